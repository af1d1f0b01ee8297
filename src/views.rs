//! View rendering
//!
//! Handlers describe what to show as a [`View`]: a template name plus a JSON
//! context. A [`ViewEngine`] turns it into a response.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

pub const BOOKINSTANCE_LIST: &str = "bookinstance_list";
pub const BOOKINSTANCE_DETAIL: &str = "bookinstance_detail";
pub const BOOKINSTANCE_FORM: &str = "bookinstance_form";
pub const BOOKINSTANCE_DELETE: &str = "bookinstance_delete";

/// A template and the values it is rendered with
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub template: &'static str,
    pub context: Map<String, Value>,
}

impl View {
    pub fn new(template: &'static str, title: impl Into<String>) -> Self {
        let mut context = Map::new();
        context.insert("title".to_string(), Value::String(title.into()));
        Self { template, context }
    }

    /// Add a context entry
    pub fn with(mut self, key: &str, value: impl Serialize) -> AppResult<Self> {
        let value = serde_json::to_value(value)
            .map_err(|e| AppError::Internal(format!("Cannot serialize view value `{}`: {}", key, e)))?;
        self.context.insert(key.to_string(), value);
        Ok(self)
    }
}

/// Renders views into HTTP responses
pub trait ViewEngine: Send + Sync {
    fn render(&self, view: View) -> AppResult<Response>;
}

/// Emits the view as a JSON document: `{"view": <template>, ...context}`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonViews;

impl ViewEngine for JsonViews {
    fn render(&self, view: View) -> AppResult<Response> {
        let mut body = view.context;
        body.insert("view".to_string(), Value::String(view.template.to_string()));
        Ok(Json(Value::Object(body)).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_view_context() {
        let view = View::new(BOOKINSTANCE_LIST, "Book Instance List")
            .with("bookinstance_list", Vec::<String>::new())
            .unwrap();
        assert_eq!(view.context["title"], "Book Instance List");
        assert!(view.context["bookinstance_list"].is_array());
    }

    #[test]
    fn test_json_views_status() {
        let view = View::new(BOOKINSTANCE_FORM, "Create Book Instance");
        let response = JsonViews.render(view).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
