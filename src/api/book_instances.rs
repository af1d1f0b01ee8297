//! Book instance (copy) pages

use axum::{
    extract::{Path, State},
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book_instance::{DeleteBookInstanceForm, LIST_URL},
        BookInstanceForm, BookInstanceStatus,
    },
    services::book_instances::Submission,
    views::{View, BOOKINSTANCE_DELETE, BOOKINSTANCE_DETAIL, BOOKINSTANCE_FORM, BOOKINSTANCE_LIST},
    AppState,
};

const CREATE_TITLE: &str = "Create Book Instance";
const UPDATE_TITLE: &str = "Update Book Instance";

/// 302 redirect, as browsers expect after a form post
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

fn status_options() -> Vec<&'static str> {
    BookInstanceStatus::ALL.iter().map(|s| s.as_str()).collect()
}

/// Render the form again with the rejected values, or redirect to the saved copy
fn submission_response(state: &AppState, title: &str, submission: Submission) -> AppResult<Response> {
    match submission {
        Submission::Saved(instance) => Ok(found(&instance.url())),
        Submission::Rejected { values, errors, books } => {
            let view = View::new(BOOKINSTANCE_FORM, title)
                .with("books", books)?
                .with("bookinstance", values)?
                .with("statuses", status_options())?
                .with("errors", errors)?;
            state.views.render(view)
        }
    }
}

/// List all book copies
#[utoipa::path(
    get,
    path = "/catalog/bookinstances",
    tag = "bookinstances",
    responses(
        (status = 200, description = "Copy list view", body = Vec<crate::models::BookInstanceDetail>)
    )
)]
pub async fn bookinstance_list(State(state): State<AppState>) -> AppResult<Response> {
    let instances = state.services.book_instances.list().await?;
    let view = View::new(BOOKINSTANCE_LIST, "Book Instance List").with("bookinstance_list", instances)?;
    state.views.render(view)
}

/// Show one book copy
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}",
    tag = "bookinstances",
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Copy detail view", body = crate::models::BookInstanceDetail),
        (status = 404, description = "Book copy not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn bookinstance_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let instance = state.services.book_instances.get_detail(id).await?;
    let title = format!("Copy: {}", instance.book.title);
    let view = View::new(BOOKINSTANCE_DETAIL, title).with("bookinstance", instance)?;
    state.views.render(view)
}

/// Show the create form
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    responses(
        (status = 200, description = "Create form view")
    )
)]
pub async fn bookinstance_create_get(State(state): State<AppState>) -> AppResult<Response> {
    let books = state.services.book_instances.form_books().await?;
    let view = View::new(BOOKINSTANCE_FORM, CREATE_TITLE)
        .with("books", books)?
        .with("statuses", status_options())?;
    state.views.render(view)
}

/// Create a book copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    request_body(content = BookInstanceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Redirect to the new copy"),
        (status = 200, description = "Form redisplayed with validation errors")
    )
)]
pub async fn bookinstance_create_post(
    State(state): State<AppState>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Response> {
    let submission = state.services.book_instances.create(form).await?;
    submission_response(&state, CREATE_TITLE, submission)
}

/// Show the delete confirmation
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Delete confirmation view"),
        (status = 302, description = "Copy does not exist, redirect to the list")
    )
)]
pub async fn bookinstance_delete_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let Some(instance) = state.services.book_instances.delete_target(id).await? else {
        return Ok(found(LIST_URL));
    };
    let view = View::new(BOOKINSTANCE_DELETE, "Book Instance Delete").with("instance", instance)?;
    state.views.render(view)
}

/// Delete a book copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(("id" = Uuid, Path, description = "Book instance ID")),
    request_body(content = DeleteBookInstanceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Redirect to the list")
    )
)]
pub async fn bookinstance_delete_post(
    State(state): State<AppState>,
    Form(form): Form<DeleteBookInstanceForm>,
) -> AppResult<Response> {
    state.services.book_instances.delete(&form.instanceid).await?;
    Ok(found(LIST_URL))
}

/// Show the update form
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Update form view"),
        (status = 404, description = "Book Instance not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn bookinstance_update_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let edit = state.services.book_instances.edit_form(id).await?;
    let view = View::new(BOOKINSTANCE_FORM, UPDATE_TITLE)
        .with("bookinstance", edit.instance)?
        .with("books", edit.books)?
        .with("statuses", status_options())?;
    state.views.render(view)
}

/// Update a book copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(("id" = Uuid, Path, description = "Book instance ID")),
    request_body(content = BookInstanceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Redirect to the updated copy"),
        (status = 200, description = "Form redisplayed with validation errors"),
        (status = 404, description = "Book Instance not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn bookinstance_update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Response> {
    let submission = state.services.book_instances.update(id, form).await?;
    submission_response(&state, UPDATE_TITLE, submission)
}
