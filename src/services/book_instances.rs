//! Book copy management service

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book_instance::{BookInstanceValues, FieldError, InvalidSubmission},
        Book, BookInstance, BookInstanceDetail, BookInstanceForm,
    },
    repository::{BookInstanceStore, BookStore},
};

pub const COPY_NOT_FOUND: &str = "Book copy not found";
pub const INSTANCE_NOT_FOUND: &str = "Book Instance not found";

/// Outcome of a create/update form submission
#[derive(Debug)]
pub enum Submission {
    /// Persisted copy
    Saved(BookInstance),
    /// Validation failed; nothing was written
    Rejected {
        values: BookInstanceValues,
        errors: Vec<FieldError>,
        books: Vec<Book>,
    },
}

/// Data shown by the update form
#[derive(Debug)]
pub struct EditForm {
    pub instance: BookInstanceDetail,
    pub books: Vec<Book>,
}

#[derive(Clone)]
pub struct BookInstanceService {
    books: Arc<dyn BookStore>,
    instances: Arc<dyn BookInstanceStore>,
}

impl BookInstanceService {
    pub fn new(books: Arc<dyn BookStore>, instances: Arc<dyn BookInstanceStore>) -> Self {
        Self { books, instances }
    }

    pub async fn list(&self) -> AppResult<Vec<BookInstanceDetail>> {
        self.instances.list_with_books().await
    }

    pub async fn get_detail(&self, id: Uuid) -> AppResult<BookInstanceDetail> {
        self.instances
            .find_with_book(id)
            .await?
            .ok_or_else(|| AppError::NotFound(COPY_NOT_FOUND.to_string()))
    }

    /// Books offered by the copy form
    pub async fn form_books(&self) -> AppResult<Vec<Book>> {
        self.books.list().await
    }

    pub async fn create(&self, form: BookInstanceForm) -> AppResult<Submission> {
        let new = match form.sanitize() {
            Ok(new) => new,
            Err(invalid) => return self.reject(invalid).await,
        };

        let instance = self.instances.insert(&new.into_instance(Uuid::new_v4())).await?;
        tracing::info!("Created book instance {}", instance.id);
        Ok(Submission::Saved(instance))
    }

    /// Copy to confirm deletion of, if it still exists
    pub async fn delete_target(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        self.instances.find_by_id(id).await
    }

    pub async fn delete(&self, instance_id: &str) -> AppResult<()> {
        let id = Uuid::parse_str(instance_id.trim())
            .map_err(|_| AppError::BadRequest(format!("Invalid book instance id: {}", instance_id)))?;

        // Only surfaces store failures; a missing copy is still removed as a no-op
        self.instances.find_by_id(id).await?;
        self.instances.delete(id).await?;
        tracing::info!("Deleted book instance {}", id);
        Ok(())
    }

    pub async fn edit_form(&self, id: Uuid) -> AppResult<EditForm> {
        let (instance, books) =
            tokio::try_join!(self.instances.find_with_book(id), self.books.list())?;
        let instance = instance.ok_or_else(|| AppError::NotFound(INSTANCE_NOT_FOUND.to_string()))?;
        Ok(EditForm { instance, books })
    }

    pub async fn update(&self, id: Uuid, form: BookInstanceForm) -> AppResult<Submission> {
        let new = match form.sanitize() {
            Ok(new) => new,
            Err(invalid) => return self.reject(invalid).await,
        };

        let instance = self
            .instances
            .update(&new.into_instance(id))
            .await?
            .ok_or_else(|| AppError::NotFound(INSTANCE_NOT_FOUND.to_string()))?;
        tracing::info!("Updated book instance {}", instance.id);
        Ok(Submission::Saved(instance))
    }

    async fn reject(&self, invalid: InvalidSubmission) -> AppResult<Submission> {
        tracing::debug!("Rejected book instance form: {:?}", invalid.errors);
        let books = self.books.list().await?;
        Ok(Submission::Rejected {
            values: invalid.values,
            errors: invalid.errors,
            books,
        })
    }
}
