//! Repository layer for database operations

pub mod book_instances;
pub mod books;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Book, BookInstance, BookInstanceDetail},
};

/// Read access to catalog books
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books, for selection lists
    async fn list(&self) -> AppResult<Vec<Book>>;
}

/// Persistence of book copies
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookInstanceStore: Send + Sync {
    /// All copies with their book populated, in store order
    async fn list_with_books(&self) -> AppResult<Vec<BookInstanceDetail>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BookInstance>>;

    async fn find_with_book(&self, id: Uuid) -> AppResult<Option<BookInstanceDetail>>;

    async fn insert(&self, instance: &BookInstance) -> AppResult<BookInstance>;

    /// Replace the fields of an existing copy; `None` when no copy has `instance.id`
    async fn update(&self, instance: &BookInstance) -> AppResult<Option<BookInstance>>;

    /// Remove a copy; removing a missing copy is not an error
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub book_instances: book_instances::BookInstancesRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            book_instances: book_instances::BookInstancesRepository::new(pool.clone()),
            pool,
        }
    }
}
