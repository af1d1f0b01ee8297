//! Business logic services

pub mod book_instances;

use std::sync::Arc;

use crate::repository::{BookInstanceStore, BookStore, Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub book_instances: book_instances::BookInstanceService,
}

impl Services {
    /// Create all services backed by the given repository
    pub fn new(repository: Repository) -> Self {
        Self::from_stores(
            Arc::new(repository.books),
            Arc::new(repository.book_instances),
        )
    }

    /// Create all services over arbitrary stores
    pub fn from_stores(books: Arc<dyn BookStore>, book_instances: Arc<dyn BookInstanceStore>) -> Self {
        Self {
            book_instances: book_instances::BookInstanceService::new(books, book_instances),
        }
    }
}
