//! Data models for the catalog

pub mod book;
pub mod book_instance;

// Re-export commonly used types
pub use book::Book;
pub use book_instance::{
    BookInstance, BookInstanceDetail, BookInstanceForm, BookInstanceStatus, NewBookInstance,
};
