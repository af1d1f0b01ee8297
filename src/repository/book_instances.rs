//! Book instances repository

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, Pool, Postgres};
use uuid::Uuid;

use super::BookInstanceStore;
use crate::{
    error::AppResult,
    models::{Book, BookInstance, BookInstanceDetail},
};

const SELECT_WITH_BOOK: &str = r#"
    SELECT bi.id, bi.imprint, bi.status, bi.due_back,
           b.id AS book_id, b.title AS book_title, b.isbn AS book_isbn, b.summary AS book_summary
    FROM book_instances bi
    JOIN books b ON b.id = bi.book_id
"#;

/// Joined copy + book row
#[derive(FromRow)]
struct BookInstanceRow {
    id: Uuid,
    imprint: String,
    status: String,
    due_back: Option<NaiveDate>,
    book_id: Uuid,
    book_title: String,
    book_isbn: Option<String>,
    book_summary: Option<String>,
}

impl From<BookInstanceRow> for BookInstanceDetail {
    fn from(row: BookInstanceRow) -> Self {
        Self {
            id: row.id,
            book: Book {
                id: row.book_id,
                title: row.book_title,
                isbn: row.book_isbn,
                summary: row.book_summary,
            },
            imprint: row.imprint,
            status: row.status,
            due_back: row.due_back,
        }
    }
}

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookInstanceStore for BookInstancesRepository {
    async fn list_with_books(&self) -> AppResult<Vec<BookInstanceDetail>> {
        let rows = sqlx::query_as::<_, BookInstanceRow>(SELECT_WITH_BOOK)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(BookInstanceDetail::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        let row = sqlx::query_as::<_, BookInstance>(
            "SELECT id, book_id, imprint, status, due_back FROM book_instances WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_with_book(&self, id: Uuid) -> AppResult<Option<BookInstanceDetail>> {
        let query = format!("{} WHERE bi.id = $1", SELECT_WITH_BOOK);
        let row = sqlx::query_as::<_, BookInstanceRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(BookInstanceDetail::from))
    }

    async fn insert(&self, instance: &BookInstance) -> AppResult<BookInstance> {
        let row = sqlx::query_as::<_, BookInstance>(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, status, due_back)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, book_id, imprint, status, due_back
            "#,
        )
        .bind(instance.id)
        .bind(instance.book)
        .bind(&instance.imprint)
        .bind(&instance.status)
        .bind(instance.due_back)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, instance: &BookInstance) -> AppResult<Option<BookInstance>> {
        let row = sqlx::query_as::<_, BookInstance>(
            r#"
            UPDATE book_instances
            SET book_id = $2, imprint = $3, status = $4, due_back = $5
            WHERE id = $1
            RETURNING id, book_id, imprint, status, due_back
            "#,
        )
        .bind(instance.id)
        .bind(instance.book)
        .bind(&instance.imprint)
        .bind(&instance.status)
        .bind(instance.due_back)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
