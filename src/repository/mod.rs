//! Repository layer for database operations

pub mod books;
pub mod query;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::book::{Book, BookFilter, NewBook},
};

/// Book storage interface.
///
/// Missing rows are reported as `AppError::NotFound`; storage failures as
/// `AppError::Database`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// List books matching every constraint of the filter
    async fn books_list(&self, filter: &BookFilter) -> AppResult<Vec<Book>>;

    /// Books whose title or author contains `term`, case-insensitively
    async fn books_search(&self, term: &str) -> AppResult<Vec<Book>>;

    async fn books_get_by_id(&self, id: i32) -> AppResult<Book>;

    /// Insert a book and return the stored row
    async fn books_create(&self, book: &NewBook) -> AppResult<Book>;

    /// Replace every editable field of an existing book
    async fn books_update(&self, id: i32, book: &NewBook) -> AppResult<Book>;

    async fn books_delete(&self, id: i32) -> AppResult<()>;

    /// Round-trip to storage, used by the readiness probe
    async fn ping(&self) -> AppResult<()>;
}

/// Postgres-backed repository holding the shared connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}
