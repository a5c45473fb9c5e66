//! Catalog management service

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::book::{Book, BookFilter, BookInput, ListBooksQuery, NewBook},
    repository::BookRepository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn BookRepository>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }

    /// List books matching the query parameters
    pub async fn list_books(&self, query: ListBooksQuery) -> AppResult<Vec<Book>> {
        let filter = BookFilter::try_from(query)?;
        self.repository.books_list(&filter).await
    }

    /// Search books by title or author; a blank term lists everything
    pub async fn search_books(&self, term: Option<&str>) -> AppResult<Vec<Book>> {
        match term.map(str::trim).filter(|t| !t.is_empty()) {
            Some(term) => self.repository.books_search(term).await,
            None => self.repository.books_list(&BookFilter::default()).await,
        }
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books_get_by_id(id).await
    }

    /// Create a new book
    pub async fn create_book(&self, input: BookInput) -> AppResult<Book> {
        let book = NewBook::try_from(input)?;
        let created = self.repository.books_create(&book).await?;
        tracing::info!(id = created.id, title = %created.title, "Book created");
        Ok(created)
    }

    /// Replace every editable field of an existing book
    pub async fn update_book(&self, id: i32, input: BookInput) -> AppResult<Book> {
        let book = NewBook::try_from(input)?;
        let updated = self.repository.books_update(id, &book).await?;
        tracing::info!(id, "Book updated");
        Ok(updated)
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books_delete(id).await?;
        tracing::info!(id, "Book deleted");
        Ok(())
    }

    /// Check storage connectivity
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
