//! HTTP client for the book endpoints.
//!
//! Callers that display a listing re-fetch it after every mutation; the
//! client itself keeps no state beyond the base URL.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{
    api::books::MessageResponse,
    error::ErrorResponse,
    models::book::{Book, BookInput, ListBooksQuery, SearchBooksQuery},
};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },
}

impl ClientError {
    /// Status code returned by the server, if the request got that far
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http(e) => e.status(),
            ClientError::Api { status, .. } => Some(*status),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Clone)]
pub struct BooksClient {
    http: reqwest::Client,
    base_url: String,
}

impl BooksClient {
    /// `base_url` is the API root, e.g. `http://localhost:3000/api`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.message,
            Err(_) => status.canonical_reason().unwrap_or("Unknown error").to_string(),
        };
        Err(ClientError::Api { status, message })
    }

    pub async fn list_books(&self, query: &ListBooksQuery) -> ClientResult<Vec<Book>> {
        let response = self.http.get(self.url("/books")).query(query).send().await?;
        Self::decode(response).await
    }

    pub async fn search_books(&self, term: &str) -> ClientResult<Vec<Book>> {
        let query = SearchBooksQuery {
            term: Some(term.to_string()),
        };
        let response = self
            .http
            .get(self.url("/books/search"))
            .query(&query)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn get_book(&self, id: i32) -> ClientResult<Book> {
        let response = self.http.get(self.url(&format!("/books/{}", id))).send().await?;
        Self::decode(response).await
    }

    pub async fn create_book(&self, input: &BookInput) -> ClientResult<Book> {
        let response = self.http.post(self.url("/books")).json(input).send().await?;
        Self::decode(response).await
    }

    pub async fn update_book(&self, id: i32, input: &BookInput) -> ClientResult<Book> {
        let response = self
            .http
            .put(self.url(&format!("/books/{}", id)))
            .json(input)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn delete_book(&self, id: i32) -> ClientResult<String> {
        let response = self
            .http
            .delete(self.url(&format!("/books/{}", id)))
            .send()
            .await?;
        let body: MessageResponse = Self::decode(response).await?;
        Ok(body.message)
    }
}
