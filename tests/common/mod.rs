//! In-memory `BookRepository` for router tests

#![allow(dead_code)]

use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response, Router};
use bookshelf_server::{
    api,
    error::{AppError, AppResult},
    models::book::{Book, BookFilter, NewBook, PriceSort},
    repository::BookRepository,
    services::Services,
    AppConfig, AppState,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

#[derive(Default)]
pub struct MemoryBookRepository {
    books: Mutex<Vec<Book>>,
    next_id: Mutex<i32>,
    fail: bool,
}

impl MemoryBookRepository {
    /// A repository whose every call fails like an unreachable database
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Default::default()
        })
    }

    pub fn snapshot(&self) -> Vec<Book> {
        self.books.lock().unwrap().clone()
    }

    fn insert(&self, book: &NewBook) -> Book {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let stored = Book {
            id: *next_id,
            title: book.title.clone(),
            author: book.author.clone(),
            publish_year: book.publish_year,
            genre: book.genre.clone(),
            price: book.price,
            created_at: Utc::now(),
        };
        self.books.lock().unwrap().push(stored.clone());
        stored
    }

    fn check(&self) -> AppResult<()> {
        if self.fail {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn matches(filter: &BookFilter, book: &Book) -> bool {
    let year_ok = |bound: Option<i32>, cmp: fn(i32, i32) -> bool| match bound {
        None => true,
        Some(bound) => book.publish_year.map_or(false, |y| cmp(y, bound)),
    };

    filter.genre.as_ref().map_or(true, |g| book.genre.as_ref() == Some(g))
        && filter
            .author
            .as_ref()
            .map_or(true, |a| book.author.to_lowercase().contains(&a.to_lowercase()))
        && year_ok(filter.min_year, |y, b| y >= b)
        && year_ok(filter.max_year, |y, b| y <= b)
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn books_list(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        self.check()?;
        let mut books: Vec<Book> = self
            .snapshot()
            .into_iter()
            .filter(|b| matches(filter, b))
            .collect();

        if let Some(sort) = filter.sort {
            books.sort_by(|a, b| {
                let by_price = match (a.price, b.price) {
                    (Some(x), Some(y)) if sort == PriceSort::Asc => x.cmp(&y),
                    (Some(x), Some(y)) => y.cmp(&x),
                    // nulls last in both directions
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                by_price.then(a.id.cmp(&b.id))
            });
        }
        Ok(books)
    }

    async fn books_search(&self, term: &str) -> AppResult<Vec<Book>> {
        self.check()?;
        let term = term.to_lowercase();
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|b| b.title.to_lowercase().contains(&term) || b.author.to_lowercase().contains(&term))
            .collect())
    }

    async fn books_get_by_id(&self, id: i32) -> AppResult<Book> {
        self.check()?;
        self.snapshot()
            .into_iter()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    async fn books_create(&self, book: &NewBook) -> AppResult<Book> {
        self.check()?;
        Ok(self.insert(book))
    }

    async fn books_update(&self, id: i32, book: &NewBook) -> AppResult<Book> {
        self.check()?;
        let mut books = self.books.lock().unwrap();
        let stored = books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
        stored.title = book.title.clone();
        stored.author = book.author.clone();
        stored.publish_year = book.publish_year;
        stored.genre = book.genre.clone();
        stored.price = book.price;
        Ok(stored.clone())
    }

    async fn books_delete(&self, id: i32) -> AppResult<()> {
        self.check()?;
        let mut books = self.books.lock().unwrap();
        let before = books.len();
        books.retain(|b| b.id != id);
        if books.len() == before {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        self.check()
    }
}

pub fn new_book(title: &str, author: &str, year: i32, genre: &str, price: &str) -> NewBook {
    NewBook {
        title: title.to_string(),
        author: author.to_string(),
        publish_year: Some(year),
        genre: Some(genre.to_string()),
        price: Some(price.parse::<Decimal>().unwrap()),
    }
}

/// Five-book sample catalog, ids 1..=5 in insertion order
pub fn seeded() -> Arc<MemoryBookRepository> {
    let repo = MemoryBookRepository::default();
    for book in [
        new_book("To Kill a Mockingbird", "Harper Lee", 1960, "Fiction", "12.99"),
        new_book("1984", "George Orwell", 1949, "Dystopian", "10.99"),
        new_book("Pride and Prejudice", "Jane Austen", 1813, "Romance", "9.99"),
        new_book("The Great Gatsby", "F. Scott Fitzgerald", 1925, "Classic", "11.99"),
        new_book("The Hobbit", "J.R.R. Tolkien", 1937, "Fantasy", "14.99"),
    ] {
        repo.insert(&book);
    }
    Arc::new(repo)
}

pub fn app(repo: Arc<MemoryBookRepository>) -> Router {
    let state = AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(Services::new(repo)),
    };
    api::create_router(state)
}

pub async fn send(app: Router, request: Request<Body>) -> (Response, Value) {
    let response = app.oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (Response::from_parts(parts, Body::empty()), value)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub fn json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn titles(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect()
}
