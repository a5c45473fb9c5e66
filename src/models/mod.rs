//! Data models for Bookshelf

pub mod book;

pub use book::{Book, BookFilter, BookInput, ListBooksQuery, NewBook, PriceSort, SearchBooksQuery};
