//! SQL construction for book listings.
//!
//! Builders here are pure: they turn a [`BookFilter`] into SQL text plus the
//! ordered values to bind, so the exact statement can be checked without a
//! database. Placeholders are numbered `$1..$n` in bind order.

use crate::models::book::{BookFilter, PriceSort};

const SELECT_BOOKS: &str =
    "SELECT id, title, author, publish_year, genre, price, created_at FROM books";

/// A value bound to a numbered placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
    I32(i32),
}

/// SQL text and its bind values, in placeholder order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookQuerySpec {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

/// Escape LIKE wildcards so the value matches literally (backslash is the
/// default escape character for Postgres LIKE/ILIKE)
fn like_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn contains_pattern(value: &str) -> String {
    format!("%{}%", like_escape(value))
}

/// Build the listing statement for a filter
pub fn build_list_query(filter: &BookFilter) -> BookQuerySpec {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();

    if let Some(genre) = &filter.genre {
        binds.push(BindValue::Text(genre.clone()));
        conditions.push(format!("genre = ${}", binds.len()));
    }

    if let Some(author) = &filter.author {
        binds.push(BindValue::Text(contains_pattern(author)));
        conditions.push(format!("author ILIKE ${}", binds.len()));
    }

    if let Some(min_year) = filter.min_year {
        binds.push(BindValue::I32(min_year));
        conditions.push(format!("publish_year >= ${}", binds.len()));
    }

    if let Some(max_year) = filter.max_year {
        binds.push(BindValue::I32(max_year));
        conditions.push(format!("publish_year <= ${}", binds.len()));
    }

    let mut sql = String::from(SELECT_BOOKS);

    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }

    sql.push_str(" ORDER BY ");
    sql.push_str(match filter.sort {
        Some(PriceSort::Asc) => "price ASC NULLS LAST, id ASC",
        Some(PriceSort::Desc) => "price DESC NULLS LAST, id ASC",
        None => "id ASC",
    });

    BookQuerySpec { sql, binds }
}

/// Build the free-text search statement (title or author, case-insensitive)
pub fn build_search_query(term: &str) -> BookQuerySpec {
    BookQuerySpec {
        sql: format!("{} WHERE (title ILIKE $1 OR author ILIKE $1) ORDER BY id ASC", SELECT_BOOKS),
        binds: vec![BindValue::Text(contains_pattern(term))],
    }
}
