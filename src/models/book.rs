//! Book model and request types

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub publish_year: Option<i32>,
    pub genre: Option<String>,
    /// Decimal price, serialized as a string (e.g. "12.99")
    pub price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// Column widths of the `books` table
pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_AUTHOR_LEN: usize = 255;
pub const MAX_GENRE_LEN: usize = 100;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText<T> {
    Number(T),
    Text(String),
}

/// Accepts a JSON number or a numeric string. A blank string counts as absent.
fn number_or_text<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
{
    match Option::<NumberOrText<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(value)) => Ok(Some(value)),
        Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(text)) => text
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| de::Error::custom(format!("invalid number '{}': {}", text, e))),
    }
}

/// Create / replace book request.
///
/// `title` and `author` are optional at the serde level so that a missing
/// field surfaces as a validation error rather than a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[validate(
        required(message = "Title and author are required"),
        length(min = 1, message = "Title and author are required")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "Title and author are required"),
        length(min = 1, message = "Title and author are required")
    )]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub publish_year: Option<i32>,
    #[validate(length(max = 100, message = "Genre must be at most 100 characters"))]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub price: Option<Decimal>,
}

/// Validated book fields, as written to storage
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publish_year: Option<i32>,
    pub genre: Option<String>,
    pub price: Option<Decimal>,
}

impl TryFrom<BookInput> for NewBook {
    type Error = AppError;

    fn try_from(input: BookInput) -> AppResult<Self> {
        input.validate()?;

        let (Some(title), Some(author)) = (input.title, input.author) else {
            return Err(AppError::Validation("Title and author are required".to_string()));
        };
        if title.chars().count() > MAX_TITLE_LEN || author.chars().count() > MAX_AUTHOR_LEN {
            return Err(AppError::Validation(format!(
                "Title and author must be at most {} characters",
                MAX_TITLE_LEN
            )));
        }

        Ok(Self {
            title,
            author,
            publish_year: input.publish_year,
            genre: input.genre.filter(|g| !g.is_empty()),
            price: input.price,
        })
    }
}

/// Book listing query parameters (API). Values are kept as raw strings and
/// checked when converted into a [`BookFilter`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListBooksQuery {
    /// Exact genre
    pub genre: Option<String>,
    /// Case-insensitive substring of the author
    pub author: Option<String>,
    /// Inclusive lower bound on publish_year
    pub min_year: Option<String>,
    /// Inclusive upper bound on publish_year
    pub max_year: Option<String>,
    /// Only `price` is supported
    pub sort_by: Option<String>,
    /// `desc` for descending, anything else ascending
    pub order: Option<String>,
}

/// Free-text search parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SearchBooksQuery {
    pub term: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSort {
    Asc,
    Desc,
}

/// Structured listing filter; every `None` means no constraint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub genre: Option<String>,
    pub author: Option<String>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub sort: Option<PriceSort>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_year(name: &str, value: Option<String>) -> AppResult<Option<i32>> {
    match non_empty(value) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{} must be an integer, got '{}'", name, raw))),
    }
}

impl TryFrom<ListBooksQuery> for BookFilter {
    type Error = AppError;

    fn try_from(query: ListBooksQuery) -> AppResult<Self> {
        let sort = match query.sort_by.as_deref() {
            Some("price") => Some(if query.order.as_deref() == Some("desc") {
                PriceSort::Desc
            } else {
                PriceSort::Asc
            }),
            _ => None,
        };

        Ok(Self {
            genre: non_empty(query.genre),
            author: non_empty(query.author),
            min_year: parse_year("min_year", query.min_year)?,
            max_year: parse_year("max_year", query.max_year)?,
            sort,
        })
    }
}
