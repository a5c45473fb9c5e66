//! Books table access on Repository

use async_trait::async_trait;
use sqlx::{postgres::PgArguments, query::QueryAs, Postgres};

use super::{
    query::{build_list_query, build_search_query, BindValue, BookQuerySpec},
    BookRepository, Repository,
};
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookFilter, NewBook},
};

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Book {} not found", id))
}

fn bind_all<'q>(
    mut query: QueryAs<'q, Postgres, Book, PgArguments>,
    binds: &'q [BindValue],
) -> QueryAs<'q, Postgres, Book, PgArguments> {
    for value in binds {
        query = match value {
            BindValue::Text(text) => query.bind(text),
            BindValue::I32(int) => query.bind(*int),
        };
    }
    query
}

impl Repository {
    async fn fetch_books(&self, spec: &BookQuerySpec) -> AppResult<Vec<Book>> {
        tracing::debug!(sql = %spec.sql, binds = spec.binds.len(), "Fetching books");
        let query = sqlx::query_as::<_, Book>(&spec.sql);
        let books = bind_all(query, &spec.binds).fetch_all(&self.pool).await?;
        Ok(books)
    }
}

#[async_trait]
impl BookRepository for Repository {
    async fn books_list(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        self.fetch_books(&build_list_query(filter)).await
    }

    async fn books_search(&self, term: &str) -> AppResult<Vec<Book>> {
        self.fetch_books(&build_search_query(term)).await
    }

    async fn books_get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "SELECT id, title, author, publish_year, genre, price, created_at FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))
    }

    async fn books_create(&self, book: &NewBook) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, publish_year, genre, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, author, publish_year, genre, price, created_at
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.publish_year)
        .bind(&book.genre)
        .bind(book.price)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn books_update(&self, id: i32, book: &NewBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title = $1,
                author = $2,
                publish_year = $3,
                genre = $4,
                price = $5
            WHERE id = $6
            RETURNING id, title, author, publish_year, genre, price, created_at
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.publish_year)
        .bind(&book.genre)
        .bind(book.price)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))
    }

    async fn books_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
