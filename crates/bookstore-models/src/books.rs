//! The book catalogue.
//!
//! Book rows are always read joined with their author and category so
//! responses carry both names, and so callers can filter, sort and search
//! on them.

use bookstore_db::{Column, ColumnKind, Listable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub publication_date: NaiveDate,
    pub price: f64,
    pub quantity: i32,
    /// User who added the book
    pub user_id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub category_id: Uuid,
    pub category_name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Listable for Book {
    const ENTITY: &'static str = "Book";
    const TABLE: &'static str = "books";
    const SOURCE: &'static str = "books b \
        JOIN authors a ON a.id = b.author_id \
        JOIN categories c ON c.id = b.category_id";
    const SELECT: &'static str = "b.id, b.title, b.publication_date, b.price, b.quantity, \
        b.user_id, b.author_id, a.name AS author_name, b.category_id, c.name AS category_name, \
        b.created_at, b.updated_at";
    const ID_COLUMN: &'static str = "b.id";
    const COLUMNS: &'static [Column] = &[
        Column::new("id", "b.id", ColumnKind::Uuid),
        Column::new("title", "b.title", ColumnKind::Text),
        Column::new("publication_date", "b.publication_date", ColumnKind::Date),
        Column::new("price", "b.price", ColumnKind::Float),
        Column::new("quantity", "b.quantity", ColumnKind::Integer),
        Column::new("user_id", "b.user_id", ColumnKind::Uuid),
        Column::new("author_id", "b.author_id", ColumnKind::Uuid),
        Column::new("author_name", "a.name", ColumnKind::Text),
        Column::new("category_id", "b.category_id", ColumnKind::Uuid),
        Column::new("category_name", "c.name", ColumnKind::Text),
        Column::new("created_at", "b.created_at", ColumnKind::Timestamp),
        Column::new("updated_at", "b.updated_at", ColumnKind::Timestamp),
    ];
    const SEARCH_COLUMNS: &'static [&'static str] = &["b.title", "a.name", "c.name"];
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateBookDto {
    #[validate(length(min = 1, max = 255, message = "title must be 1 to 255 characters"))]
    pub title: String,
    /// `YYYY-MM-DD`
    pub publication_date: NaiveDate,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: i32,
    pub author_id: Uuid,
    pub category_id: Uuid,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateBookDto {
    #[validate(length(min = 1, max = 255, message = "title must be 1 to 255 characters"))]
    pub title: Option<String>,
    pub publication_date: Option<NaiveDate>,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: Option<i32>,
    pub author_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}
