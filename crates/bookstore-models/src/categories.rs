use bookstore_db::{Column, ColumnKind, Listable};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Listable for Category {
    const ENTITY: &'static str = "Category";
    const TABLE: &'static str = "categories";
    const SOURCE: &'static str = "categories c";
    const SELECT: &'static str = "c.id, c.name, c.created_at, c.updated_at";
    const ID_COLUMN: &'static str = "c.id";
    const COLUMNS: &'static [Column] = &[
        Column::new("id", "c.id", ColumnKind::Uuid),
        Column::new("name", "c.name", ColumnKind::Text),
        Column::new("created_at", "c.created_at", ColumnKind::Timestamp),
        Column::new("updated_at", "c.updated_at", ColumnKind::Timestamp),
    ];
    const SEARCH_COLUMNS: &'static [&'static str] = &["c.name"];
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 100, message = "name must be 1 to 100 characters"))]
    pub name: String,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, max = 100, message = "name must be 1 to 100 characters"))]
    pub name: Option<String>,
}
