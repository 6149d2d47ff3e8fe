use bookstore_db::{Column, ColumnKind, Listable};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub biography: String,
    pub nationality: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Listable for Author {
    const ENTITY: &'static str = "Author";
    const TABLE: &'static str = "authors";
    const SOURCE: &'static str = "authors a";
    const SELECT: &'static str =
        "a.id, a.name, a.biography, a.nationality, a.created_at, a.updated_at";
    const ID_COLUMN: &'static str = "a.id";
    const COLUMNS: &'static [Column] = &[
        Column::new("id", "a.id", ColumnKind::Uuid),
        Column::new("name", "a.name", ColumnKind::Text),
        Column::new("biography", "a.biography", ColumnKind::Text),
        Column::new("nationality", "a.nationality", ColumnKind::Text),
        Column::new("created_at", "a.created_at", ColumnKind::Timestamp),
        Column::new("updated_at", "a.updated_at", ColumnKind::Timestamp),
    ];
    const SEARCH_COLUMNS: &'static [&'static str] = &["a.name", "a.biography", "a.nationality"];
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateAuthorDto {
    #[validate(length(min = 1, max = 200, message = "name must be 1 to 200 characters"))]
    pub name: String,
    #[serde(default)]
    pub biography: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub nationality: String,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateAuthorDto {
    #[validate(length(min = 1, max = 200, message = "name must be 1 to 200 characters"))]
    pub name: Option<String>,
    pub biography: Option<String>,
    #[validate(length(max = 100))]
    pub nationality: Option<String>,
}
