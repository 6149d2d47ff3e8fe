use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Metadata for an uploaded book cover. The file itself lives in file
/// storage under `cover_path`.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct BookCover {
    pub id: Uuid,
    pub book_id: Uuid,
    pub image_name: String,
    /// Storage key
    pub cover_path: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct BookCoverResponse {
    #[serde(flatten)]
    pub cover: BookCover,
    /// Public URL the image is served from
    pub url: String,
}
