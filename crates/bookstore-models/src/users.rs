//! User accounts and authentication payloads.

use bookstore_auth::Role;
use bookstore_db::{Column, ColumnKind, Listable};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A user account as exposed by the API. The password hash is never part
/// of this type.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Listable for User {
    const ENTITY: &'static str = "User";
    const TABLE: &'static str = "users";
    const SOURCE: &'static str = "users u";
    const SELECT: &'static str =
        "u.id, u.user_name, u.first_name, u.last_name, u.role, u.created_at, u.updated_at";
    const ID_COLUMN: &'static str = "u.id";
    const COLUMNS: &'static [Column] = &[
        Column::new("id", "u.id", ColumnKind::Uuid),
        Column::new("user_name", "u.user_name", ColumnKind::Text),
        Column::new("first_name", "u.first_name", ColumnKind::Text),
        Column::new("last_name", "u.last_name", ColumnKind::Text),
        Column::new("role", "u.role", ColumnKind::Text),
        Column::new("created_at", "u.created_at", ColumnKind::Timestamp),
        Column::new("updated_at", "u.updated_at", ColumnKind::Timestamp),
    ];
    const SEARCH_COLUMNS: &'static [&'static str] = &["u.first_name", "u.last_name", "u.user_name"];
}

/// Login lookup row, including the bcrypt hash.
#[derive(FromRow, Debug, Clone)]
pub struct UserCredentials {
    pub id: Uuid,
    pub password: String,
    pub role: Role,
}

/// Self-service registration. New accounts always get the `user` role.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "user_name must be 3 to 50 characters"))]
    pub user_name: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "first_name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last_name is required"))]
    pub last_name: String,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "user_name is required"))]
    pub user_name: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: User,
}

/// Account creation by an admin, who may pick the role.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 3, max = 50, message = "user_name must be 3 to 50 characters"))]
    pub user_name: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "first_name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last_name is required"))]
    pub last_name: String,
    /// Defaults to `user`
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 1))]
    pub first_name: Option<String>,
    #[validate(length(min = 1))]
    pub last_name: Option<String>,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: Option<String>,
    pub role: Option<Role>,
}
