use anyhow::{Context, bail};
use bookstore_auth::Role;
use bookstore_core::hash_password;
use bookstore_db::PgPool;
use uuid::Uuid;

pub struct NewAdmin<'a> {
    pub user_name: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password: &'a str,
}

/// Inserts an `admin` account. Fails if the user name is taken.
pub async fn create_admin(db: &PgPool, admin: NewAdmin<'_>) -> anyhow::Result<Uuid> {
    if admin.password.len() < 8 {
        bail!("Password must be at least 8 characters");
    }

    let hashed_password = hash_password(admin.password).map_err(|e| e.error)?;

    let user_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (user_name, password, first_name, last_name, role)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (user_name) DO NOTHING
         RETURNING id",
    )
    .bind(admin.user_name)
    .bind(&hashed_password)
    .bind(admin.first_name)
    .bind(admin.last_name)
    .bind(Role::Admin)
    .fetch_optional(db)
    .await
    .context("Failed to insert admin")?;

    match user_id {
        Some(id) => Ok(id),
        None => bail!("User name '{}' is already taken", admin.user_name),
    }
}
