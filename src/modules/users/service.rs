use bookstore_core::{AppError, FilterParam, hash_password};
use bookstore_db::{Page, PgPool, StoreError, delete_by_id, find_by_id, find_many};
use bookstore_models::{CreateUserDto, UpdateUserDto, User};
use tracing::instrument;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, user_name, first_name, last_name, role, created_at, updated_at";

pub struct UserService;

impl UserService {
    #[instrument(skip(db, dto), fields(user_name = %dto.user_name))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE user_name = $1)")
                .bind(&dto.user_name)
                .fetch_one(db)
                .await
                .map_err(StoreError::from)?;

        if taken {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "User name already taken"
            )));
        }

        let hashed_password = hash_password(&dto.password)?;
        let role = dto.role.unwrap_or_default();

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (user_name, password, first_name, last_name, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&dto.user_name)
        .bind(&hashed_password)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(role)
        .fetch_one(db)
        .await
        .map_err(StoreError::from)?;

        tracing::info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn get_users(db: &PgPool, filter: &FilterParam) -> Result<Page<User>, AppError> {
        Ok(find_many::<User>(db, filter).await?)
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        Ok(find_by_id::<User>(db, id).await?)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_user(db: &PgPool, id: Uuid, dto: UpdateUserDto) -> Result<User, AppError> {
        let hashed_password = dto.password.as_deref().map(hash_password).transpose()?;

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET first_name = COALESCE($1, first_name),
                 last_name = COALESCE($2, last_name),
                 password = COALESCE($3, password),
                 role = COALESCE($4, role),
                 updated_at = NOW()
             WHERE id = $5
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&hashed_password)
        .bind(dto.role)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(StoreError::from)?
        .ok_or(StoreError::not_found("User"))?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        delete_by_id::<User>(db, id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}
