use bookstore_core::{AppError, FilterParam};
use bookstore_db::{Page, PgPool, StoreError, delete_by_id, find_by_id, find_many};
use bookstore_models::{Category, CreateCategoryDto, UpdateCategoryDto};
use tracing::instrument;
use uuid::Uuid;

pub struct CategoryService;

impl CategoryService {
    #[instrument(skip(db))]
    pub async fn create_category(
        db: &PgPool,
        dto: CreateCategoryDto,
    ) -> Result<Category, AppError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES ($1)
             RETURNING id, name, created_at, updated_at",
        )
        .bind(dto.name.trim())
        .fetch_one(db)
        .await
        .map_err(StoreError::from)?;

        Ok(category)
    }

    #[instrument(skip(db))]
    pub async fn get_categories(
        db: &PgPool,
        filter: &FilterParam,
    ) -> Result<Page<Category>, AppError> {
        Ok(find_many::<Category>(db, filter).await?)
    }

    #[instrument(skip(db))]
    pub async fn get_category(db: &PgPool, id: Uuid) -> Result<Category, AppError> {
        Ok(find_by_id::<Category>(db, id).await?)
    }

    #[instrument(skip(db))]
    pub async fn update_category(
        db: &PgPool,
        id: Uuid,
        dto: UpdateCategoryDto,
    ) -> Result<Category, AppError> {
        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories
             SET name = COALESCE($1, name), updated_at = NOW()
             WHERE id = $2
             RETURNING id, name, created_at, updated_at",
        )
        .bind(dto.name.as_deref().map(str::trim))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(StoreError::from)?
        .ok_or(StoreError::not_found("Category"))?;

        Ok(category)
    }

    #[instrument(skip(db))]
    pub async fn delete_category(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        delete_by_id::<Category>(db, id).await?;
        Ok(())
    }
}
