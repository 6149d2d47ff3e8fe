use bookstore_core::{AppError, FilterParam};
use bookstore_db::{Page, PgPool, StoreError, delete_by_id, find_by_id, find_many};
use bookstore_models::{Author, CreateAuthorDto, UpdateAuthorDto};
use tracing::instrument;
use uuid::Uuid;

const AUTHOR_COLUMNS: &str = "id, name, biography, nationality, created_at, updated_at";

pub struct AuthorService;

impl AuthorService {
    #[instrument(skip(db))]
    pub async fn create_author(db: &PgPool, dto: CreateAuthorDto) -> Result<Author, AppError> {
        let author = sqlx::query_as::<_, Author>(&format!(
            "INSERT INTO authors (name, biography, nationality)
             VALUES ($1, $2, $3)
             RETURNING {AUTHOR_COLUMNS}"
        ))
        .bind(&dto.name)
        .bind(&dto.biography)
        .bind(&dto.nationality)
        .fetch_one(db)
        .await
        .map_err(StoreError::from)?;

        Ok(author)
    }

    #[instrument(skip(db))]
    pub async fn get_authors(db: &PgPool, filter: &FilterParam) -> Result<Page<Author>, AppError> {
        Ok(find_many::<Author>(db, filter).await?)
    }

    #[instrument(skip(db))]
    pub async fn get_author(db: &PgPool, id: Uuid) -> Result<Author, AppError> {
        Ok(find_by_id::<Author>(db, id).await?)
    }

    #[instrument(skip(db))]
    pub async fn update_author(
        db: &PgPool,
        id: Uuid,
        dto: UpdateAuthorDto,
    ) -> Result<Author, AppError> {
        let author = sqlx::query_as::<_, Author>(&format!(
            "UPDATE authors
             SET name = COALESCE($1, name),
                 biography = COALESCE($2, biography),
                 nationality = COALESCE($3, nationality),
                 updated_at = NOW()
             WHERE id = $4
             RETURNING {AUTHOR_COLUMNS}"
        ))
        .bind(&dto.name)
        .bind(&dto.biography)
        .bind(&dto.nationality)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(StoreError::from)?
        .ok_or(StoreError::not_found("Author"))?;

        Ok(author)
    }

    /// Fails with a constraint error while books still reference the author.
    #[instrument(skip(db))]
    pub async fn delete_author(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        delete_by_id::<Author>(db, id).await?;
        Ok(())
    }
}
