use axum::body::Bytes;
use bookstore_core::file_storage::{sanitize_file_name, validate_image_type};
use bookstore_core::{AppError, FileStorage, FilterParam};
use bookstore_db::{Page, PgPool, StoreError, delete_by_id, find_by_id, find_many};
use bookstore_models::{Book, BookCover, BookCoverResponse, CreateBookDto, UpdateBookDto};
use tracing::instrument;
use uuid::Uuid;

const COVER_COLUMNS: &str =
    "id, book_id, image_name, cover_path, content_type, size_bytes, created_at, updated_at";

/// An image received from a multipart upload.
#[derive(Debug)]
pub struct CoverUpload {
    /// Display name; the sanitized file name when absent
    pub image_name: Option<String>,
    pub file_name: String,
    pub content_type: String,
    pub content: Bytes,
}

pub struct BookService;

impl BookService {
    #[instrument(skip(db, dto), fields(title = %dto.title))]
    pub async fn create_book(
        db: &PgPool,
        user_id: Uuid,
        dto: CreateBookDto,
    ) -> Result<Book, AppError> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO books (title, publication_date, price, quantity, user_id, author_id, category_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(&dto.title)
        .bind(dto.publication_date)
        .bind(dto.price)
        .bind(dto.quantity)
        .bind(user_id)
        .bind(dto.author_id)
        .bind(dto.category_id)
        .fetch_one(db)
        .await
        .map_err(StoreError::from)?;

        tracing::info!(book_id = %id, "Book created");
        Ok(find_by_id::<Book>(db, id).await?)
    }

    #[instrument(skip(db))]
    pub async fn get_books(db: &PgPool, filter: &FilterParam) -> Result<Page<Book>, AppError> {
        Ok(find_many::<Book>(db, filter).await?)
    }

    #[instrument(skip(db))]
    pub async fn get_book(db: &PgPool, id: Uuid) -> Result<Book, AppError> {
        Ok(find_by_id::<Book>(db, id).await?)
    }

    #[instrument(skip(db))]
    pub async fn update_book(db: &PgPool, id: Uuid, dto: UpdateBookDto) -> Result<Book, AppError> {
        sqlx::query_scalar::<_, Uuid>(
            "UPDATE books
             SET title = COALESCE($1, title),
                 publication_date = COALESCE($2, publication_date),
                 price = COALESCE($3, price),
                 quantity = COALESCE($4, quantity),
                 author_id = COALESCE($5, author_id),
                 category_id = COALESCE($6, category_id),
                 updated_at = NOW()
             WHERE id = $7
             RETURNING id",
        )
        .bind(&dto.title)
        .bind(dto.publication_date)
        .bind(dto.price)
        .bind(dto.quantity)
        .bind(dto.author_id)
        .bind(dto.category_id)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(StoreError::from)?
        .ok_or(StoreError::not_found("Book"))?;

        Ok(find_by_id::<Book>(db, id).await?)
    }

    /// Deletes the book, its cover row (by cascade) and the stored cover file.
    #[instrument(skip(db, storage))]
    pub async fn delete_book(
        db: &PgPool,
        storage: &dyn FileStorage,
        id: Uuid,
    ) -> Result<(), AppError> {
        let cover_path: Option<String> =
            sqlx::query_scalar("SELECT cover_path FROM book_covers WHERE book_id = $1")
                .bind(id)
                .fetch_optional(db)
                .await
                .map_err(StoreError::from)?;

        delete_by_id::<Book>(db, id).await?;

        if let Some(key) = cover_path {
            remove_file(storage, &key).await;
        }

        tracing::info!(book_id = %id, "Book deleted");
        Ok(())
    }

    /// Stores a new cover image for the book, replacing any previous one.
    #[instrument(skip(db, storage, upload), fields(content_type = %upload.content_type, size = upload.content.len()))]
    pub async fn upload_cover(
        db: &PgPool,
        storage: &dyn FileStorage,
        book_id: Uuid,
        upload: CoverUpload,
    ) -> Result<BookCoverResponse, AppError> {
        find_by_id::<Book>(db, book_id).await?;
        validate_image_type(&upload.content_type)?;

        let file_name = sanitize_file_name(&upload.file_name);
        let key = format!("{book_id}/{}-{file_name}", Uuid::new_v4());
        let image_name = upload
            .image_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or(file_name);

        storage.save(&key, &upload.content).await?;

        let previous: Option<String> =
            sqlx::query_scalar("SELECT cover_path FROM book_covers WHERE book_id = $1")
                .bind(book_id)
                .fetch_optional(db)
                .await
                .map_err(StoreError::from)?;

        let saved = sqlx::query_as::<_, BookCover>(&format!(
            "INSERT INTO book_covers (book_id, image_name, cover_path, content_type, size_bytes)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (book_id) DO UPDATE
             SET image_name = EXCLUDED.image_name,
                 cover_path = EXCLUDED.cover_path,
                 content_type = EXCLUDED.content_type,
                 size_bytes = EXCLUDED.size_bytes,
                 updated_at = NOW()
             RETURNING {COVER_COLUMNS}"
        ))
        .bind(book_id)
        .bind(&image_name)
        .bind(&key)
        .bind(&upload.content_type)
        .bind(upload.content.len() as i64)
        .fetch_one(db)
        .await;

        let cover = match saved {
            Ok(cover) => cover,
            Err(err) => {
                remove_file(storage, &key).await;
                return Err(StoreError::from(err).into());
            }
        };

        if let Some(old_key) = previous.filter(|old| *old != cover.cover_path) {
            remove_file(storage, &old_key).await;
        }

        let url = storage.get_url(&cover.cover_path)?;
        tracing::info!(book_id = %book_id, key = %cover.cover_path, "Book cover stored");
        Ok(BookCoverResponse { cover, url })
    }

    #[instrument(skip(db, storage))]
    pub async fn get_cover(
        db: &PgPool,
        storage: &dyn FileStorage,
        book_id: Uuid,
    ) -> Result<BookCoverResponse, AppError> {
        let cover = sqlx::query_as::<_, BookCover>(&format!(
            "SELECT {COVER_COLUMNS} FROM book_covers WHERE book_id = $1"
        ))
        .bind(book_id)
        .fetch_optional(db)
        .await
        .map_err(StoreError::from)?
        .ok_or(StoreError::not_found("Book cover"))?;

        let url = storage.get_url(&cover.cover_path)?;
        Ok(BookCoverResponse { cover, url })
    }
}

/// Best-effort removal; an orphaned file is logged, not returned.
async fn remove_file(storage: &dyn FileStorage, key: &str) {
    if let Err(err) = storage.delete(key).await {
        tracing::warn!(key = %key, error = %err, "Failed to remove stored file");
    }
}
