use anyhow::anyhow;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use bookstore_core::{ApiResponse, AppError, ErrorBody, ListQuery, PaginationParam};
use bookstore_models::{Book, BookCoverResponse, CreateBookDto, UpdateBookDto};
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::{BookService, CoverUpload};

/// Multipart body of a cover upload.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct CoverUploadForm {
    /// JPEG, PNG or GIF image
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
    /// Display name, defaults to the uploaded file name
    image_name: Option<String>,
}

fn multipart_error(err: MultipartError) -> AppError {
    AppError::new(err.status(), anyhow!(err.body_text()))
}

/// Add a book. The caller is recorded as its creator.
#[utoipa::path(
    post,
    path = "/api/books",
    request_body = CreateBookDto,
    responses(
        (status = 201, description = "Book created", body = ApiResponse<Book>),
        (status = 400, description = "Unknown author or category", body = ErrorBody),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Books"
)]
#[instrument(skip(state, dto))]
pub async fn create_book(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateBookDto>,
) -> Result<(StatusCode, ApiResponse<Book>), AppError> {
    let book = BookService::create_book(&state.db, identity.user_id, dto).await?;
    Ok(ApiResponse::ok(book).with_status(StatusCode::CREATED))
}

/// List books. Search matches title, author name and category name.
#[utoipa::path(
    get,
    path = "/api/books",
    params(PaginationParam),
    responses(
        (status = 200, description = "One page of books", body = ApiResponse<Vec<Book>>),
        (status = 400, description = "Malformed sort or filter, or unknown column", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Books"
)]
#[instrument(skip(state))]
pub async fn get_books(
    State(state): State<AppState>,
    ListQuery(filter): ListQuery,
) -> Result<ApiResponse<Vec<Book>>, AppError> {
    let page = BookService::get_books(&state.db, &filter).await?;
    let meta = page.meta(&filter);
    Ok(ApiResponse::paginated(page.records, meta))
}

#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = ApiResponse<Book>),
        (status = 404, description = "Book not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Books"
)]
#[instrument(skip(state))]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Book>, AppError> {
    let book = BookService::get_book(&state.db, id).await?;
    Ok(ApiResponse::ok(book))
}

#[utoipa::path(
    put,
    path = "/api/books/{id}",
    params(("id" = Uuid, Path, description = "Book ID")),
    request_body = UpdateBookDto,
    responses(
        (status = 200, description = "Book updated", body = ApiResponse<Book>),
        (status = 404, description = "Book not found", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Books"
)]
#[instrument(skip(state, dto))]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateBookDto>,
) -> Result<ApiResponse<Book>, AppError> {
    let book = BookService::update_book(&state.db, id, dto).await?;
    Ok(ApiResponse::ok(book))
}

#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book and its cover deleted"),
        (status = 404, description = "Book not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Books"
)]
#[instrument(skip(state))]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    BookService::delete_book(&state.db, state.storage.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Upload or replace a book's cover image
#[utoipa::path(
    post,
    path = "/api/books/{id}/cover",
    params(("id" = Uuid, Path, description = "Book ID")),
    request_body(content = CoverUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Cover stored", body = ApiResponse<BookCoverResponse>),
        (status = 400, description = "Missing image field", body = ErrorBody),
        (status = 404, description = "Book not found", body = ErrorBody),
        (status = 413, description = "Image too large", body = ErrorBody),
        (status = 415, description = "Unsupported image type", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Books"
)]
#[instrument(skip(state, multipart))]
pub async fn upload_cover(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, ApiResponse<BookCoverResponse>), AppError> {
    let mut image = None;
    let mut image_name = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or("cover").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let content = field.bytes().await.map_err(multipart_error)?;
                image = Some((file_name, content_type, content));
            }
            "image_name" => {
                image_name = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let (file_name, content_type, content) =
        image.ok_or_else(|| AppError::bad_request(anyhow!("Multipart field 'image' is required")))?;

    let upload = CoverUpload {
        image_name,
        file_name,
        content_type,
        content,
    };

    let cover = BookService::upload_cover(&state.db, state.storage.as_ref(), id, upload).await?;
    Ok(ApiResponse::ok(cover).with_status(StatusCode::CREATED))
}

#[utoipa::path(
    get,
    path = "/api/books/{id}/cover",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Cover metadata and public URL", body = ApiResponse<BookCoverResponse>),
        (status = 404, description = "Book has no cover", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Books"
)]
#[instrument(skip(state))]
pub async fn get_cover(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<BookCoverResponse>, AppError> {
    let cover = BookService::get_cover(&state.db, state.storage.as_ref(), id).await?;
    Ok(ApiResponse::ok(cover))
}
