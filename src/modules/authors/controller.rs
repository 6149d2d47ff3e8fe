use axum::extract::{Path, State};
use axum::http::StatusCode;
use bookstore_core::{ApiResponse, AppError, ErrorBody, ListQuery, PaginationParam};
use bookstore_models::{Author, CreateAuthorDto, UpdateAuthorDto};
use tracing::instrument;
use uuid::Uuid;

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::AuthorService;

#[utoipa::path(
    post,
    path = "/api/authors",
    request_body = CreateAuthorDto,
    responses(
        (status = 201, description = "Author created", body = ApiResponse<Author>),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Authors"
)]
#[instrument(skip(state))]
pub async fn create_author(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateAuthorDto>,
) -> Result<(StatusCode, ApiResponse<Author>), AppError> {
    let author = AuthorService::create_author(&state.db, dto).await?;
    Ok(ApiResponse::ok(author).with_status(StatusCode::CREATED))
}

/// List authors. Search matches name, biography and nationality.
#[utoipa::path(
    get,
    path = "/api/authors",
    params(PaginationParam),
    responses(
        (status = 200, description = "One page of authors", body = ApiResponse<Vec<Author>>),
        (status = 400, description = "Malformed sort or filter", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Authors"
)]
#[instrument(skip(state))]
pub async fn get_authors(
    State(state): State<AppState>,
    ListQuery(filter): ListQuery,
) -> Result<ApiResponse<Vec<Author>>, AppError> {
    let page = AuthorService::get_authors(&state.db, &filter).await?;
    let meta = page.meta(&filter);
    Ok(ApiResponse::paginated(page.records, meta))
}

#[utoipa::path(
    get,
    path = "/api/authors/{id}",
    params(("id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = ApiResponse<Author>),
        (status = 404, description = "Author not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Authors"
)]
#[instrument(skip(state))]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Author>, AppError> {
    let author = AuthorService::get_author(&state.db, id).await?;
    Ok(ApiResponse::ok(author))
}

#[utoipa::path(
    put,
    path = "/api/authors/{id}",
    params(("id" = Uuid, Path, description = "Author ID")),
    request_body = UpdateAuthorDto,
    responses(
        (status = 200, description = "Author updated", body = ApiResponse<Author>),
        (status = 404, description = "Author not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Authors"
)]
#[instrument(skip(state))]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAuthorDto>,
) -> Result<ApiResponse<Author>, AppError> {
    let author = AuthorService::update_author(&state.db, id, dto).await?;
    Ok(ApiResponse::ok(author))
}

#[utoipa::path(
    delete,
    path = "/api/authors/{id}",
    params(("id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 400, description = "Author still has books", body = ErrorBody),
        (status = 404, description = "Author not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Authors"
)]
#[instrument(skip(state))]
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    AuthorService::delete_author(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
