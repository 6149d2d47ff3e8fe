use axum::extract::{Path, State};
use axum::http::StatusCode;
use bookstore_core::{ApiResponse, AppError, ErrorBody, ListQuery, PaginationParam};
use bookstore_models::{Category, CreateCategoryDto, UpdateCategoryDto};
use tracing::instrument;
use uuid::Uuid;

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::CategoryService;

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<Category>),
        (status = 400, description = "Category name already exists", body = ErrorBody),
        (status = 403, description = "Admin role required", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
#[instrument(skip(state))]
pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateCategoryDto>,
) -> Result<(StatusCode, ApiResponse<Category>), AppError> {
    let category = CategoryService::create_category(&state.db, dto).await?;
    Ok(ApiResponse::ok(category).with_status(StatusCode::CREATED))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    params(PaginationParam),
    responses(
        (status = 200, description = "One page of categories", body = ApiResponse<Vec<Category>>),
        (status = 400, description = "Malformed sort or filter", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
#[instrument(skip(state))]
pub async fn get_categories(
    State(state): State<AppState>,
    ListQuery(filter): ListQuery,
) -> Result<ApiResponse<Vec<Category>>, AppError> {
    let page = CategoryService::get_categories(&state.db, &filter).await?;
    let meta = page.meta(&filter);
    Ok(ApiResponse::paginated(page.records, meta))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category details", body = ApiResponse<Category>),
        (status = 404, description = "Category not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Category>, AppError> {
    let category = CategoryService::get_category(&state.db, id).await?;
    Ok(ApiResponse::ok(category))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<Category>),
        (status = 404, description = "Category not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
#[instrument(skip(state))]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateCategoryDto>,
) -> Result<ApiResponse<Category>, AppError> {
    let category = CategoryService::update_category(&state.db, id, dto).await?;
    Ok(ApiResponse::ok(category))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, description = "Category still has books", body = ErrorBody),
        (status = 404, description = "Category not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    CategoryService::delete_category(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
