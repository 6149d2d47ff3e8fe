use axum::extract::{Path, State};
use axum::http::StatusCode;
use bookstore_core::{ApiResponse, AppError, ErrorBody, ListQuery, PaginationParam};
use bookstore_models::{CreateUserDto, UpdateUserDto, User};
use tracing::instrument;
use uuid::Uuid;

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::UserService;

/// Create a user with any role
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = ApiResponse<User>),
        (status = 400, description = "User name already taken", body = ErrorBody),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, ApiResponse<User>), AppError> {
    let user = UserService::create_user(&state.db, dto).await?;
    Ok(ApiResponse::ok(user).with_status(StatusCode::CREATED))
}

/// List users
#[utoipa::path(
    get,
    path = "/api/users",
    params(PaginationParam),
    responses(
        (status = 200, description = "One page of users", body = ApiResponse<Vec<User>>),
        (status = 400, description = "Malformed sort or filter", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    ListQuery(filter): ListQuery,
) -> Result<ApiResponse<Vec<User>>, AppError> {
    let page = UserService::get_users(&state.db, &filter).await?;
    let meta = page.meta(&filter);
    Ok(ApiResponse::paginated(page.records, meta))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<User>),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<User>, AppError> {
    let user = UserService::get_user(&state.db, id).await?;
    Ok(ApiResponse::ok(user))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<User>),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<ApiResponse<User>, AppError> {
    let user = UserService::update_user(&state.db, id, dto).await?;
    Ok(ApiResponse::ok(user))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    UserService::delete_user(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
