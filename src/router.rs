use axum::error_handling::HandleErrorLayer;
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::routing::get;
use axum::{Router, middleware};
use bookstore_core::ApiResponse;
use bookstore_observability::{REQUEST_ID_HEADER, logging_middleware};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::middleware::auth::require_auth;
use crate::middleware::role::require_role;
use crate::middleware::timeout::handle_timeout_error;
use crate::modules::auth::controller::validate_token;
use crate::modules::auth::init_auth_router;
use crate::modules::authors::init_authors_router;
use crate::modules::books::init_books_router;
use crate::modules::categories::init_categories_router;
use crate::modules::users::init_users_router;
use crate::state::AppState;

#[derive(Serialize)]
struct Health {
    status: &'static str,
    database: &'static str,
}

async fn health_check(State(state): State<AppState>) -> (StatusCode, ApiResponse<Health>) {
    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => ApiResponse::ok(Health {
            status: "ok",
            database: "up",
        })
        .with_status(StatusCode::OK),
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not reach the database");
            ApiResponse::ok(Health {
                status: "degraded",
                database: "down",
            })
            .with_status(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Routes behind the auth gate and the role gate.
fn protected_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/users", init_users_router())
        .nest(
            "/books",
            init_books_router(state.storage_config.max_cover_bytes),
        )
        .nest("/authors", init_authors_router())
        .nest("/categories", init_categories_router())
        .route_layer(middleware::from_fn(require_role))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}

fn api_router(state: &AppState) -> Router<AppState> {
    let auth = init_auth_router().merge(
        Router::new()
            .route("/validate", get(validate_token))
            .route_layer(middleware::from_fn_with_state(state.clone(), require_auth)),
    );

    Router::new()
        .nest("/auth", auth)
        .merge(protected_router(state))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(state.server_config.request_timeout()),
        )
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::HeaderName::from_static(REQUEST_ID_HEADER)])
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health_check))
        .nest("/api", api_router(&state))
        .nest_service("/files", ServeDir::new(&state.storage_config.storage_dir))
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(logging_middleware))
}
