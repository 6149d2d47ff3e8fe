//! The JSON envelope returned by every endpoint.
//!
//! ```json
//! {
//!   "data": [...],
//!   "meta_data": { "total_count": 12, "page": 2, "per_page": 5 },
//!   "ok": true
//! }
//! ```
//!
//! `meta_data` is only present on list responses and `error` only on
//! failures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MetaData {
    /// Number of records in the whole filtered set
    pub total_count: i64,
    pub page: i64,
    pub per_page: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
    /// Cause chain, only exposed for client errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<MetaData>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            meta_data: None,
            ok: true,
            error: None,
        }
    }

    pub fn paginated(data: T, meta_data: MetaData) -> Self {
        Self {
            data: Some(data),
            meta_data: Some(meta_data),
            ok: true,
            error: None,
        }
    }

    pub fn failure(error: ErrorBody) -> Self {
        Self {
            data: None,
            meta_data: None,
            ok: false,
            error: Some(error),
        }
    }

    /// Pairs the envelope with a status other than 200.
    pub fn with_status(self, status: StatusCode) -> (StatusCode, Self) {
        (status, self)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
