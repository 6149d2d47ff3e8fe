//! Application error type.
//!
//! Every handler returns `Result<_, AppError>`. Component errors
//! (`DecodeError`, `AuthError`, `StoreError`, `StorageError`) convert into
//! `AppError` at the boundary where they are detected, each picking its own
//! status code. The response body is the standard envelope with `ok: false`.

use anyhow::Error;
use axum::{
    Json,
    response::{IntoResponse, Response},
};

pub use axum::http::StatusCode;

use crate::response::{ApiResponse, ErrorBody};

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn internal_error(message: String) -> Self {
        Self::internal(anyhow::anyhow!(message))
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn request_timeout() -> Self {
        Self::new(StatusCode::REQUEST_TIMEOUT, anyhow::anyhow!("Request timeout"))
    }

    /// The envelope error body.
    ///
    /// Client errors expose the cause chain as `stack`; server errors keep
    /// it in the logs only.
    pub fn body(&self) -> ErrorBody {
        let stack = if self.status.is_client_error() {
            let causes: Vec<String> = self.error.chain().skip(1).map(|c| c.to_string()).collect();
            (!causes.is_empty()).then(|| causes.join(": "))
        } else {
            None
        };

        ErrorBody {
            message: self.error.to_string(),
            stack,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status.as_u16(), error = ?self.error, "Request failed");
        }

        let body: ApiResponse<()> = ApiResponse::failure(self.body());
        (self.status, Json(body)).into_response()
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError::internal(err)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::unprocessable(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use axum::body::to_bytes;

    async fn read_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_bad_request_status() {
        let err = AppError::bad_request(anyhow::anyhow!("bad"));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_client_error_exposes_cause_chain() {
        let inner: Result<(), _> = Err(anyhow::anyhow!("column does not exist"));
        let err = AppError::bad_request(inner.context("Failed to list books").unwrap_err());

        let body = err.body();
        assert_eq!(body.message, "Failed to list books");
        assert_eq!(body.stack.as_deref(), Some("column does not exist"));
    }

    #[test]
    fn test_server_error_hides_cause_chain() {
        let inner: Result<(), _> = Err(anyhow::anyhow!("connection refused"));
        let err = AppError::internal(inner.context("Failed to list books").unwrap_err());

        let body = err.body();
        assert_eq!(body.message, "Failed to list books");
        assert!(body.stack.is_none());
    }

    #[test]
    fn test_no_stack_without_causes() {
        let err = AppError::bad_request(anyhow::anyhow!("name is required"));
        assert!(err.body().stack.is_none());
    }

    #[tokio::test]
    async fn test_into_response_envelope() {
        let response =
            AppError::new(StatusCode::FORBIDDEN, anyhow::anyhow!("Access denied")).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let json = read_json(response).await;
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"]["message"], "Access denied");
        assert!(json.get("meta_data").is_none());
    }
}
