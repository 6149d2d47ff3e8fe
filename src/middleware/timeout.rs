use axum::BoxError;
use bookstore_core::AppError;
use tower::timeout::error::Elapsed;

/// Maps errors from the timeout layer. The timed-out handler future has
/// already been dropped by the time this runs.
pub async fn handle_timeout_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        tracing::warn!("Request exceeded its deadline");
        AppError::request_timeout()
    } else {
        AppError::internal_error(format!("Unhandled middleware error: {err}"))
    }
}
