use bookstore_core::AppError;
use bookstore_core::errors::StatusCode;
use bookstore_db::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing or malformed bearer token")]
    MissingCredential,

    #[error("Invalid token")]
    InvalidCredential(#[source] jsonwebtoken::errors::Error),

    #[error("Token has expired")]
    ExpiredCredential,

    #[error("User not found")]
    IdentityNotFound,

    #[error("Your role does not allow this operation")]
    Forbidden,

    #[error("Invalid username or password")]
    InvalidLogin,

    #[error("Failed to sign token")]
    SignError(#[source] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        if let AuthError::Store(store) = err {
            return store.into();
        }

        let status = match &err {
            AuthError::MissingCredential
            | AuthError::InvalidCredential(_)
            | AuthError::ExpiredCredential
            | AuthError::InvalidLogin => StatusCode::UNAUTHORIZED,
            AuthError::IdentityNotFound => StatusCode::NOT_FOUND,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::SignError(_) | AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        AppError::new(status, err)
    }
}
