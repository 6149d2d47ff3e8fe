use bookstore_core::AppError;
use bookstore_core::errors::StatusCode;
use sqlx::migrate::MigrateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("Unknown column '{0}'")]
    InvalidColumn(String),

    #[error("Invalid value for column '{column}': {reason}")]
    InvalidValue { column: String, reason: String },

    #[error("Operator {operator} is not supported on column '{column}'")]
    InvalidOperator { column: String, operator: String },

    #[error("{message}")]
    Constraint {
        message: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("DATABASE_URL must be set")]
    MissingDatabaseUrl,

    #[error("Database error")]
    Database(#[source] sqlx::Error),

    #[error("Migration failed")]
    Migrate(#[from] MigrateError),
}

impl StoreError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    /// True for failures caused by the request rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidColumn(_)
                | Self::InvalidValue { .. }
                | Self::InvalidOperator { .. }
                | Self::Constraint { .. }
        )
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = err {
            return Self::NotFound { entity: "Record" };
        }

        let message = match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Some(match db_err.constraint() {
                    Some(constraint) => format!("Record already exists ({constraint})"),
                    None => "Record already exists".to_string(),
                })
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                Some("Referenced record does not exist or is still in use".to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
                Some("Value violates a constraint".to_string())
            }
            _ => None,
        };

        match message {
            Some(message) => Self::Constraint {
                message,
                source: err,
            },
            None => Self::Database(err),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        AppError::new(status, err)
    }
}
