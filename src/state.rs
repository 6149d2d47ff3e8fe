use std::sync::Arc;

use bookstore_auth::IdentityStore;
use bookstore_config::{CorsConfig, JwtConfig, ServerConfig, StorageConfig};
use bookstore_core::{FileStorage, LocalFileStorage};
use bookstore_db::{PgPool, StoreError, init_db_pool};

/// Shared per-process state. Every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Identity lookup used by the auth gate
    pub identities: Arc<dyn IdentityStore>,
    pub storage: Arc<dyn FileStorage>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub server_config: ServerConfig,
    pub storage_config: StorageConfig,
}

impl AppState {
    pub fn new(
        db: PgPool,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        server_config: ServerConfig,
        storage_config: StorageConfig,
    ) -> Self {
        let storage = LocalFileStorage::new(
            storage_config.storage_dir.clone(),
            storage_config.base_url.clone(),
            storage_config.max_cover_bytes,
        );

        Self {
            identities: Arc::new(db.clone()),
            storage: Arc::new(storage),
            db,
            jwt_config,
            cors_config,
            server_config,
            storage_config,
        }
    }

    /// Replaces the identity store, e.g. with an in-memory one in tests.
    pub fn with_identities(mut self, identities: Arc<dyn IdentityStore>) -> Self {
        self.identities = identities;
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("server_config", &self.server_config)
            .field("storage_config", &self.storage_config)
            .finish_non_exhaustive()
    }
}

pub async fn init_app_state() -> Result<AppState, StoreError> {
    let db = init_db_pool().await?;

    Ok(AppState::new(
        db,
        JwtConfig::from_env(),
        CorsConfig::from_env(),
        ServerConfig::from_env(),
        StorageConfig::from_env(),
    ))
}
