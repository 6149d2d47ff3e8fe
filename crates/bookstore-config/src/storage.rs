use std::env;
use std::path::PathBuf;

pub const DEFAULT_MAX_COVER_BYTES: usize = 5 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Directory cover files are written to and served from
    pub storage_dir: PathBuf,
    /// Public URL prefix of the `/files` route
    pub base_url: String,
    pub max_cover_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("./storage/covers"),
            base_url: "http://localhost:3000/files".to_string(),
            max_cover_bytes: DEFAULT_MAX_COVER_BYTES,
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            storage_dir: env::var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            base_url: env::var("STORAGE_BASE_URL").unwrap_or(defaults.base_url),
            max_cover_bytes: crate::env_or("MAX_COVER_BYTES", defaults.max_cover_bytes),
        }
    }
}
