use std::fs;
use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Debug)]
pub struct LogSettings {
    /// Default level for bookstore crates when `RUST_LOG` is unset
    pub level: String,
    /// Directory for rolling log files
    pub log_dir: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("storage/logs"),
        }
    }
}

impl LogSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or(defaults.level),
            log_dir: std::env::var("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
        }
    }

    /// Filter used when `RUST_LOG` is not set.
    pub fn default_directives(&self) -> String {
        format!(
            "bookstore={level},bookstore_core={level},bookstore_db={level},bookstore_auth={level},\
             bookstore_observability={level},tower_http=warn,hyper=warn,sqlx=warn",
            level = self.level
        )
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directives()))
    }
}

/// Installs the global subscriber.
///
/// Console output always works; if the log directory cannot be created the
/// file layers are skipped.
pub fn init_tracing(settings: &LogSettings) {
    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(settings.env_filter());

    if let Err(e) = fs::create_dir_all(&settings.log_dir) {
        tracing_subscriber::registry().with(console_layer).init();
        tracing::warn!(
            log_dir = %settings.log_dir.display(),
            error = %e,
            "Failed to create log directory, logging to console only"
        );
        return;
    }

    let error_appender = RollingFileAppender::new(Rotation::DAILY, &settings.log_dir, "bookstore.log");
    let error_layer = fmt::layer()
        .with_writer(error_appender)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(EnvFilter::new("error"));

    // Structured logs for ingestion
    let json_appender = RollingFileAppender::new(Rotation::DAILY, &settings.log_dir, "bookstore.json");
    let json_layer = fmt::layer()
        .json()
        .with_writer(json_appender)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(settings.env_filter());

    tracing_subscriber::registry()
        .with(console_layer)
        .with(error_layer)
        .with(json_layer)
        .init();

    tracing::info!(log_dir = %settings.log_dir.display(), "Tracing initialized");
}
