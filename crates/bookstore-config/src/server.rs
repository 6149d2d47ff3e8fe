use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Deadline for a whole request, in seconds
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            request_timeout_secs: 5,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let timeout = crate::env_or("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs);

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: crate::env_or("PORT", defaults.port),
            request_timeout_secs: if timeout > 0 {
                timeout
            } else {
                defaults.request_timeout_secs
            },
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
