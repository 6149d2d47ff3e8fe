use std::env;

/// Secret used when `JWT_SECRET` is unset. Only suitable for development.
pub const DEV_SECRET: &str = "bookstore-dev-secret-change-me";

/// Thirty days.
pub const DEFAULT_EXPIRY_SECS: i64 = 30 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds
    pub expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET is not set, falling back to the development secret");
                DEV_SECRET.to_string()
            }
        };

        let expiry = crate::env_or("JWT_EXPIRY", DEFAULT_EXPIRY_SECS);

        Self {
            secret,
            expiry: if expiry > 0 { expiry } else { DEFAULT_EXPIRY_SECS },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_expiry_is_thirty_days() {
        assert_eq!(DEFAULT_EXPIRY_SECS, 2_592_000);
    }
}
