//! # Bookstore Auth
//!
//! Authentication for the Bookstore API.
//!
//! - [`claims`]: the [`Role`] model, token [`Claims`] and the request-scoped
//!   [`AuthContext`]
//! - [`jwt`]: issuing and verifying HMAC-signed tokens
//! - [`identity`]: resolving a token subject to a stored identity
//! - [`error`]: [`AuthError`] and its HTTP mapping
//!
//! A protected request goes through [`authenticate`]: bearer header, then
//! signature and algorithm check, then expiry, then identity lookup. The
//! first failing step ends the request.
//!
//! # Example
//!
//! ```ignore
//! use bookstore_auth::{Role, authenticate, issue_token};
//!
//! let token = issue_token(user_id, Role::User, &jwt_config)?;
//! let header = format!("Bearer {token}");
//! let ctx = authenticate(Some(&header), &jwt_config, &pool).await?;
//! assert_eq!(ctx.role, Role::User);
//! ```

pub mod claims;
pub mod error;
pub mod identity;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::{AuthContext, Claims, Role};
pub use error::AuthError;
pub use identity::{
    IdentityFuture, IdentityStore, InMemoryIdentityStore, authenticate, bearer_token,
};
pub use jwt::{issue_token, verify_token};
