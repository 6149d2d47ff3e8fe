//! Request pipeline stages shared by every protected route.
//!
//! - [`auth`]: the auth gate and the [`AuthUser`](auth::AuthUser) extractor
//! - [`role`]: the role gate
//! - [`timeout`]: the request deadline
//!
//! A protected request runs `require_auth`, then `require_role`, then the
//! handler. Either gate ends the request with an error envelope.
//!
//! # Example
//!
//! ```ignore
//! use axum::middleware::{from_fn, from_fn_with_state};
//!
//! let protected = Router::new()
//!     .route("/books", get(list_books))
//!     .route_layer(from_fn(require_role))
//!     .route_layer(from_fn_with_state(state.clone(), require_auth));
//! ```

pub mod auth;
pub mod role;
pub mod timeout;
