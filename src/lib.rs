//! # Bookstore API
//!
//! A REST API for a bookstore catalogue built with Axum and PostgreSQL:
//! users, books, authors, categories and book cover images.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Auth gate, role gate, request deadline
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Registration, login, token validation
//! │   ├── users/       # User management
//! │   ├── books/       # Books and cover uploads
//! │   ├── authors/     # Authors
//! │   └── categories/  # Categories
//! ├── docs.rs           # OpenAPI document
//! ├── router.rs         # Route tree and layers
//! ├── state.rs          # Shared application state
//! └── validator.rs      # Validated JSON extractor
//! ```
//!
//! Shared pieces live in the workspace crates: `bookstore-core` (errors,
//! envelope, list query parser, file storage), `bookstore-db` (pool,
//! migrations, list executor), `bookstore-auth` (tokens and identities),
//! `bookstore-models` (rows and DTOs), `bookstore-config` and
//! `bookstore-observability`.
//!
//! Each feature module has the same layout:
//!
//! - `controller.rs`: HTTP handlers
//! - `service.rs`: queries and business logic
//! - `router.rs`: Axum router
//!
//! ## Request pipeline
//!
//! Every route under `/api` except register and login passes the auth gate,
//! which verifies the bearer token and attaches the stored identity. Routes
//! other than `/api/auth/validate` then pass the role gate: `user` accounts
//! are read-only, `admin` accounts may do anything.
//!
//! ## List endpoints
//!
//! All list endpoints accept the same query parameters:
//!
//! | Parameter | Example |
//! |-----------|---------|
//! | `page` | `2` |
//! | `per_page` | `5` |
//! | `sort` | `{"column_name":"price","value":"desc"}` |
//! | `search` | `tolkien` |
//! | `filter` | `[{"column_name":"quantity","operator":">","value":0}]` |
//! | `link_operator` | `or` |
//!
//! A non-empty `search` replaces `filter`. Responses carry
//! `meta_data: {total_count, page, per_page}`.
//!
//! ## Response envelope
//!
//! ```json
//! { "data": ..., "meta_data": {...}, "ok": true }
//! { "data": null, "ok": false, "error": { "message": "...", "stack": "..." } }
//! ```

pub mod docs;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

pub use router::init_router;
pub use state::{AppState, init_app_state};
