//! # Bookstore Core
//!
//! Core types, errors, and utilities for the Bookstore API.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`response`]: The JSON envelope every endpoint answers with
//! - [`pagination`]: Query-parameter decoding for list endpoints
//! - [`password`]: Password hashing and verification
//! - [`file_storage`]: Storage backends for uploaded files
//!
//! # Example
//!
//! ```ignore
//! use bookstore_core::pagination::{PaginationParam, extract_pagination};
//!
//! let param = PaginationParam {
//!     page: "2".to_string(),
//!     per_page: "5".to_string(),
//!     ..Default::default()
//! };
//! let filter = extract_pagination(&param)?;
//! assert_eq!(filter.offset(), 5);
//! ```

pub mod errors;
pub mod file_storage;
pub mod pagination;
pub mod password;
pub mod response;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use file_storage::{FileStorage, LocalFileStorage, StorageError};
pub use pagination::{FilterParam, ListQuery, PaginationParam};
pub use password::{hash_password, verify_password};
pub use response::{ApiResponse, ErrorBody, MetaData};
