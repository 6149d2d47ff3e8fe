//! # Bookstore Models
//!
//! Database rows, request DTOs and list allowlists for the Bookstore API.
//!
//! Every entity that backs a list endpoint implements
//! [`Listable`](bookstore_db::Listable), which is where the columns
//! callers may filter, sort and search on are declared.
//!
//! - [`users`]: accounts, registration and login payloads
//! - [`authors`]: book authors
//! - [`categories`]: book categories
//! - [`books`]: the catalogue, joined with author and category names
//! - [`covers`]: uploaded cover image metadata

pub mod authors;
pub mod books;
pub mod categories;
pub mod covers;
pub mod users;

// Re-export commonly used types at crate root
pub use authors::{Author, CreateAuthorDto, UpdateAuthorDto};
pub use books::{Book, CreateBookDto, UpdateBookDto};
pub use categories::{Category, CreateCategoryDto, UpdateCategoryDto};
pub use covers::{BookCover, BookCoverResponse};
pub use users::{
    CreateUserDto, LoginRequest, LoginResponse, RegisterRequest, UpdateUserDto, User,
    UserCredentials,
};
