pub mod auth;
pub mod authors;
pub mod books;
pub mod categories;
pub mod users;
