use bookstore_auth::{AuthContext, Role};
use bookstore_core::{ErrorBody, MetaData};
use bookstore_models::{
    Author, Book, BookCover, BookCoverResponse, Category, CreateAuthorDto, CreateBookDto,
    CreateCategoryDto, CreateUserDto, LoginRequest, LoginResponse, RegisterRequest,
    UpdateAuthorDto, UpdateBookDto, UpdateCategoryDto, UpdateUserDto, User,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::books::controller::CoverUploadForm;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::validate_token,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::books::controller::create_book,
        crate::modules::books::controller::get_books,
        crate::modules::books::controller::get_book,
        crate::modules::books::controller::update_book,
        crate::modules::books::controller::delete_book,
        crate::modules::books::controller::upload_cover,
        crate::modules::books::controller::get_cover,
        crate::modules::authors::controller::create_author,
        crate::modules::authors::controller::get_authors,
        crate::modules::authors::controller::get_author,
        crate::modules::authors::controller::update_author,
        crate::modules::authors::controller::delete_author,
        crate::modules::categories::controller::create_category,
        crate::modules::categories::controller::get_categories,
        crate::modules::categories::controller::get_category,
        crate::modules::categories::controller::update_category,
        crate::modules::categories::controller::delete_category,
    ),
    components(
        schemas(
            Role,
            AuthContext,
            ErrorBody,
            MetaData,
            User,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateUserDto,
            UpdateUserDto,
            Book,
            CreateBookDto,
            UpdateBookDto,
            BookCover,
            BookCoverResponse,
            CoverUploadForm,
            Author,
            CreateAuthorDto,
            UpdateAuthorDto,
            Category,
            CreateCategoryDto,
            UpdateCategoryDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and token validation"),
        (name = "Users", description = "User management"),
        (name = "Books", description = "Book catalogue and cover images"),
        (name = "Authors", description = "Author management"),
        (name = "Categories", description = "Category management")
    ),
    info(
        title = "Bookstore API",
        version = "0.1.0",
        description = "Bookstore catalogue REST API built with Axum and PostgreSQL. Every list endpoint accepts `page`, `per_page`, `sort`, `search`, `filter` and `link_operator`.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
