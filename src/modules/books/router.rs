use axum::{Router, extract::DefaultBodyLimit, routing::get};

use crate::state::AppState;

use super::controller::{
    create_book, delete_book, get_book, get_books, get_cover, update_book, upload_cover,
};

/// Room for multipart boundaries and the `image_name` field.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn init_books_router(max_cover_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(get_books).post(create_book))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .route(
            "/{id}/cover",
            get(get_cover)
                .post(upload_cover)
                .layer(DefaultBodyLimit::max(max_cover_bytes + MULTIPART_OVERHEAD)),
        )
}
