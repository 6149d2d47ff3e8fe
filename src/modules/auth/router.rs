use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{login_user, register_user};

/// Public authentication routes. `/validate` sits behind the auth gate and
/// is mounted by the top-level router.
pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
}
