use axum::{
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
};
use bookstore_auth::{AuthContext, AuthError, Role};
use bookstore_core::AppError;

/// Whether `role` may issue a request with `method`.
///
/// Admins may do anything. Users are limited to read-only methods.
pub fn is_permitted(role: Role, method: &Method) -> bool {
    match role {
        Role::Admin => true,
        Role::User => matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS),
    }
}

/// Role gate. Must run after [`require_auth`](super::auth::require_auth);
/// a request without an attached identity is refused.
pub async fn require_role(req: Request, next: Next) -> Result<Response, AppError> {
    let identity = req
        .extensions()
        .get::<AuthContext>()
        .copied()
        .ok_or(AuthError::Forbidden)?;

    if !is_permitted(identity.role, req.method()) {
        tracing::warn!(
            user_id = %identity.user_id,
            role = %identity.role,
            method = %req.method(),
            path = %req.uri().path(),
            "Role not permitted for method"
        );
        return Err(AuthError::Forbidden.into());
    }

    Ok(next.run(req).await)
}
