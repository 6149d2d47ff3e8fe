use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use bookstore_auth::{AuthContext, AuthError, authenticate};
use bookstore_core::AppError;

use crate::state::AppState;

/// Auth gate. Resolves the bearer token to a stored identity and attaches
/// it to the request as an [`AuthContext`].
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let identity = authenticate(authorization, &state.jwt_config, state.identities.as_ref())
        .await
        .inspect_err(|err| tracing::debug!(error = %err, "Authentication rejected"))?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// The identity attached by [`require_auth`].
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub AuthContext);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .map(AuthUser)
            .ok_or_else(|| AuthError::MissingCredential.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;
    use bookstore_auth::Role;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_auth_user_reads_extension() {
        let ctx = AuthContext {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
        };
        let mut req = HttpRequest::builder().body(()).unwrap();
        req.extensions_mut().insert(ctx);
        let (mut parts, _) = req.into_parts();

        let AuthUser(found) = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(found, ctx);
    }

    #[tokio::test]
    async fn test_auth_user_missing_is_unauthorized() {
        let (mut parts, _) = HttpRequest::builder().body(()).unwrap().into_parts();
        let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }
}
