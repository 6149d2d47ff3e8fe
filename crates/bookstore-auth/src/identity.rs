//! Resolving bearer tokens to stored identities.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use bookstore_config::JwtConfig;
use bookstore_db::{PgPool, StoreError};
use uuid::Uuid;

use crate::claims::{AuthContext, Role};
use crate::error::AuthError;
use crate::jwt::verify_token;

pub type IdentityFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<AuthContext>, StoreError>> + Send + 'a>>;

/// Looks up the current role of a token subject.
pub trait IdentityStore: Send + Sync {
    /// `Ok(None)` when no such user exists.
    fn find_identity(&self, user_id: Uuid) -> IdentityFuture<'_>;
}

impl IdentityStore for PgPool {
    fn find_identity(&self, user_id: Uuid) -> IdentityFuture<'_> {
        Box::pin(async move {
            let row: Option<(Uuid, Role)> =
                sqlx::query_as("SELECT id, role FROM users WHERE id = $1")
                    .bind(user_id)
                    .fetch_optional(self)
                    .await?;

            Ok(row.map(|(user_id, role)| AuthContext { user_id, role }))
        })
    }
}

impl<T: IdentityStore + ?Sized> IdentityStore for Arc<T> {
    fn find_identity(&self, user_id: Uuid) -> IdentityFuture<'_> {
        (**self).find_identity(user_id)
    }
}

/// Identity store backed by a map, for tests and tooling that run
/// without a database.
#[derive(Clone, Debug, Default)]
pub struct InMemoryIdentityStore {
    users: Arc<RwLock<HashMap<Uuid, Role>>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user_id: Uuid, role: Role) {
        if let Ok(mut users) = self.users.write() {
            users.insert(user_id, role);
        }
    }

    pub fn remove(&self, user_id: Uuid) {
        if let Ok(mut users) = self.users.write() {
            users.remove(&user_id);
        }
    }
}

impl IdentityStore for InMemoryIdentityStore {
    fn find_identity(&self, user_id: Uuid) -> IdentityFuture<'_> {
        let role = self
            .users
            .read()
            .ok()
            .and_then(|users| users.get(&user_id).copied());

        Box::pin(async move { Ok(role.map(|role| AuthContext { user_id, role })) })
    }
}

/// Extracts the token from an `Authorization` header value.
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, AuthError> {
    authorization
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingCredential)
}

/// Runs the whole authentication pipeline for one request.
///
/// The role attached is the one currently stored for the user, not the one
/// in the token.
pub async fn authenticate<S>(
    authorization: Option<&str>,
    jwt_config: &JwtConfig,
    store: &S,
) -> Result<AuthContext, AuthError>
where
    S: IdentityStore + ?Sized,
{
    let token = bearer_token(authorization)?;
    let claims = verify_token(token, jwt_config)?;

    let identity = store
        .find_identity(claims.sub)
        .await?
        .ok_or(AuthError::IdentityNotFound)?;

    if identity.role != claims.role {
        tracing::debug!(
            user_id = %identity.user_id,
            token_role = %claims.role,
            stored_role = %identity.role,
            "Stored role differs from token role"
        );
    }

    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::issue_token;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "identity-test-secret-with-enough-length".to_string(),
            expiry: 3600,
        }
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert!(matches!(bearer_token(None), Err(AuthError::MissingCredential)));
        assert!(matches!(
            bearer_token(Some("Basic dXNlcjpwYXNz")),
            Err(AuthError::MissingCredential)
        ));
        assert!(matches!(
            bearer_token(Some("bearer abc")),
            Err(AuthError::MissingCredential)
        ));
        assert!(matches!(
            bearer_token(Some("Bearer   ")),
            Err(AuthError::MissingCredential)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_resolves_identity() {
        let store = InMemoryIdentityStore::new();
        let user_id = Uuid::new_v4();
        store.insert(user_id, Role::Admin);

        let header = format!("Bearer {}", issue_token(user_id, Role::Admin, &config()).unwrap());
        let ctx = authenticate(Some(&header), &config(), &store).await.unwrap();

        assert_eq!(ctx, AuthContext { user_id, role: Role::Admin });
    }

    #[tokio::test]
    async fn test_stored_role_is_authoritative() {
        let store = InMemoryIdentityStore::new();
        let user_id = Uuid::new_v4();
        store.insert(user_id, Role::User);

        let header = format!("Bearer {}", issue_token(user_id, Role::Admin, &config()).unwrap());
        let ctx = authenticate(Some(&header), &config(), &store).await.unwrap();

        assert_eq!(ctx.role, Role::User);
    }

    #[tokio::test]
    async fn test_unknown_subject() {
        let store = InMemoryIdentityStore::new();
        let header = format!(
            "Bearer {}",
            issue_token(Uuid::new_v4(), Role::User, &config()).unwrap()
        );

        assert!(matches!(
            authenticate(Some(&header), &config(), &store).await,
            Err(AuthError::IdentityNotFound)
        ));
    }

    #[tokio::test]
    async fn test_missing_header_stops_before_lookup() {
        let store = InMemoryIdentityStore::new();
        assert!(matches!(
            authenticate(None, &config(), &store).await,
            Err(AuthError::MissingCredential)
        ));
    }

    #[tokio::test]
    async fn test_works_through_trait_object() {
        let store: Arc<dyn IdentityStore> = Arc::new(InMemoryIdentityStore::new());
        let header = "Bearer not-a-jwt";

        assert!(matches!(
            authenticate(Some(header), &config(), store.as_ref()).await,
            Err(AuthError::InvalidCredential(_))
        ));
    }
}
