//! The auth gate and role gate, end to end through the router, with an
//! in-memory identity store and no database.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use bookstore::init_router;
use bookstore_auth::{AuthContext, IdentityFuture, IdentityStore, InMemoryIdentityStore, Role};
use chrono::Utc;
use common::{TEST_SECRET, app_without_db, lazy_pool, read_json, request, test_state, token_for};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

fn store_with(users: &[(Uuid, Role)]) -> Arc<InMemoryIdentityStore> {
    let store = InMemoryIdentityStore::new();
    for (id, role) in users {
        store.insert(*id, *role);
    }
    Arc::new(store)
}

#[tokio::test]
async fn test_missing_header_is_unauthorized() {
    let app = app_without_db(store_with(&[]));

    let response = app
        .oneshot(request("GET", "/api/books", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(response).await;
    assert_eq!(body["ok"], false);
    assert!(body["data"].is_null());
    assert_eq!(body["error"]["message"], "Missing or malformed bearer token");
}

#[tokio::test]
async fn test_non_bearer_scheme_is_unauthorized() {
    let app = app_without_db(store_with(&[]));
    let req = axum::http::Request::builder()
        .uri("/api/books")
        .header("authorization", "Basic YWRtaW46YWRtaW4=")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = app_without_db(store_with(&[]));

    let response = app
        .oneshot(request("GET", "/api/books", Some("not.a.jwt"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(response).await;
    assert_eq!(body["error"]["message"], "Invalid token");
    assert!(body["error"]["stack"].is_string());
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let user_id = Uuid::new_v4();
    let app = app_without_db(store_with(&[(user_id, Role::Admin)]));
    let now = Utc::now().timestamp();
    let token = encode(
        &Header::new(Algorithm::HS256),
        &json!({ "sub": user_id, "role": "admin", "exp": now - 60, "iat": now - 3600 }),
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let response = app
        .oneshot(request("GET", "/api/auth/validate", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(response).await;
    assert_eq!(body["error"]["message"], "Token has expired");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_unauthorized() {
    let user_id = Uuid::new_v4();
    let app = app_without_db(store_with(&[(user_id, Role::Admin)]));
    let now = Utc::now().timestamp();
    let token = encode(
        &Header::new(Algorithm::HS256),
        &json!({ "sub": user_id, "role": "admin", "exp": now + 60, "iat": now }),
        &EncodingKey::from_secret(b"some-other-secret"),
    )
    .unwrap();

    let response = app
        .oneshot(request("GET", "/api/auth/validate", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_subject_is_not_found() {
    let app = app_without_db(store_with(&[]));
    let token = token_for(Uuid::new_v4(), Role::Admin);

    let response = app
        .oneshot(request("GET", "/api/auth/validate", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["error"]["message"], "User not found");
}

#[tokio::test]
async fn test_validate_returns_attached_identity() {
    let user_id = Uuid::new_v4();
    let app = app_without_db(store_with(&[(user_id, Role::User)]));
    let token = token_for(user_id, Role::User);

    let response = app
        .oneshot(request("GET", "/api/auth/validate", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body = read_json(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["data"]["user_id"], user_id.to_string());
    assert_eq!(body["data"]["role"], "user");
}

#[tokio::test]
async fn test_stored_role_overrides_token_role() {
    let user_id = Uuid::new_v4();
    let app = app_without_db(store_with(&[(user_id, Role::User)]));
    let token = token_for(user_id, Role::Admin);

    let response = app
        .oneshot(request("DELETE", &format!("/api/books/{}", Uuid::new_v4()), Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_user_cannot_mutate() {
    let user_id = Uuid::new_v4();
    let store = store_with(&[(user_id, Role::User)]);
    let token = token_for(user_id, Role::User);
    let id = Uuid::new_v4();

    let cases = [
        ("POST", "/api/authors".to_string()),
        ("PUT", format!("/api/categories/{id}")),
        ("DELETE", format!("/api/books/{id}")),
        ("POST", "/api/users".to_string()),
    ];

    for (method, uri) in cases {
        let response = app_without_db(store.clone())
            .oneshot(request(method, &uri, Some(&token), Some(json!({}))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{method} {uri}");
        let body = read_json(response).await;
        assert_eq!(body["error"]["message"], "Your role does not allow this operation");
    }
}

#[tokio::test]
async fn test_admin_passes_both_gates() {
    let admin_id = Uuid::new_v4();
    let app = app_without_db(store_with(&[(admin_id, Role::Admin)]));
    let token = token_for(admin_id, Role::Admin);

    // Rejected by body validation, which only runs once both gates passed.
    let response = app
        .oneshot(request("POST", "/api/authors", Some(&token), Some(json!({}))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"]["message"], "name is required");
}

#[tokio::test]
async fn test_user_list_with_malformed_sort_is_bad_request() {
    let user_id = Uuid::new_v4();
    let app = app_without_db(store_with(&[(user_id, Role::User)]));
    let token = token_for(user_id, Role::User);

    let response = app
        .oneshot(request("GET", "/api/books?sort=%7Bnot-json", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn test_public_routes_skip_the_gate() {
    let app = app_without_db(store_with(&[]));

    // Validation fails before any query, proving no token was required.
    let response = app
        .oneshot(request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "user_name": "ab", "password": "short", "first_name": "A", "last_name": "B" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

/// Resolves every subject as an admin, but only after `delay`.
struct SlowIdentityStore {
    delay: Duration,
}

impl IdentityStore for SlowIdentityStore {
    fn find_identity(&self, user_id: Uuid) -> IdentityFuture<'_> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            Ok(Some(AuthContext {
                user_id,
                role: Role::Admin,
            }))
        })
    }
}

#[tokio::test]
async fn test_request_past_deadline_gets_timeout_envelope() {
    let mut state = test_state(lazy_pool(), std::env::temp_dir().join("bookstore-test-covers"))
        .with_identities(Arc::new(SlowIdentityStore {
            delay: Duration::from_secs(3),
        }));
    state.server_config.request_timeout_secs = 1;
    let app = init_router(state);
    let token = token_for(Uuid::new_v4(), Role::Admin);

    let response = app
        .oneshot(request("GET", "/api/auth/validate", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    let body = read_json(response).await;
    assert_eq!(body["ok"], false);
    assert!(body["data"].is_null());
    assert_eq!(body["error"]["message"], "Request timeout");
}
