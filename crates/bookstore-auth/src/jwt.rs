//! Issuing and verifying access tokens.
//!
//! Tokens are HS256-signed JWTs carrying [`Claims`]. Verification accepts
//! HMAC algorithms only, so a token declaring `RS256`, `ES256` or `none`
//! is rejected before any signature check. Expiry is checked separately
//! from the signature so the two failures stay distinguishable.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode,
};
use uuid::Uuid;

use bookstore_config::JwtConfig;

use crate::claims::{Claims, Role};
use crate::error::AuthError;

const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Signs a token for `user_id` valid for `jwt_config.expiry` seconds.
pub fn issue_token(user_id: Uuid, role: Role, jwt_config: &JwtConfig) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role,
        exp: now + jwt_config.expiry,
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(AuthError::SignError)
}

/// Verifies the signature and expiry of `token` and returns its claims.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AuthError> {
    let header = decode_header(token).map_err(AuthError::InvalidCredential)?;
    if !HMAC_ALGORITHMS.contains(&header.alg) {
        tracing::warn!(alg = ?header.alg, "Rejected token with non-HMAC algorithm");
        return Err(AuthError::InvalidCredential(ErrorKind::InvalidAlgorithm.into()));
    }

    let mut validation = Validation::new(header.alg);
    validation.algorithms = HMAC_ALGORITHMS.to_vec();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(AuthError::InvalidCredential)?;

    if Utc::now().timestamp() > claims.exp {
        return Err(AuthError::ExpiredCredential);
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            expiry: 3600,
        }
    }

    fn sign(claims: &impl serde::Serialize, alg: Algorithm, secret: &str) -> String {
        encode(
            &Header::new(alg),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, Role::Admin, &config()).unwrap();

        let claims = verify_token(&token, &config()).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_default_lifetime_is_thirty_days() {
        let config = JwtConfig {
            expiry: bookstore_config::jwt::DEFAULT_EXPIRY_SECS,
            ..config()
        };
        let token = issue_token(Uuid::new_v4(), Role::User, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.exp - claims.iat, 30 * 24 * 60 * 60);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = issue_token(Uuid::new_v4(), Role::User, &config()).unwrap();
        let other = JwtConfig {
            secret: "a-completely-different-secret-value".to_string(),
            ..config()
        };
        assert!(matches!(
            verify_token(&token, &other),
            Err(AuthError::InvalidCredential(_))
        ));
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert!(matches!(
            verify_token("not.a.token", &config()),
            Err(AuthError::InvalidCredential(_))
        ));
    }

    #[test]
    fn test_expired_token_with_valid_signature() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: Role::Admin,
            exp: now - 10,
            iat: now - 100,
        };
        let token = sign(&claims, Algorithm::HS256, &config().secret);

        assert!(matches!(
            verify_token(&token, &config()),
            Err(AuthError::ExpiredCredential)
        ));
    }

    #[test]
    fn test_other_hmac_algorithms_accepted() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: Role::User,
            exp: now + 60,
            iat: now,
        };
        let token = sign(&claims, Algorithm::HS512, &config().secret);
        assert_eq!(verify_token(&token, &config()).unwrap(), claims);
    }

    #[test]
    fn test_non_hmac_algorithm_rejected() {
        // {"alg":"RS256","typ":"JWT"} with well-formed, unexpired claims
        let token = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.\
            eyJzdWIiOiI2ZjJjMWY5ZS0zYjdhLTRjMWQtOWUyZi0wYTFiMmMzZDRlNWYiLCJyb2xlIjoiYWRtaW4iLCJleHAiOjQxMDI0NDQ4MDAsImlhdCI6MTcwMDAwMDAwMH0.\
            c2lnbmF0dXJl";

        match verify_token(token, &config()) {
            Err(AuthError::InvalidCredential(e)) => {
                assert_eq!(e.kind(), &ErrorKind::InvalidAlgorithm)
            }
            other => panic!("expected InvalidCredential, got {other:?}"),
        }
    }

    #[test]
    fn test_alg_none_rejected() {
        // {"alg":"none","typ":"JWT"}
        let token = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.\
            eyJzdWIiOiI2ZjJjMWY5ZS0zYjdhLTRjMWQtOWUyZi0wYTFiMmMzZDRlNWYiLCJyb2xlIjoiYWRtaW4iLCJleHAiOjQxMDI0NDQ4MDAsImlhdCI6MTcwMDAwMDAwMH0.";

        assert!(matches!(
            verify_token(token, &config()),
            Err(AuthError::InvalidCredential(_))
        ));
    }

    #[test]
    fn test_missing_role_claim_is_invalid() {
        let claims = serde_json::json!({
            "sub": Uuid::new_v4(),
            "exp": Utc::now().timestamp() + 60,
            "iat": Utc::now().timestamp(),
        });
        let token = sign(&claims, Algorithm::HS256, &config().secret);

        assert!(matches!(
            verify_token(&token, &config()),
            Err(AuthError::InvalidCredential(_))
        ));
    }

    #[test]
    fn test_string_exp_is_invalid() {
        let claims = serde_json::json!({
            "sub": Uuid::new_v4(),
            "role": "admin",
            "exp": "tomorrow",
            "iat": Utc::now().timestamp(),
        });
        let token = sign(&claims, Algorithm::HS256, &config().secret);

        assert!(matches!(
            verify_token(&token, &config()),
            Err(AuthError::InvalidCredential(_))
        ));
    }
}
