use bookstore_auth::{AuthError, issue_token};
use bookstore_config::JwtConfig;
use bookstore_core::{AppError, verify_password};
use bookstore_db::{PgPool, StoreError, find_by_id};
use bookstore_models::{
    CreateUserDto, LoginRequest, LoginResponse, RegisterRequest, User, UserCredentials,
};
use tracing::instrument;

use crate::modules::users::service::UserService;

pub struct AuthService;

impl AuthService {
    /// Self-service sign up. The account always gets the `user` role.
    #[instrument(skip(db, dto), fields(user_name = %dto.user_name))]
    pub async fn register_user(db: &PgPool, dto: RegisterRequest) -> Result<User, AppError> {
        UserService::create_user(
            db,
            CreateUserDto {
                user_name: dto.user_name,
                password: dto.password,
                first_name: dto.first_name,
                last_name: dto.last_name,
                role: None,
            },
        )
        .await
    }

    #[instrument(skip(db, dto, jwt_config), fields(user_name = %dto.user_name))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, password, role FROM users WHERE user_name = $1",
        )
        .bind(&dto.user_name)
        .fetch_optional(db)
        .await
        .map_err(StoreError::from)?
        .ok_or(AuthError::InvalidLogin)?;

        if !verify_password(&dto.password, &credentials.password)? {
            tracing::warn!(user_id = %credentials.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidLogin.into());
        }

        let access_token = issue_token(credentials.id, credentials.role, jwt_config)?;
        let user = find_by_id::<User>(db, credentials.id).await?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_config.expiry,
            user,
        })
    }
}
