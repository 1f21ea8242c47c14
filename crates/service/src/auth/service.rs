//! Registration, login, token refresh, and role enforcement.

use kvartal_core::error::CoreError;
use kvartal_db::models::status::Role;
use kvartal_db::models::user::{CreateUser, User, UserPublic};
use kvartal_db::repositories::UserRepo;
use kvartal_db::DbPool;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{self, Claims, JwtConfig};
use crate::auth::password;
use crate::error::{ServiceError, ServiceResult};

/// Registration payload. Role defaults to [`Role::User`] when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUser {
    pub name: String,
    pub org_name: Option<String>,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

/// Access + refresh token pair returned by login and refresh.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Credential handling and token issuance.
pub struct AuthService {
    pool: DbPool,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(pool: DbPool, jwt: JwtConfig) -> Self {
        Self { pool, jwt }
    }

    /// Register a new user.
    ///
    /// Rejects with [`CoreError::DuplicateEmail`] when the email is already
    /// taken; the password is hashed before it ever reaches the repository.
    pub async fn register(&self, input: RegisterUser) -> ServiceResult<UserPublic> {
        let mut conn = self.pool.acquire().await?;

        if UserRepo::find_by_email(&mut conn, &input.email)
            .await?
            .is_some()
        {
            return Err(CoreError::DuplicateEmail.into());
        }

        let password_hash = password::hash_password(&input.password)
            .map_err(|e| CoreError::Internal(format!("Password hashing error: {e}")))?;

        let user = UserRepo::create(
            &mut conn,
            &CreateUser {
                name: input.name,
                org_name: input.org_name,
                role: input.role.unwrap_or(Role::User),
                email: input.email,
                password_hash,
            },
        )
        .await?;

        tracing::info!(user_id = user.id, "Registered user");
        Ok(user.into())
    }

    /// Authenticate with email + password, returning fresh tokens.
    ///
    /// An unknown email and a wrong password both surface as
    /// [`CoreError::InvalidCredentials`]; no token is issued either way.
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<TokenPair> {
        let mut conn = self.pool.acquire().await?;

        let user = UserRepo::find_by_email(&mut conn, email)
            .await?
            .ok_or(CoreError::InvalidCredentials)?;

        let password_valid = password::verify_password(password, &user.password_hash)
            .map_err(|e| CoreError::Internal(format!("Password verification error: {e}")))?;
        if !password_valid {
            return Err(CoreError::InvalidCredentials.into());
        }

        self.issue_tokens(&user)
    }

    /// Validate a token and return its claims.
    pub fn verify_token(&self, token: &str) -> ServiceResult<Claims> {
        Ok(jwt::validate_token(token, &self.jwt)?)
    }

    /// Validate a token and load the user it refers to.
    ///
    /// A token whose subject no longer exists is treated as invalid.
    pub async fn resolve_user(&self, token: &str) -> ServiceResult<User> {
        let claims = self.verify_token(token)?;
        let mut conn = self.pool.acquire().await?;
        let user = UserRepo::find_by_id(&mut conn, claims.sub)
            .await?
            .ok_or(CoreError::InvalidToken)?;
        Ok(user)
    }

    /// Resolve the token's user and require an exact role match.
    pub async fn require_role(&self, token: &str, role: Role) -> ServiceResult<User> {
        let user = self.resolve_user(token).await?;
        if user.role != role {
            return Err(CoreError::Forbidden(format!(
                "Requires role {}",
                role.as_str()
            ))
            .into());
        }
        Ok(user)
    }

    /// Exchange a valid refresh token for a new access + refresh pair.
    pub async fn refresh(&self, refresh_token: &str) -> ServiceResult<TokenPair> {
        let claims = self.verify_token(refresh_token)?;
        let mut conn = self.pool.acquire().await?;
        let user = UserRepo::find_by_id(&mut conn, claims.sub)
            .await?
            .ok_or(CoreError::InvalidToken)?;
        self.issue_tokens(&user)
    }

    /// Generate both tokens for a user.
    fn issue_tokens(&self, user: &User) -> Result<TokenPair, ServiceError> {
        let access_token = jwt::generate_access_token(user.id, user.role.as_str(), &self.jwt)
            .map_err(|e| CoreError::Internal(format!("Token generation error: {e}")))?;
        let refresh_token = jwt::generate_refresh_token(user.id, user.role.as_str(), &self.jwt)
            .map_err(|e| CoreError::Internal(format!("Token generation error: {e}")))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.jwt.access_token_expiry_mins * 60,
        })
    }
}
