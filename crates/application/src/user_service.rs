//! User registration, login and bearer token verification.
//!
//! Failure messages for login and token checks stay generic so callers
//! cannot tell unknown accounts from wrong passwords.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tasklane_core::{AppError, AppResult, UserId, UserIdentity};
use tasklane_domain::{EmailAddress, Username, validate_password};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// User record returned by repository queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Unique login handle.
    pub username: String,
    /// Canonical email address.
    pub email: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Returns the identity carried by access tokens for this user.
    #[must_use]
    pub fn identity(&self) -> UserIdentity {
        UserIdentity::new(self.id, self.username.clone(), Some(self.email.clone()))
    }
}

/// Values persisted for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Validated login handle.
    pub username: String,
    /// Canonical email address.
    pub email: String,
    /// Argon2id password hash.
    pub password_hash: String,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Finds a user by username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>>;

    /// Finds a user by identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Creates a user. Duplicate username or email yields `Conflict`.
    async fn create(&self, user: NewUser) -> AppResult<UserRecord>;
}

/// Port for password hashing so the application layer stays free of crypto crates.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Signed bearer token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Encoded token.
    pub access_token: String,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
}

/// Port for issuing and verifying bearer tokens.
pub trait AccessTokenCodec: Send + Sync {
    /// Issues a token for the identity.
    fn issue(&self, identity: &UserIdentity) -> AppResult<IssuedToken>;

    /// Verifies a token and returns the identity it carries.
    ///
    /// Expired or tampered tokens yield `Unauthorized`.
    fn verify(&self, token: &str) -> AppResult<UserIdentity>;
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Parameters for user registration.
#[derive(Debug, Clone)]
pub struct RegisterParams {
    /// Requested login handle.
    pub username: String,
    /// Email address for the new account.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Authenticated user with a freshly issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Authenticated user.
    pub user: UserRecord,
    /// Bearer token for subsequent requests.
    pub token: IssuedToken,
}

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Application service for user authentication and registration.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_codec: Arc<dyn AccessTokenCodec>,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_codec: Arc<dyn AccessTokenCodec>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_codec,
        }
    }

    /// Registers a new account and signs it in.
    pub async fn register(&self, params: RegisterParams) -> AppResult<AuthSession> {
        let username = Username::new(params.username.trim())?;
        let email = EmailAddress::new(&params.email)?;
        validate_password(&params.password)?;

        if self
            .user_repository
            .find_by_username(username.as_str())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "username '{}' is already taken",
                username.as_str()
            )));
        }

        if self
            .user_repository
            .find_by_email(email.as_str())
            .await?
            .is_some()
        {
            // Still hash so the response time matches the success path.
            let _ = self.password_hasher.hash_password(&params.password);
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        let password_hash = self.password_hasher.hash_password(&params.password)?;
        let user = self
            .user_repository
            .create(NewUser {
                username: username.as_str().to_owned(),
                email: email.as_str().to_owned(),
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "user registered");
        self.start_session(user)
    }

    /// Authenticates with an email address or username plus password.
    pub async fn login(&self, identifier: &str, password: &str) -> AppResult<AuthSession> {
        let identifier = identifier.trim();
        let user = if identifier.contains('@') {
            self.user_repository
                .find_by_email(&identifier.to_lowercase())
                .await?
        } else {
            self.user_repository.find_by_username(identifier).await?
        };

        let Some(user) = user else {
            // Hash anyway so unknown accounts cost the same as wrong passwords.
            let _ = self.password_hasher.hash_password(password);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_owned()));
        };

        if !self
            .password_hasher
            .verify_password(password, &user.password_hash)?
        {
            tracing::debug!(user_id = %user.id, "login rejected");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_owned()));
        }

        self.start_session(user)
    }

    /// Verifies a bearer token and confirms the account still exists.
    pub async fn authenticate(&self, token: &str) -> AppResult<UserIdentity> {
        let identity = self.token_codec.verify(token)?;
        let user = self
            .user_repository
            .find_by_id(identity.user_id())
            .await?
            .ok_or_else(|| AppError::Unauthorized("invalid token".to_owned()))?;

        Ok(user.identity())
    }

    /// Returns the account of an authenticated user.
    pub async fn current_user(&self, actor: &UserIdentity) -> AppResult<UserRecord> {
        self.user_repository
            .find_by_id(actor.user_id())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{}' does not exist", actor.user_id())))
    }

    fn start_session(&self, user: UserRecord) -> AppResult<AuthSession> {
        let token = self.token_codec.issue(&user.identity())?;
        Ok(AuthSession { user, token })
    }
}

#[cfg(test)]
mod tests;
