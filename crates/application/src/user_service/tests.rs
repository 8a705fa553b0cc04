use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tasklane_core::{AppError, AppResult, UserId, UserIdentity};
use tokio::sync::Mutex;

use super::{
    AccessTokenCodec, IssuedToken, NewUser, PasswordHasher, RegisterParams, UserRecord,
    UserRepository, UserService,
};

#[derive(Default)]
struct FakeUserRepository {
    users: Mutex<Vec<UserRecord>>,
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.id == user_id)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<UserRecord> {
        let record = UserRecord {
            id: UserId::new(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        self.users.lock().await.push(record.clone());
        Ok(record)
    }
}

struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}

/// Encodes the user id as the token; anything else is rejected.
struct IdTokenCodec;

impl AccessTokenCodec for IdTokenCodec {
    fn issue(&self, identity: &UserIdentity) -> AppResult<IssuedToken> {
        Ok(IssuedToken {
            access_token: identity.user_id().to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        })
    }

    fn verify(&self, token: &str) -> AppResult<UserIdentity> {
        let user_id = token
            .parse::<UserId>()
            .map_err(|_| AppError::Unauthorized("invalid token".to_owned()))?;
        Ok(UserIdentity::new(user_id, String::new(), None))
    }
}

fn service() -> (UserService, Arc<FakeUserRepository>) {
    let repository = Arc::new(FakeUserRepository::default());
    let service = UserService::new(
        repository.clone(),
        Arc::new(PlainHasher),
        Arc::new(IdTokenCodec),
    );
    (service, repository)
}

fn params(username: &str, email: &str) -> RegisterParams {
    RegisterParams {
        username: username.to_owned(),
        email: email.to_owned(),
        password: "correct horse battery".to_owned(),
    }
}

#[tokio::test]
async fn register_normalizes_email_and_issues_token() {
    let (service, repository) = service();

    let session = service
        .register(params("jordan_k", "Jordan@Example.com"))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(session.user.email, "jordan@example.com");
    assert_eq!(session.token.access_token, session.user.id.to_string());
    assert_eq!(repository.users.lock().await.len(), 1);
}

#[tokio::test]
async fn duplicate_username_or_email_conflicts() {
    let (service, _) = service();
    service
        .register(params("jordan_k", "jordan@example.com"))
        .await
        .unwrap_or_else(|_| unreachable!());

    let same_name = service
        .register(params("jordan_k", "other@example.com"))
        .await;
    assert!(matches!(same_name, Err(AppError::Conflict(_))));

    let same_email = service
        .register(params("someone_else", "JORDAN@example.com"))
        .await;
    assert!(matches!(same_email, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn weak_password_is_rejected() {
    let (service, _) = service();
    let mut request = params("jordan_k", "jordan@example.com");
    request.password = "password".to_owned();

    let result = service.register(request).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn login_accepts_email_or_username() {
    let (service, _) = service();
    service
        .register(params("jordan_k", "jordan@example.com"))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(
        service
            .login("jordan@example.com", "correct horse battery")
            .await
            .is_ok()
    );
    assert!(
        service
            .login("jordan_k", "correct horse battery")
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn login_failures_share_one_message() {
    let (service, _) = service();
    service
        .register(params("jordan_k", "jordan@example.com"))
        .await
        .unwrap_or_else(|_| unreachable!());

    let wrong_password = service.login("jordan_k", "not the password").await;
    let unknown_user = service.login("nobody_here", "correct horse battery").await;

    match (wrong_password, unknown_user) {
        (Err(AppError::Unauthorized(first)), Err(AppError::Unauthorized(second))) => {
            assert_eq!(first, second);
        }
        other => panic!("expected two unauthorized errors, got {other:?}"),
    }
}

#[tokio::test]
async fn authenticate_requires_existing_account() {
    let (service, _) = service();
    let session = service
        .register(params("jordan_k", "jordan@example.com"))
        .await
        .unwrap_or_else(|_| unreachable!());

    let identity = service
        .authenticate(&session.token.access_token)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(identity.username(), "jordan_k");

    let stranger = service.authenticate(&UserId::new().to_string()).await;
    assert!(matches!(stranger, Err(AppError::Unauthorized(_))));

    let garbage = service.authenticate("not-a-token").await;
    assert!(matches!(garbage, Err(AppError::Unauthorized(_))));
}
