use std::sync::Arc;

use tasklane_application::UserService;
use tasklane_core::AppError;
use tasklane_infrastructure::{Argon2PasswordHasher, JwtAccessTokenCodec, PostgresUserRepository};

use crate::api_config::ApiConfig;

pub(super) fn build_user_service(
    config: &ApiConfig,
    user_repository: Arc<PostgresUserRepository>,
) -> Result<UserService, AppError> {
    let password_hasher = Arc::new(Argon2PasswordHasher::new());
    let token_codec = Arc::new(JwtAccessTokenCodec::new(
        &config.jwt_secret,
        config.jwt_ttl(),
    )?);

    Ok(UserService::new(user_repository, password_hasher, token_codec))
}
