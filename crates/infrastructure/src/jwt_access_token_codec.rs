//! HS256 bearer tokens carrying the caller identity.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tasklane_application::{AccessTokenCodec, IssuedToken};
use tasklane_core::{AppError, AppResult, UserId, UserIdentity};
use uuid::Uuid;

/// Shortest accepted signing secret, in bytes.
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    iat: i64,
    exp: i64,
}

/// JWT codec signing tokens with a shared secret.
#[derive(Clone)]
pub struct JwtAccessTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtAccessTokenCodec {
    /// Creates a codec. Secrets shorter than [`MIN_JWT_SECRET_LENGTH`] are rejected.
    pub fn new(secret: &str, ttl: Duration) -> AppResult<Self> {
        if secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::Validation(format!(
                "jwt secret must be at least {MIN_JWT_SECRET_LENGTH} bytes"
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl,
        })
    }
}

impl AccessTokenCodec for JwtAccessTokenCodec {
    fn issue(&self, identity: &UserIdentity) -> AppResult<IssuedToken> {
        let issued_at = Utc::now();
        let expires_at = issued_at + self.ttl;
        let claims = Claims {
            sub: identity.user_id().as_uuid(),
            username: identity.username().to_owned(),
            email: identity.email().map(str::to_owned),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|error| AppError::Internal(format!("failed to sign access token: {error}")))?;

        Ok(IssuedToken {
            access_token,
            expires_at,
        })
    }

    fn verify(&self, token: &str) -> AppResult<UserIdentity> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|error| {
            tracing::debug!(error = %error, "rejected access token");
            AppError::Unauthorized("invalid token".to_owned())
        })?;

        Ok(UserIdentity::new(
            UserId::from_uuid(data.claims.sub),
            data.claims.username,
            data.claims.email,
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use tasklane_application::AccessTokenCodec;
    use tasklane_core::{AppError, AppResult, UserId, UserIdentity};

    use super::JwtAccessTokenCodec;

    const SECRET: &str = "a-test-secret-that-is-long-enough-for-hs256";

    fn identity() -> UserIdentity {
        UserIdentity::new(
            UserId::new(),
            "morgan_l",
            Some("morgan@example.com".to_owned()),
        )
    }

    #[test]
    fn issued_token_verifies_to_same_identity() -> AppResult<()> {
        let codec = JwtAccessTokenCodec::new(SECRET, Duration::hours(1))?;
        let identity = identity();

        let token = codec.issue(&identity)?;
        assert_eq!(codec.verify(&token.access_token)?, identity);
        Ok(())
    }

    #[test]
    fn token_from_another_secret_is_unauthorized() -> AppResult<()> {
        let issuer = JwtAccessTokenCodec::new(SECRET, Duration::hours(1))?;
        let verifier =
            JwtAccessTokenCodec::new("another-secret-that-is-also-long-enough", Duration::hours(1))?;

        let token = issuer.issue(&identity())?;
        let result = verifier.verify(&token.access_token);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
        Ok(())
    }

    #[test]
    fn expired_token_is_unauthorized() -> AppResult<()> {
        let codec = JwtAccessTokenCodec::new(SECRET, Duration::minutes(-10))?;

        let token = codec.issue(&identity())?;
        let result = codec.verify(&token.access_token);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
        Ok(())
    }

    #[test]
    fn short_secret_is_rejected() {
        let result = JwtAccessTokenCodec::new("short", Duration::hours(1));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
