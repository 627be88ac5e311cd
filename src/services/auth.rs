use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

/// Role carried in the bearer token. Token issuance lives with the identity
/// provider; this service only verifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    Worker,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Manager => write!(f, "manager"),
            UserRole::Worker => write!(f, "worker"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: UserRole,
    pub exp: usize,
}

/// Mint a token. Used by tests and operational tooling; production tokens
/// come from the identity provider sharing the same secret.
pub fn issue_token(user_id: Uuid, role: UserRole, config: &Config) -> Result<String, AppError> {
    let expiration = Utc::now() + chrono::Duration::days(config.jwt_expiration_days);
    let claims = Claims {
        sub: user_id,
        role,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::internal_server_error_message(format!("Failed to issue token: {}", e)))
}

pub fn verify_token(token: &str, config: &Config) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        log::warn!("Token verification failed: {}", e);
        AppError::Unauthorized
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn config() -> Config {
        Config {
            database_url: "postgres://@localhost:5432/paylog_test".to_string(),
            jwt_secret: "test-secret-key-that-is-long-enough".to_string(),
            jwt_expiration_days: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
        }
    }

    #[test]
    fn issued_tokens_verify_round_trip() {
        let config = config();
        let user_id = Uuid::new_v4();

        let token = issue_token(user_id, UserRole::Manager, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, UserRole::Manager);
    }

    #[test]
    fn tokens_signed_with_other_secrets_are_rejected() {
        let config = config();
        let mut other = config.clone();
        other.jwt_secret = "a-completely-different-secret-key".to_string();

        let token = issue_token(Uuid::new_v4(), UserRole::Admin, &other).unwrap();
        assert!(matches!(
            verify_token(&token, &config),
            Err(AppError::Unauthorized)
        ));
    }
}
