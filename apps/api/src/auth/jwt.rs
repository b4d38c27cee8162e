use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 bearer tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("token signing failed: {e}")))
    }

    /// Returns the user id carried by a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Result<Uuid, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            tracing::debug!("Rejected bearer token: {e}");
            match e.kind() {
                ErrorKind::ExpiredSignature => AppError::Unauthorized("Token expired".into()),
                _ => AppError::Unauthorized("Could not validate credentials".into()),
            }
        })?;
        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Unauthorized("Could not validate credentials".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_then_verify() {
        let issuer = TokenIssuer::new("secret", 60);
        let user = Uuid::new_v4();
        let token = issuer.issue(user).unwrap();
        assert_eq!(issuer.verify(&token).unwrap(), user);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = TokenIssuer::new("one", 60).issue(Uuid::new_v4()).unwrap();
        let err = TokenIssuer::new("two", 60).verify(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = TokenIssuer::new("secret", -5);
        let token = issuer.issue(Uuid::new_v4()).unwrap();
        match issuer.verify(&token) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Token expired"),
            other => panic!("expected expiry rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_rejected() {
        let issuer = TokenIssuer::new("secret", 60);
        assert!(issuer.verify("not.a.token").is_err());
    }
}
