//! Authenticated user identity taken from the auth provider's JWT

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;

/// Role granting access to the support administration panel
pub const ADMIN_ROLE: &str = "admin";

/// JWT claims issued by the hosted auth provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// User id
    pub sub: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    pub fn new(user_id: Uuid, email: Option<String>, ttl_seconds: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: user_id,
            email,
            aud: None,
            exp: now + ttl_seconds,
            iat: now,
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Create a signed token (used by tests and local tooling)
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse and verify a token
    pub fn from_token(token: &str, auth: &AuthConfig) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
        let mut validation = Validation::new(Algorithm::HS256);
        match &auth.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(auth.jwt_secret.as_bytes()),
            &validation,
        )?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(audience: Option<&str>) -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            audience: audience.map(str::to_string),
        }
    }

    #[test]
    fn test_token_roundtrip() {
        let id = Uuid::new_v4();
        let token = UserClaims::new(id, Some("a@b.c".into()), 3600)
            .create_token("test-secret")
            .unwrap();
        let claims = UserClaims::from_token(&token, &auth(None)).unwrap();
        assert_eq!(claims.user_id(), id);
        assert_eq!(claims.email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = UserClaims::new(Uuid::new_v4(), None, 3600)
            .create_token("other-secret")
            .unwrap();
        assert!(UserClaims::from_token(&token, &auth(None)).is_err());
    }

    #[test]
    fn test_audience_checked_when_configured() {
        let mut claims = UserClaims::new(Uuid::new_v4(), None, 3600);
        claims.aud = Some("authenticated".into());
        let token = claims.create_token("test-secret").unwrap();
        assert!(UserClaims::from_token(&token, &auth(Some("authenticated"))).is_ok());
        assert!(UserClaims::from_token(&token, &auth(Some("service"))).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut claims = UserClaims::new(Uuid::new_v4(), None, 3600);
        claims.exp = chrono::Utc::now().timestamp() - 3600;
        let token = claims.create_token("test-secret").unwrap();
        assert!(UserClaims::from_token(&token, &auth(None)).is_err());
    }
}
