//! JWT service for session token generation and validation
//!
//! Tokens are HS256-signed with the shared secret from configuration and
//! carry the username of the caller that logged in. Nothing is stored
//! server-side: a token stays valid until its `exp` passes.

use anyhow::Result;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared secret used to sign and verify tokens
    pub secret: String,
    /// Token lifetime in seconds (default: 1 hour)
    pub expiry_seconds: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiry_seconds", &self.expiry_seconds)
            .finish()
    }
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token was issued to
    pub username: String,
    /// Issued at time
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry_seconds: u64,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        JwtService {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            expiry_seconds: config.expiry_seconds,
        }
    }

    /// Issue a signed token for `username`
    pub fn issue(&self, username: &str) -> Result<String> {
        let now = Utc::now().timestamp();
        let expiry = i64::try_from(self.expiry_seconds)
            .map_err(|e| anyhow::anyhow!("Token expiry out of range: {}", e))?;
        let exp = now
            .checked_add(expiry)
            .ok_or_else(|| anyhow::anyhow!("Token expiry overflows the timestamp range"))?;

        let claims = Claims {
            username: username.to_string(),
            iat: now,
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Get the token expiry time
    pub fn expiry_seconds(&self) -> u64 {
        self.expiry_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> JwtService {
        JwtService::new(&JwtConfig {
            secret: secret.to_string(),
            expiry_seconds: 3600,
        })
    }

    #[test]
    fn test_issued_token_decodes_to_username() {
        let jwt = service("testsecret");

        let token = jwt.issue("admin").unwrap();
        let claims = jwt.validate_token(&token).unwrap();

        assert_eq!(claims.username, "admin");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = service("one secret").issue("admin").unwrap();
        assert!(service("another secret").validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            username: "admin".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"testsecret"),
        )
        .unwrap();

        assert!(service("testsecret").validate_token(&token).is_err());
    }

    #[test]
    fn test_oversized_expiry_is_an_error() {
        let jwt = JwtService::new(&JwtConfig {
            secret: "testsecret".to_string(),
            expiry_seconds: i64::MAX as u64,
        });
        assert!(jwt.issue("admin").is_err());

        let jwt = JwtService::new(&JwtConfig {
            secret: "testsecret".to_string(),
            expiry_seconds: u64::MAX,
        });
        assert!(jwt.issue("admin").is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(service("testsecret").validate_token("not-a-jwt").is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = JwtConfig {
            secret: "hunter2".to_string(),
            expiry_seconds: 60,
        };
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
