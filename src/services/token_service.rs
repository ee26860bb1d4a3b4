//! Session token issuing and verification (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{Config, TOKEN_LIFETIME_SECONDS};
use crate::domain::{Identity, User, UserRole};
use crate::errors::AppResult;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// The principal these claims authenticate.
    pub fn identity(&self) -> Identity {
        Identity::new(self.sub, UserRole::from(self.role.as_str()))
    }
}

/// Signs and verifies session tokens with the configured secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(config: &Config) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens are valid for exactly one hour
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret_bytes()),
            validation,
        }
    }

    /// Issue a token for `user`, valid from now.
    pub fn issue(&self, user: &User) -> AppResult<String> {
        self.issue_at(user.id, user.role, Utc::now())
    }

    /// Issue a token as if signed at `issued_at`.
    pub fn issue_at(&self, id: Uuid, role: UserRole, issued_at: DateTime<Utc>) -> AppResult<String> {
        let expires_at = issued_at + Duration::seconds(TOKEN_LIFETIME_SECONDS);

        let claims = Claims {
            sub: id,
            role: role.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    fn issuer() -> TokenIssuer {
        let config = Config::new("sqlite::memory:", "token-test-secret-with-enough-length").unwrap();
        TokenIssuer::new(&config)
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = issuer();
        let id = Uuid::new_v4();
        let token = issuer.issue_at(id, UserRole::Admin, Utc::now()).unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_SECONDS);
        assert_eq!(claims.identity(), Identity::new(id, UserRole::Admin));
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = issuer();
        let issued_at = Utc::now() - Duration::seconds(TOKEN_LIFETIME_SECONDS + 5);
        let token = issuer
            .issue_at(Uuid::new_v4(), UserRole::User, issued_at)
            .unwrap();

        assert!(matches!(issuer.verify(&token), Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let issuer = issuer();
        let token = issuer
            .issue_at(Uuid::new_v4(), UserRole::User, Utc::now())
            .unwrap();

        // Flip a character in the signature segment
        let mut tampered = token.into_bytes();
        let last = tampered.len() - 2;
        tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();

        assert!(issuer.verify(&tampered).is_err());
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let other = TokenIssuer::new(
            &Config::new("sqlite::memory:", "another-secret-that-is-long-enough!!").unwrap(),
        );
        let token = other
            .issue_at(Uuid::new_v4(), UserRole::User, Utc::now())
            .unwrap();

        assert!(issuer().verify(&token).is_err());
    }
}
