//! Bearer tokens
//!
//! HS256 JWTs. Admin tokens carry the admin email as subject and last a day;
//! user tokens carry the user UUID and last a week.

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::users::models::UserUuid;

/// Admin token lifetime.
pub const ADMIN_TOKEN_TTL: SignedDuration = SignedDuration::from_hours(24);

/// User token lifetime.
pub const USER_TOKEN_TTL: SignedDuration = SignedDuration::from_hours(24 * 7);

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Admin { email: String },
    User { uuid: UserUuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Role {
    Admin,
    User,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: Role,
    iat: i64,
    exp: i64,
}

/// A signed token and when it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: Timestamp,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signing secret is not configured")]
    MissingSecret,

    #[error("token is invalid or expired")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("token subject is malformed")]
    MalformedSubject,

    #[error("token could not be signed")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Signs and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenIssuer(**redacted**)")
    }
}

impl TokenIssuer {
    /// Build an issuer from the signing secret.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::MissingSecret`] when the secret is blank.
    pub fn new(secret: &Zeroizing<String>) -> Result<Self, TokenError> {
        if secret.trim().is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Sign a token for the principal, valid from `now` for the principal's lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if encoding fails.
    pub fn issue(&self, principal: &Principal, now: Timestamp) -> Result<IssuedToken, TokenError> {
        let (sub, role, ttl) = match principal {
            Principal::Admin { email } => (email.clone(), Role::Admin, ADMIN_TOKEN_TTL),
            Principal::User { uuid } => (uuid.to_string(), Role::User, USER_TOKEN_TTL),
        };

        let expires_at = now.checked_add(ttl).unwrap_or(Timestamp::MAX);

        let claims = Claims {
            sub,
            role,
            iat: now.as_second(),
            exp: expires_at.as_second(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Signing)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a token's signature and expiry and recover its principal.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] for bad signatures or expired tokens and
    /// [`TokenError::MalformedSubject`] when a user subject is not a UUID.
    pub fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(TokenError::Invalid)?
            .claims;

        match claims.role {
            Role::Admin => Ok(Principal::Admin { email: claims.sub }),
            Role::User => Uuid::try_parse(&claims.sub)
                .map(|uuid| Principal::User {
                    uuid: UserUuid::from_uuid(uuid),
                })
                .map_err(|_parse| TokenError::MalformedSubject),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn issuer() -> TestResult<TokenIssuer> {
        Ok(TokenIssuer::new(&Zeroizing::new("test-secret".to_string()))?)
    }

    #[test]
    fn user_token_round_trips_principal() -> TestResult {
        let issuer = issuer()?;
        let principal = Principal::User {
            uuid: UserUuid::new(),
        };

        let issued = issuer.issue(&principal, Timestamp::now())?;

        assert_eq!(issuer.verify(&issued.token)?, principal);

        Ok(())
    }

    #[test]
    fn admin_token_lasts_one_day() -> TestResult {
        let now = Timestamp::now();
        let issued = issuer()?.issue(
            &Principal::Admin {
                email: "admin@example.com".to_string(),
            },
            now,
        )?;

        assert_eq!(issued.expires_at.duration_since(now), ADMIN_TOKEN_TTL);

        Ok(())
    }

    #[test]
    fn expired_token_is_rejected() -> TestResult {
        let issuer = issuer()?;
        let long_ago = Timestamp::now().checked_sub(SignedDuration::from_hours(24 * 8))?;

        let issued = issuer.issue(
            &Principal::User {
                uuid: UserUuid::new(),
            },
            long_ago,
        )?;

        assert!(matches!(issuer.verify(&issued.token), Err(TokenError::Invalid(_))));

        Ok(())
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() -> TestResult {
        let other = TokenIssuer::new(&Zeroizing::new("other-secret".to_string()))?;
        let issued = other.issue(
            &Principal::Admin {
                email: "admin@example.com".to_string(),
            },
            Timestamp::now(),
        )?;

        assert!(issuer()?.verify(&issued.token).is_err());

        Ok(())
    }

    #[test]
    fn blank_secret_is_refused() {
        assert!(matches!(
            TokenIssuer::new(&Zeroizing::new("  ".to_string())),
            Err(TokenError::MissingSecret)
        ));
    }
}
