/// Bearer token verification
///
/// Boardflow does not issue sessions; the external identity service
/// signs HS256 tokens and this module only verifies them. The resolved
/// actor (user ID and email) is all the rest of the system ever sees of
/// a credential.
///
/// # Example
///
/// ```
/// use boardflow_shared::auth::token::{verify_token, Claims};
/// use jsonwebtoken::{encode, EncodingKey, Header};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "shared-secret-at-least-32-bytes-long";
/// let claims = Claims::new(Uuid::new_v4(), "user@example.com".to_string());
/// let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))?;
///
/// let actor = verify_token(&token, secret)?;
/// assert_eq!(actor.email, "user@example.com");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error type for token verification
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature, format, or claim validation failed
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Claims carried by the identity service's tokens
///
/// Only the subset this core consumes: subject (user ID), email, and the
/// standard timestamps the validator checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Email address of the user
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims expiring in 24 hours; used by tests and tooling
    pub fn new(user_id: Uuid, email: String) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email,
            iat: now.timestamp(),
            exp: (now + Duration::hours(24)).timestamp(),
        }
    }
}

/// The authenticated caller, injected into request extensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// User ID from the token subject
    pub user_id: Uuid,

    /// Email address from the token
    pub email: String,
}

/// Verifies an HS256 bearer token and resolves the actor
///
/// # Errors
///
/// Returns `TokenError::Expired` for expired tokens and
/// `TokenError::Invalid` for bad signatures or malformed claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Actor, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(format!("Token validation failed: {}", e)),
    })?;

    Ok(Actor {
        user_id: token_data.claims.sub,
        email: token_data.claims.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_valid_token() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "user@example.com".to_string());
        let token = sign(&claims, SECRET);

        let actor = verify_token(&token, SECRET).unwrap();
        assert_eq!(actor.user_id, user_id);
        assert_eq!(actor.email, "user@example.com");
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4(), "user@example.com".to_string());
        let token = sign(&claims, SECRET);

        let result = verify_token(&token, "a-completely-different-secret-value");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };
        let token = sign(&claims, SECRET);

        let result = verify_token(&token, SECRET);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let result = verify_token("not-a-token", SECRET);
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }
}
