// JWT token creation and verification
// Access tokens authorize requests, refresh tokens only mint new pairs

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which half of a token pair a token is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
///
/// # Fields
/// * `sub` - Subject (user_id)
/// * `exp` - Expiry time (seconds since epoch)
/// * `token_type` - Access or refresh
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID (subject)
    pub sub: Uuid,
    /// Expiry timestamp (seconds since epoch)
    pub exp: usize,
    pub token_type: TokenType,
}

/// Signing secret and lifetimes for issued tokens
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

/// Tokens returned to clients after login, registration or refresh
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Creates a signed token of the given type
///
/// # Example
/// ```
/// use jobboard_api::auth::jwt::{create_token, verify_token, TokenType};
/// use uuid::Uuid;
///
/// let user_id = Uuid::new_v4();
/// let token = create_token(user_id, TokenType::Access, 60, "secret").expect("valid token");
///
/// let claims = verify_token(&token, TokenType::Access, "secret").expect("valid token");
/// assert_eq!(claims.sub, user_id);
/// ```
pub fn create_token(
    user_id: Uuid,
    token_type: TokenType,
    ttl_secs: i64,
    secret: &str,
) -> Result<String, String> {
    let expiry = Utc::now() + Duration::seconds(ttl_secs);
    let claims = Claims {
        sub: user_id,
        exp: expiry.timestamp() as usize,
        token_type,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| e.to_string())
}

/// Issues a fresh access/refresh pair for a user
pub fn create_token_pair(user_id: Uuid, settings: &TokenSettings) -> Result<TokenPair, String> {
    Ok(TokenPair {
        access: create_token(user_id, TokenType::Access, settings.access_ttl_secs, &settings.secret)?,
        refresh: create_token(
            user_id,
            TokenType::Refresh,
            settings.refresh_ttl_secs,
            &settings.secret,
        )?,
    })
}

/// Verifies and decodes a JWT token
///
/// Fails when the signature or expiry is invalid, or when the token is
/// not of the `expected` type.
pub fn verify_token(token: &str, expected: TokenType, secret: &str) -> Result<Claims, String> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())?;

    if claims.token_type != expected {
        return Err(format!("Expected {:?} token", expected).to_lowercase());
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-unit-tests";

    fn settings() -> TokenSettings {
        TokenSettings {
            secret: TEST_SECRET.to_string(),
            access_ttl_secs: 3000,
            refresh_ttl_secs: 259200,
        }
    }

    #[test]
    fn create_and_verify_token() {
        let user_id = Uuid::new_v4();
        let token = create_token(user_id, TokenType::Access, 60, TEST_SECRET).expect("valid token");

        let claims = verify_token(&token, TokenType::Access, TEST_SECRET).expect("valid verification");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn wrong_secret_fails() {
        let token = create_token(Uuid::new_v4(), TokenType::Access, 60, TEST_SECRET).expect("valid token");

        let result = verify_token(&token, TokenType::Access, "wrong-secret");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_token_fails() {
        let result = verify_token("invalid.token.string", TokenType::Access, TEST_SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let pair = create_token_pair(Uuid::new_v4(), &settings()).expect("valid pair");

        assert!(verify_token(&pair.refresh, TokenType::Access, TEST_SECRET).is_err());
        assert!(verify_token(&pair.access, TokenType::Refresh, TEST_SECRET).is_err());
        assert!(verify_token(&pair.refresh, TokenType::Refresh, TEST_SECRET).is_ok());
    }

    #[test]
    fn token_expiry_follows_ttl() {
        let pair = create_token_pair(Uuid::new_v4(), &settings()).expect("valid pair");
        let now = Utc::now().timestamp();

        let access = verify_token(&pair.access, TokenType::Access, TEST_SECRET).unwrap();
        let refresh = verify_token(&pair.refresh, TokenType::Refresh, TEST_SECRET).unwrap();

        // 10 second buffer for test execution time
        assert!((access.exp as i64) <= now + 3000 + 10);
        assert!((access.exp as i64) > now + 3000 - 10);
        assert!((refresh.exp as i64) > now + 259200 - 10);
    }

    #[test]
    fn expired_token_fails() {
        // Past the default 60 second leeway
        let token = create_token(Uuid::new_v4(), TokenType::Access, -120, TEST_SECRET).unwrap();
        assert!(verify_token(&token, TokenType::Access, TEST_SECRET).is_err());
    }
}
