use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// Days an issued token stays valid.
pub const TOKEN_VALIDITY_DAYS: i64 = 7;

/// Claims embedded in an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub id: String,
    pub email: String,
    pub role: String,
    pub exp: i64,
}

/// Issues HS256-signed access tokens over a shared secret.
///
/// Stateless: each call builds a fresh token, and validity is purely a
/// function of the signature and the embedded expiry.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
        }
    }

    /// Sign a token for the user and its role. Expiry is fixed at issuance
    /// plus [`TOKEN_VALIDITY_DAYS`], UTC.
    pub fn issue(&self, user: &User, role: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = AccessClaims {
            full_name: user.name.clone(),
            id: user.id.clone(),
            email: user.username.clone(),
            role: role.to_string(),
            exp: (Utc::now() + Duration::days(TOKEN_VALIDITY_DAYS)).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    fn test_user() -> User {
        User::new("mario@example.com", "Mario Rossi", "hash".to_string())
    }

    fn decode_claims(token: &str, secret: &str) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
        decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
    }

    #[test]
    fn test_issued_token_carries_all_claims() {
        let user = test_user();
        let token = TokenIssuer::new("secret").issue(&user, "Customer").unwrap();

        let claims = decode_claims(&token, "secret").unwrap();
        assert_eq!(claims.full_name, "Mario Rossi");
        assert_eq!(claims.id, user.id);
        assert_eq!(claims.email, "mario@example.com");
        assert_eq!(claims.role, "Customer");
    }

    #[test]
    fn test_expiry_is_seven_days_out() {
        let token = TokenIssuer::new("secret")
            .issue(&test_user(), "Customer")
            .unwrap();

        let claims = decode_claims(&token, "secret").unwrap();
        let expected = (Utc::now() + Duration::days(TOKEN_VALIDITY_DAYS)).timestamp();
        // Clock tolerance for test execution time.
        assert!((claims.exp - expected).abs() < 60);
    }

    #[test]
    fn test_wrong_secret_fails_verification() {
        let token = TokenIssuer::new("secret").issue(&test_user(), "Admin").unwrap();
        assert!(decode_claims(&token, "other-secret").is_err());
    }

    #[test]
    fn test_token_is_compact_jwt() {
        let token = TokenIssuer::new("secret").issue(&test_user(), "Admin").unwrap();
        assert_eq!(token.split('.').count(), 3);
    }
}
