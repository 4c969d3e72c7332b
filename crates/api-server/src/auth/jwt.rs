use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::AuthError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserJwtClaims {
    pub sub: String,
    pub exp: usize,
}

/// HS256 signing material and token lifetime
#[derive(Clone)]
pub struct JwtKeys {
    secret: String,
    ttl_hours: i64,
}

impl JwtKeys {
    pub fn new(secret: impl Into<String>, ttl_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_hours,
        }
    }

    pub fn issue_user_jwt(&self, user_id: Uuid) -> Result<(String, usize), AuthError> {
        let exp = (Utc::now() + Duration::hours(self.ttl_hours)).timestamp() as usize;
        let claims = UserJwtClaims {
            sub: user_id.to_string(),
            exp,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map(|token| (token, exp))
        .map_err(|err| AuthError::Token(format!("Failed to sign user JWT: {}", err)))
    }

    /// Verify signature and expiry, returning the user id in `sub`
    pub fn verify_user_jwt(&self, token: &str) -> Result<Uuid, AuthError> {
        let claims = decode::<UserJwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|decoded| decoded.claims)
        .map_err(|err| AuthError::Unauthorized(format!("Invalid or expired token: {}", err)))?;

        Uuid::parse_str(&claims.sub)
            .map_err(|_| AuthError::Unauthorized("Invalid token subject".to_string()))
    }

    /// Resolve the caller from an `Authorization: Bearer` header
    pub fn resolve_user(&self, headers: &HeaderMap) -> Result<Uuid, AuthError> {
        let token = extract_bearer_token(headers)?;
        self.verify_user_jwt(token)
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AuthError::Unauthorized("Missing Authorization header".to_string()))?;
    let auth_value = auth_header
        .to_str()
        .map_err(|_| AuthError::Unauthorized("Invalid Authorization header".to_string()))?;
    auth_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::Unauthorized("Authorization must be Bearer token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            HeaderValue::from_static("Bearer secret-token"),
        );

        let token = extract_bearer_token(&headers).unwrap();
        assert_eq!(token, "secret-token");
    }

    #[test]
    fn rejects_when_authorization_header_missing() {
        let headers = HeaderMap::new();
        assert!(extract_bearer_token(&headers).is_err());
    }

    #[test]
    fn rejects_when_scheme_is_not_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            HeaderValue::from_static("Basic secret-token"),
        );
        assert!(extract_bearer_token(&headers).is_err());
    }

    #[test]
    fn issued_token_resolves_to_user() {
        let keys = JwtKeys::new("test-secret", 1);
        let user_id = Uuid::new_v4();
        let (token, exp) = keys.issue_user_jwt(user_id).unwrap();
        assert!(exp as i64 > Utc::now().timestamp());

        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        assert_eq!(keys.resolve_user(&headers).unwrap(), user_id);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let (token, _) = JwtKeys::new("one", 1).issue_user_jwt(Uuid::new_v4()).unwrap();
        let result = JwtKeys::new("two", 1).verify_user_jwt(&token);
        assert!(matches!(result, Err(AuthError::Unauthorized(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        // Past the default 60s leeway
        let (token, _) = JwtKeys::new("secret", -1).issue_user_jwt(Uuid::new_v4()).unwrap();
        let result = JwtKeys::new("secret", 1).verify_user_jwt(&token);
        assert!(matches!(result, Err(AuthError::Unauthorized(_))));
    }
}
