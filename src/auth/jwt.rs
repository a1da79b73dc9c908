use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::user::Claims;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as usize
}

pub fn generate_access_token(
    user_id: u64,
    email: String,
    name: String,
    is_admin: bool,
    secret: &str,
    ttl: usize,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        user_id,
        sub: email,
        name,
        is_admin,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_and_carries_identity() {
        let token = generate_access_token(
            7,
            "alice@example.com".into(),
            "Alice Employee".into(),
            false,
            "test-secret",
            900,
        )
        .unwrap();

        let claims = verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.sub, "alice@example.com");
        assert!(!claims.is_admin);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_access_token(
            7,
            "alice@example.com".into(),
            "Alice".into(),
            false,
            "test-secret",
            900,
        )
        .unwrap();
        assert!(verify_token(&token, "other-secret").is_err());
    }
}
