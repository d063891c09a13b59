use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use super::model::Claims;

const ACCESS_TOKEN_EXPIRY_SECONDS: i64 = 8 * 60 * 60; // one office working day
const REFRESH_TOKEN_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60; // 7 days

pub const ACCESS_TOKEN: &str = "access";
pub const REFRESH_TOKEN: &str = "refresh";

fn issue(
    secret: &str,
    email: &str,
    token_type: &str,
    lifetime: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: email.to_string(),
        exp: now + lifetime as usize,
        iat: now,
        token_type: token_type.to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Generate access token (short-lived)
pub fn generate_access_token(
    secret: &str,
    email: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    issue(secret, email, ACCESS_TOKEN, ACCESS_TOKEN_EXPIRY_SECONDS)
}

/// Generate refresh token (long-lived)
pub fn generate_refresh_token(
    secret: &str,
    email: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    issue(secret, email, REFRESH_TOKEN, REFRESH_TOKEN_EXPIRY_SECONDS)
}

/// Validate and decode a token
pub fn validate_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Get access token expiry in seconds
pub fn get_access_token_expiry() -> i64 {
    ACCESS_TOKEN_EXPIRY_SECONDS
}
