use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Login request payload
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "office@ticketothemoon.com")]
    pub email: String,
    pub password: String,
}

/// Token response after successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Refresh token request
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Signed-in office account
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountInfo {
    pub email: String,
    /// Access token expiry as a unix timestamp
    pub expires_at: usize,
}

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // office email
    pub exp: usize,         // expiration time
    pub iat: usize,         // issued at
    pub token_type: String, // "access" or "refresh"
}
