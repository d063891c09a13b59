use actix_web::error::ErrorUnauthorized;
use actix_web::{web, Error, HttpRequest};

use super::jwt::{validate_token, ACCESS_TOKEN};
use super::model::Claims;
use crate::AppState;

/// Extract token from Authorization header
fn extract_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

/// Validate token from HttpRequest and return claims
pub fn validate_request_token(req: &HttpRequest) -> Result<Claims, Error> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ErrorUnauthorized("Authentication is not configured"))?;

    let token =
        extract_token(req).ok_or_else(|| ErrorUnauthorized("Missing authorization token"))?;

    let claims = validate_token(&state.config.jwt_secret, &token).map_err(|e| {
        log::warn!("Token validation failed: {:?}", e);
        ErrorUnauthorized("Invalid or expired token")
    })?;

    if claims.token_type != ACCESS_TOKEN {
        return Err(ErrorUnauthorized("Invalid token type"));
    }

    if !state.config.office.matches_email(&claims.sub) {
        return Err(ErrorUnauthorized("Token does not belong to the office account"));
    }

    Ok(claims)
}
