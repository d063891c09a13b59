use actix_web::{web, HttpRequest, HttpResponse, Responder};
use bcrypt::verify;

use super::jwt::{
    generate_access_token, generate_refresh_token, get_access_token_expiry, validate_token,
    REFRESH_TOKEN,
};
use super::middleware::validate_request_token;
use super::model::{AccountInfo, LoginRequest, RefreshRequest, TokenResponse};
use crate::AppState;

/// Login endpoint
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = crate::ErrorResponse)
    )
)]
pub async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> impl Responder {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return HttpResponse::BadRequest().json(crate::ErrorResponse::bad_request(
            "Enter email & password",
        ));
    }

    let office = &state.config.office;
    let password_valid = office.matches_email(&body.email)
        && verify(&body.password, &office.password_hash).unwrap_or(false);

    if !password_valid {
        log::warn!("Rejected login attempt for {}", body.email.trim());
        return HttpResponse::Unauthorized()
            .json(crate::ErrorResponse::unauthorized("Wrong email or password"));
    }

    let secret = &state.config.jwt_secret;
    let access_token = match generate_access_token(secret, &office.email) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Failed to generate access token: {:?}", e);
            return HttpResponse::InternalServerError().json(crate::ErrorResponse::internal_error(
                "Failed to generate token",
            ));
        }
    };

    let refresh_token = match generate_refresh_token(secret, &office.email) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Failed to generate refresh token: {:?}", e);
            return HttpResponse::InternalServerError().json(crate::ErrorResponse::internal_error(
                "Failed to generate token",
            ));
        }
    };

    log::info!("Office account {} logged in", office.email);
    HttpResponse::Ok().json(TokenResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: get_access_token_expiry(),
    })
}

/// Refresh access token
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Authentication",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Token refreshed", body = TokenResponse),
        (status = 401, description = "Invalid refresh token", body = crate::ErrorResponse)
    )
)]
pub async fn refresh_token(
    state: web::Data<AppState>,
    body: web::Json<RefreshRequest>,
) -> impl Responder {
    let secret = &state.config.jwt_secret;
    let claims = match validate_token(secret, &body.refresh_token) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Invalid refresh token: {:?}", e);
            return HttpResponse::Unauthorized()
                .json(crate::ErrorResponse::unauthorized("Invalid or expired refresh token"));
        }
    };

    if claims.token_type != REFRESH_TOKEN {
        return HttpResponse::Unauthorized()
            .json(crate::ErrorResponse::unauthorized("Invalid token type"));
    }

    // the office account may have changed since the token was issued
    if !state.config.office.matches_email(&claims.sub) {
        return HttpResponse::Unauthorized()
            .json(crate::ErrorResponse::unauthorized("Session expired. Please login again."));
    }

    let access_token = match generate_access_token(secret, &state.config.office.email) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Failed to generate access token: {:?}", e);
            return HttpResponse::InternalServerError().json(crate::ErrorResponse::internal_error(
                "Failed to generate token",
            ));
        }
    };

    HttpResponse::Ok().json(TokenResponse {
        access_token,
        refresh_token: body.refresh_token.clone(),
        token_type: "Bearer".to_string(),
        expires_in: get_access_token_expiry(),
    })
}

/// Current office account (protected)
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Signed-in account", body = AccountInfo),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn me(req: HttpRequest) -> impl Responder {
    match validate_request_token(&req) {
        Ok(claims) => HttpResponse::Ok().json(AccountInfo {
            email: claims.sub,
            expires_at: claims.exp,
        }),
        Err(e) => e.error_response(),
    }
}

/// Configure auth routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/refresh", web::post().to(refresh_token))
            .route("/me", web::get().to(me)),
    );
}
