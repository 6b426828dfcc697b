use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::TokenIssuer;
use crate::errors::AppError;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /auth/login
///
/// Exchanges the configured credentials for a signed, time-limited token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "auth"
)]
pub async fn login(
    tokens: web::Data<TokenIssuer>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let token = tokens.login(&body.username, &body.password).inspect_err(|_| {
        log::warn!("Rejected login attempt for user '{}'", body.username);
    })?;

    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}
