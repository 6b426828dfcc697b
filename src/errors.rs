use actix_web::HttpResponse;
use thiserror::Error;

use crate::auth::AuthError;
use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidRequest(msg) => AppError::BadRequest(msg),
            DomainError::InvalidItem { index, reason } => AppError::BadRequest(format!(
                "Each item requires productId, a positive quantity and price (item {}: {})",
                index, reason
            )),
            DomainError::NotFound => AppError::NotFound("Order not found".to_string()),
            DomainError::Conflict(_) => AppError::Conflict("orderId already exists".to_string()),
            DomainError::Storage(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => AppError::Unauthorized(e.to_string()),
            AuthError::Signing(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = |message: String| serde_json::json!({ "error": message });
        match self {
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(body(msg.clone())),
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(body(msg.clone())),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(body(msg.clone())),
            AppError::Conflict(msg) => HttpResponse::Conflict().json(body(msg.clone())),
            AppError::Internal(msg) => {
                log::error!("Request failed: {}", msg);
                HttpResponse::InternalServerError().json(body("Internal server error".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::ItemError;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound("Order not found".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(err.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_error_display() {
        assert_eq!(
            AppError::Internal("msg".to_string()).to_string(),
            "Internal error: msg"
        );
    }

    #[test]
    fn domain_invalid_request_maps_to_400() {
        let app_err: AppError = DomainError::InvalidRequest("orderId is required".to_string()).into();
        assert!(matches!(app_err, AppError::BadRequest(ref m) if m == "orderId is required"));
        assert_eq!(app_err.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn domain_invalid_item_maps_to_400() {
        let app_err: AppError = DomainError::InvalidItem {
            index: 2,
            reason: ItemError::InvalidQuantity,
        }
        .into();
        assert_eq!(app_err.error_response().status(), StatusCode::BAD_REQUEST);
        assert!(app_err.to_string().contains("item 2"));
    }

    #[test]
    fn domain_not_found_maps_to_404() {
        let app_err: AppError = DomainError::NotFound.into();
        assert_eq!(app_err.error_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn domain_conflict_maps_to_409() {
        let app_err: AppError = DomainError::Conflict("O1".to_string()).into();
        assert_eq!(app_err.error_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn domain_storage_maps_to_500() {
        let app_err: AppError = DomainError::Storage("connection refused".to_string()).into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }

    #[test]
    fn auth_failure_maps_to_401() {
        let app_err: AppError = AuthError::InvalidCredentials.into();
        assert_eq!(app_err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn signing_failure_maps_to_500() {
        let app_err: AppError = AuthError::Signing("bad key".to_string()).into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }
}
