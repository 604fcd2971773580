use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Not found")]
    NotFound,

    #[error("Payment could not be confirmed: {0}")]
    PaymentRejected(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidRange | DomainError::InvalidGuestCount => {
                AppError::Validation(e.to_string())
            }
            DomainError::InvalidInput(msg) => AppError::Validation(msg),
            DomainError::NotFound => AppError::NotFound,
            DomainError::VerificationFailed(reason) => AppError::PaymentRejected(reason),
            DomainError::PersistenceError(msg) | DomainError::Internal(msg) => {
                AppError::Internal(msg)
            }
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::PaymentRejected(_) => {
                HttpResponse::UnprocessableEntity().json(serde_json::json!({
                    "error": self.to_string()
                }))
            }
            AppError::Internal(_) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    #[test]
    fn validation_returns_400() {
        let resp = AppError::Validation("bad dates".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound.error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn payment_rejected_returns_422() {
        let resp = AppError::PaymentRejected("amount mismatch".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn internal_error_returns_500() {
        let resp = AppError::Internal("boom".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_range_maps_to_validation() {
        let app_err: AppError = DomainError::InvalidRange.into();
        assert!(matches!(app_err, AppError::Validation(_)));
    }

    #[test]
    fn invalid_guest_count_maps_to_validation() {
        let app_err: AppError = DomainError::InvalidGuestCount.into();
        assert!(matches!(app_err, AppError::Validation(_)));
    }

    #[test]
    fn verification_failure_maps_to_payment_rejected() {
        let app_err: AppError = DomainError::VerificationFailed("declined".to_string()).into();
        assert!(matches!(app_err, AppError::PaymentRejected(_)));
    }

    #[test]
    fn persistence_error_maps_to_internal() {
        let app_err: AppError = DomainError::PersistenceError("dup".to_string()).into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }

    #[test]
    fn domain_not_found_maps_to_app_not_found() {
        let app_err: AppError = DomainError::NotFound.into();
        assert!(matches!(app_err, AppError::NotFound));
    }
}
