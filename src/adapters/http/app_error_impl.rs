use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::app_error::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound | AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::Unauthenticated | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            // No eligible record: nothing to verify against.
            AppError::OtpNotFound => StatusCode::NOT_FOUND,
            AppError::OtpExpired | AppError::OtpInvalid => StatusCode::BAD_REQUEST,
            AppError::OtpTooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
            // A malformed token is bad input; a well-formed token that fails
            // a provider rule is a rejected credential.
            AppError::OauthTokenInvalid(_) => StatusCode::BAD_REQUEST,
            AppError::OauthIssuerInvalid(_)
            | AppError::OauthAudienceInvalid(_)
            | AppError::OauthEmailUnavailable(_) => StatusCode::UNAUTHORIZED,
        };

        // 4xx-class rejections are routine; keep the error channel for faults.
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::warn!(error = ?self, "Request rejected");
        }

        let body = match &self {
            AppError::InvalidInput(msg) => {
                serde_json::json!({ "error": self.code(), "message": msg })
            }
            _ => serde_json::json!({ "error": self.code() }),
        };

        (status, Json(body)).into_response()
    }
}
