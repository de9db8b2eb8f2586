use thiserror::Error;

use crate::domain::entities::auth_provider::OauthProvider;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found")]
    NotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Missing bearer credential")]
    Unauthenticated,

    #[error("Invalid or expired session token")]
    InvalidToken,

    #[error("No verification code on record")]
    OtpNotFound,

    #[error("Verification code expired")]
    OtpExpired,

    #[error("Too many verification attempts")]
    OtpTooManyAttempts,

    #[error("Verification code does not match")]
    OtpInvalid,

    #[error("Malformed {0} identity token")]
    OauthTokenInvalid(OauthProvider),

    #[error("Unexpected issuer in {0} identity token")]
    OauthIssuerInvalid(OauthProvider),

    #[error("Audience mismatch in {0} identity token")]
    OauthAudienceInvalid(OauthProvider),

    #[error("No email in {0} identity token")]
    OauthEmailUnavailable(OauthProvider),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable string code exposed on the wire. Clients match on these,
    /// so they never change once shipped.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::NotFound => "NOT_FOUND",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::Unauthenticated => "UNAUTHENTICATED",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::OtpNotFound => "OTP_NOT_FOUND",
            AppError::OtpExpired => "OTP_EXPIRED",
            AppError::OtpTooManyAttempts => "OTP_TOO_MANY_ATTEMPTS",
            AppError::OtpInvalid => "OTP_INVALID",
            AppError::OauthTokenInvalid(p) => match p {
                OauthProvider::Google => "GOOGLE_TOKEN_INVALID",
                OauthProvider::Apple => "APPLE_TOKEN_INVALID",
            },
            AppError::OauthIssuerInvalid(p) => match p {
                OauthProvider::Google => "GOOGLE_ISSUER_INVALID",
                OauthProvider::Apple => "APPLE_ISSUER_INVALID",
            },
            AppError::OauthAudienceInvalid(p) => match p {
                OauthProvider::Google => "GOOGLE_AUDIENCE_INVALID",
                OauthProvider::Apple => "APPLE_AUDIENCE_INVALID",
            },
            AppError::OauthEmailUnavailable(p) => match p {
                OauthProvider::Google => "GOOGLE_EMAIL_NOT_AVAILABLE",
                OauthProvider::Apple => "APPLE_EMAIL_NOT_AVAILABLE",
            },
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
