//! Login endpoints. Every successful flow responds with the same shape:
//! a signed session token plus the user profile.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::app_state::AppState,
    adapters::http::extract::AuthUser,
    app_error::{AppError, AppResult},
    application::jwt,
    application::validators::{is_valid_email, is_valid_otp_shape},
    domain::entities::auth_provider::OauthProvider,
    domain::entities::user::UserProfile,
};

/// The dev-login shortcut is only registered outside production.
pub fn router(production: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/request-otp", post(request_otp))
        .route("/verify-otp", post(verify_otp))
        .route("/oauth/google", post(oauth_google))
        .route("/oauth/apple", post(oauth_apple))
        .route("/me", get(me));

    if production {
        router
    } else {
        router.route("/dev-login", post(dev_login))
    }
}

// ============================================================================
// Payloads
// ============================================================================

#[derive(Deserialize)]
struct RequestOtpPayload {
    email: String,
}

#[derive(Deserialize)]
struct VerifyOtpPayload {
    email: String,
    code: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdTokenLoginPayload {
    id_token: String,
}

#[derive(Deserialize)]
struct DevLoginPayload {
    email: String,
    name: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OtpRequestedResponse {
    ok: bool,
    delivery: &'static str,
    expires_at: NaiveDateTime,
}

#[derive(Serialize)]
struct SessionResponse {
    token: String,
    user: UserProfile,
}

// ============================================================================
// Handlers
// ============================================================================

async fn request_otp(
    State(state): State<AppState>,
    Json(payload): Json<RequestOtpPayload>,
) -> AppResult<Json<OtpRequestedResponse>> {
    let email = normalize_email(&payload.email)?;

    let issued = state.auth_use_cases.request_otp(&email).await?;

    Ok(Json(OtpRequestedResponse {
        ok: true,
        delivery: if issued.delivered { "email" } else { "dev-console" },
        expires_at: issued.expires_at,
    }))
}

async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpPayload>,
) -> AppResult<Json<SessionResponse>> {
    let email = normalize_email(&payload.email)?;
    if !is_valid_otp_shape(&payload.code) {
        return Err(AppError::InvalidInput("code must be 6 digits".into()));
    }

    let user = state.auth_use_cases.verify_otp(&email, &payload.code).await?;
    issue_session(&state, user)
}

async fn oauth_google(
    State(state): State<AppState>,
    Json(payload): Json<IdTokenLoginPayload>,
) -> AppResult<Json<SessionResponse>> {
    let user = state
        .auth_use_cases
        .oauth_login(OauthProvider::Google, &payload.id_token)
        .await?;
    issue_session(&state, user)
}

async fn oauth_apple(
    State(state): State<AppState>,
    Json(payload): Json<IdTokenLoginPayload>,
) -> AppResult<Json<SessionResponse>> {
    let user = state
        .auth_use_cases
        .oauth_login(OauthProvider::Apple, &payload.id_token)
        .await?;
    issue_session(&state, user)
}

async fn dev_login(
    State(state): State<AppState>,
    Json(payload): Json<DevLoginPayload>,
) -> AppResult<Json<SessionResponse>> {
    let email = normalize_email(&payload.email)?;

    let user = state
        .auth_use_cases
        .dev_login(&email, payload.name.as_deref())
        .await?;
    issue_session(&state, user)
}

async fn me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<serde_json::Value>> {
    let profile = state.auth_use_cases.get_user(user.user_id).await?;
    Ok(Json(serde_json::json!({ "user": profile })))
}

// ============================================================================
// Helpers
// ============================================================================

/// Emails are matched case-insensitively everywhere, so they are stored
/// and hashed lowercased.
fn normalize_email(raw: &str) -> AppResult<String> {
    let email = raw.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::InvalidInput("a valid email is required".into()));
    }
    Ok(email)
}

fn issue_session(state: &AppState, user: UserProfile) -> AppResult<Json<SessionResponse>> {
    let token = jwt::issue(
        user.id,
        &user.email,
        &state.config.jwt_secret,
        state.config.session_ttl,
    )?;
    Ok(Json(SessionResponse { token, user }))
}
