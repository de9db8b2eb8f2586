use axum::{Json, Router, response::IntoResponse, routing::get};

use crate::{adapters::http::app_state::AppState, adapters::http::extract::AuthUser};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_chats))
}

/// Chat rooms will hang off mutual matches; until those exist the list
/// is always empty. Real-time transport stays out of this service.
async fn list_chats(_user: AuthUser) -> impl IntoResponse {
    Json(serde_json::json!({ "chats": [] }))
}
