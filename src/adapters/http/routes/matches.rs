use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState, adapters::http::extract::AuthUser, app_error::AppResult,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/like", post(like_pet))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LikePayload {
    pet_id: Uuid,
}

/// Record interest in a listing. `matched` stays false until owner-to-owner
/// matching ships.
async fn like_pet(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<LikePayload>,
) -> AppResult<Json<serde_json::Value>> {
    let like = state
        .match_use_cases
        .like_pet(user.user_id, payload.pet_id)
        .await?;

    Ok(Json(serde_json::json!({ "like": like, "matched": false })))
}
