//! Pet listing endpoints: authenticated creation, public browsing with
//! filters and keyset pagination.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;

use crate::{
    adapters::http::app_state::AppState,
    adapters::http::extract::AuthUser,
    app_error::{AppError, AppResult},
    domain::entities::pet::{PetGender, PetObjective, PetSize},
    use_cases::pet::{NewPetListing, PetFilter},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(browse_pets).post(create_pet))
}

// ============================================================================
// Payloads
// ============================================================================

#[derive(Deserialize)]
struct MediaPayload {
    photos: Vec<String>,
    video: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePetPayload {
    display_name: String,
    species: String,
    breed: String,
    gender: PetGender,
    size: Option<PetSize>,
    colors: Vec<String>,
    age_months: i32,
    #[serde(default)]
    pedigree: bool,
    vaccinated: Option<bool>,
    neutered: Option<bool>,
    health_notes: Option<String>,
    objective: PetObjective,
    region: String,
    about: Option<String>,
    media: MediaPayload,
    #[serde(default)]
    is_donation: bool,
}

/// Browse filters arrive as query-string values, all optional. Enum-valued
/// parameters are parsed explicitly so a bad value reads as INVALID_INPUT
/// rather than a deserialization failure.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrowseQuery {
    species: Option<String>,
    breed: Option<String>,
    gender: Option<String>,
    objective: Option<String>,
    region: Option<String>,
    donation_only: Option<String>,
    cursor: Option<String>,
    take: Option<i64>,
}

// ============================================================================
// Handlers
// ============================================================================

async fn create_pet(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePetPayload>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let listing = NewPetListing {
        display_name: payload.display_name,
        species: payload.species,
        breed: payload.breed,
        gender: payload.gender,
        size: payload.size,
        colors: payload.colors,
        age_months: payload.age_months,
        pedigree: payload.pedigree,
        vaccinated: payload.vaccinated,
        neutered: payload.neutered,
        health_notes: payload.health_notes,
        objective: payload.objective,
        region: payload.region,
        about: payload.about,
        photos: payload.media.photos,
        video_url: payload.media.video,
        is_donation: payload.is_donation,
    };

    let pet = state
        .pet_use_cases
        .create_listing(user.user_id, listing)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "pet": pet })),
    ))
}

async fn browse_pets(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let gender = query
        .gender
        .as_deref()
        .map(|g| {
            PetGender::from_str(g)
                .ok_or_else(|| AppError::InvalidInput(format!("Unknown gender: {g}")))
        })
        .transpose()?;
    let objective = query
        .objective
        .as_deref()
        .map(|o| {
            PetObjective::from_str(o)
                .ok_or_else(|| AppError::InvalidInput(format!("Unknown objective: {o}")))
        })
        .transpose()?;

    let filter = PetFilter {
        species: query.species,
        breed: query.breed,
        gender,
        objective,
        region: query.region,
        donation_only: query.donation_only.as_deref() == Some("true"),
    };

    let page = state
        .pet_use_cases
        .browse(filter, query.cursor, query.take)
        .await?;

    Ok(Json(serde_json::json!({
        "pets": page.pets,
        "nextCursor": page.next_cursor,
    })))
}
