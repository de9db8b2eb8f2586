//! Pet listing creation and public browsing with filters and keyset pagination.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, NaiveDateTime};
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::validators::is_valid_media_url;
use crate::domain::entities::pet::{PetGender, PetObjective, PetProfile, PetSize};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 50;

// ============================================================================
// Ports
// ============================================================================

#[async_trait]
pub trait PetRepo: Send + Sync {
    async fn create(&self, owner_id: Uuid, listing: &NewPetListing) -> AppResult<PetProfile>;

    /// Fetch up to `limit` listings matching the filter, newest first
    /// (creation time descending, id descending as tie-break), starting
    /// strictly after the cursor position when one is given.
    async fn list(
        &self,
        filter: &PetFilter,
        cursor: Option<&PetCursor>,
        limit: i64,
    ) -> AppResult<Vec<PetProfile>>;
}

// ============================================================================
// Inputs
// ============================================================================

#[derive(Debug, Clone)]
pub struct NewPetListing {
    pub display_name: String,
    pub species: String,
    pub breed: String,
    pub gender: PetGender,
    pub size: Option<PetSize>,
    pub colors: Vec<String>,
    pub age_months: i32,
    pub pedigree: bool,
    pub vaccinated: Option<bool>,
    pub neutered: Option<bool>,
    pub health_notes: Option<String>,
    pub objective: PetObjective,
    pub region: String,
    pub about: Option<String>,
    pub photos: Vec<String>,
    pub video_url: Option<String>,
    pub is_donation: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PetFilter {
    pub species: Option<String>,
    pub breed: Option<String>,
    pub gender: Option<PetGender>,
    pub objective: Option<PetObjective>,
    pub region: Option<String>,
    pub donation_only: bool,
}

#[derive(Debug, Clone)]
pub struct PetPage {
    pub pets: Vec<PetProfile>,
    pub next_cursor: Option<String>,
}

// ============================================================================
// Cursor
// ============================================================================

/// Opaque keyset cursor: base64 of `created_at_micros:id`. The (created_at,
/// id) pair matches the listing sort order, so pagination stays stable while
/// new listings arrive.
#[derive(Debug, Clone)]
pub struct PetCursor {
    pub created_at: NaiveDateTime,
    pub id: Uuid,
}

impl PetCursor {
    pub fn encode(&self) -> String {
        let raw = format!("{}:{}", self.created_at.and_utc().timestamp_micros(), self.id);
        URL_SAFE_NO_PAD.encode(raw.as_bytes())
    }

    pub fn decode(s: &str) -> AppResult<Self> {
        let invalid = || AppError::InvalidInput("Invalid cursor".into());

        let bytes = URL_SAFE_NO_PAD.decode(s).map_err(|_| invalid())?;
        let raw = String::from_utf8(bytes).map_err(|_| invalid())?;
        let (micros, id) = raw.split_once(':').ok_or_else(invalid)?;

        let micros: i64 = micros.parse().map_err(|_| invalid())?;
        let created_at = DateTime::from_timestamp_micros(micros)
            .ok_or_else(invalid)?
            .naive_utc();
        let id = Uuid::parse_str(id).map_err(|_| invalid())?;

        Ok(PetCursor { created_at, id })
    }
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct PetUseCases {
    pets: Arc<dyn PetRepo>,
}

impl PetUseCases {
    pub fn new(pets: Arc<dyn PetRepo>) -> Self {
        Self { pets }
    }

    #[instrument(skip(self, listing))]
    pub async fn create_listing(
        &self,
        owner_id: Uuid,
        listing: NewPetListing,
    ) -> AppResult<PetProfile> {
        validate_listing(&listing)?;
        self.pets.create(owner_id, &listing).await
    }

    /// Public browse. `take` is clamped to the page-size ceiling; one extra
    /// row is fetched to decide whether a next page exists.
    #[instrument(skip(self))]
    pub async fn browse(
        &self,
        filter: PetFilter,
        cursor: Option<String>,
        take: Option<i64>,
    ) -> AppResult<PetPage> {
        let take = take.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let cursor = cursor.as_deref().map(PetCursor::decode).transpose()?;

        let mut pets = self.pets.list(&filter, cursor.as_ref(), take + 1).await?;

        let next_cursor = if pets.len() as i64 > take {
            pets.truncate(take as usize);
            pets.last().and_then(|p| {
                p.created_at.map(|created_at| {
                    PetCursor {
                        created_at,
                        id: p.id,
                    }
                    .encode()
                })
            })
        } else {
            None
        };

        Ok(PetPage { pets, next_cursor })
    }
}

fn validate_listing(listing: &NewPetListing) -> AppResult<()> {
    let fail = |msg: &str| Err(AppError::InvalidInput(msg.into()));

    if listing.display_name.trim().is_empty() {
        return fail("displayName must not be empty");
    }
    if listing.species.trim().len() < 2 {
        return fail("species must be at least 2 characters");
    }
    if listing.breed.trim().is_empty() {
        return fail("breed must not be empty");
    }
    if listing.colors.is_empty() || listing.colors.len() > 3 {
        return fail("colors must contain between 1 and 3 entries");
    }
    if listing.colors.iter().any(|c| c.trim().is_empty()) {
        return fail("colors must not contain empty entries");
    }
    if !(0..=360).contains(&listing.age_months) {
        return fail("ageMonths must be between 0 and 360");
    }
    if listing.health_notes.as_ref().is_some_and(|n| n.len() > 500) {
        return fail("healthNotes must be at most 500 characters");
    }
    if listing.region.trim().len() < 2 {
        return fail("region must be at least 2 characters");
    }
    if listing.about.as_ref().is_some_and(|a| a.len() > 800) {
        return fail("about must be at most 800 characters");
    }
    if listing.photos.len() < 3 {
        return fail("media.photos must contain at least 3 URLs");
    }
    if listing.photos.iter().any(|p| !is_valid_media_url(p)) {
        return fail("media.photos must contain valid URLs");
    }
    if listing.video_url.as_ref().is_some_and(|v| !is_valid_media_url(v)) {
        return fail("media.video must be a valid URL");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn valid_listing() -> NewPetListing {
        NewPetListing {
            display_name: "Thor".to_string(),
            species: "Cachorro".to_string(),
            breed: "Husky Siberiano".to_string(),
            gender: PetGender::Male,
            size: Some(PetSize::Large),
            colors: vec!["Branco".to_string(), "Cinza".to_string()],
            age_months: 11,
            pedigree: true,
            vaccinated: Some(true),
            neutered: Some(false),
            health_notes: None,
            objective: PetObjective::Breeding,
            region: "Brasil / SP".to_string(),
            about: None,
            photos: vec![
                "https://images.example.com/1.jpg".to_string(),
                "https://images.example.com/2.jpg".to_string(),
                "https://images.example.com/3.jpg".to_string(),
            ],
            video_url: None,
            is_donation: false,
        }
    }

    #[test]
    fn cursor_round_trip() {
        let cursor = PetCursor {
            created_at: Utc::now().naive_utc(),
            id: Uuid::new_v4(),
        };
        let decoded = PetCursor::decode(&cursor.encode()).unwrap();

        // Micro precision survives the encode/decode.
        assert_eq!(
            decoded.created_at.and_utc().timestamp_micros(),
            cursor.created_at.and_utc().timestamp_micros()
        );
        assert_eq!(decoded.id, cursor.id);
    }

    #[test]
    fn cursor_rejects_garbage() {
        assert!(PetCursor::decode("???").is_err());
        assert!(PetCursor::decode(&URL_SAFE_NO_PAD.encode(b"no-colon")).is_err());
        assert!(PetCursor::decode(&URL_SAFE_NO_PAD.encode(b"abc:not-a-uuid")).is_err());
    }

    #[test]
    fn listing_validation_accepts_complete_listing() {
        assert!(validate_listing(&valid_listing()).is_ok());
    }

    #[test]
    fn listing_validation_rejects_out_of_range_fields() {
        let mut too_old = valid_listing();
        too_old.age_months = 361;
        assert!(validate_listing(&too_old).is_err());

        let mut too_many_colors = valid_listing();
        too_many_colors.colors = vec!["a".into(), "b".into(), "c".into(), "d".into()];
        assert!(validate_listing(&too_many_colors).is_err());

        let mut too_few_photos = valid_listing();
        too_few_photos.photos.truncate(2);
        assert!(validate_listing(&too_few_photos).is_err());

        let mut bad_photo = valid_listing();
        bad_photo.photos[0] = "not-a-url".into();
        assert!(validate_listing(&bad_photo).is_err());
    }
}
