//! In-memory implementations of the repository and notifier ports, for
//! HTTP-level testing without Postgres or outbound email.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::auth_provider::{AuthProvider, OauthProvider},
    domain::entities::pet::{LikeProfile, PetProfile},
    domain::entities::user::UserProfile,
    use_cases::auth::{OtpNotifier, UserRepo, VerificationCodeRecord, VerificationCodeRepo},
    use_cases::matches::LikeRepo,
    use_cases::oauth::IdTokenSignatureVerifier,
    use_cases::pet::{NewPetListing, PetCursor, PetFilter, PetRepo},
};

// ============================================================================
// InMemoryUserRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepo {
    pub users: Mutex<HashMap<Uuid, UserProfile>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_by_email(&self, email: &str) -> Option<UserProfile> {
        self.users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned()
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn upsert_identity(
        &self,
        email: &str,
        name: Option<&str>,
        provider: AuthProvider,
        email_verified: bool,
    ) -> AppResult<UserProfile> {
        let mut users = self.users.lock().unwrap();
        let now = chrono::Utc::now().naive_utc();

        if let Some(existing) = users.values_mut().find(|u| u.email == email) {
            // Matches the SQL COALESCE: a missing name never clears one.
            if let Some(name) = name {
                existing.name = Some(name.to_string());
            }
            existing.email_verified = email_verified;
            existing.auth_provider = provider;
            existing.updated_at = Some(now);
            return Ok(existing.clone());
        }

        let user = UserProfile {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.map(|n| n.to_string()),
            locale: "pt-BR".to_string(),
            email_verified,
            auth_provider: provider,
            created_at: Some(now),
            updated_at: Some(now),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<UserProfile>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }
}

// ============================================================================
// InMemoryVerificationCodeRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryVerificationCodeRepo {
    next_id: AtomicI64,
    pub records: Mutex<Vec<VerificationCodeRecord>>,
}

impl InMemoryVerificationCodeRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest_for(&self, email: &str) -> Option<VerificationCodeRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.email == email)
            .max_by_key(|r| (r.created_at, r.id))
            .cloned()
    }

    /// Push the latest unconsumed record's expiry into the past.
    pub fn expire_latest(&self, email: &str) {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records
            .iter_mut()
            .filter(|r| r.email == email && r.consumed_at.is_none())
            .max_by_key(|r| (r.created_at, r.id))
        {
            record.expires_at = chrono::Utc::now().naive_utc() - chrono::Duration::minutes(1);
        }
    }
}

#[async_trait]
impl VerificationCodeRepo for InMemoryVerificationCodeRepo {
    async fn supersede_and_insert(
        &self,
        email: &str,
        code_hash: &str,
        expires_at: NaiveDateTime,
    ) -> AppResult<()> {
        let mut records = self.records.lock().unwrap();
        let now = chrono::Utc::now().naive_utc();

        for record in records
            .iter_mut()
            .filter(|r| r.email == email && r.consumed_at.is_none())
        {
            record.consumed_at = Some(now);
        }

        records.push(VerificationCodeRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            email: email.to_string(),
            code_hash: code_hash.to_string(),
            attempts: 0,
            expires_at,
            consumed_at: None,
            created_at: now,
        });
        Ok(())
    }

    async fn latest_unconsumed(&self, email: &str) -> AppResult<Option<VerificationCodeRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.email == email && r.consumed_at.is_none())
            .max_by_key(|r| (r.created_at, r.id))
            .cloned())
    }

    async fn increment_attempts(&self, id: i64, ceiling: i32) -> AppResult<Option<i32>> {
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) if record.attempts < ceiling => {
                record.attempts += 1;
                Ok(Some(record.attempts))
            }
            _ => Ok(None),
        }
    }

    async fn mark_consumed(&self, id: i64) -> AppResult<bool> {
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) if record.consumed_at.is_none() => {
                record.consumed_at = Some(chrono::Utc::now().naive_utc());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn was_consumed(&self, email: &str, code_hash: &str) -> AppResult<bool> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.email == email && r.code_hash == code_hash && r.consumed_at.is_some()))
    }
}

// ============================================================================
// InMemoryOtpNotifier
// ============================================================================

#[derive(Debug, Clone)]
pub struct SentCode {
    pub to: String,
    pub code: String,
}

/// Captures every code instead of emailing it. `failing()` simulates a
/// delivery outage.
#[derive(Default)]
pub struct InMemoryOtpNotifier {
    pub sent: Mutex<Vec<SentCode>>,
    fail: bool,
}

impl InMemoryOtpNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(vec![]),
            fail: true,
        }
    }

    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|s| s.to == email)
            .map(|s| s.code.clone())
    }
}

#[async_trait]
impl OtpNotifier for InMemoryOtpNotifier {
    async fn send_code(&self, to: &str, code: &str, _ttl_minutes: i64) -> AppResult<()> {
        if self.fail {
            return Err(AppError::Internal("simulated delivery failure".into()));
        }
        self.sent.lock().unwrap().push(SentCode {
            to: to.to_string(),
            code: code.to_string(),
        });
        Ok(())
    }
}

// ============================================================================
// AcceptAllSignatureVerifier
// ============================================================================

/// Treats every id-token signature as valid, so tests exercise the
/// payload rules without provider key sets.
#[derive(Default)]
pub struct AcceptAllSignatureVerifier;

#[async_trait]
impl IdTokenSignatureVerifier for AcceptAllSignatureVerifier {
    async fn verify_signature(&self, _provider: OauthProvider, _raw_token: &str) -> AppResult<()> {
        Ok(())
    }
}

// ============================================================================
// InMemoryPetRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryPetRepo {
    pub pets: Mutex<Vec<PetProfile>>,
    last_created: Mutex<Option<NaiveDateTime>>,
}

impl InMemoryPetRepo {
    pub fn new() -> Self {
        Self::default()
    }

    // Strictly increasing creation times, the way successive inserts
    // land under the database clock.
    fn next_timestamp(&self) -> NaiveDateTime {
        let mut last = self.last_created.lock().unwrap();
        let mut now = chrono::Utc::now().naive_utc();
        if let Some(prev) = *last {
            if now <= prev {
                now = prev + chrono::Duration::microseconds(1);
            }
        }
        *last = Some(now);
        now
    }
}

#[async_trait]
impl PetRepo for InMemoryPetRepo {
    async fn create(&self, owner_id: Uuid, listing: &NewPetListing) -> AppResult<PetProfile> {
        let pet = PetProfile {
            id: Uuid::new_v4(),
            owner_id,
            display_name: listing.display_name.clone(),
            species: listing.species.clone(),
            breed: listing.breed.clone(),
            gender: listing.gender,
            size: listing.size,
            colors: listing.colors.clone(),
            age_months: listing.age_months,
            pedigree: listing.pedigree,
            vaccinated: listing.vaccinated,
            neutered: listing.neutered,
            health_notes: listing.health_notes.clone(),
            objective: listing.objective,
            region: listing.region.clone(),
            about: listing.about.clone(),
            photos: listing.photos.clone(),
            video_url: listing.video_url.clone(),
            is_donation: listing.is_donation,
            created_at: Some(self.next_timestamp()),
        };
        self.pets.lock().unwrap().push(pet.clone());
        Ok(pet)
    }

    async fn list(
        &self,
        filter: &PetFilter,
        cursor: Option<&PetCursor>,
        limit: i64,
    ) -> AppResult<Vec<PetProfile>> {
        let pets = self.pets.lock().unwrap();

        let mut matching: Vec<PetProfile> = pets
            .iter()
            .filter(|p| {
                filter.species.as_deref().is_none_or(|s| p.species == s)
                    && filter.breed.as_deref().is_none_or(|b| p.breed == b)
                    && filter.gender.is_none_or(|g| p.gender == g)
                    && filter.objective.is_none_or(|o| p.objective == o)
                    && filter.region.as_deref().is_none_or(|r| p.region == r)
                    && (!filter.donation_only || p.is_donation)
                    && cursor.is_none_or(|c| {
                        p.created_at
                            .is_some_and(|ca| (ca, p.id) < (c.created_at, c.id))
                    })
            })
            .cloned()
            .collect();

        matching.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        matching.truncate(limit as usize);
        Ok(matching)
    }
}

// ============================================================================
// InMemoryLikeRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryLikeRepo {
    pub likes: Mutex<Vec<LikeProfile>>,
}

impl InMemoryLikeRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LikeRepo for InMemoryLikeRepo {
    async fn upsert(&self, user_id: Uuid, pet_id: Uuid) -> AppResult<LikeProfile> {
        let mut likes = self.likes.lock().unwrap();
        let now = chrono::Utc::now().naive_utc();

        if let Some(existing) = likes
            .iter_mut()
            .find(|l| l.user_id == user_id && l.pet_id == pet_id)
        {
            existing.updated_at = Some(now);
            return Ok(existing.clone());
        }

        let like = LikeProfile {
            id: Uuid::new_v4(),
            user_id,
            pet_id,
            created_at: Some(now),
            updated_at: Some(now),
        };
        likes.push(like.clone());
        Ok(like)
    }
}

// ============================================================================
// Test Factories
// ============================================================================

/// A listing that passes validation; tweak fields through the closure.
pub fn create_test_listing(overrides: impl FnOnce(&mut NewPetListing)) -> NewPetListing {
    use crate::domain::entities::pet::{PetGender, PetObjective, PetSize};

    let mut listing = NewPetListing {
        display_name: "Luna".to_string(),
        species: "Cachorro".to_string(),
        breed: "Golden Retriever".to_string(),
        gender: PetGender::Female,
        size: Some(PetSize::Large),
        colors: vec!["Dourado".to_string()],
        age_months: 24,
        pedigree: false,
        vaccinated: Some(true),
        neutered: Some(true),
        health_notes: None,
        objective: PetObjective::Companionship,
        region: "Brasil / RJ".to_string(),
        about: Some("Muito docil.".to_string()),
        photos: vec![
            "https://images.example.com/luna-1.jpg".to_string(),
            "https://images.example.com/luna-2.jpg".to_string(),
            "https://images.example.com/luna-3.jpg".to_string(),
        ],
        video_url: None,
        is_donation: false,
    };
    overrides(&mut listing);
    listing
}
