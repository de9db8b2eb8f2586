use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PetGender {
    Male,
    Female,
}

impl PetGender {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetGender::Male => "MALE",
            PetGender::Female => "FEMALE",
        }
    }

    pub fn from_str(raw: &str) -> Option<Self> {
        match raw {
            "MALE" => Some(PetGender::Male),
            "FEMALE" => Some(PetGender::Female),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PetSize {
    Small,
    Medium,
    Large,
}

impl PetSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetSize::Small => "SMALL",
            PetSize::Medium => "MEDIUM",
            PetSize::Large => "LARGE",
        }
    }

    pub fn from_str(raw: &str) -> Option<Self> {
        match raw {
            "SMALL" => Some(PetSize::Small),
            "MEDIUM" => Some(PetSize::Medium),
            "LARGE" => Some(PetSize::Large),
            _ => None,
        }
    }
}

/// What the owner is looking for with this listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PetObjective {
    Breeding,
    Companionship,
    Socialization,
}

impl PetObjective {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetObjective::Breeding => "BREEDING",
            PetObjective::Companionship => "COMPANIONSHIP",
            PetObjective::Socialization => "SOCIALIZATION",
        }
    }

    pub fn from_str(raw: &str) -> Option<Self> {
        match raw {
            "BREEDING" => Some(PetObjective::Breeding),
            "COMPANIONSHIP" => Some(PetObjective::Companionship),
            "SOCIALIZATION" => Some(PetObjective::Socialization),
            _ => None,
        }
    }
}

/// A pet listing as returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetProfile {
    pub id: Uuid,
    pub owner_id: Uuid,
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
    pub created_at: Option<NaiveDateTime>,
}

/// A "like" from a user toward a pet listing. One row per (user, pet) pair;
/// re-liking only refreshes `updated_at`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub pet_id: Uuid,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}
