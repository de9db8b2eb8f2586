use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::pet::{PetGender, PetObjective, PetProfile, PetSize},
    use_cases::pet::{NewPetListing, PetCursor, PetFilter, PetRepo},
};

#[derive(sqlx::FromRow, Debug)]
struct PetDb {
    id: Uuid,
    owner_id: Uuid,
    display_name: String,
    species: String,
    breed: String,
    gender: String,
    size: Option<String>,
    colors: Vec<String>,
    age_months: i32,
    pedigree: bool,
    vaccinated: Option<bool>,
    neutered: Option<bool>,
    health_notes: Option<String>,
    objective: String,
    region: String,
    about: Option<String>,
    photos: Vec<String>,
    video_url: Option<String>,
    is_donation: bool,
    created_at: Option<NaiveDateTime>,
}

impl PetDb {
    fn into_profile(self) -> AppResult<PetProfile> {
        let gender = PetGender::from_str(&self.gender)
            .ok_or_else(|| AppError::Internal(format!("Unknown gender in db: {}", self.gender)))?;
        let size = self
            .size
            .as_deref()
            .map(|s| {
                PetSize::from_str(s)
                    .ok_or_else(|| AppError::Internal(format!("Unknown size in db: {s}")))
            })
            .transpose()?;
        let objective = PetObjective::from_str(&self.objective).ok_or_else(|| {
            AppError::Internal(format!("Unknown objective in db: {}", self.objective))
        })?;

        Ok(PetProfile {
            id: self.id,
            owner_id: self.owner_id,
            display_name: self.display_name,
            species: self.species,
            breed: self.breed,
            gender,
            size,
            colors: self.colors,
            age_months: self.age_months,
            pedigree: self.pedigree,
            vaccinated: self.vaccinated,
            neutered: self.neutered,
            health_notes: self.health_notes,
            objective,
            region: self.region,
            about: self.about,
            photos: self.photos,
            video_url: self.video_url,
            is_donation: self.is_donation,
            created_at: self.created_at,
        })
    }
}

const PET_COLUMNS: &str = "id, owner_id, display_name, species, breed, gender, size, colors, \
     age_months, pedigree, vaccinated, neutered, health_notes, objective, region, about, \
     photos, video_url, is_donation, created_at";

#[async_trait]
impl PetRepo for PostgresPersistence {
    async fn create(&self, owner_id: Uuid, listing: &NewPetListing) -> AppResult<PetProfile> {
        let sql = format!(
            r#"
            INSERT INTO pets (
                id, owner_id, display_name, species, breed, gender, size, colors,
                age_months, pedigree, vaccinated, neutered, health_notes, objective,
                region, about, photos, video_url, is_donation
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING {PET_COLUMNS}
            "#
        );
        let rec = sqlx::query_as::<_, PetDb>(&sql)
            .bind(Uuid::new_v4())
            .bind(owner_id)
            .bind(&listing.display_name)
            .bind(&listing.species)
            .bind(&listing.breed)
            .bind(listing.gender.as_str())
            .bind(listing.size.map(|s| s.as_str()))
            .bind(&listing.colors)
            .bind(listing.age_months)
            .bind(listing.pedigree)
            .bind(listing.vaccinated)
            .bind(listing.neutered)
            .bind(&listing.health_notes)
            .bind(listing.objective.as_str())
            .bind(&listing.region)
            .bind(&listing.about)
            .bind(&listing.photos)
            .bind(&listing.video_url)
            .bind(listing.is_donation)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        rec.into_profile()
    }

    async fn list(
        &self,
        filter: &PetFilter,
        cursor: Option<&PetCursor>,
        limit: i64,
    ) -> AppResult<Vec<PetProfile>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {PET_COLUMNS} FROM pets WHERE TRUE"));

        if let Some(species) = filter.species.as_deref() {
            qb.push(" AND species = ").push_bind(species);
        }
        if let Some(breed) = filter.breed.as_deref() {
            qb.push(" AND breed = ").push_bind(breed);
        }
        if let Some(gender) = filter.gender {
            qb.push(" AND gender = ").push_bind(gender.as_str());
        }
        if let Some(objective) = filter.objective {
            qb.push(" AND objective = ").push_bind(objective.as_str());
        }
        if let Some(region) = filter.region.as_deref() {
            qb.push(" AND region = ").push_bind(region);
        }
        if filter.donation_only {
            qb.push(" AND is_donation = TRUE");
        }
        if let Some(cursor) = cursor {
            // Row-value comparison keeps the keyset predicate aligned with
            // the sort order below.
            qb.push(" AND (created_at, id) < (")
                .push_bind(cursor.created_at)
                .push(", ")
                .push_bind(cursor.id)
                .push(")");
        }

        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(limit);

        let rows = qb
            .build_query_as::<PetDb>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?;

        rows.into_iter().map(PetDb::into_profile).collect()
    }
}
