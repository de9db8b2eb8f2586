use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::pet::LikeProfile,
    use_cases::matches::LikeRepo,
};

#[derive(sqlx::FromRow, Debug)]
struct LikeDb {
    id: Uuid,
    user_id: Uuid,
    pet_id: Uuid,
    created_at: Option<NaiveDateTime>,
    updated_at: Option<NaiveDateTime>,
}

#[async_trait]
impl LikeRepo for PostgresPersistence {
    async fn upsert(&self, user_id: Uuid, pet_id: Uuid) -> AppResult<LikeProfile> {
        let rec = sqlx::query_as::<_, LikeDb>(
            r#"
            INSERT INTO likes (id, user_id, pet_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, pet_id) DO UPDATE SET updated_at = NOW()
            RETURNING id, user_id, pet_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(pet_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(LikeProfile {
            id: rec.id,
            user_id: rec.user_id,
            pet_id: rec.pet_id,
            created_at: rec.created_at,
            updated_at: rec.updated_at,
        })
    }
}
