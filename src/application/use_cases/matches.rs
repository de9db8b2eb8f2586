//! Likes between users and pet listings. Mutual-match detection comes later,
//! when owner-to-owner likes exist; for now every like reports `matched: false`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::AppResult;
use crate::domain::entities::pet::LikeProfile;

#[async_trait]
pub trait LikeRepo: Send + Sync {
    /// Upsert on the (user, pet) pair; a repeat like refreshes `updated_at`.
    async fn upsert(&self, user_id: Uuid, pet_id: Uuid) -> AppResult<LikeProfile>;
}

#[derive(Clone)]
pub struct MatchUseCases {
    likes: Arc<dyn LikeRepo>,
}

impl MatchUseCases {
    pub fn new(likes: Arc<dyn LikeRepo>) -> Self {
        Self { likes }
    }

    #[instrument(skip(self))]
    pub async fn like_pet(&self, user_id: Uuid, pet_id: Uuid) -> AppResult<LikeProfile> {
        self.likes.upsert(user_id, pet_id).await
    }
}
