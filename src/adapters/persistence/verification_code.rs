use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::Row;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    use_cases::auth::{VerificationCodeRecord, VerificationCodeRepo},
};

#[derive(sqlx::FromRow, Debug)]
struct VerificationCodeDb {
    id: i64,
    email: String,
    code_hash: String,
    attempts: i32,
    expires_at: NaiveDateTime,
    consumed_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
}

impl From<VerificationCodeDb> for VerificationCodeRecord {
    fn from(db: VerificationCodeDb) -> Self {
        VerificationCodeRecord {
            id: db.id,
            email: db.email,
            code_hash: db.code_hash,
            attempts: db.attempts,
            expires_at: db.expires_at,
            consumed_at: db.consumed_at,
            created_at: db.created_at,
        }
    }
}

#[async_trait]
impl VerificationCodeRepo for PostgresPersistence {
    async fn supersede_and_insert(
        &self,
        email: &str,
        code_hash: &str,
        expires_at: NaiveDateTime,
    ) -> AppResult<()> {
        // Single statement: superseding earlier codes and inserting the new
        // one cannot be interleaved by another issuance.
        sqlx::query(
            r#"
            WITH superseded AS (
                UPDATE verification_codes
                SET consumed_at = NOW()
                WHERE email = $1 AND consumed_at IS NULL
            )
            INSERT INTO verification_codes (email, code_hash, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(email)
        .bind(code_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    async fn latest_unconsumed(&self, email: &str) -> AppResult<Option<VerificationCodeRecord>> {
        let rec = sqlx::query_as::<_, VerificationCodeDb>(
            r#"
            SELECT id, email, code_hash, attempts, expires_at, consumed_at, created_at
            FROM verification_codes
            WHERE email = $1 AND consumed_at IS NULL
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(rec.map(VerificationCodeRecord::from))
    }

    async fn increment_attempts(&self, id: i64, ceiling: i32) -> AppResult<Option<i32>> {
        // Compare-and-increment so racing attempts can never push the
        // counter past the ceiling.
        let row = sqlx::query(
            r#"
            UPDATE verification_codes
            SET attempts = attempts + 1
            WHERE id = $1 AND attempts < $2
            RETURNING attempts
            "#,
        )
        .bind(id)
        .bind(ceiling)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(|r| r.get::<i32, _>("attempts")))
    }

    async fn was_consumed(&self, email: &str, code_hash: &str) -> AppResult<bool> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM verification_codes
                WHERE email = $1 AND code_hash = $2 AND consumed_at IS NOT NULL
            ) AS seen
            "#,
        )
        .bind(email)
        .bind(code_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.get::<bool, _>("seen"))
    }

    async fn mark_consumed(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE verification_codes
            SET consumed_at = NOW()
            WHERE id = $1 AND consumed_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(result.rows_affected() == 1)
    }
}
