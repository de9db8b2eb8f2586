use sqlx::PgPool;

use crate::app_error::AppError;

pub mod like;
pub mod pet;
pub mod user;
pub mod verification_code;

#[derive(Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    pub fn new(pool: PgPool) -> Self {
        PostgresPersistence { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Idempotent schema setup, run once at startup.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                name TEXT,
                locale TEXT NOT NULL DEFAULT 'pt-BR',
                email_verified BOOLEAN NOT NULL DEFAULT FALSE,
                auth_provider TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMP NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS verification_codes (
                id BIGSERIAL PRIMARY KEY,
                email TEXT NOT NULL,
                code_hash TEXT NOT NULL,
                attempts INTEGER NOT NULL DEFAULT 0,
                expires_at TIMESTAMP NOT NULL,
                consumed_at TIMESTAMP,
                created_at TIMESTAMP NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Verification lookups only ever touch unconsumed rows.
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_verification_codes_active \
             ON verification_codes(email, created_at DESC) WHERE consumed_at IS NULL",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS pets (
                id UUID PRIMARY KEY,
                owner_id UUID NOT NULL REFERENCES users(id),
                display_name TEXT NOT NULL,
                species TEXT NOT NULL,
                breed TEXT NOT NULL,
                gender TEXT NOT NULL,
                size TEXT,
                colors TEXT[] NOT NULL,
                age_months INTEGER NOT NULL,
                pedigree BOOLEAN NOT NULL DEFAULT FALSE,
                vaccinated BOOLEAN,
                neutered BOOLEAN,
                health_notes TEXT,
                objective TEXT NOT NULL,
                region TEXT NOT NULL,
                about TEXT,
                photos TEXT[] NOT NULL,
                video_url TEXT,
                is_donation BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMP NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Matches the browse sort order.
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_pets_created_at ON pets(created_at DESC, id DESC)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS likes (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL REFERENCES users(id),
                pet_id UUID NOT NULL REFERENCES pets(id),
                created_at TIMESTAMP NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMP NOT NULL DEFAULT NOW(),
                UNIQUE (user_id, pet_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                // PostgreSQL unique violation
                if msg.contains("duplicate key") || msg.contains("unique constraint") {
                    AppError::InvalidInput("A record with this value already exists".into())
                }
                // PostgreSQL foreign key violation
                else if msg.contains("foreign key") || msg.contains("violates foreign key") {
                    AppError::InvalidInput("Referenced record not found".into())
                }
                // PostgreSQL not-null violation
                else if msg.contains("null value") && msg.contains("violates not-null") {
                    AppError::InvalidInput("Required field is missing".into())
                } else {
                    // Log the actual error for debugging, but don't expose details
                    tracing::error!(error = ?err, "Database error");
                    AppError::Database("Database operation failed".into())
                }
            }
            _ => {
                tracing::error!(error = ?err, "Database error");
                AppError::Database("Database operation failed".into())
            }
        }
    }
}
