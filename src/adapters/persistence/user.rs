use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::auth_provider::AuthProvider,
    domain::entities::user::UserProfile,
    use_cases::auth::UserRepo,
};

// User row as stored in the db.
#[derive(sqlx::FromRow, Debug)]
struct UserDb {
    id: Uuid,
    email: String,
    name: Option<String>,
    locale: String,
    email_verified: bool,
    auth_provider: String,
    created_at: Option<NaiveDateTime>,
    updated_at: Option<NaiveDateTime>,
}

impl UserDb {
    fn into_profile(self) -> AppResult<UserProfile> {
        let auth_provider = AuthProvider::from_str(&self.auth_provider).ok_or_else(|| {
            AppError::Internal(format!("Unknown auth provider in db: {}", self.auth_provider))
        })?;
        Ok(UserProfile {
            id: self.id,
            email: self.email,
            name: self.name,
            locale: self.locale,
            email_verified: self.email_verified,
            auth_provider,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const USER_COLUMNS: &str =
    "id, email, name, locale, email_verified, auth_provider, created_at, updated_at";

#[async_trait]
impl UserRepo for PostgresPersistence {
    async fn upsert_identity(
        &self,
        email: &str,
        name: Option<&str>,
        provider: AuthProvider,
        email_verified: bool,
    ) -> AppResult<UserProfile> {
        let sql = format!(
            r#"
            INSERT INTO users (id, email, name, locale, email_verified, auth_provider)
            VALUES ($1, $2, $3, 'pt-BR', $4, $5)
            ON CONFLICT (email) DO UPDATE
            SET name = COALESCE($3, users.name),
                email_verified = $4,
                auth_provider = $5,
                updated_at = NOW()
            RETURNING {USER_COLUMNS}
            "#
        );
        let rec = sqlx::query_as::<_, UserDb>(&sql)
            .bind(Uuid::new_v4())
            .bind(email)
            .bind(name)
            .bind(email_verified)
            .bind(provider.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        rec.into_profile()
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<UserProfile>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let rec = sqlx::query_as::<_, UserDb>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;

        rec.map(UserDb::into_profile).transpose()
    }
}
