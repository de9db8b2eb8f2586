//! Authentication flows: one-time verification codes, third-party id tokens,
//! and the developer shortcut login. Each flow ends in the same place: an
//! identity upsert keyed by email, after which the HTTP layer mints a session.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use rand::Rng;
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::use_cases::oauth::IdTokenValidator;
use crate::domain::entities::auth_provider::{AuthProvider, OauthProvider};
use crate::domain::entities::user::UserProfile;

/// Verification is refused once a record has accumulated this many
/// failed attempts, correct code or not.
pub const OTP_MAX_ATTEMPTS: i32 = 5;

// ============================================================================
// Ports
// ============================================================================

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Upsert keyed by email. Creation sets all supplied fields; update
    /// overwrites name only when one is supplied, and always refreshes
    /// the verified flag and provider tag.
    async fn upsert_identity(
        &self,
        email: &str,
        name: Option<&str>,
        provider: AuthProvider,
        email_verified: bool,
    ) -> AppResult<UserProfile>;

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<UserProfile>>;
}

#[async_trait]
pub trait VerificationCodeRepo: Send + Sync {
    /// Consume every prior unconsumed code for the email and insert the new
    /// record, as one atomic operation. Keeps the "at most one active code
    /// per email" invariant without a read-modify-write window.
    async fn supersede_and_insert(
        &self,
        email: &str,
        code_hash: &str,
        expires_at: NaiveDateTime,
    ) -> AppResult<()>;

    /// Most recently created unconsumed record for the email; creation-time
    /// descending with the row id as deterministic tie-break.
    async fn latest_unconsumed(&self, email: &str) -> AppResult<Option<VerificationCodeRecord>>;

    /// Compare-and-increment: bump the attempt counter only while it is below
    /// the ceiling. Returns the new count, or None if the ceiling was already
    /// reached by a concurrent attempt.
    async fn increment_attempts(&self, id: i64, ceiling: i32) -> AppResult<Option<i32>>;

    /// Set the consumption timestamp exactly once. Returns false when the
    /// record was already consumed.
    async fn mark_consumed(&self, id: i64) -> AppResult<bool>;

    /// Whether this hash belongs to a code that was already consumed
    /// (used or superseded). Distinguishes a stale code from a wrong one.
    async fn was_consumed(&self, email: &str, code_hash: &str) -> AppResult<bool>;
}

/// Outbound delivery of a freshly issued code.
#[async_trait]
pub trait OtpNotifier: Send + Sync {
    async fn send_code(&self, to: &str, code: &str, ttl_minutes: i64) -> AppResult<()>;
}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone)]
pub struct VerificationCodeRecord {
    pub id: i64,
    pub email: String,
    pub code_hash: String,
    pub attempts: i32,
    pub expires_at: NaiveDateTime,
    pub consumed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct OtpIssued {
    pub delivered: bool,
    pub expires_at: NaiveDateTime,
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct AuthUseCases {
    users: Arc<dyn UserRepo>,
    codes: Arc<dyn VerificationCodeRepo>,
    notifier: Arc<dyn OtpNotifier>,
    id_tokens: IdTokenValidator,
    otp_hash_secret: secrecy::SecretString,
    otp_ttl_minutes: i64,
    production: bool,
}

impl AuthUseCases {
    pub fn new(
        users: Arc<dyn UserRepo>,
        codes: Arc<dyn VerificationCodeRepo>,
        notifier: Arc<dyn OtpNotifier>,
        id_tokens: IdTokenValidator,
        otp_hash_secret: secrecy::SecretString,
        otp_ttl_minutes: i64,
        production: bool,
    ) -> Self {
        Self {
            users,
            codes,
            notifier,
            id_tokens,
            otp_hash_secret,
            otp_ttl_minutes,
            production,
        }
    }

    /// Issue a fresh 6-digit code for the email, superseding any earlier one.
    /// Delivery failure never fails the issuance; the code stays valid and is
    /// surfaced on the operational console outside production.
    #[instrument(skip(self))]
    pub async fn request_otp(&self, email: &str) -> AppResult<OtpIssued> {
        let email = &canonical_email(email);
        let code = generate_code();
        let code_hash = hash_code(email, &code, &self.otp_hash_secret);
        let expires_at =
            (Utc::now() + chrono::Duration::minutes(self.otp_ttl_minutes)).naive_utc();

        self.codes
            .supersede_and_insert(email, &code_hash, expires_at)
            .await?;

        let delivered = match self
            .notifier
            .send_code(email, &code, self.otp_ttl_minutes)
            .await
        {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = ?err, "Verification code delivery failed; code remains valid");
                if !self.production {
                    tracing::info!(%email, %code, "Verification code (dev console)");
                }
                false
            }
        };

        Ok(OtpIssued {
            delivered,
            expires_at,
        })
    }

    /// Check a submitted code against the most recent unconsumed record.
    /// On success the record is consumed and the identity upserted with
    /// provider EMAIL_CODE and a verified email.
    #[instrument(skip(self, code))]
    pub async fn verify_otp(&self, email: &str, code: &str) -> AppResult<UserProfile> {
        let email = &canonical_email(email);
        let record = self
            .codes
            .latest_unconsumed(email)
            .await?
            .ok_or(AppError::OtpNotFound)?;

        if record.expires_at <= Utc::now().naive_utc() {
            return Err(AppError::OtpExpired);
        }
        if record.attempts >= OTP_MAX_ATTEMPTS {
            return Err(AppError::OtpTooManyAttempts);
        }

        let submitted_hash = hash_code(email, code, &self.otp_hash_secret);
        if record.code_hash != submitted_hash {
            // A code that once existed but was used or superseded is gone,
            // not wrong; it costs no attempt.
            if self.codes.was_consumed(email, &submitted_hash).await? {
                return Err(AppError::OtpNotFound);
            }
            self.codes
                .increment_attempts(record.id, OTP_MAX_ATTEMPTS)
                .await?;
            return Err(AppError::OtpInvalid);
        }

        // Lost race against another verification of the same record.
        if !self.codes.mark_consumed(record.id).await? {
            return Err(AppError::OtpNotFound);
        }

        self.users
            .upsert_identity(email, None, AuthProvider::EmailCode, true)
            .await
    }

    /// Validate a third-party id token and upsert the asserted identity.
    #[instrument(skip(self, raw_token))]
    pub async fn oauth_login(
        &self,
        provider: OauthProvider,
        raw_token: &str,
    ) -> AppResult<UserProfile> {
        let identity = self.id_tokens.validate(provider, raw_token).await?;

        self.users
            .upsert_identity(
                &canonical_email(&identity.email),
                identity.name.as_deref(),
                provider.as_auth_provider(),
                identity.email_verified,
            )
            .await
    }

    /// Developer shortcut: trust the caller outright. The HTTP layer only
    /// exposes this route on non-production deployments.
    #[instrument(skip(self))]
    pub async fn dev_login(&self, email: &str, name: Option<&str>) -> AppResult<UserProfile> {
        self.users
            .upsert_identity(&canonical_email(email), name, AuthProvider::Dev, true)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<UserProfile> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// The upsert is keyed by email, so every flow must canonicalize the
/// same way. Id-token emails in particular arrive in whatever case the
/// provider relays.
fn canonical_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// 6-digit numeric code, uniform over 100000..=999999.
fn generate_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(100_000..=999_999);
    n.to_string()
}

/// Deterministic keyed hash of the code. Only the hash is persisted.
pub fn hash_code(email: &str, code: &str, secret: &secrecy::SecretString) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(code.as_bytes());
    hasher.update(secret.expose_secret().as_bytes());
    hex::encode(hasher.finalize())
}
