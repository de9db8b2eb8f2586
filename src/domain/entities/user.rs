use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

use super::auth_provider::AuthProvider;

/// A marketplace user as returned to clients. Created on first successful
/// login through any provider; never hard-deleted by the auth subsystem.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub locale: String,
    pub email_verified: bool,
    pub auth_provider: AuthProvider,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}
