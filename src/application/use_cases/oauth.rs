//! Identity-token validation for third-party sign-in (Google, Apple).
//!
//! The token is a compact JWT: header.payload.signature, base64url-encoded.
//! Signature verification is a pluggable port so the HTTP layer can be tested
//! without the providers' key sets; the production adapter checks RS256
//! signatures against the provider's published JWKS before the payload is
//! trusted (see `infra::jwks`).

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use tracing::instrument;

use crate::app_error::{AppError, AppResult};
use crate::domain::entities::auth_provider::OauthProvider;

pub const GOOGLE_ISSUERS: [&str; 2] = ["https://accounts.google.com", "accounts.google.com"];
pub const APPLE_ISSUER: &str = "https://appleid.apple.com";

/// Verifies the cryptographic signature of a raw id token.
#[async_trait]
pub trait IdTokenSignatureVerifier: Send + Sync {
    async fn verify_signature(&self, provider: OauthProvider, raw_token: &str) -> AppResult<()>;
}

/// The subset of id-token claims this service cares about.
///
/// `aud` and `email_verified` are kept as raw JSON values: Google sends
/// `email_verified` as a boolean while Apple is known to send either a
/// boolean or the string `"true"`.
#[derive(Debug, Clone, Deserialize)]
pub struct IdTokenPayload {
    pub iss: Option<String>,
    pub aud: Option<serde_json::Value>,
    pub email: Option<serde_json::Value>,
    pub email_verified: Option<serde_json::Value>,
    pub name: Option<String>,
}

/// Identity claims accepted after all provider rules passed.
#[derive(Debug, Clone)]
pub struct ValidatedIdentity {
    pub email: String,
    pub email_verified: bool,
    pub name: Option<String>,
}

#[derive(Clone)]
pub struct IdTokenValidator {
    signature_verifier: Arc<dyn IdTokenSignatureVerifier>,
    google_audience: Option<String>,
    apple_audience: Option<String>,
}

impl IdTokenValidator {
    pub fn new(
        signature_verifier: Arc<dyn IdTokenSignatureVerifier>,
        google_audience: Option<String>,
        apple_audience: Option<String>,
    ) -> Self {
        Self {
            signature_verifier,
            google_audience,
            apple_audience,
        }
    }

    #[instrument(skip(self, raw_token))]
    pub async fn validate(
        &self,
        provider: OauthProvider,
        raw_token: &str,
    ) -> AppResult<ValidatedIdentity> {
        self.signature_verifier
            .verify_signature(provider, raw_token)
            .await?;

        let payload = decode_payload(provider, raw_token)?;
        let expected_audience = match provider {
            OauthProvider::Google => self.google_audience.as_deref(),
            OauthProvider::Apple => self.apple_audience.as_deref(),
        };
        apply_provider_rules(provider, &payload, expected_audience)
    }
}

/// Decode the payload segment of a compact token. Fewer than 2 segments or an
/// undecodable payload is a malformed token.
pub fn decode_payload(provider: OauthProvider, raw_token: &str) -> AppResult<IdTokenPayload> {
    let mut segments = raw_token.split('.');
    let payload_segment = match (segments.next(), segments.next()) {
        (Some(_header), Some(payload)) if !payload.is_empty() => payload,
        _ => return Err(AppError::OauthTokenInvalid(provider)),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload_segment)
        .map_err(|_| AppError::OauthTokenInvalid(provider))?;
    serde_json::from_slice(&bytes).map_err(|_| AppError::OauthTokenInvalid(provider))
}

/// Apply per-provider issuer/audience/email rules to a decoded payload.
pub fn apply_provider_rules(
    provider: OauthProvider,
    payload: &IdTokenPayload,
    expected_audience: Option<&str>,
) -> AppResult<ValidatedIdentity> {
    let issuer_ok = match provider {
        OauthProvider::Google => payload
            .iss
            .as_deref()
            .is_some_and(|iss| GOOGLE_ISSUERS.contains(&iss)),
        OauthProvider::Apple => payload.iss.as_deref() == Some(APPLE_ISSUER),
    };
    if !issuer_ok {
        return Err(AppError::OauthIssuerInvalid(provider));
    }

    if let Some(expected) = expected_audience {
        let aud_matches = payload
            .aud
            .as_ref()
            .and_then(|aud| aud.as_str())
            .is_some_and(|aud| aud == expected);
        if !aud_matches {
            return Err(AppError::OauthAudienceInvalid(provider));
        }
    }

    let email = payload
        .email
        .as_ref()
        .and_then(|e| e.as_str())
        .filter(|e| !e.is_empty())
        .ok_or(AppError::OauthEmailUnavailable(provider))?;

    Ok(ValidatedIdentity {
        email: email.to_string(),
        email_verified: is_email_verified(payload),
        name: payload.name.clone(),
    })
}

/// Apple relays `email_verified` either as a boolean or as the string "true".
fn is_email_verified(payload: &IdTokenPayload) -> bool {
    match &payload.email_verified {
        Some(serde_json::Value::Bool(b)) => *b,
        Some(serde_json::Value::String(s)) => s == "true",
        _ => false,
    }
}
