//! RS256 signature verification of provider id tokens against the provider's
//! published key set. Keys are fetched lazily and cached per `kid`; an unknown
//! `kid` triggers one refetch before the token is rejected, which covers
//! provider key rotation.

use std::collections::HashMap;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::app_error::{AppError, AppResult};
use crate::application::use_cases::oauth::IdTokenSignatureVerifier;
use crate::domain::entities::auth_provider::OauthProvider;

const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";
const APPLE_JWKS_URL: &str = "https://appleid.apple.com/auth/keys";

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct JwksDocument {
    keys: Vec<Jwk>,
}

pub struct JwksSignatureVerifier {
    client: reqwest::Client,
    // Keyed by "{jwks_url}#{kid}".
    keys: RwLock<HashMap<String, Jwk>>,
}

impl JwksSignatureVerifier {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            keys: RwLock::new(HashMap::new()),
        }
    }

    fn jwks_url(provider: OauthProvider) -> &'static str {
        match provider {
            OauthProvider::Google => GOOGLE_JWKS_URL,
            OauthProvider::Apple => APPLE_JWKS_URL,
        }
    }

    async fn cached_key(&self, url: &str, kid: &str) -> Option<Jwk> {
        self.keys.read().await.get(&cache_key(url, kid)).cloned()
    }

    async fn refresh_keys(&self, url: &str) -> AppResult<()> {
        let document: JwksDocument = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("JWKS fetch failed: {e}")))?
            .error_for_status()
            .map_err(|e| AppError::Internal(format!("JWKS fetch failed: {e}")))?
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("JWKS parse failed: {e}")))?;

        let mut keys = self.keys.write().await;
        for jwk in document.keys {
            keys.insert(cache_key(url, &jwk.kid), jwk);
        }
        Ok(())
    }

    async fn key_for(&self, provider: OauthProvider, kid: &str) -> AppResult<Jwk> {
        let url = Self::jwks_url(provider);
        if let Some(jwk) = self.cached_key(url, kid).await {
            return Ok(jwk);
        }

        self.refresh_keys(url).await?;
        self.cached_key(url, kid)
            .await
            .ok_or(AppError::OauthTokenInvalid(provider))
    }
}

impl Default for JwksSignatureVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdTokenSignatureVerifier for JwksSignatureVerifier {
    async fn verify_signature(
        &self,
        provider: OauthProvider,
        raw_token: &str,
    ) -> AppResult<()> {
        let header =
            decode_header(raw_token).map_err(|_| AppError::OauthTokenInvalid(provider))?;
        let kid = header.kid.ok_or(AppError::OauthTokenInvalid(provider))?;

        let jwk = self.key_for(provider, &kid).await?;
        let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|e| AppError::Internal(format!("Bad JWK from provider: {e}")))?;

        // Only the signature and expiry are checked here; issuer, audience and
        // email rules live in the validator so they stay testable offline.
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_aud = false;

        decode::<serde_json::Value>(raw_token, &key, &validation)
            .map(|_| ())
            .map_err(|_| AppError::OauthTokenInvalid(provider))
    }
}

fn cache_key(url: &str, kid: &str) -> String {
    format!("{url}#{kid}")
}
