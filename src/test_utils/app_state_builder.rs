//! Builds an `AppState` backed entirely by in-memory ports, for exercising
//! the HTTP layer with `axum_test::TestServer`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;
use time::Duration;

use crate::{
    adapters::http::app_state::AppState,
    application::use_cases::auth::AuthUseCases,
    application::use_cases::matches::MatchUseCases,
    application::use_cases::oauth::IdTokenValidator,
    application::use_cases::pet::PetUseCases,
    infra::config::AppConfig,
    test_utils::{
        AcceptAllSignatureVerifier, InMemoryLikeRepo, InMemoryOtpNotifier, InMemoryPetRepo,
        InMemoryUserRepo, InMemoryVerificationCodeRepo,
    },
};

pub struct TestAppStateBuilder {
    production: bool,
    google_audience: Option<String>,
    apple_audience: Option<String>,
    otp_ttl_minutes: i64,
    users: Arc<InMemoryUserRepo>,
    codes: Arc<InMemoryVerificationCodeRepo>,
    notifier: Arc<InMemoryOtpNotifier>,
    pets: Arc<InMemoryPetRepo>,
    likes: Arc<InMemoryLikeRepo>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            production: false,
            google_audience: None,
            apple_audience: None,
            otp_ttl_minutes: 10,
            users: Arc::new(InMemoryUserRepo::new()),
            codes: Arc::new(InMemoryVerificationCodeRepo::new()),
            notifier: Arc::new(InMemoryOtpNotifier::new()),
            pets: Arc::new(InMemoryPetRepo::new()),
            likes: Arc::new(InMemoryLikeRepo::new()),
        }
    }

    /// Production posture: the dev-login route is not registered.
    pub fn production(mut self) -> Self {
        self.production = true;
        self
    }

    pub fn with_google_audience(mut self, audience: &str) -> Self {
        self.google_audience = Some(audience.to_string());
        self
    }

    pub fn with_apple_audience(mut self, audience: &str) -> Self {
        self.apple_audience = Some(audience.to_string());
        self
    }

    pub fn with_failing_delivery(mut self) -> Self {
        self.notifier = Arc::new(InMemoryOtpNotifier::failing());
        self
    }

    pub fn is_production(&self) -> bool {
        self.production
    }

    // Handles onto the mocks, for assertions after requests ran.

    pub fn users(&self) -> Arc<InMemoryUserRepo> {
        self.users.clone()
    }

    pub fn codes(&self) -> Arc<InMemoryVerificationCodeRepo> {
        self.codes.clone()
    }

    pub fn notifier(&self) -> Arc<InMemoryOtpNotifier> {
        self.notifier.clone()
    }

    pub fn pets(&self) -> Arc<InMemoryPetRepo> {
        self.pets.clone()
    }

    pub fn likes(&self) -> Arc<InMemoryLikeRepo> {
        self.likes.clone()
    }

    pub fn build(&self) -> AppState {
        let config = Arc::new(AppConfig {
            bind_addr: "127.0.0.1:8080".parse::<SocketAddr>().unwrap(),
            database_url: String::new(),
            db_max_connections: 5,
            cors_origin: HeaderValue::from_static("http://localhost:3000"),
            jwt_secret: SecretString::new("test_jwt_secret".into()),
            otp_hash_secret: SecretString::new("test_otp_secret".into()),
            session_ttl: Duration::days(7),
            otp_ttl_minutes: self.otp_ttl_minutes,
            google_audience: self.google_audience.clone(),
            apple_audience: self.apple_audience.clone(),
            resend_api_key: SecretString::new("".into()),
            email_from: "login@petcusher.test".to_string(),
            production: self.production,
        });

        let id_tokens = IdTokenValidator::new(
            Arc::new(AcceptAllSignatureVerifier),
            self.google_audience.clone(),
            self.apple_audience.clone(),
        );

        let auth_use_cases = Arc::new(AuthUseCases::new(
            self.users.clone(),
            self.codes.clone(),
            self.notifier.clone(),
            id_tokens,
            config.otp_hash_secret.clone(),
            self.otp_ttl_minutes,
            self.production,
        ));
        let pet_use_cases = Arc::new(PetUseCases::new(self.pets.clone()));
        let match_use_cases = Arc::new(MatchUseCases::new(self.likes.clone()));

        AppState {
            config,
            auth_use_cases,
            pet_use_cases,
            match_use_cases,
        }
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
