use std::fs::File;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{email::resend::ResendOtpNotifier, http::app_state::AppState},
    infra::{config::AppConfig, jwks::JwksSignatureVerifier, postgres_persistence},
    use_cases::auth::{AuthUseCases, UserRepo, VerificationCodeRepo},
    use_cases::matches::{LikeRepo, MatchUseCases},
    use_cases::oauth::IdTokenValidator,
    use_cases::pet::{PetRepo, PetUseCases},
};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let postgres = Arc::new(
        postgres_persistence(&config.database_url, config.db_max_connections).await?,
    );
    postgres
        .ensure_schema()
        .await
        .map_err(|e| anyhow::anyhow!("schema setup failed: {e}"))?;

    let notifier = Arc::new(ResendOtpNotifier::new(
        config.resend_api_key.clone(),
        config.email_from.clone(),
    ));

    let id_tokens = IdTokenValidator::new(
        Arc::new(JwksSignatureVerifier::new()),
        config.google_audience.clone(),
        config.apple_audience.clone(),
    );

    let auth_use_cases = AuthUseCases::new(
        postgres.clone() as Arc<dyn UserRepo>,
        postgres.clone() as Arc<dyn VerificationCodeRepo>,
        notifier,
        id_tokens,
        config.otp_hash_secret.clone(),
        config.otp_ttl_minutes,
        config.production,
    );
    let pet_use_cases = PetUseCases::new(postgres.clone() as Arc<dyn PetRepo>);
    let match_use_cases = MatchUseCases::new(postgres as Arc<dyn LikeRepo>);

    Ok(AppState {
        config: Arc::new(config),
        auth_use_cases: Arc::new(auth_use_cases),
        pet_use_cases: Arc::new(pet_use_cases),
        match_use_cases: Arc::new(match_use_cases),
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "petcusher_api=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    // File (structured JSON logs)
    let file = File::create("app.log").expect("cannot create log file");
    let json_layer = fmt::layer()
        .json()
        .with_writer(file)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
