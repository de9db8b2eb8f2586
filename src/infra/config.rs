use std::env;
use std::net::SocketAddr;

use axum::http::HeaderValue;
use secrecy::SecretString;
use time::Duration;

pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub db_max_connections: u32,
    pub cors_origin: HeaderValue,
    /// Signs session credentials (HS256).
    pub jwt_secret: SecretString,
    /// Keys the verification-code hashes.
    pub otp_hash_secret: SecretString,
    pub session_ttl: Duration,
    pub otp_ttl_minutes: i64,
    /// Expected `aud` of Google id tokens; unset skips the audience check.
    pub google_audience: Option<String>,
    /// Expected `aud` of Apple id tokens; unset skips the audience check.
    pub apple_audience: Option<String>,
    pub resend_api_key: SecretString,
    pub email_from: String,
    /// Production posture: secrets become mandatory and the dev-login route
    /// is not registered.
    pub production: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let production = env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        let jwt_secret = required_secret("JWT_SECRET", production);
        let otp_hash_secret = required_secret("OTP_HASH_SECRET", production);

        let session_ttl_days: i64 = env::var("SESSION_TTL_DAYS")
            .unwrap_or("7".to_string())
            .parse()
            .expect("SESSION_TTL_DAYS must be a valid number");

        let otp_ttl_minutes: i64 = env::var("OTP_TTL_MINUTES")
            .unwrap_or("10".to_string())
            .parse()
            .expect("OTP_TTL_MINUTES must be a valid number");

        let bind_addr: SocketAddr = env::var("BIND_ADDR")
            .unwrap_or("127.0.0.1:8080".to_string())
            .parse()
            .expect("BIND_ADDR must be a valid socket address");

        let cors_origin: HeaderValue = env::var("CORS_ORIGIN")
            .unwrap_or("http://localhost:3000".to_string())
            .parse()
            .expect("CORS_ORIGIN must be a valid header value");

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let db_max_connections: u32 = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or("5".to_string())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid number");

        let google_audience = env::var("GOOGLE_AUDIENCE").ok().filter(|v| !v.is_empty());
        let apple_audience = env::var("APPLE_AUDIENCE").ok().filter(|v| !v.is_empty());

        // Delivery failure is tolerated, so an absent key only means codes
        // are never emailed (dev-console delivery instead).
        let resend_api_key = SecretString::new(
            env::var("RESEND_API_KEY").unwrap_or_default().into(),
        );
        let email_from =
            env::var("EMAIL_FROM").unwrap_or("login@petcusher.app".to_string());

        Self {
            bind_addr,
            database_url,
            db_max_connections,
            cors_origin,
            jwt_secret,
            otp_hash_secret,
            session_ttl: Duration::days(session_ttl_days),
            otp_ttl_minutes,
            google_audience,
            apple_audience,
            resend_api_key,
            email_from,
            production,
        }
    }
}

/// In a production posture a missing secret kills startup; anywhere else it
/// falls back to a known-insecure development value with a loud warning.
fn required_secret(name: &str, production: bool) -> SecretString {
    match env::var(name) {
        Ok(value) if !value.is_empty() => SecretString::new(value.into()),
        _ if production => panic!("{name} must be set when APP_ENV=production"),
        _ => {
            tracing::warn!("{name} is unset; using an insecure development default");
            SecretString::new(format!("dev_{}", name.to_lowercase()).into())
        }
    }
}
