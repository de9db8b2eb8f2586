use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::{
    app_error::{AppError, AppResult},
    use_cases::auth::OtpNotifier,
};

#[derive(Clone)]
pub struct ResendOtpNotifier {
    client: Client,
    api_key: secrecy::SecretString,
    from: String,
}

impl ResendOtpNotifier {
    pub fn new(api_key: secrecy::SecretString, from: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            from,
        }
    }
}

#[derive(Serialize)]
struct ResendReq<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[async_trait]
impl OtpNotifier for ResendOtpNotifier {
    async fn send_code(&self, to: &str, code: &str, ttl_minutes: i64) -> AppResult<()> {
        if self.api_key.expose_secret().is_empty() {
            return Err(AppError::Internal("No email API key configured".into()));
        }

        let html = format!(
            "<p>Seu c\u{f3}digo de acesso \u{e9}:</p>\
             <p style=\"font-size:28px;letter-spacing:4px;font-weight:bold;\">{code}</p>\
             <p>Ele expira em {ttl_minutes} minutos. Se voc\u{ea} n\u{e3}o pediu este c\u{f3}digo, ignore este email.</p>"
        );
        let body = ResendReq {
            from: &self.from,
            to: [to],
            subject: "Seu c\u{f3}digo de acesso Petcusher",
            html: &html,
        };

        self.client
            .post("https://api.resend.com/emails")
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(())
    }
}
