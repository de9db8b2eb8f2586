use serde::{Deserialize, Serialize};

/// How a user last proved control of their identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthProvider {
    EmailCode,
    Google,
    Apple,
    Dev,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::EmailCode => "EMAIL_CODE",
            AuthProvider::Google => "GOOGLE",
            AuthProvider::Apple => "APPLE",
            AuthProvider::Dev => "DEV",
        }
    }

    pub fn from_str(raw: &str) -> Option<Self> {
        match raw {
            "EMAIL_CODE" => Some(AuthProvider::EmailCode),
            "GOOGLE" => Some(AuthProvider::Google),
            "APPLE" => Some(AuthProvider::Apple),
            "DEV" => Some(AuthProvider::Dev),
            _ => None,
        }
    }
}

/// Third-party identity providers we accept id tokens from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OauthProvider {
    Google,
    Apple,
}

impl OauthProvider {
    pub fn as_auth_provider(&self) -> AuthProvider {
        match self {
            OauthProvider::Google => AuthProvider::Google,
            OauthProvider::Apple => AuthProvider::Apple,
        }
    }
}

impl std::fmt::Display for OauthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OauthProvider::Google => write!(f, "Google"),
            OauthProvider::Apple => write!(f, "Apple"),
        }
    }
}
