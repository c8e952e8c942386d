//! Centralized configuration management.
//!
//! Environment variables (and a `.env` file, loaded by `main`) are read once
//! here and handed to the resolver explicitly. Nothing else reads the
//! environment.

use coverbeet::{discogs::DISCOGS_API_URL, CoverError};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Discogs personal access token (`DISCOGS_TOKEN`)
    pub token: Option<String>,
    /// API root (`DISCOGS_API_URL`, default: "https://api.discogs.com")
    pub api_url: String,
    /// User-Agent override (`DISCOGS_USER_AGENT`)
    pub user_agent: Option<String>,
    /// Treat Discogs' placeholder artwork as missing (`DISCOGS_SKIP_PLACEHOLDER`).
    /// Presence of the variable enables it whatever the value, so
    /// `DISCOGS_SKIP_PLACEHOLDER=false` also turns it on.
    pub skip_placeholder: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            token: non_blank("DISCOGS_TOKEN"),
            api_url: non_blank("DISCOGS_API_URL").unwrap_or_else(|| DISCOGS_API_URL.to_string()),
            user_agent: non_blank("DISCOGS_USER_AGENT"),
            skip_placeholder: lookup("DISCOGS_SKIP_PLACEHOLDER").is_some(),
        }
    }

    /// The token to use, preferring an explicit value over the environment.
    pub fn token(&self, explicit: Option<&str>) -> Result<String, CoverError> {
        explicit
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or(self.token.as_deref())
            .map(str::to_string)
            .ok_or(CoverError::MissingCredential)
    }
}
