use crate::error::ExitError;

/// Environment variable holding the v3 API key.
pub const API_KEY_ENV: &str = "SENDINBLUE_API_KEY";
/// Optional override of the API base URL.
pub const API_URL_ENV: &str = "SENDINBLUE_API_URL";
pub const DEFAULT_API_URL: &str = "https://api.sendinblue.com/v3";

/// Connection settings for the template API.
///
/// Read once when an operation starts and handed to the client, so nothing
/// below `main` looks at the process environment.
#[derive(Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ExitError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ExitError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ExitError::Config(format!("{API_KEY_ENV} env var must be set")))?;

        let base_url = lookup(API_URL_ENV)
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ExitError::Config(format!(
                "{API_URL_ENV} must be an http(s) URL, got {base_url:?}"
            )));
        }

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}
