//! Backend Configuration

/// Connection settings for the recharge REST backend
#[derive(Clone, Debug)]
pub struct BackendConfig {
    /// Base URL, e.g. `http://localhost:8080`
    pub base_url: String,

    /// Request timeout in seconds; bounds every busy indicator
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            timeout_secs: 10,
        }
    }
}

impl BackendConfig {
    pub fn from_env() -> Self {
        let base_url = std::env::var("MOBICOMM_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080".into());
        let timeout_secs = std::env::var("MOBICOMM_API_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(10);

        Self { base_url, timeout_secs }
    }
}
