/// Client configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the backend, with the `/api` prefix already joined.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let origin =
            std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".into());
        let request_timeout_secs = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);
        Ok(Self {
            api_base_url: format!("{}/api", origin.trim_end_matches('/')),
            request_timeout_secs,
        })
    }
}
