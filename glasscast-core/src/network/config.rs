use std::time::Duration;

/// Default per-request timeout for both backends.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const WEATHER_API_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// Immutable description of one backend: where it lives, which headers every
/// call carries, and how long a call may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    base_url: String,
    headers: Vec<(String, String)>,
    timeout: Duration,
}

impl EndpointConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            headers: Vec::new(),
            timeout,
        }
    }

    /// Adds a header sent with every call to this backend.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// weatherapi.com; the API key travels as a query parameter, not a header.
    pub fn weather_api() -> Self {
        Self::new(WEATHER_API_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Supabase project: the anon key is sent both as `apikey` and as the
    /// default bearer token. Per-call `Authorization` headers replace the latter.
    pub fn supabase(project_url: impl Into<String>, anon_key: &str) -> Self {
        Self::new(project_url, DEFAULT_TIMEOUT)
            .with_header("apikey", anon_key)
            .with_header("Authorization", format!("Bearer {anon_key}"))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
