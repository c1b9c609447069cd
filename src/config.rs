use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api_url: String,
    /// Zero disables the client-side timeout.
    pub request_timeout_secs: u64,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let request_timeout_secs = match std::env::var("KANBAN_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse().map_err(|e| {
                anyhow::anyhow!("KANBAN_REQUEST_TIMEOUT_SECS must be a whole number of seconds: {e}")
            })?,
            Err(_) => 0,
        };

        Ok(Self {
            api_url: std::env::var("KANBAN_API_URL")
                .unwrap_or_else(|_| "http://localhost:5000/api/v1".into()),
            request_timeout_secs,
            email: non_empty_var("KANBAN_EMAIL"),
            password: non_empty_var("KANBAN_PASSWORD"),
        })
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000/api/v1".into(),
            request_timeout_secs: 0,
            email: None,
            password: None,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
