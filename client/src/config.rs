//! Client configuration
//!
//! Centralized configuration with environment variable support
//! and sensible defaults.

use std::env;
use std::time::Duration;

/// Default backend API root (FastAPI server with the `/api` router prefix)
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Default delay before the upload status label clears itself
pub const DEFAULT_STATUS_CLEAR_MS: u64 = 3000;

/// Document types the backend's document agent accepts
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "txt", "docx"];

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend API configuration
    pub api: ApiConfig,
    /// Upload behaviour configuration
    pub upload: UploadConfig,
}

/// Backend API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to (no trailing slash)
    pub base_url: String,
}

/// Upload configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// How long a settled upload's status label stays visible
    pub status_clear_delay: Duration,
    /// Lower-case file extensions accepted for upload
    pub allowed_extensions: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let base_url = env::var("MEDIFY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self {
            api: ApiConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
            },
            upload: UploadConfig {
                status_clear_delay: Duration::from_millis(
                    env::var("MEDIFY_STATUS_CLEAR_MS")
                        .ok()
                        .and_then(|ms| ms.parse().ok())
                        .unwrap_or(DEFAULT_STATUS_CLEAR_MS),
                ),
                allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            },
        }
    }

    /// Build a configuration pointing at the given backend URL
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.api.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Override the status self-clear delay
    pub fn with_status_clear_delay(mut self, delay: Duration) -> Self {
        self.upload.status_clear_delay = delay;
        self
    }

    /// Get the full URL of a backend endpoint
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults() {
        env::remove_var("MEDIFY_API_URL");
        env::remove_var("MEDIFY_STATUS_CLEAR_MS");

        let config = ClientConfig::from_env();
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.upload.status_clear_delay, Duration::from_secs(3));
        assert_eq!(config.upload.allowed_extensions, vec!["pdf", "txt", "docx"]);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        env::set_var("MEDIFY_API_URL", "http://medify.local:9000/api/");
        env::set_var("MEDIFY_STATUS_CLEAR_MS", "250");

        let config = ClientConfig::from_env();
        assert_eq!(config.api.base_url, "http://medify.local:9000/api");
        assert_eq!(config.upload.status_clear_delay, Duration::from_millis(250));

        env::set_var("MEDIFY_STATUS_CLEAR_MS", "soon");
        let config = ClientConfig::from_env();
        assert_eq!(config.upload.status_clear_delay, Duration::from_secs(3));

        env::remove_var("MEDIFY_API_URL");
        env::remove_var("MEDIFY_STATUS_CLEAR_MS");
    }

    #[test]
    #[serial]
    fn test_endpoint_joins_paths() {
        let config = ClientConfig::from_env().with_base_url("http://localhost:8000/api/");
        assert_eq!(config.endpoint("/agents"), "http://localhost:8000/api/agents");
        assert_eq!(
            config.endpoint("document/upload"),
            "http://localhost:8000/api/document/upload"
        );
    }
}
