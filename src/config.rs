//! Configuration for the background removal client
//!
//! The service credential is never hardcoded: it is resolved from an
//! explicit value, the `CUTOUT_API_KEY` environment variable, or a user
//! config file, in that order.

use crate::error::{CutoutError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default background removal service endpoint (remove.bg v1.0)
pub const DEFAULT_ENDPOINT: &str = "https://api.remove.bg/v1.0/removebg";

/// Environment variable consulted for the service credential
pub const API_KEY_ENV_VAR: &str = "CUTOUT_API_KEY";

/// Multipart form field carrying the image bytes
pub const IMAGE_FIELD: &str = "image_file";

/// HTTP header carrying the service credential
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Configuration for the background removal service client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service credential sent in the `X-Api-Key` header
    pub api_key: String,
    /// Service endpoint URL
    pub endpoint: String,
    /// Optional request timeout. `None` lets a request run to completion
    /// or network-level failure, matching single-attempt semantics.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    api_key: Option<String>,
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service credential explicitly
    #[must_use]
    pub fn api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the service endpoint URL
    #[must_use]
    pub fn endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set a request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the configuration, resolving the credential if not set explicitly
    ///
    /// # Errors
    /// Returns `CutoutError::InvalidConfig` when no credential can be
    /// resolved or the endpoint is not an HTTP(S) URL.
    pub fn build(self) -> Result<ClientConfig> {
        let api_key = resolve_api_key(self.api_key)?;
        let endpoint = self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        validate_endpoint(&endpoint)?;

        Ok(ClientConfig {
            api_key,
            endpoint,
            timeout: self.timeout,
        })
    }
}

/// Validate that an endpoint is a plausible HTTP(S) URL
fn validate_endpoint(endpoint: &str) -> Result<()> {
    if endpoint.starts_with("https://") || endpoint.starts_with("http://") {
        Ok(())
    } else {
        Err(CutoutError::invalid_config(format!(
            "Invalid service endpoint '{}': expected an http:// or https:// URL",
            endpoint
        )))
    }
}

/// Persisted user configuration (`<config_dir>/cutout/config.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    /// Service credential
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Service endpoint override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl FileConfig {
    /// Default location of the user config file
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cutout").join("config.json"))
    }

    /// Load the config file if it exists; a missing file is not an error
    ///
    /// # Errors
    /// Returns `CutoutError::Io` for unreadable files and
    /// `CutoutError::Internal` for unparseable contents.
    pub fn load() -> Result<Option<Self>> {
        let Some(path) = Self::default_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .map_err(|e| CutoutError::file_io_error("read config file", &path, &e))?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            CutoutError::internal(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        log::debug!("Loaded config file from {}", path.display());
        Ok(Some(config))
    }
}

/// Resolve the service credential from explicit value, environment, or file
fn resolve_api_key(explicit: Option<String>) -> Result<String> {
    let env_value = std::env::var(API_KEY_ENV_VAR).ok();
    let file_value = FileConfig::load()
        .unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable config file: {}", e);
            None
        })
        .and_then(|config| config.api_key);

    resolve_api_key_from(explicit, env_value, file_value)
}

/// Pure resolution order: explicit > environment > config file
fn resolve_api_key_from(
    explicit: Option<String>,
    env_value: Option<String>,
    file_value: Option<String>,
) -> Result<String> {
    explicit
        .or(env_value)
        .or(file_value)
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            CutoutError::invalid_config(format!(
                "No API key configured. Pass one explicitly, set {}, or add \"api_key\" to the config file.",
                API_KEY_ENV_VAR
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_with_explicit_key() {
        let config = ClientConfig::builder()
            .api_key("test-key")
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap();

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_builder_endpoint_override() {
        let config = ClientConfig::builder()
            .api_key("test-key")
            .endpoint("http://localhost:9000/removebg")
            .build()
            .unwrap();

        assert_eq!(config.endpoint, "http://localhost:9000/removebg");
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_builder_rejects_bad_endpoint() {
        let result = ClientConfig::builder()
            .api_key("test-key")
            .endpoint("ftp://example.com/removebg")
            .build();

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid service endpoint"));
    }

    #[test]
    fn test_resolution_order() {
        let key = resolve_api_key_from(
            Some("explicit".to_string()),
            Some("env".to_string()),
            Some("file".to_string()),
        )
        .unwrap();
        assert_eq!(key, "explicit");

        let key =
            resolve_api_key_from(None, Some("env".to_string()), Some("file".to_string())).unwrap();
        assert_eq!(key, "env");

        let key = resolve_api_key_from(None, None, Some("file".to_string())).unwrap();
        assert_eq!(key, "file");
    }

    #[test]
    fn test_resolution_rejects_missing_or_blank_key() {
        let result = resolve_api_key_from(None, None, None);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("No API key"));

        let result = resolve_api_key_from(Some("   ".to_string()), None, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_file_config_round_trip() {
        let config = FileConfig {
            api_key: Some("file-key".to_string()),
            endpoint: None,
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("endpoint"));

        let parsed: FileConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.api_key.as_deref(), Some("file-key"));
        assert!(parsed.endpoint.is_none());
    }
}
