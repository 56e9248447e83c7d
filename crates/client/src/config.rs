//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TRIPNEST_API_BASE_URL` - Root URL of the marketplace API (e.g., `https://api.tripnest.lk`)
//! - `CLOUDINARY_CLOUD_NAME` - Image host cloud name
//! - `CLOUDINARY_UPLOAD_PRESET` - Unsigned upload preset
//!
//! ## Optional
//! - `CLOUDINARY_UPLOAD_URL` - Image host API root (default: `https://api.cloudinary.com`)
//! - `TRIPNEST_TRANSITION_DELAY_MS` - Wizard step animation delay (default: 300)
//! - `TRIPNEST_REDIRECT_DELAY_MS` - Delay before leaving a completed wizard (default: 2000)
//! - `TRIPNEST_STORE_PATH` - Local key-value store file (default: `.tripnest/store.json`)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_UPLOAD_URL: &str = "https://api.cloudinary.com";
const DEFAULT_TRANSITION_DELAY_MS: u64 = 300;
const DEFAULT_REDIRECT_DELAY_MS: u64 = 2000;
const DEFAULT_STORE_PATH: &str = ".tripnest/store.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Marketplace API root, without trailing slash
    pub api_base_url: String,
    /// Image host configuration
    pub image_host: ImageHostConfig,
    /// Wizard step animation delay
    pub transition_delay: Duration,
    /// Delay between completing a wizard and leaving it
    pub redirect_delay: Duration,
    /// Path of the file-backed key-value store
    pub store_path: PathBuf,
}

/// Image host (Cloudinary) configuration.
///
/// Implements `Debug` manually to redact the upload preset, which grants
/// unsigned upload rights to anyone who holds it.
#[derive(Clone)]
pub struct ImageHostConfig {
    /// API root, without trailing slash
    pub upload_url: String,
    /// Cloud name (first path segment of the upload endpoint)
    pub cloud_name: String,
    /// Unsigned upload preset
    pub upload_preset: SecretString,
}

impl std::fmt::Debug for ImageHostConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHostConfig")
            .field("upload_url", &self.upload_url)
            .field("cloud_name", &self.cloud_name)
            .field("upload_preset", &"[REDACTED]")
            .finish()
    }
}

impl ImageHostConfig {
    /// Full image upload endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/v1_1/{}/image/upload", self.upload_url, self.cloud_name)
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = get_url(&lookup, "TRIPNEST_API_BASE_URL", None)?;
        let image_host = ImageHostConfig {
            upload_url: get_url(&lookup, "CLOUDINARY_UPLOAD_URL", Some(DEFAULT_UPLOAD_URL))?,
            cloud_name: get_required(&lookup, "CLOUDINARY_CLOUD_NAME")?,
            upload_preset: SecretString::from(get_required(&lookup, "CLOUDINARY_UPLOAD_PRESET")?),
        };
        let transition_delay =
            get_millis(&lookup, "TRIPNEST_TRANSITION_DELAY_MS", DEFAULT_TRANSITION_DELAY_MS)?;
        let redirect_delay =
            get_millis(&lookup, "TRIPNEST_REDIRECT_DELAY_MS", DEFAULT_REDIRECT_DELAY_MS)?;
        let store_path = store_path_from_lookup(&lookup);

        Ok(Self {
            api_base_url,
            image_host,
            transition_delay,
            redirect_delay,
            store_path,
        })
    }
}

/// Local store location from `TRIPNEST_STORE_PATH`, without requiring the
/// network settings. Commands that only touch the local store use this.
#[must_use]
pub fn store_path_from_env() -> PathBuf {
    let _ = dotenvy::dotenv();
    store_path_from_lookup(&|key: &str| std::env::var(key).ok())
}

/// Local store location through an arbitrary variable lookup.
#[must_use]
pub fn store_path_from_lookup<F>(lookup: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup("TRIPNEST_STORE_PATH")
        .filter(|s| !s.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_STORE_PATH), PathBuf::from)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required, non-blank variable.
fn get_required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an absolute http(s) URL, trimmed of its trailing slash.
fn get_url<F>(lookup: &F, key: &str, default: Option<&str>) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = match (lookup(key), default) {
        (Some(value), _) => value,
        (None, Some(default)) => default.to_string(),
        (None, None) => return Err(ConfigError::MissingEnvVar(key.to_string())),
    };

    let parsed = url::Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }

    Ok(raw.trim().trim_end_matches('/').to_string())
}

/// Get a millisecond duration with a default.
fn get_millis<F>(lookup: &F, key: &str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let millis = match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?,
        None => default,
    };
    Ok(Duration::from_millis(millis))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("TRIPNEST_API_BASE_URL", "https://api.tripnest.lk/"),
            ("CLOUDINARY_CLOUD_NAME", "tripnest"),
            ("CLOUDINARY_UPLOAD_PRESET", "provider_unsigned"),
        ]
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&minimal())).unwrap();

        assert_eq!(config.api_base_url, "https://api.tripnest.lk");
        assert_eq!(config.image_host.upload_url, DEFAULT_UPLOAD_URL);
        assert_eq!(config.transition_delay, Duration::from_millis(300));
        assert_eq!(config.redirect_delay, Duration::from_millis(2000));
        assert_eq!(config.store_path, PathBuf::from(DEFAULT_STORE_PATH));
        assert_eq!(
            config.image_host.upload_preset.expose_secret(),
            "provider_unsigned"
        );
    }

    #[test]
    fn test_store_path_needs_no_network_settings() {
        assert_eq!(
            store_path_from_lookup(&lookup_from(&[])),
            PathBuf::from(DEFAULT_STORE_PATH)
        );
        assert_eq!(
            store_path_from_lookup(&lookup_from(&[("TRIPNEST_STORE_PATH", "/tmp/tp.json")])),
            PathBuf::from("/tmp/tp.json")
        );
        assert_eq!(
            store_path_from_lookup(&lookup_from(&[("TRIPNEST_STORE_PATH", "  ")])),
            PathBuf::from(DEFAULT_STORE_PATH)
        );
    }

    #[test]
    fn test_image_endpoint() {
        let config = ClientConfig::from_lookup(lookup_from(&minimal())).unwrap();
        assert_eq!(
            config.image_host.endpoint(),
            "https://api.cloudinary.com/v1_1/tripnest/image/upload"
        );
    }

    #[test]
    fn test_missing_required_variable() {
        let mut vars = minimal();
        vars.retain(|(k, _)| *k != "CLOUDINARY_CLOUD_NAME");
        let err = ClientConfig::from_lookup(lookup_from(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "CLOUDINARY_CLOUD_NAME"));
    }

    #[test]
    fn test_blank_required_variable_counts_as_missing() {
        let vars = [
            ("TRIPNEST_API_BASE_URL", "https://api.tripnest.lk"),
            ("CLOUDINARY_CLOUD_NAME", "tripnest"),
            ("CLOUDINARY_UPLOAD_PRESET", "   "),
        ];
        let err = ClientConfig::from_lookup(lookup_from(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn test_invalid_base_url() {
        let mut vars = minimal();
        vars[0] = ("TRIPNEST_API_BASE_URL", "ftp://api.tripnest.lk");
        let err = ClientConfig::from_lookup(lookup_from(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_invalid_delay() {
        let mut vars = minimal();
        vars.push(("TRIPNEST_TRANSITION_DELAY_MS", "fast"));
        let err = ClientConfig::from_lookup(lookup_from(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "TRIPNEST_TRANSITION_DELAY_MS"));
    }

    #[test]
    fn test_image_host_config_debug_redacts_preset() {
        let config = ImageHostConfig {
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            cloud_name: "tripnest".to_string(),
            upload_preset: SecretString::from("super_secret_preset"),
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("tripnest"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_preset"));
    }
}
