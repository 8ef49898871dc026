//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SOFTBENNY_DATA_DIR` - Directory for persisted data (default: .softbenny)
//! - `SOFTBENNY_CATALOG` - Product catalog JSON file (default: bundled catalog)
//! - `SOFTBENNY_SESSION_POLICY` - `trust` or `revalidate` (default: trust)
//! - `SOFTBENNY_STORE_NAME` - Name printed on receipts (default: SoftBenny)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_DATA_DIR: &str = ".softbenny";
const DEFAULT_STORE_NAME: &str = "SoftBenny";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// How a session pointer found in storage at startup is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPolicy {
    /// Use the stored user as-is.
    #[default]
    Trust,
    /// Drop the pointer if its user is no longer registered.
    Revalidate,
}

impl FromStr for SessionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trust" => Ok(Self::Trust),
            "revalidate" => Ok(Self::Revalidate),
            other => Err(format!("expected 'trust' or 'revalidate', got '{other}'")),
        }
    }
}

impl fmt::Display for SessionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Trust => "trust",
            Self::Revalidate => "revalidate",
        })
    }
}

/// Storefront application configuration.
///
/// Implements `Debug` manually to redact the Sentry DSN.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// Directory holding the persisted key-value data
    pub data_dir: PathBuf,
    /// Catalog file; `None` uses the bundled catalog
    pub catalog_path: Option<PathBuf>,
    /// Treatment of a restored session pointer
    pub session_policy: SessionPolicy,
    /// Name printed on receipts
    pub store_name: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<SecretString>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("data_dir", &self.data_dir)
            .field("catalog_path", &self.catalog_path)
            .field("session_policy", &self.session_policy)
            .field("store_name", &self.store_name)
            .field(
                "sentry_dsn",
                &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"),
            )
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            catalog_path: None,
            session_policy: SessionPolicy::default(),
            store_name: DEFAULT_STORE_NAME.to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = PathBuf::from(get_env_or_default(
            &lookup,
            "SOFTBENNY_DATA_DIR",
            DEFAULT_DATA_DIR,
        ));
        let catalog_path = get_optional_env(&lookup, "SOFTBENNY_CATALOG").map(PathBuf::from);
        let session_policy = get_env_or_default(&lookup, "SOFTBENNY_SESSION_POLICY", "trust")
            .parse::<SessionPolicy>()
            .map_err(|e| ConfigError::InvalidEnvVar("SOFTBENNY_SESSION_POLICY".to_string(), e))?;
        let store_name = get_env_or_default(&lookup, "SOFTBENNY_STORE_NAME", DEFAULT_STORE_NAME);
        if store_name.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "SOFTBENNY_STORE_NAME".to_string(),
                "must not be blank".to_string(),
            ));
        }

        let sentry_dsn = get_optional_env(&lookup, "SENTRY_DSN").map(SecretString::from);
        let sentry_environment = get_optional_env(&lookup, "SENTRY_ENVIRONMENT");

        Ok(Self {
            data_dir,
            catalog_path,
            session_policy,
            store_name,
            sentry_dsn,
            sentry_environment,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> String {
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".softbenny"));
        assert!(config.catalog_path.is_none());
        assert_eq!(config.session_policy, SessionPolicy::Trust);
        assert_eq!(config.store_name, "SoftBenny");
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SOFTBENNY_DATA_DIR", "/tmp/sb"),
            ("SOFTBENNY_CATALOG", "catalog.json"),
            ("SOFTBENNY_SESSION_POLICY", "Revalidate"),
            ("SOFTBENNY_STORE_NAME", "Benny's"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
        ])
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/sb"));
        assert_eq!(config.catalog_path, Some(PathBuf::from("catalog.json")));
        assert_eq!(config.session_policy, SessionPolicy::Revalidate);
        assert_eq!(config.store_name, "Benny's");
        assert_eq!(
            config.sentry_dsn.unwrap().expose_secret(),
            "https://key@sentry.example/1"
        );
    }

    #[test]
    fn test_invalid_session_policy() {
        let err = load(&[("SOFTBENNY_SESSION_POLICY", "sometimes")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "SOFTBENNY_SESSION_POLICY"));
    }

    #[test]
    fn test_blank_store_name_is_rejected() {
        assert!(load(&[("SOFTBENNY_STORE_NAME", "   ")]).is_err());
    }

    #[test]
    fn test_debug_redacts_dsn() {
        let config = load(&[("SENTRY_DSN", "https://key@sentry.example/1")]).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("key@sentry"));
        assert!(debug.contains("[REDACTED]"));
    }
}
