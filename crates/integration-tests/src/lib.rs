//! Integration tests for SoftBenny.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p softbenny-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `purchase_history` - Account and purchase scenarios across restarts
//! - `persistence` - On-disk layout, corruption and cart lifetime
//!
//! Every test runs against a [`FileStore`] in its own temporary directory;
//! "restarting" the storefront means dropping it and opening the same
//! directory again.

use std::path::Path;

use secrecy::SecretString;
use tempfile::TempDir;

use softbenny_storefront::storage::FileStore;
use softbenny_storefront::{SessionPolicy, Storefront, StorefrontConfig};

/// A temporary data directory plus the config pointing at it.
pub struct TestContext {
    dir: TempDir,
    pub config: StorefrontConfig,
}

impl TestContext {
    /// Create a context with an empty data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let config = StorefrontConfig {
            data_dir: dir.path().to_path_buf(),
            ..StorefrontConfig::default()
        };
        Self { dir, config }
    }

    /// Same as [`TestContext::new`] with a different session policy.
    #[must_use]
    pub fn with_policy(policy: SessionPolicy) -> Self {
        let mut ctx = Self::new();
        ctx.config.session_policy = policy;
        ctx
    }

    /// The data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Open (or reopen) the storefront over the data directory.
    ///
    /// # Errors
    ///
    /// Returns whatever [`Storefront::open`] returns.
    pub fn open(&self) -> softbenny_storefront::Result<Storefront<FileStore>> {
        Storefront::open(self.config.clone())
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for a password secret.
#[must_use]
pub fn secret(password: &str) -> SecretString {
    SecretString::from(password)
}
