//! # CLI Configuration
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults (`certichain.json`, `certichain.key` in the working
//!    directory).
//! 2. The YAML file named by `--config`.
//! 3. `CERTICHAIN_STORE` / `CERTICHAIN_KEYPAIR` environment variables.
//! 4. `--store` / `--keypair` flags.
//!
//! ```yaml
//! store_path: /var/lib/certichain/registry.json
//! keypair_path: ~/.certichain/admin.key
//! registry:
//!   reputation_per_certificate: 10
//!   limits:
//!     course_name: 128
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use certichain_registry::RegistryConfig;

/// Environment variable overriding the store path.
pub const STORE_ENV: &str = "CERTICHAIN_STORE";
/// Environment variable overriding the keypair path.
pub const KEYPAIR_ENV: &str = "CERTICHAIN_KEYPAIR";

const DEFAULT_STORE: &str = "certichain.json";
const DEFAULT_KEYPAIR: &str = "certichain.key";

/// Contents of the YAML config file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub store_path: Option<PathBuf>,
    pub keypair_path: Option<PathBuf>,
    pub registry: RegistryConfig,
}

impl FileConfig {
    /// Read and parse the config file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub store_path: PathBuf,
    pub keypair_path: PathBuf,
    pub registry: RegistryConfig,
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn resolve(
        config: Option<&Path>,
        store_flag: Option<PathBuf>,
        keypair_flag: Option<PathBuf>,
    ) -> Result<Self> {
        let file = match config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::layer(file, |name| std::env::var_os(name).map(PathBuf::from), store_flag, keypair_flag))
    }

    /// Layer `env` and the flags over `file`.
    pub fn layer(
        file: FileConfig,
        env: impl Fn(&str) -> Option<PathBuf>,
        store_flag: Option<PathBuf>,
        keypair_flag: Option<PathBuf>,
    ) -> Self {
        let store_path = store_flag
            .or_else(|| env(STORE_ENV))
            .or(file.store_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE));
        let keypair_path = keypair_flag
            .or_else(|| env(KEYPAIR_ENV))
            .or(file.keypair_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_KEYPAIR));
        tracing::debug!(
            store = %store_path.display(),
            keypair = %keypair_path.display(),
            "resolved settings"
        );
        Self {
            store_path,
            keypair_path,
            registry: file.registry,
        }
    }
}
