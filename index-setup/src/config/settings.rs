//! Connection and path settings.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::ProvisionError;

/// Default Meilisearch URL.
pub const DEFAULT_CONNECTION_ADDR: &str = "http://localhost:7700";

/// Default manifest location, relative to the working directory.
pub const DEFAULT_MANIFEST_PATH: &str = "indexes.json";

/// Default directory holding the settings files named by the manifest.
pub const DEFAULT_SETTINGS_DIR: &str = "settings";

/// Default directory holding the sample documents files named by the manifest.
pub const DEFAULT_DOCUMENTS_DIR: &str = "documents";

/// Connection settings for the Meilisearch server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeilisearchConfig {
    pub connection_addr: String,
    pub master_key: Option<String>,
    /// Task polling interval; `None` keeps the SDK default.
    pub task_interval: Option<Duration>,
    /// Task wait timeout; `None` keeps the SDK default.
    pub task_timeout: Option<Duration>,
}

impl Default for MeilisearchConfig {
    fn default() -> Self {
        Self {
            connection_addr: DEFAULT_CONNECTION_ADDR.to_string(),
            master_key: None,
            task_interval: None,
            task_timeout: None,
        }
    }
}

impl MeilisearchConfig {
    /// Read the settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MEILI_CONNECTION_ADDR`: server URL (default: http://localhost:7700)
    /// - `MEILI_MASTER_KEY`: API key (default: none, unauthenticated)
    /// - `MEILI_TASK_INTERVAL_MS`: task polling interval in milliseconds
    /// - `MEILI_TASK_TIMEOUT_SECS`: task wait timeout in seconds
    pub fn from_env() -> Result<Self, ProvisionError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProvisionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let connection_addr = lookup("MEILI_CONNECTION_ADDR")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_CONNECTION_ADDR.to_string());
        let master_key = lookup("MEILI_MASTER_KEY").filter(|v| !v.is_empty());

        let task_interval =
            parse_number(&lookup, "MEILI_TASK_INTERVAL_MS")?.map(Duration::from_millis);
        let task_timeout =
            parse_number(&lookup, "MEILI_TASK_TIMEOUT_SECS")?.map(Duration::from_secs);

        Ok(Self {
            connection_addr,
            master_key,
            task_interval,
            task_timeout,
        })
    }
}

fn parse_number<F>(lookup: &F, key: &str) -> Result<Option<u64>, ProvisionError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ProvisionError::config(format!("{} must be a number: {}", key, e))),
    }
}

/// Where the provisioning driver finds its input files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionConfig {
    pub manifest_path: PathBuf,
    pub settings_dir: PathBuf,
    pub documents_dir: PathBuf,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            settings_dir: PathBuf::from(DEFAULT_SETTINGS_DIR),
            documents_dir: PathBuf::from(DEFAULT_DOCUMENTS_DIR),
        }
    }
}

impl ProvisionConfig {
    /// Resolve every path against `root`.
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let defaults = Self::default();
        Self {
            manifest_path: root.join(defaults.manifest_path),
            settings_dir: root.join(defaults.settings_dir),
            documents_dir: root.join(defaults.documents_dir),
        }
    }
}
