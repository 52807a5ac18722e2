//! # Index Setup
//!
//! Main library for the Meilisearch index setup tools.
//!
//! This crate provides the configuration, manifest loading and the
//! provisioning driver used by the `setup-indexes` binary, plus the stats
//! rendering used by `index-stats`.

pub mod config;
pub mod manifest;
pub mod provisioner;
pub mod reporter;
pub mod telemetry;

pub use config::{Dependencies, MeilisearchConfig, ProvisionConfig};
pub use provisioner::{EntryIssue, IssueReason, ProvisionReport, Provisioner};

use thiserror::Error;

/// Errors that abort a provisioning run.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The search service did not answer its health probe.
    #[error("Health check failed: {0}")]
    HealthCheckFailed(index_setup_repository::SetupError),

    /// The manifest is missing or malformed.
    #[error("Manifest error: {0}")]
    ManifestError(String),

    /// Search service error.
    #[error("Setup error: {0}")]
    Setup(#[from] index_setup_repository::SetupError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProvisionError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a manifest error.
    pub fn manifest(msg: impl Into<String>) -> Self {
        Self::ManifestError(msg.into())
    }
}
