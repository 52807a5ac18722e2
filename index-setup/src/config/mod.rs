//! Configuration and dependency wiring.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{
    MeilisearchConfig, ProvisionConfig, DEFAULT_CONNECTION_ADDR, DEFAULT_DOCUMENTS_DIR,
    DEFAULT_MANIFEST_PATH, DEFAULT_SETTINGS_DIR,
};
