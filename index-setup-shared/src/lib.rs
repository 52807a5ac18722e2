//! # Index Setup Shared
//!
//! Plain data types shared by the index setup crates: manifest entries,
//! settings documents, per-category settings updates and index statistics.

pub mod manifest;
pub mod settings;
pub mod stats;

pub use manifest::{IndexManifestEntry, RawManifestEntry};
pub use settings::{IndexSettings, SettingsUpdate};
pub use stats::IndexStats;
