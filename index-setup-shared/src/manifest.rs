//! Index manifest entries.
//!
//! The manifest is a JSON list where every item names an index, its primary
//! key and the settings file to apply to it.

use serde::{Deserialize, Serialize};

/// A manifest item exactly as it appears on disk.
///
/// All fields are optional at this stage; use [`RawManifestEntry::validate`]
/// to turn it into a usable [`IndexManifestEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawManifestEntry {
    /// Name (uid) of the index.
    pub index_name: Option<String>,
    /// Primary key of the index.
    pub pid: Option<String>,
    /// Settings file name, relative to the settings directory.
    pub setting_file: Option<String>,
    /// Optional sample documents file, relative to the documents directory.
    #[serde(default)]
    pub documents_file: Option<String>,
}

/// A validated manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexManifestEntry {
    pub index_name: String,
    pub primary_key: String,
    pub settings_file: String,
    pub documents_file: Option<String>,
}

impl IndexManifestEntry {
    /// Create an entry without sample documents.
    pub fn new(
        index_name: impl Into<String>,
        primary_key: impl Into<String>,
        settings_file: impl Into<String>,
    ) -> Self {
        Self {
            index_name: index_name.into(),
            primary_key: primary_key.into(),
            settings_file: settings_file.into(),
            documents_file: None,
        }
    }
}

impl RawManifestEntry {
    /// Check that the required fields are present and non-empty.
    ///
    /// Returns the names of the missing fields (using their on-disk keys) when
    /// the entry is incomplete.
    pub fn validate(self) -> Result<IndexManifestEntry, Vec<&'static str>> {
        let index_name = non_empty(self.index_name);
        let primary_key = non_empty(self.pid);
        let settings_file = non_empty(self.setting_file);

        match (index_name, primary_key, settings_file) {
            (Some(index_name), Some(primary_key), Some(settings_file)) => Ok(IndexManifestEntry {
                index_name,
                primary_key,
                settings_file,
                documents_file: non_empty(self.documents_file),
            }),
            (index_name, primary_key, settings_file) => {
                let mut missing = Vec::new();
                if index_name.is_none() {
                    missing.push("index_name");
                }
                if primary_key.is_none() {
                    missing.push("pid");
                }
                if settings_file.is_none() {
                    missing.push("setting_file");
                }
                Err(missing)
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
