//! Loading of the manifest, settings and sample documents files.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::ProvisionError;
use index_setup_shared::{IndexManifestEntry, IndexSettings, RawManifestEntry};

/// Why a manifest item could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryRejection {
    /// One or more required fields are absent or empty.
    MissingFields(Vec<&'static str>),
    /// The item is not an object, or a field has the wrong type.
    Malformed(String),
}

/// Read the manifest file. It must contain a JSON list.
///
/// Items are returned unparsed so that a bad item only skips itself.
pub fn load_manifest(path: &Path) -> Result<Vec<Value>, ProvisionError> {
    if !path.exists() {
        return Err(ProvisionError::manifest(format!(
            "manifest file not found: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content).map_err(|e| {
        ProvisionError::manifest(format!("{} is not valid JSON: {}", path.display(), e))
    })?;

    match value {
        Value::Array(items) => Ok(items),
        _ => Err(ProvisionError::manifest(format!(
            "{} must contain a list of index entries",
            path.display()
        ))),
    }
}

/// Turn one manifest item into a validated entry.
pub fn parse_entry(item: &Value) -> Result<IndexManifestEntry, EntryRejection> {
    let raw: RawManifestEntry = serde_json::from_value(item.clone())
        .map_err(|e| EntryRejection::Malformed(e.to_string()))?;

    raw.validate().map_err(EntryRejection::MissingFields)
}

/// Best-effort index name of a manifest item, for log messages.
pub fn entry_name(item: &Value) -> Option<String> {
    item.get("index_name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Read a settings file. It must contain a JSON object.
pub fn load_settings(path: &Path) -> Result<IndexSettings, ProvisionError> {
    let content = fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => Ok(IndexSettings::from(map)),
        Ok(_) => Err(ProvisionError::manifest(format!(
            "{} must contain a JSON object",
            path.display()
        ))),
        Err(e) => Err(ProvisionError::manifest(format!(
            "{} is not valid JSON: {}",
            path.display(),
            e
        ))),
    }
}

/// Read a sample documents file. It must contain a JSON list.
pub fn load_documents(path: &Path) -> Result<Vec<Value>, ProvisionError> {
    let content = fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Array(documents)) => Ok(documents),
        Ok(_) => Err(ProvisionError::manifest(format!(
            "{} must contain a list of documents",
            path.display()
        ))),
        Err(e) => Err(ProvisionError::manifest(format!(
            "{} is not valid JSON: {}",
            path.display(),
            e
        ))),
    }
}
