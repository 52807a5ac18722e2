//! Index settings documents.
//!
//! A settings document maps a settings category name (as the search service
//! names it, e.g. `searchableAttributes`) to the value for that category. The
//! document is forwarded as-is; values are not validated locally.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Settings category names recognized by the search service.
pub mod category {
    pub const SEARCHABLE_ATTRIBUTES: &str = "searchableAttributes";
    pub const DISPLAYED_ATTRIBUTES: &str = "displayedAttributes";
    pub const FILTERABLE_ATTRIBUTES: &str = "filterableAttributes";
    pub const SORTABLE_ATTRIBUTES: &str = "sortableAttributes";
    pub const RANKING_RULES: &str = "rankingRules";
    pub const STOP_WORDS: &str = "stopWords";
    pub const SYNONYMS: &str = "synonyms";
}

/// A settings document keyed by category name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexSettings(Map<String, Value>);

impl IndexSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a category value, replacing any previous value.
    pub fn with(mut self, category: impl Into<String>, value: Value) -> Self {
        self.0.insert(category.into(), value);
        self
    }

    /// Set a category value in place.
    pub fn insert(&mut self, category: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(category.into(), value)
    }

    /// Merge another document into this one. Categories present in `other` win.
    pub fn merge(&mut self, other: &IndexSettings) {
        for (category, value) in &other.0 {
            self.0.insert(category.clone(), value.clone());
        }
    }

    pub fn get(&self, category: &str) -> Option<&Value> {
        self.0.get(category)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for IndexSettings {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<SettingsUpdate> for IndexSettings {
    fn from(update: SettingsUpdate) -> Self {
        IndexSettings::new().with(update.category(), update.to_value())
    }
}

/// An update scoped to a single settings category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsUpdate {
    SearchableAttributes(Vec<String>),
    DisplayedAttributes(Vec<String>),
    FilterableAttributes(Vec<String>),
    SortableAttributes(Vec<String>),
    RankingRules(Vec<String>),
    StopWords(Vec<String>),
    Synonyms(BTreeMap<String, Vec<String>>),
}

impl SettingsUpdate {
    /// The category name this update targets.
    pub fn category(&self) -> &'static str {
        match self {
            Self::SearchableAttributes(_) => category::SEARCHABLE_ATTRIBUTES,
            Self::DisplayedAttributes(_) => category::DISPLAYED_ATTRIBUTES,
            Self::FilterableAttributes(_) => category::FILTERABLE_ATTRIBUTES,
            Self::SortableAttributes(_) => category::SORTABLE_ATTRIBUTES,
            Self::RankingRules(_) => category::RANKING_RULES,
            Self::StopWords(_) => category::STOP_WORDS,
            Self::Synonyms(_) => category::SYNONYMS,
        }
    }

    /// The category value as JSON.
    pub fn to_value(&self) -> Value {
        match self {
            Self::SearchableAttributes(values)
            | Self::DisplayedAttributes(values)
            | Self::FilterableAttributes(values)
            | Self::SortableAttributes(values)
            | Self::RankingRules(values)
            | Self::StopWords(values) => Value::from(values.clone()),
            Self::Synonyms(synonyms) => Value::Object(
                synonyms
                    .iter()
                    .map(|(word, alternatives)| (word.clone(), Value::from(alternatives.clone())))
                    .collect(),
            ),
        }
    }
}
