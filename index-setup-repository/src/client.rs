//! Index setup client implementation.
//!
//! This module provides the main client for provisioning the search service.
//! It is the single entry point for every administrative call: application
//! code uses it to check health, create and delete indexes, push settings,
//! load documents and read statistics.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::config::SetupClientConfig;
use crate::errors::SetupError;
use crate::interfaces::SearchAdminProvider;
use crate::types::CreateOutcome;
use index_setup_shared::{IndexSettings, IndexStats, SettingsUpdate};

/// The main client for provisioning indexes.
///
/// Every call logs its outcome and returns a tagged `SetupError` on failure;
/// callers decide whether a failure is fatal.
pub struct IndexSetupClient {
    provider: Box<dyn SearchAdminProvider>,
    config: SetupClientConfig,
}

impl IndexSetupClient {
    /// Create a new IndexSetupClient with default configuration.
    pub fn new(provider: Box<dyn SearchAdminProvider>) -> Self {
        Self {
            provider,
            config: SetupClientConfig::default(),
        }
    }

    /// Create a new IndexSetupClient with custom configuration.
    pub fn with_config(provider: Box<dyn SearchAdminProvider>, config: SetupClientConfig) -> Self {
        Self { provider, config }
    }

    fn validate_index_name(index_name: &str) -> Result<(), SetupError> {
        if index_name.is_empty() {
            return Err(SetupError::validation("index name is required"));
        }
        Ok(())
    }

    /// Check that the search service is reachable.
    ///
    /// No retries: a failure here is meant to end the calling workflow.
    pub async fn health_check(&self) -> Result<(), SetupError> {
        match self.provider.health().await {
            Ok(status) => {
                info!(status = %status, "Meilisearch server status");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Health check failed");
                Err(e)
            }
        }
    }

    /// Create an index unless it already exists.
    ///
    /// The index is looked up first; an existing index is left untouched and
    /// reported as `CreateOutcome::AlreadyExists`.
    #[instrument(skip(self))]
    pub async fn create_index(
        &self,
        index_name: &str,
        primary_key: Option<&str>,
    ) -> Result<CreateOutcome, SetupError> {
        Self::validate_index_name(index_name)?;

        match self.provider.get_index(index_name).await {
            Ok(_) => {
                info!(index = %index_name, "Index already exists");
                return Ok(CreateOutcome::AlreadyExists);
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => {
                error!(index = %index_name, error = %e, "Index lookup failed");
                return Err(e);
            }
        }

        match self.provider.create_index(index_name, primary_key).await {
            Ok(task_uid) => {
                info!(index = %index_name, task_uid, "Index created");
                Ok(CreateOutcome::Created(task_uid))
            }
            Err(e) => {
                error!(index = %index_name, error = %e, "Index creation failed");
                Err(e)
            }
        }
    }

    /// Push a whole settings document to an index.
    #[instrument(skip(self, settings))]
    pub async fn update_config(
        &self,
        index_name: &str,
        settings: &IndexSettings,
    ) -> Result<(), SetupError> {
        Self::validate_index_name(index_name)?;

        match self.provider.update_settings(index_name, settings).await {
            Ok(task_uid) => {
                info!(
                    index = %index_name,
                    task_uid,
                    categories = settings.len(),
                    "Index settings updated"
                );
                Ok(())
            }
            Err(e) => {
                error!(index = %index_name, error = %e, "Settings update failed");
                Err(e)
            }
        }
    }

    /// Set the attributes searched by queries.
    pub async fn configure_searchable_attributes(
        &self,
        index_name: &str,
        attributes: Vec<String>,
    ) -> Result<(), SetupError> {
        self.configure(index_name, SettingsUpdate::SearchableAttributes(attributes))
            .await
    }

    /// Set the attributes returned in search hits.
    pub async fn configure_displayed_attributes(
        &self,
        index_name: &str,
        attributes: Vec<String>,
    ) -> Result<(), SetupError> {
        self.configure(index_name, SettingsUpdate::DisplayedAttributes(attributes))
            .await
    }

    /// Set the attributes usable in filters.
    pub async fn configure_filterable_attributes(
        &self,
        index_name: &str,
        attributes: Vec<String>,
    ) -> Result<(), SetupError> {
        self.configure(index_name, SettingsUpdate::FilterableAttributes(attributes))
            .await
    }

    /// Set the attributes usable for sorting.
    pub async fn configure_sortable_attributes(
        &self,
        index_name: &str,
        attributes: Vec<String>,
    ) -> Result<(), SetupError> {
        self.configure(index_name, SettingsUpdate::SortableAttributes(attributes))
            .await
    }

    pub async fn configure_ranking_rules(
        &self,
        index_name: &str,
        rules: Vec<String>,
    ) -> Result<(), SetupError> {
        self.configure(index_name, SettingsUpdate::RankingRules(rules))
            .await
    }

    pub async fn configure_stop_words(
        &self,
        index_name: &str,
        stop_words: Vec<String>,
    ) -> Result<(), SetupError> {
        self.configure(index_name, SettingsUpdate::StopWords(stop_words))
            .await
    }

    pub async fn configure_synonyms(
        &self,
        index_name: &str,
        synonyms: BTreeMap<String, Vec<String>>,
    ) -> Result<(), SetupError> {
        self.configure(index_name, SettingsUpdate::Synonyms(synonyms))
            .await
    }

    async fn configure(&self, index_name: &str, update: SettingsUpdate) -> Result<(), SetupError> {
        Self::validate_index_name(index_name)?;
        let category = update.category();

        match self.provider.apply_setting(index_name, &update).await {
            Ok(task_uid) => {
                info!(
                    index = %index_name,
                    task_uid,
                    category,
                    value = %update.to_value(),
                    "Setting applied"
                );
                Ok(())
            }
            Err(e) => {
                error!(index = %index_name, category, error = %e, "Setting update failed");
                Err(e)
            }
        }
    }

    /// Insert documents into an index.
    ///
    /// Documents are sent in chunks of at most `max_batch_size`, waiting for
    /// each chunk's task. Returns the number of documents inserted.
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    pub async fn add_sample_documents(
        &self,
        index_name: &str,
        documents: &[Value],
    ) -> Result<usize, SetupError> {
        Self::validate_index_name(index_name)?;

        if documents.is_empty() {
            warn!(index = %index_name, "No documents to add");
            return Ok(0);
        }

        for chunk in documents.chunks(self.config.chunk_size(documents.len())) {
            if let Err(e) = self.provider.add_documents(index_name, chunk, None).await {
                error!(index = %index_name, error = %e, "Adding documents failed");
                return Err(e);
            }
        }

        info!(index = %index_name, count = documents.len(), "Documents added");
        Ok(documents.len())
    }

    /// Fetch statistics for an index.
    pub async fn get_index_stats(&self, index_name: &str) -> Result<IndexStats, SetupError> {
        Self::validate_index_name(index_name)?;

        self.provider.index_stats(index_name).await.map_err(|e| {
            error!(index = %index_name, error = %e, "Fetching index stats failed");
            e
        })
    }

    /// List the uids of all indexes on the service.
    pub async fn list_indexes(&self) -> Result<Vec<String>, SetupError> {
        let indexes = self.provider.list_indexes().await.map_err(|e| {
            error!(error = %e, "Listing indexes failed");
            e
        })?;

        Ok(indexes.into_iter().map(|index| index.uid).collect())
    }

    /// Delete every index on the service.
    ///
    /// Deletions run one at a time, each waiting for its task. The first
    /// failure stops the remaining deletions and is returned. On success the
    /// number of deleted indexes is returned.
    pub async fn delete_all_indexes(&self) -> Result<usize, SetupError> {
        let indexes = self.list_indexes().await?;
        let mut deleted = 0;

        for index_name in &indexes {
            match self.provider.delete_index(index_name).await {
                Ok(task_uid) => {
                    info!(index = %index_name, task_uid, "Index deleted");
                    deleted += 1;
                }
                Err(e) => {
                    error!(
                        index = %index_name,
                        error = %e,
                        remaining = indexes.len() - deleted - 1,
                        "Index deletion failed, aborting"
                    );
                    return Err(e);
                }
            }
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockCall, MockProvider};
    use serde_json::json;

    fn client_with(provider: &MockProvider) -> IndexSetupClient {
        IndexSetupClient::new(Box::new(provider.clone()))
    }

    #[tokio::test]
    async fn test_health_check_ok() {
        let provider = MockProvider::new();
        let client = client_with(&provider);

        assert!(client.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let provider = MockProvider::new();
        provider.set_healthy(false).await;
        let client = client_with(&provider);

        let result = client.health_check().await;
        assert!(matches!(result, Err(SetupError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_create_index_new() {
        let provider = MockProvider::new();
        let client = client_with(&provider);

        let outcome = client.create_index("movies", Some("id")).await.unwrap();

        assert!(matches!(outcome, CreateOutcome::Created(_)));
        let index = provider.index("movies").await.unwrap();
        assert_eq!(index.primary_key, Some("id".to_string()));
    }

    #[tokio::test]
    async fn test_create_index_existing_is_noop() {
        let provider = MockProvider::new();
        provider.seed_index("movies", Some("id")).await;
        let client = client_with(&provider);

        let outcome = client.create_index("movies", Some("id")).await.unwrap();

        assert_eq!(outcome, CreateOutcome::AlreadyExists);
        assert!(!provider
            .calls()
            .await
            .contains(&MockCall::CreateIndex("movies".to_string())));
    }

    #[tokio::test]
    async fn test_create_index_task_failure() {
        let provider = MockProvider::new();
        provider.fail_create_of("movies").await;
        let client = client_with(&provider);

        let result = client.create_index("movies", Some("id")).await;

        assert!(matches!(result, Err(SetupError::TaskFailed { .. })));
        assert!(provider.index("movies").await.is_none());
    }

    #[tokio::test]
    async fn test_create_index_empty_name() {
        let provider = MockProvider::new();
        let client = client_with(&provider);

        let result = client.create_index("", Some("id")).await;

        assert!(matches!(result, Err(SetupError::ValidationError(_))));
        assert!(provider.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_config_merges_settings() {
        let provider = MockProvider::new();
        provider.seed_index("movies", Some("id")).await;
        let client = client_with(&provider);

        let settings = IndexSettings::new()
            .with("sortableAttributes", json!(["year"]))
            .with("stopWords", json!([]));
        client.update_config("movies", &settings).await.unwrap();

        let index = provider.index("movies").await.unwrap();
        assert_eq!(index.settings.get("sortableAttributes"), Some(&json!(["year"])));
        assert_eq!(index.settings.get("stopWords"), Some(&json!([])));
    }

    #[tokio::test]
    async fn test_update_config_missing_index() {
        let provider = MockProvider::new();
        let client = client_with(&provider);

        let result = client.update_config("movies", &IndexSettings::new()).await;

        assert!(matches!(result, Err(SetupError::IndexNotFound(_))));
    }

    #[tokio::test]
    async fn test_configure_each_category() {
        let provider = MockProvider::new();
        provider.seed_index("movies", Some("id")).await;
        let client = client_with(&provider);

        client
            .configure_searchable_attributes("movies", vec!["title".to_string()])
            .await
            .unwrap();
        client
            .configure_displayed_attributes("movies", vec!["title".to_string(), "year".to_string()])
            .await
            .unwrap();
        client
            .configure_filterable_attributes("movies", vec!["genre".to_string()])
            .await
            .unwrap();
        client
            .configure_sortable_attributes("movies", vec!["year".to_string()])
            .await
            .unwrap();
        client
            .configure_ranking_rules("movies", vec!["words".to_string(), "sort".to_string()])
            .await
            .unwrap();
        client
            .configure_stop_words("movies", vec!["the".to_string()])
            .await
            .unwrap();
        let mut synonyms = BTreeMap::new();
        synonyms.insert("film".to_string(), vec!["movie".to_string()]);
        client.configure_synonyms("movies", synonyms).await.unwrap();

        let settings = provider.index("movies").await.unwrap().settings;
        assert_eq!(settings.len(), 7);
        assert_eq!(settings.get("searchableAttributes"), Some(&json!(["title"])));
        assert_eq!(settings.get("displayedAttributes"), Some(&json!(["title", "year"])));
        assert_eq!(settings.get("filterableAttributes"), Some(&json!(["genre"])));
        assert_eq!(settings.get("sortableAttributes"), Some(&json!(["year"])));
        assert_eq!(settings.get("rankingRules"), Some(&json!(["words", "sort"])));
        assert_eq!(settings.get("stopWords"), Some(&json!(["the"])));
        assert_eq!(settings.get("synonyms"), Some(&json!({"film": ["movie"]})));
    }

    #[tokio::test]
    async fn test_configure_failure_is_reported() {
        let provider = MockProvider::new();
        provider.seed_index("movies", Some("id")).await;
        provider.fail_settings_of("movies").await;
        let client = client_with(&provider);

        let result = client
            .configure_ranking_rules("movies", vec!["bogus".to_string()])
            .await;

        assert!(matches!(result, Err(SetupError::TaskFailed { .. })));
    }

    #[tokio::test]
    async fn test_add_sample_documents_in_chunks() {
        let provider = MockProvider::new();
        provider.seed_index("movies", Some("id")).await;
        let client = IndexSetupClient::with_config(
            Box::new(provider.clone()),
            SetupClientConfig::with_max_batch_size(2),
        );

        let documents: Vec<Value> = (0..5).map(|i| json!({"id": i})).collect();
        let added = client.add_sample_documents("movies", &documents).await.unwrap();

        assert_eq!(added, 5);
        let adds: Vec<MockCall> = provider
            .calls()
            .await
            .into_iter()
            .filter(|c| matches!(c, MockCall::AddDocuments(..)))
            .collect();
        assert_eq!(
            adds,
            vec![
                MockCall::AddDocuments("movies".to_string(), 2),
                MockCall::AddDocuments("movies".to_string(), 2),
                MockCall::AddDocuments("movies".to_string(), 1),
            ]
        );
        assert_eq!(provider.index("movies").await.unwrap().documents.len(), 5);
    }

    #[tokio::test]
    async fn test_add_sample_documents_empty() {
        let provider = MockProvider::new();
        provider.seed_index("movies", Some("id")).await;
        let client = client_with(&provider);

        assert_eq!(client.add_sample_documents("movies", &[]).await.unwrap(), 0);
        assert!(provider.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_get_index_stats() {
        let provider = MockProvider::new();
        provider.seed_index("movies", Some("id")).await;
        let client = client_with(&provider);
        client
            .add_sample_documents("movies", &[json!({"id": 1}), json!({"id": 2})])
            .await
            .unwrap();

        let stats = client.get_index_stats("movies").await.unwrap();

        assert_eq!(stats.get("numberOfDocuments"), Some(&json!(2)));
        assert_eq!(stats.get("primaryKey"), Some(&json!("id")));
    }

    #[tokio::test]
    async fn test_get_index_stats_missing_index() {
        let provider = MockProvider::new();
        let client = client_with(&provider);

        let result = client.get_index_stats("nope").await;

        assert!(matches!(result, Err(SetupError::IndexNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_all_indexes_leaves_nothing() {
        let provider = MockProvider::new();
        provider.seed_index("movies", Some("id")).await;
        provider.seed_index("books", Some("isbn")).await;
        let client = client_with(&provider);

        let deleted = client.delete_all_indexes().await.unwrap();

        assert_eq!(deleted, 2);
        assert!(client.list_indexes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_all_indexes_stops_at_first_failure() {
        let provider = MockProvider::new();
        provider.seed_index("a", None).await;
        provider.seed_index("b", None).await;
        provider.seed_index("c", None).await;
        provider.fail_delete_of("b").await;
        let client = client_with(&provider);

        let result = client.delete_all_indexes().await;

        assert!(matches!(result, Err(SetupError::TaskFailed { .. })));
        // "a" went first, "b" failed, "c" was never attempted
        assert_eq!(provider.index_names().await, vec!["b", "c"]);
        assert!(!provider
            .calls()
            .await
            .contains(&MockCall::DeleteIndex("c".to_string())));
    }
}
