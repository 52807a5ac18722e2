//! Meilisearch provider implementation.
//!
//! Every mutating call enqueues a task on the server and then polls it with
//! `wait_for_completion` before returning.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use meilisearch_sdk::{
    client::Client,
    errors::{Error as MeilisearchSdkError, ErrorCode},
    indexes::{Index, IndexesQuery},
    request::{HttpClient, Method},
    reqwest::ReqwestClient,
    task_info::TaskInfo,
};
use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, error, info};
use url::Url;

use crate::errors::SetupError;
use crate::interfaces::SearchAdminProvider;
use crate::types::{IndexSummary, TaskUid};
use index_setup_shared::{IndexSettings, IndexStats, SettingsUpdate};

/// Page size used when enumerating indexes.
const INDEX_PAGE_SIZE: usize = 100;

/// Meilisearch-backed provider.
///
/// Holds a single client connection for its whole lifetime.
///
/// # Example
///
/// ```ignore
/// let provider = MeilisearchProvider::new("http://localhost:7700", Some("masterKey"))?;
/// let client = IndexSetupClient::new(Box::new(provider));
/// client.health_check().await?;
/// ```
pub struct MeilisearchProvider {
    client: Client,
    http: ReqwestClient,
    host: String,
    task_interval: Option<Duration>,
    task_timeout: Option<Duration>,
}

impl MeilisearchProvider {
    /// Create a provider for the server at `url`.
    ///
    /// # Arguments
    ///
    /// * `url` - The Meilisearch server URL (e.g., "http://localhost:7700")
    /// * `api_key` - Master or admin key; `None` for an unprotected instance
    ///
    /// # Returns
    ///
    /// * `Ok(MeilisearchProvider)` - A new provider instance
    /// * `Err(SetupError)` - If the address is invalid
    pub fn new(url: &str, api_key: Option<&str>) -> Result<Self, SetupError> {
        let parsed = Url::parse(url).map_err(|e| {
            SetupError::connection(format!("Invalid Meilisearch address '{}': {}", url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SetupError::connection(format!(
                "Invalid Meilisearch address '{}': scheme must be http or https",
                url
            )));
        }

        let client = Client::new(url, api_key).map_err(map_sdk_error)?;
        let http = ReqwestClient::new(api_key).map_err(map_sdk_error)?;

        info!(
            url = %url,
            authenticated = api_key.is_some(),
            "Created Meilisearch client"
        );

        Ok(Self {
            client,
            http,
            host: url.trim_end_matches('/').to_string(),
            task_interval: None,
            task_timeout: None,
        })
    }

    /// Override the task polling interval and timeout.
    ///
    /// `None` keeps the SDK defaults.
    pub fn with_task_polling(
        mut self,
        interval: Option<Duration>,
        timeout: Option<Duration>,
    ) -> Self {
        self.task_interval = interval;
        self.task_timeout = timeout;
        self
    }

    async fn fetch_index(&self, index_name: &str) -> Result<Index, SetupError> {
        self.client
            .get_index(index_name)
            .await
            .map_err(map_sdk_error)
    }

    /// Block until the task settles, turning a failed task into an error.
    async fn wait(&self, task: TaskInfo) -> Result<TaskUid, SetupError> {
        let task_uid = task.task_uid;
        debug!(task_uid, "Waiting for task");

        let task = task
            .wait_for_completion(&self.client, self.task_interval, self.task_timeout)
            .await
            .map_err(map_sdk_error)?;

        if task.is_failure() {
            let failure = task.unwrap_failure();
            error!(task_uid, error = %failure.error_message, "Task failed");
            return Err(SetupError::task_failed(task_uid, failure.error_message));
        }

        debug!(task_uid, "Task succeeded");
        Ok(task_uid)
    }
}

#[async_trait]
impl SearchAdminProvider for MeilisearchProvider {
    async fn health(&self) -> Result<String, SetupError> {
        let health = self.client.health().await.map_err(|e| match map_sdk_error(e) {
            SetupError::ConnectionError(msg) => SetupError::ConnectionError(msg),
            other => SetupError::connection(other.to_string()),
        })?;
        Ok(health.status)
    }

    async fn get_index(&self, index_name: &str) -> Result<IndexSummary, SetupError> {
        let index = self.fetch_index(index_name).await?;
        Ok(IndexSummary::new(index.uid, index.primary_key))
    }

    async fn list_indexes(&self) -> Result<Vec<IndexSummary>, SetupError> {
        let mut indexes = Vec::new();
        let mut offset = 0;

        loop {
            let page = IndexesQuery::new(&self.client)
                .with_offset(offset)
                .with_limit(INDEX_PAGE_SIZE)
                .execute()
                .await
                .map_err(map_sdk_error)?;

            let fetched = page.results.len();
            indexes.extend(
                page.results
                    .into_iter()
                    .map(|index| IndexSummary::new(index.uid, index.primary_key)),
            );

            if fetched < INDEX_PAGE_SIZE {
                break;
            }
            offset += fetched;
        }

        Ok(indexes)
    }

    async fn create_index(
        &self,
        index_name: &str,
        primary_key: Option<&str>,
    ) -> Result<TaskUid, SetupError> {
        let task = self
            .client
            .create_index(index_name, primary_key)
            .await
            .map_err(map_sdk_error)?;

        info!(index = %index_name, task_uid = task.task_uid, "Creating index");
        self.wait(task).await
    }

    async fn delete_index(&self, index_name: &str) -> Result<TaskUid, SetupError> {
        let task = self
            .client
            .delete_index(index_name)
            .await
            .map_err(map_sdk_error)?;

        self.wait(task).await
    }

    async fn update_settings(
        &self,
        index_name: &str,
        settings: &IndexSettings,
    ) -> Result<TaskUid, SetupError> {
        let index = self.fetch_index(index_name).await?;
        let (url, body) = settings_request(&self.host, &index.uid, settings);

        let task: TaskInfo = self
            .http
            .request::<(), &Value, TaskInfo>(&url, Method::Patch { query: (), body: &body }, 202)
            .await
            .map_err(map_sdk_error)?;

        self.wait(task).await
    }

    async fn apply_setting(
        &self,
        index_name: &str,
        update: &SettingsUpdate,
    ) -> Result<TaskUid, SetupError> {
        let index = self.fetch_index(index_name).await?;

        let task = match update {
            SettingsUpdate::SearchableAttributes(attributes) => {
                index.set_searchable_attributes(attributes).await
            }
            SettingsUpdate::DisplayedAttributes(attributes) => {
                index.set_displayed_attributes(attributes).await
            }
            SettingsUpdate::FilterableAttributes(attributes) => {
                index.set_filterable_attributes(attributes).await
            }
            SettingsUpdate::SortableAttributes(attributes) => {
                index.set_sortable_attributes(attributes).await
            }
            SettingsUpdate::RankingRules(rules) => index.set_ranking_rules(rules).await,
            SettingsUpdate::StopWords(words) => index.set_stop_words(words).await,
            SettingsUpdate::Synonyms(synonyms) => {
                let synonyms: HashMap<String, Vec<String>> = synonyms
                    .iter()
                    .map(|(word, alternatives)| (word.clone(), alternatives.clone()))
                    .collect();
                index.set_synonyms(&synonyms).await
            }
        }
        .map_err(map_sdk_error)?;

        self.wait(task).await
    }

    async fn add_documents(
        &self,
        index_name: &str,
        documents: &[Value],
        primary_key: Option<&str>,
    ) -> Result<TaskUid, SetupError> {
        let index = self.fetch_index(index_name).await?;

        let task = index
            .add_documents(documents, primary_key)
            .await
            .map_err(map_sdk_error)?;

        self.wait(task).await
    }

    async fn index_stats(&self, index_name: &str) -> Result<IndexStats, SetupError> {
        let index = self.fetch_index(index_name).await?;
        let stats = index.get_stats().await.map_err(map_sdk_error)?;

        let mut result = IndexStats::new();
        result.insert("uid", json!(index.uid));
        result.insert("primaryKey", json!(index.primary_key));
        result.insert("createdAt", json!(index.created_at.and_then(format_timestamp)));
        result.insert("updatedAt", json!(index.updated_at.and_then(format_timestamp)));
        result.insert("numberOfDocuments", json!(stats.number_of_documents));
        result.insert("isIndexing", json!(stats.is_indexing));
        result.insert("fieldDistribution", json!(stats.field_distribution));

        Ok(result)
    }
}

/// Build the settings update request for `index_name`.
///
/// The body is the settings document exactly as given, so categories the SDK
/// does not model and `null` resets reach the server unchanged.
fn settings_request(host: &str, index_name: &str, settings: &IndexSettings) -> (String, Value) {
    let url = format!("{}/indexes/{}/settings", host, index_name);
    (url, Value::Object(settings.as_map().clone()))
}

fn format_timestamp(timestamp: OffsetDateTime) -> Option<String> {
    timestamp.format(&Rfc3339).ok()
}

/// Map an SDK error onto the setup error taxonomy.
fn map_sdk_error(err: MeilisearchSdkError) -> SetupError {
    match err {
        MeilisearchSdkError::Meilisearch(e) if e.error_code == ErrorCode::IndexNotFound => {
            SetupError::index_not_found(e.error_message)
        }
        MeilisearchSdkError::Meilisearch(e) => SetupError::remote(e.error_message),
        MeilisearchSdkError::Timeout => {
            SetupError::task_timeout("task did not finish before the timeout")
        }
        MeilisearchSdkError::ParseError(e) => SetupError::serialization(e.to_string()),
        other => SetupError::connection(other.to_string()),
    }
}
