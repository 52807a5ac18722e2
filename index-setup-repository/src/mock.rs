//! In-memory provider used by tests.
//!
//! Behaves like a Meilisearch instance that finishes every task immediately:
//! settings updates merge into the stored document, creating an existing index
//! fails the task, and missing indexes answer `IndexNotFound`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::errors::SetupError;
use crate::interfaces::SearchAdminProvider;
use crate::types::{IndexSummary, TaskUid};
use index_setup_shared::{IndexSettings, IndexStats, SettingsUpdate};

/// Every call received by the mock, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Health,
    GetIndex(String),
    ListIndexes,
    CreateIndex(String),
    DeleteIndex(String),
    UpdateSettings(String),
    ApplySetting(String, &'static str),
    AddDocuments(String, usize),
    IndexStats(String),
}

impl MockCall {
    /// Whether the call reads or changes index state (anything but `Health`).
    pub fn touches_indexes(&self) -> bool {
        !matches!(self, Self::Health)
    }
}

/// Stored state of one index.
#[derive(Debug, Clone, Default)]
pub struct MockIndex {
    pub primary_key: Option<String>,
    pub settings: IndexSettings,
    pub documents: Vec<Value>,
}

#[derive(Debug)]
struct MockState {
    healthy: bool,
    indexes: BTreeMap<String, MockIndex>,
    calls: Vec<MockCall>,
    failing_creates: BTreeSet<String>,
    failing_deletes: BTreeSet<String>,
    failing_settings: BTreeSet<String>,
    next_task_uid: TaskUid,
}

impl MockState {
    fn next_task(&mut self) -> TaskUid {
        let uid = self.next_task_uid;
        self.next_task_uid += 1;
        uid
    }

    fn index_mut(&mut self, index_name: &str) -> Result<&mut MockIndex, SetupError> {
        self.indexes
            .get_mut(index_name)
            .ok_or_else(|| SetupError::index_not_found(format!("Index `{}` not found.", index_name)))
    }
}

/// Cloneable handle to shared in-memory state.
///
/// Clone it before boxing it into a client to keep a handle for assertions.
#[derive(Debug, Clone)]
pub struct MockProvider {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                healthy: true,
                indexes: BTreeMap::new(),
                calls: Vec::new(),
                failing_creates: BTreeSet::new(),
                failing_deletes: BTreeSet::new(),
                failing_settings: BTreeSet::new(),
                next_task_uid: 0,
            })),
        }
    }

    pub async fn set_healthy(&self, healthy: bool) {
        self.state.lock().await.healthy = healthy;
    }

    /// Add an index without recording a call.
    pub async fn seed_index(&self, index_name: &str, primary_key: Option<&str>) {
        self.state.lock().await.indexes.insert(
            index_name.to_string(),
            MockIndex {
                primary_key: primary_key.map(str::to_string),
                ..Default::default()
            },
        );
    }

    pub async fn fail_create_of(&self, index_name: &str) {
        self.state
            .lock()
            .await
            .failing_creates
            .insert(index_name.to_string());
    }

    pub async fn fail_delete_of(&self, index_name: &str) {
        self.state
            .lock()
            .await
            .failing_deletes
            .insert(index_name.to_string());
    }

    pub async fn fail_settings_of(&self, index_name: &str) {
        self.state
            .lock()
            .await
            .failing_settings
            .insert(index_name.to_string());
    }

    pub async fn calls(&self) -> Vec<MockCall> {
        self.state.lock().await.calls.clone()
    }

    pub async fn index(&self, index_name: &str) -> Option<MockIndex> {
        self.state.lock().await.indexes.get(index_name).cloned()
    }

    pub async fn index_names(&self) -> Vec<String> {
        self.state.lock().await.indexes.keys().cloned().collect()
    }
}

#[async_trait]
impl SearchAdminProvider for MockProvider {
    async fn health(&self) -> Result<String, SetupError> {
        let mut state = self.state.lock().await;
        state.calls.push(MockCall::Health);

        if state.healthy {
            Ok("available".to_string())
        } else {
            Err(SetupError::connection("error sending request: connection refused"))
        }
    }

    async fn get_index(&self, index_name: &str) -> Result<IndexSummary, SetupError> {
        let mut state = self.state.lock().await;
        state.calls.push(MockCall::GetIndex(index_name.to_string()));

        let index = state.index_mut(index_name)?;
        Ok(IndexSummary::new(index_name, index.primary_key.clone()))
    }

    async fn list_indexes(&self) -> Result<Vec<IndexSummary>, SetupError> {
        let mut state = self.state.lock().await;
        state.calls.push(MockCall::ListIndexes);

        Ok(state
            .indexes
            .iter()
            .map(|(uid, index)| IndexSummary::new(uid.clone(), index.primary_key.clone()))
            .collect())
    }

    async fn create_index(
        &self,
        index_name: &str,
        primary_key: Option<&str>,
    ) -> Result<TaskUid, SetupError> {
        let mut state = self.state.lock().await;
        state.calls.push(MockCall::CreateIndex(index_name.to_string()));
        let task_uid = state.next_task();

        if state.failing_creates.contains(index_name) {
            return Err(SetupError::task_failed(task_uid, "index creation rejected"));
        }
        if state.indexes.contains_key(index_name) {
            return Err(SetupError::task_failed(
                task_uid,
                format!("Index `{}` already exists.", index_name),
            ));
        }

        state.indexes.insert(
            index_name.to_string(),
            MockIndex {
                primary_key: primary_key.map(str::to_string),
                ..Default::default()
            },
        );
        Ok(task_uid)
    }

    async fn delete_index(&self, index_name: &str) -> Result<TaskUid, SetupError> {
        let mut state = self.state.lock().await;
        state.calls.push(MockCall::DeleteIndex(index_name.to_string()));
        let task_uid = state.next_task();

        if state.failing_deletes.contains(index_name) {
            return Err(SetupError::task_failed(task_uid, "index deletion rejected"));
        }
        state.index_mut(index_name)?;
        state.indexes.remove(index_name);
        Ok(task_uid)
    }

    async fn update_settings(
        &self,
        index_name: &str,
        settings: &IndexSettings,
    ) -> Result<TaskUid, SetupError> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(MockCall::UpdateSettings(index_name.to_string()));
        let task_uid = state.next_task();

        if state.failing_settings.contains(index_name) {
            return Err(SetupError::task_failed(task_uid, "invalid settings"));
        }
        state.index_mut(index_name)?.settings.merge(settings);
        Ok(task_uid)
    }

    async fn apply_setting(
        &self,
        index_name: &str,
        update: &SettingsUpdate,
    ) -> Result<TaskUid, SetupError> {
        let mut state = self.state.lock().await;
        state.calls.push(MockCall::ApplySetting(
            index_name.to_string(),
            update.category(),
        ));
        let task_uid = state.next_task();

        if state.failing_settings.contains(index_name) {
            return Err(SetupError::task_failed(task_uid, "invalid settings"));
        }
        state
            .index_mut(index_name)?
            .settings
            .insert(update.category(), update.to_value());
        Ok(task_uid)
    }

    async fn add_documents(
        &self,
        index_name: &str,
        documents: &[Value],
        _primary_key: Option<&str>,
    ) -> Result<TaskUid, SetupError> {
        let mut state = self.state.lock().await;
        state.calls.push(MockCall::AddDocuments(
            index_name.to_string(),
            documents.len(),
        ));
        let task_uid = state.next_task();

        state
            .index_mut(index_name)?
            .documents
            .extend(documents.iter().cloned());
        Ok(task_uid)
    }

    async fn index_stats(&self, index_name: &str) -> Result<IndexStats, SetupError> {
        let mut state = self.state.lock().await;
        state.calls.push(MockCall::IndexStats(index_name.to_string()));

        let index = state.index_mut(index_name)?;
        let mut stats = IndexStats::new();
        stats.insert("uid", json!(index_name));
        stats.insert("primaryKey", json!(index.primary_key));
        stats.insert("numberOfDocuments", json!(index.documents.len()));
        stats.insert("isIndexing", json!(false));
        Ok(stats)
    }
}
