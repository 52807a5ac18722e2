//! Search admin provider trait definition.
//!
//! This module defines the abstract interface for the administrative
//! operations of a search service (index lifecycle, settings, documents).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SetupError;
use crate::types::{IndexSummary, TaskUid};
use index_setup_shared::{IndexSettings, IndexStats, SettingsUpdate};

/// Abstracts the administrative API of the search service.
///
/// Implementations are injected into `IndexSetupClient`, which keeps the
/// logging and the create-if-missing logic out of the backend.
///
/// Every mutating method returns only once the remote task it enqueued has
/// finished. A task that finishes in the failed state is reported as
/// `SetupError::TaskFailed`; on success the task uid is returned.
#[async_trait]
pub trait SearchAdminProvider: Send + Sync {
    /// Probe the service for liveness.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The status reported by the service
    /// * `Err(SetupError)` - If the service is unreachable
    async fn health(&self) -> Result<String, SetupError>;

    /// Look up a single index.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexSummary)` - If the index exists
    /// * `Err(SetupError::IndexNotFound)` - If it does not
    /// * `Err(SetupError)` - If the lookup fails
    async fn get_index(&self, index_name: &str) -> Result<IndexSummary, SetupError>;

    /// List every index on the service.
    async fn list_indexes(&self) -> Result<Vec<IndexSummary>, SetupError>;

    /// Create an index and wait for the creation task.
    async fn create_index(
        &self,
        index_name: &str,
        primary_key: Option<&str>,
    ) -> Result<TaskUid, SetupError>;

    /// Delete an index and wait for the deletion task.
    async fn delete_index(&self, index_name: &str) -> Result<TaskUid, SetupError>;

    /// Push a whole settings document and wait for the settings task.
    ///
    /// Categories absent from the document are left unchanged.
    async fn update_settings(
        &self,
        index_name: &str,
        settings: &IndexSettings,
    ) -> Result<TaskUid, SetupError>;

    /// Update a single settings category and wait for the settings task.
    async fn apply_setting(
        &self,
        index_name: &str,
        update: &SettingsUpdate,
    ) -> Result<TaskUid, SetupError>;

    /// Add (or replace) documents and wait for the indexing task.
    async fn add_documents(
        &self,
        index_name: &str,
        documents: &[Value],
        primary_key: Option<&str>,
    ) -> Result<TaskUid, SetupError>;

    /// Fetch statistics for an index.
    async fn index_stats(&self, index_name: &str) -> Result<IndexStats, SetupError>;
}
