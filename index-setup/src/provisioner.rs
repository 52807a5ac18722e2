//! Provisioning driver.
//!
//! Resets the search service to the state described by the manifest: every
//! existing index is deleted, then each manifest entry is created and
//! configured in order. The run is not transactional; indexes handled before
//! a failure stay as they are.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::config::ProvisionConfig;
use crate::manifest::{self, EntryRejection};
use crate::ProvisionError;
use index_setup_repository::{CreateOutcome, IndexSetupClient, SetupError};
use index_setup_shared::IndexManifestEntry;

/// Why an entry was skipped or only partly provisioned.
#[derive(Debug, Error)]
pub enum IssueReason {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("malformed entry: {0}")]
    MalformedEntry(String),

    #[error("index creation failed: {0}")]
    CreateFailed(SetupError),

    #[error("settings file not found: {}", .0.display())]
    SettingsNotFound(PathBuf),

    #[error("settings file unreadable: {0}")]
    SettingsUnreadable(String),

    #[error("settings update failed: {0}")]
    SettingsFailed(SetupError),

    #[error("sample documents not loaded: {0}")]
    DocumentsFailed(String),
}

/// A problem with a single manifest entry.
#[derive(Debug)]
pub struct EntryIssue {
    /// Index name, when the entry named one.
    pub index_name: Option<String>,
    pub reason: IssueReason,
}

/// Outcome of a provisioning run.
#[derive(Debug, Default)]
pub struct ProvisionReport {
    /// Indexes deleted during the reset.
    pub deleted: usize,
    /// Error that stopped the reset early, if any.
    pub reset_error: Option<SetupError>,
    /// Indexes created by this run.
    pub created: Vec<String>,
    /// Indexes that were already present.
    pub existing: Vec<String>,
    /// Indexes whose settings document was applied.
    pub configured: Vec<String>,
    /// Sample documents inserted, per index.
    pub documents: Vec<(String, usize)>,
    pub issues: Vec<EntryIssue>,
}

impl ProvisionReport {
    fn issue(&mut self, index_name: Option<String>, reason: IssueReason) {
        match &index_name {
            Some(name) => warn!(index = %name, reason = %reason, "Manifest entry issue"),
            None => warn!(reason = %reason, "Manifest entry issue"),
        }
        self.issues.push(EntryIssue { index_name, reason });
    }

    /// Whether every entry was fully provisioned.
    pub fn is_clean(&self) -> bool {
        self.reset_error.is_none() && self.issues.is_empty()
    }
}

/// Drives a full provisioning run.
pub struct Provisioner {
    client: IndexSetupClient,
    config: ProvisionConfig,
}

impl Provisioner {
    pub fn new(client: IndexSetupClient, config: ProvisionConfig) -> Self {
        Self { client, config }
    }

    /// Run the provisioning workflow.
    ///
    /// # Returns
    ///
    /// * `Ok(ProvisionReport)` - The run completed; per-entry problems are in the report
    /// * `Err(ProvisionError::HealthCheckFailed)` - The server is unreachable; nothing was touched
    /// * `Err(ProvisionError::ManifestError)` - The manifest is missing or not a list
    pub async fn run(&self) -> Result<ProvisionReport, ProvisionError> {
        if let Err(e) = self.client.health_check().await {
            error!("Meilisearch server is not running properly");
            return Err(ProvisionError::HealthCheckFailed(e));
        }

        let mut report = ProvisionReport::default();

        match self.client.delete_all_indexes().await {
            Ok(deleted) => report.deleted = deleted,
            Err(e) => {
                warn!(error = %e, "Resetting indexes failed, continuing");
                report.reset_error = Some(e);
            }
        }

        let items = manifest::load_manifest(&self.config.manifest_path).map_err(|e| {
            error!(error = %e, "Cannot load index manifest");
            e
        })?;
        info!(
            manifest = %self.config.manifest_path.display(),
            entries = items.len(),
            "Loaded index manifest"
        );

        for item in &items {
            match manifest::parse_entry(item) {
                Ok(entry) => self.provision_entry(&entry, &mut report).await,
                Err(EntryRejection::MissingFields(fields)) => {
                    report.issue(manifest::entry_name(item), IssueReason::MissingFields(fields))
                }
                Err(EntryRejection::Malformed(msg)) => {
                    report.issue(manifest::entry_name(item), IssueReason::MalformedEntry(msg))
                }
            }
        }

        info!(
            deleted = report.deleted,
            created = report.created.len(),
            existing = report.existing.len(),
            configured = report.configured.len(),
            issues = report.issues.len(),
            "Provisioning finished"
        );
        Ok(report)
    }

    #[instrument(skip(self, entry, report), fields(index = %entry.index_name))]
    async fn provision_entry(&self, entry: &IndexManifestEntry, report: &mut ProvisionReport) {
        let name = entry.index_name.clone();

        match self
            .client
            .create_index(&entry.index_name, Some(&entry.primary_key))
            .await
        {
            Ok(CreateOutcome::Created(_)) => report.created.push(name.clone()),
            Ok(CreateOutcome::AlreadyExists) => report.existing.push(name.clone()),
            Err(e) => {
                report.issue(Some(name), IssueReason::CreateFailed(e));
                return;
            }
        }

        let settings_path = self.config.settings_dir.join(&entry.settings_file);
        if !settings_path.exists() {
            report.issue(Some(name), IssueReason::SettingsNotFound(settings_path));
            return;
        }

        let settings = match manifest::load_settings(&settings_path) {
            Ok(settings) => settings,
            Err(e) => {
                report.issue(Some(name), IssueReason::SettingsUnreadable(e.to_string()));
                return;
            }
        };

        match self.client.update_config(&entry.index_name, &settings).await {
            Ok(()) => report.configured.push(name.clone()),
            Err(e) => {
                report.issue(Some(name), IssueReason::SettingsFailed(e));
                return;
            }
        }

        if let Some(documents_file) = &entry.documents_file {
            let documents_path = self.config.documents_dir.join(documents_file);
            let loaded = match manifest::load_documents(&documents_path) {
                Ok(documents) => self
                    .client
                    .add_sample_documents(&entry.index_name, &documents)
                    .await
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };

            match loaded {
                Ok(count) => report.documents.push((name, count)),
                Err(msg) => report.issue(Some(name), IssueReason::DocumentsFailed(msg)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use index_setup_repository::mock::{MockCall, MockProvider};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        provider: MockProvider,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            fs::create_dir(dir.path().join("settings")).unwrap();
            fs::create_dir(dir.path().join("documents")).unwrap();
            Self {
                dir,
                provider: MockProvider::new(),
            }
        }

        fn manifest(&self, content: &str) {
            fs::write(self.dir.path().join("indexes.json"), content).unwrap();
        }

        fn settings(&self, name: &str, content: &str) {
            fs::write(self.dir.path().join("settings").join(name), content).unwrap();
        }

        fn documents(&self, name: &str, content: &str) {
            fs::write(self.dir.path().join("documents").join(name), content).unwrap();
        }

        fn provisioner(&self) -> Provisioner {
            Provisioner::new(
                IndexSetupClient::new(Box::new(self.provider.clone())),
                ProvisionConfig::rooted_at(self.dir.path()),
            )
        }

        async fn created(&self) -> Vec<String> {
            self.provider
                .calls()
                .await
                .into_iter()
                .filter_map(|call| match call {
                    MockCall::CreateIndex(name) => Some(name),
                    _ => None,
                })
                .collect()
        }
    }

    #[tokio::test]
    async fn test_movies_scenario() {
        let fixture = Fixture::new();
        fixture.manifest(r#"[{"index_name":"movies","pid":"id","setting_file":"movies.json"}]"#);
        fixture.settings("movies.json", r#"{"sortableAttributes":["year"]}"#);

        let report = fixture.provisioner().run().await.unwrap();

        assert!(report.is_clean());
        assert_eq!(report.created, vec!["movies"]);
        assert_eq!(report.configured, vec!["movies"]);
        let index = fixture.provider.index("movies").await.unwrap();
        assert_eq!(index.primary_key, Some("id".to_string()));
        assert_eq!(index.settings.get("sortableAttributes"), Some(&json!(["year"])));
    }

    #[tokio::test]
    async fn test_unhealthy_server_touches_nothing() {
        let fixture = Fixture::new();
        fixture.provider.seed_index("movies", Some("id")).await;
        fixture.provider.set_healthy(false).await;
        fixture.manifest(r#"[{"index_name":"movies","pid":"id","setting_file":"movies.json"}]"#);

        let result = fixture.provisioner().run().await;

        assert!(matches!(result, Err(ProvisionError::HealthCheckFailed(_))));
        let calls = fixture.provider.calls().await;
        assert_eq!(calls, vec![MockCall::Health]);
        assert!(!calls.iter().any(MockCall::touches_indexes));
        assert_eq!(fixture.provider.index_names().await, vec!["movies"]);
    }

    #[tokio::test]
    async fn test_existing_indexes_are_reset() {
        let fixture = Fixture::new();
        fixture.provider.seed_index("stale", Some("id")).await;
        fixture.provider.seed_index("movies", Some("old_id")).await;
        fixture.manifest(r#"[{"index_name":"movies","pid":"id","setting_file":"movies.json"}]"#);
        fixture.settings("movies.json", r#"{"rankingRules":["words"]}"#);

        let report = fixture.provisioner().run().await.unwrap();

        assert_eq!(report.deleted, 2);
        assert_eq!(fixture.provider.index_names().await, vec!["movies"]);
        let index = fixture.provider.index("movies").await.unwrap();
        assert_eq!(index.primary_key, Some("id".to_string()));
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let fixture = Fixture::new();
        fixture.manifest(r#"[{"index_name":"movies","pid":"id","setting_file":"movies.json"}]"#);
        fixture.settings("movies.json", r#"{"sortableAttributes":["year"]}"#);
        let provisioner = fixture.provisioner();

        let first = provisioner.run().await.unwrap();
        let second = provisioner.run().await.unwrap();

        assert!(first.is_clean());
        assert!(second.is_clean());
        assert_eq!(second.created, vec!["movies"]);
        let index = fixture.provider.index("movies").await.unwrap();
        assert_eq!(index.settings.get("sortableAttributes"), Some(&json!(["year"])));
    }

    #[tokio::test]
    async fn test_reset_failure_still_provisions() {
        let fixture = Fixture::new();
        fixture.provider.seed_index("movies", Some("id")).await;
        fixture.provider.fail_delete_of("movies").await;
        fixture.manifest(r#"[{"index_name":"movies","pid":"id","setting_file":"movies.json"}]"#);
        fixture.settings("movies.json", r#"{"stopWords":["the"]}"#);

        let report = fixture.provisioner().run().await.unwrap();

        assert!(report.reset_error.is_some());
        assert_eq!(report.existing, vec!["movies"]);
        assert_eq!(report.configured, vec!["movies"]);
        assert!(fixture.created().await.is_empty());
    }

    #[tokio::test]
    async fn test_incomplete_entries_are_skipped() {
        let fixture = Fixture::new();
        fixture.manifest(
            r#"[
                {"index_name":"no_pid","setting_file":"a.json"},
                {"pid":"id","setting_file":"a.json"},
                {"index_name":"no_settings","pid":"id"},
                {"index_name":"","pid":"id","setting_file":"a.json"},
                "not an object",
                {"index_name":"books","pid":"isbn","setting_file":"a.json"}
            ]"#,
        );
        fixture.settings("a.json", r#"{"searchableAttributes":["title"]}"#);

        let report = fixture.provisioner().run().await.unwrap();

        assert_eq!(fixture.created().await, vec!["books"]);
        assert_eq!(report.configured, vec!["books"]);
        assert_eq!(report.issues.len(), 5);
        assert!(matches!(
            report.issues[0].reason,
            IssueReason::MissingFields(ref fields) if fields == &vec!["pid"]
        ));
        assert_eq!(report.issues[0].index_name, Some("no_pid".to_string()));
        assert!(matches!(report.issues[4].reason, IssueReason::MalformedEntry(_)));
    }

    #[tokio::test]
    async fn test_missing_manifest_aborts_after_reset() {
        let fixture = Fixture::new();
        fixture.provider.seed_index("movies", Some("id")).await;

        let result = fixture.provisioner().run().await;

        assert!(matches!(result, Err(ProvisionError::ManifestError(_))));
        assert!(fixture.provider.index_names().await.is_empty());
        assert!(fixture.created().await.is_empty());
    }

    #[tokio::test]
    async fn test_manifest_must_be_a_list() {
        let fixture = Fixture::new();
        fixture.manifest(r#"{"index_name":"movies","pid":"id","setting_file":"movies.json"}"#);

        let result = fixture.provisioner().run().await;

        assert!(matches!(result, Err(ProvisionError::ManifestError(_))));
        assert!(fixture.created().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_failure_skips_settings() {
        let fixture = Fixture::new();
        fixture.provider.fail_create_of("movies").await;
        fixture.manifest(
            r#"[
                {"index_name":"movies","pid":"id","setting_file":"movies.json"},
                {"index_name":"books","pid":"isbn","setting_file":"movies.json"}
            ]"#,
        );
        fixture.settings("movies.json", r#"{"sortableAttributes":["year"]}"#);

        let report = fixture.provisioner().run().await.unwrap();

        assert!(matches!(report.issues[0].reason, IssueReason::CreateFailed(_)));
        assert!(!fixture
            .provider
            .calls()
            .await
            .contains(&MockCall::UpdateSettings("movies".to_string())));
        assert_eq!(report.configured, vec!["books"]);
    }

    #[tokio::test]
    async fn test_missing_settings_file_keeps_index() {
        let fixture = Fixture::new();
        fixture.manifest(r#"[{"index_name":"movies","pid":"id","setting_file":"missing.json"}]"#);

        let report = fixture.provisioner().run().await.unwrap();

        assert_eq!(report.created, vec!["movies"]);
        assert!(report.configured.is_empty());
        assert!(matches!(report.issues[0].reason, IssueReason::SettingsNotFound(_)));
        assert!(fixture.provider.index("movies").await.is_some());
    }

    #[tokio::test]
    async fn test_unusual_settings_are_passed_through() {
        let fixture = Fixture::new();
        fixture.manifest(r#"[{"index_name":"movies","pid":"id","setting_file":"movies.json"}]"#);
        fixture.settings(
            "movies.json",
            r#"{"stopWords":[],"synonyms":{},"futureCategory":["x"]}"#,
        );

        let report = fixture.provisioner().run().await.unwrap();

        assert!(report.is_clean());
        let settings = fixture.provider.index("movies").await.unwrap().settings;
        assert_eq!(settings.get("stopWords"), Some(&json!([])));
        assert_eq!(settings.get("futureCategory"), Some(&json!(["x"])));
    }

    #[tokio::test]
    async fn test_settings_rejection_is_recorded() {
        let fixture = Fixture::new();
        fixture.provider.fail_settings_of("movies").await;
        fixture.manifest(r#"[{"index_name":"movies","pid":"id","setting_file":"movies.json"}]"#);
        fixture.settings("movies.json", r#"{"rankingRules":["bogus"]}"#);

        let report = fixture.provisioner().run().await.unwrap();

        assert_eq!(report.created, vec!["movies"]);
        assert!(report.configured.is_empty());
        assert!(matches!(report.issues[0].reason, IssueReason::SettingsFailed(_)));
    }

    #[tokio::test]
    async fn test_sample_documents_loaded() {
        let fixture = Fixture::new();
        fixture.manifest(
            r#"[{"index_name":"movies","pid":"id","setting_file":"movies.json","documents_file":"movies.json"}]"#,
        );
        fixture.settings("movies.json", r#"{"sortableAttributes":["year"]}"#);
        fixture.documents("movies.json", r#"[{"id":1,"year":1999},{"id":2,"year":2004}]"#);

        let report = fixture.provisioner().run().await.unwrap();

        assert_eq!(report.documents, vec![("movies".to_string(), 2)]);
        assert_eq!(fixture.provider.index("movies").await.unwrap().documents.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_documents_file_is_an_issue() {
        let fixture = Fixture::new();
        fixture.manifest(
            r#"[{"index_name":"movies","pid":"id","setting_file":"movies.json","documents_file":"nope.json"}]"#,
        );
        fixture.settings("movies.json", r#"{"sortableAttributes":["year"]}"#);

        let report = fixture.provisioner().run().await.unwrap();

        assert_eq!(report.configured, vec!["movies"]);
        assert!(matches!(report.issues[0].reason, IssueReason::DocumentsFailed(_)));
    }
}
