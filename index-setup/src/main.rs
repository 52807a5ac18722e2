//! `setup-indexes`: recreate every index listed in the manifest.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, warn};

use index_setup::config::{
    DEFAULT_DOCUMENTS_DIR, DEFAULT_MANIFEST_PATH, DEFAULT_SETTINGS_DIR,
};
use index_setup::{telemetry, Dependencies, ProvisionConfig, Provisioner};

#[derive(Parser)]
#[command(name = "setup-indexes")]
#[command(about = "Delete all Meilisearch indexes and recreate them from a manifest", long_about = None)]
struct Cli {
    /// Manifest listing the indexes to create
    #[arg(long, default_value = DEFAULT_MANIFEST_PATH)]
    manifest: PathBuf,

    /// Directory containing the settings files named in the manifest
    #[arg(long, default_value = DEFAULT_SETTINGS_DIR)]
    settings_dir: PathBuf,

    /// Directory containing the sample documents files named in the manifest
    #[arg(long, default_value = DEFAULT_DOCUMENTS_DIR)]
    documents_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    telemetry::init_tracing();

    let cli = Cli::parse();

    let dependencies = match Dependencies::from_env() {
        Ok(dependencies) => dependencies,
        Err(e) => {
            error!(error = %e, "Failed to initialize");
            return;
        }
    };

    let config = ProvisionConfig {
        manifest_path: cli.manifest,
        settings_dir: cli.settings_dir,
        documents_dir: cli.documents_dir,
    };

    match Provisioner::new(dependencies.client, config).run().await {
        Ok(report) if report.is_clean() => info!("All indexes provisioned"),
        Ok(report) => {
            for issue in &report.issues {
                warn!(
                    index = issue.index_name.as_deref().unwrap_or("<unnamed>"),
                    reason = %issue.reason,
                    "Entry not fully provisioned"
                );
            }
        }
        Err(e) => error!(error = %e, "Provisioning aborted"),
    }
}
