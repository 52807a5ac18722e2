//! `index-stats <INDEX>`: print statistics for one index.

use clap::Parser;
use tracing::error;

use index_setup::reporter::{fetch_stats, render_stats};
use index_setup::{telemetry, Dependencies};

#[derive(Parser)]
#[command(name = "index-stats")]
#[command(about = "Print statistics for a Meilisearch index", long_about = None)]
struct Cli {
    /// Name of the index
    index: String,
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

    if dependencies.client.health_check().await.is_err() {
        return;
    }

    let stats = fetch_stats(&dependencies.client, &cli.index).await;
    for line in render_stats(&stats) {
        println!("{}", line);
    }
}
