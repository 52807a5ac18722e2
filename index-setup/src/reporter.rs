//! Index statistics reporting.

use serde_json::Value;

use index_setup_repository::IndexSetupClient;
use index_setup_shared::IndexStats;

/// Fetch statistics for `index_name`, or an empty result when the server
/// cannot provide them. The client has already logged the reason.
pub async fn fetch_stats(client: &IndexSetupClient, index_name: &str) -> IndexStats {
    client.get_index_stats(index_name).await.unwrap_or_default()
}

/// Render statistics as `name value` lines. String values are printed
/// without quotes, everything else as JSON.
pub fn render_stats(stats: &IndexStats) -> Vec<String> {
    stats
        .iter()
        .map(|(name, value)| match value {
            Value::String(s) => format!("{} {}", name, s),
            other => format!("{} {}", name, other),
        })
        .collect()
}
