//! Configuration types for the IndexSetupClient.

/// Configuration for the IndexSetupClient.
#[derive(Debug, Clone)]
pub struct SetupClientConfig {
    /// Maximum number of documents sent in a single add-documents task.
    /// Larger inputs are split into several tasks. Set to None to send
    /// everything at once.
    pub max_batch_size: Option<usize>,
}

impl Default for SetupClientConfig {
    fn default() -> Self {
        Self {
            max_batch_size: Some(1000),
        }
    }
}

impl SetupClientConfig {
    /// Create a config with a custom batch size limit.
    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            max_batch_size: Some(max_batch_size),
        }
    }

    /// Effective chunk size for `total` documents.
    pub(crate) fn chunk_size(&self, total: usize) -> usize {
        match self.max_batch_size {
            Some(max) if max > 0 => max,
            _ => total.max(1),
        }
    }
}
