//! Request and response types for index setup operations.

/// Uid of a remote task, as assigned by the search service.
pub type TaskUid = u32;

/// Minimal description of an index on the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSummary {
    pub uid: String,
    pub primary_key: Option<String>,
}

impl IndexSummary {
    pub fn new(uid: impl Into<String>, primary_key: Option<String>) -> Self {
        Self {
            uid: uid.into(),
            primary_key,
        }
    }
}

/// Result of a create-if-missing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The index was created by this call.
    Created(TaskUid),
    /// The index already existed; nothing was changed.
    AlreadyExists,
}
