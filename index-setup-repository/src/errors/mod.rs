//! Error types for the index setup repository.

mod setup_error;

pub use setup_error::SetupError;
