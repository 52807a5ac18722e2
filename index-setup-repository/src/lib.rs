//! # Index Setup Repository
//!
//! This crate provides the client used to provision a search service: error
//! definitions, the `SearchAdminProvider` interface, a concrete implementation
//! for Meilisearch and the `IndexSetupClient` wrapper that logs and sequences
//! every administrative call.

pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod meilisearch;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod types;

pub use client::IndexSetupClient;
pub use config::SetupClientConfig;
pub use errors::SetupError;
pub use interfaces::SearchAdminProvider;
pub use meilisearch::MeilisearchProvider;
pub use types::{CreateOutcome, IndexSummary, TaskUid};
