//! Meilisearch implementation of the search admin provider.
//!
//! This module provides a concrete implementation of `SearchAdminProvider`
//! using the official Meilisearch SDK.

mod client;

pub use client::MeilisearchProvider;
