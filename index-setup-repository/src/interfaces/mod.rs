//! Interface definitions for the search admin backend.
//!
//! This module defines the abstract `SearchAdminProvider` trait that allows
//! for dependency injection and swappable backend implementations.

mod search_admin_provider;

pub use search_admin_provider::SearchAdminProvider;
