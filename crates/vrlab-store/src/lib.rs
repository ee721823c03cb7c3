//! Store layer for VR Lab.
//!
//! Every store is a trait with an in-memory implementation. The server
//! creates them at startup, shares them with the HTTP handlers behind
//! `Arc<dyn ...>`, and clears them on graceful shutdown. A persistent backend
//! can be substituted by implementing the same traits.
//!
//! # Modules
//!
//! - [`interaction_store`] -- Append-only interaction log
//! - [`content_catalog`] -- Content library catalog and filters
//! - [`preferences_store`] -- Per-user preference bundles
//! - [`error`] -- Shared error types

pub mod content_catalog;
pub mod error;
pub mod interaction_store;
pub mod preferences_store;

// Re-export primary types for convenience.
pub use content_catalog::{ContentCatalog, ContentFilter, MemoryContentCatalog};
pub use error::StoreError;
pub use interaction_store::{InteractionFilter, InteractionStore, MemoryInteractionStore};
pub use preferences_store::{MemoryPreferencesStore, PreferencesStore, default_bundle};
