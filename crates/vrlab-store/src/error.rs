//! Error types for the store layer.
//!
//! The in-memory stores guard their state with [`std::sync::RwLock`]. A
//! writer that panicked while holding the lock leaves it poisoned; every
//! later access reports [`StoreError::Poisoned`] instead of reading state
//! that may be half-written.

/// Errors that can occur in the store layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The named store's lock was poisoned.
    #[error("{0} store lock poisoned")]
    Poisoned(&'static str),
}
