//! Per-user preference bundles.
//!
//! Bundles are stored as raw JSON: a PUT overwrites whatever was there, with
//! no merge and no shape validation. Users who never saved anything get
//! [`UserPreferences::default`], serialized on the way out.

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde_json::{Value, json};
use vrlab_types::{UserId, UserPreferences};

use crate::error::StoreError;

const STORE: &str = "preferences";

/// Storage for preference bundles.
pub trait PreferencesStore: Send + Sync {
    /// The stored bundle for `user`, if any.
    fn get(&self, user: UserId) -> Result<Option<Value>, StoreError>;

    /// Replace the stored bundle for `user`.
    fn put(&self, user: UserId, preferences: Value) -> Result<(), StoreError>;

    /// Drop every stored bundle.
    fn clear(&self) -> Result<(), StoreError>;

    /// The stored bundle for `user`, or the default bundle.
    fn get_or_default(&self, user: UserId) -> Result<Value, StoreError> {
        Ok(self.get(user)?.unwrap_or_else(default_bundle))
    }
}

/// The default bundle as JSON.
pub fn default_bundle() -> Value {
    serde_json::to_value(UserPreferences::default()).unwrap_or(Value::Null)
}

/// [`PreferencesStore`] backed by a map.
#[derive(Debug, Default)]
pub struct MemoryPreferencesStore {
    bundles: RwLock<BTreeMap<UserId, Value>>,
}

impl MemoryPreferencesStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the demo account's saved bundle (user 1 favours the
    /// underwater and forest environments).
    pub fn seeded() -> Self {
        let mut demo = default_bundle();
        if let Some(fields) = demo.as_object_mut() {
            fields.insert(
                "preferred_environments".to_owned(),
                json!(["underwater", "forest"]),
            );
        }
        let mut bundles = BTreeMap::new();
        bundles.insert(UserId(1), demo);
        Self {
            bundles: RwLock::new(bundles),
        }
    }
}

impl PreferencesStore for MemoryPreferencesStore {
    fn get(&self, user: UserId) -> Result<Option<Value>, StoreError> {
        let bundles = self
            .bundles
            .read()
            .map_err(|_poisoned| StoreError::Poisoned(STORE))?;
        Ok(bundles.get(&user).cloned())
    }

    fn put(&self, user: UserId, preferences: Value) -> Result<(), StoreError> {
        self.bundles
            .write()
            .map_err(|_poisoned| StoreError::Poisoned(STORE))?
            .insert(user, preferences);
        tracing::debug!(user_id = %user, "Preferences updated");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.bundles
            .write()
            .map_err(|_poisoned| StoreError::Poisoned(STORE))?
            .clear();
        Ok(())
    }
}
