//! Shared application state for the API server.
//!
//! [`AppState`] holds the injectable stores, the collector that live
//! sessions submit to, and the registry of running sessions. The stores are
//! created once at startup and cleared by [`AppState::shutdown`].

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use vrlab_core::collector::Collector;
use vrlab_core::config::SessionConfig;
use vrlab_core::runtime::SessionHandle;
use vrlab_store::{
    ContentCatalog, InteractionStore, MemoryContentCatalog, MemoryInteractionStore,
    MemoryPreferencesStore, PreferencesStore,
};
use vrlab_types::{InteractionSubmission, SessionId};

/// Collector that appends straight into an [`InteractionStore`].
///
/// Used when no remote collector endpoint is configured, so interactions
/// from live sessions show up in `GET /api/interactions`.
pub struct StoreCollector {
    store: Arc<dyn InteractionStore>,
}

impl StoreCollector {
    /// Create a collector writing to `store`.
    pub fn new(store: Arc<dyn InteractionStore>) -> Self {
        Self { store }
    }
}

impl Collector for StoreCollector {
    fn submit(&self, submission: InteractionSubmission) {
        if let Err(e) = self.store.append(submission) {
            tracing::warn!(error = %e, "Failed to record interaction, dropping");
        }
    }
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Interaction log.
    pub interactions: Arc<dyn InteractionStore>,
    /// Content library.
    pub catalog: Arc<dyn ContentCatalog>,
    /// Preference bundles.
    pub preferences: Arc<dyn PreferencesStore>,
    /// Where live sessions submit their interactions.
    pub collector: Arc<dyn Collector>,
    /// Running sessions, keyed by id.
    pub sessions: Arc<RwLock<BTreeMap<SessionId, SessionHandle>>>,
    /// Settings for newly spawned sessions.
    pub session_config: SessionConfig,
}

impl AppState {
    /// Assemble state from explicit collaborators.
    pub fn new(
        interactions: Arc<dyn InteractionStore>,
        catalog: Arc<dyn ContentCatalog>,
        preferences: Arc<dyn PreferencesStore>,
        collector: Arc<dyn Collector>,
        session_config: SessionConfig,
    ) -> Self {
        Self {
            interactions,
            catalog,
            preferences,
            collector,
            sessions: Arc::new(RwLock::new(BTreeMap::new())),
            session_config,
        }
    }

    /// Seeded in-memory stores, with sessions recording into the local
    /// interaction log.
    pub fn in_memory(session_config: SessionConfig) -> Self {
        let interactions: Arc<dyn InteractionStore> = Arc::new(MemoryInteractionStore::new());
        let collector = Arc::new(StoreCollector::new(Arc::clone(&interactions)));
        Self::new(
            interactions,
            Arc::new(MemoryContentCatalog::seeded()),
            Arc::new(MemoryPreferencesStore::seeded()),
            collector,
            session_config,
        )
    }

    /// Drop registry entries whose actor has stopped on its own (idle
    /// timeout). Returns how many were removed.
    pub async fn prune_closed(&self) -> usize {
        let mut registry = self.sessions.write().await;
        let before = registry.len();
        registry.retain(|_, handle| !handle.is_closed());
        let pruned = before.saturating_sub(registry.len());
        if pruned > 0 {
            tracing::debug!(pruned, "Pruned stopped sessions");
        }
        pruned
    }

    /// Replace the collector live sessions submit to.
    #[must_use]
    pub fn with_collector(mut self, collector: Arc<dyn Collector>) -> Self {
        self.collector = collector;
        self
    }

    /// Look up a running session.
    pub async fn session(&self, id: SessionId) -> Option<SessionHandle> {
        self.prune_closed().await;
        self.sessions.read().await.get(&id).cloned()
    }

    /// Stop every running session and clear the stores.
    pub async fn shutdown(&self) {
        let sessions: Vec<SessionHandle> = {
            let mut registry = self.sessions.write().await;
            let handles = registry.values().cloned().collect();
            registry.clear();
            handles
        };
        for handle in &sessions {
            if let Err(e) = handle.shutdown().await {
                tracing::debug!(session_id = %handle.id(), error = %e, "Session already stopped");
            }
        }

        let cleared = [
            self.interactions.clear(),
            self.catalog.clear(),
            self.preferences.clear(),
        ];
        for result in cleared {
            if let Err(e) = result {
                tracing::warn!(error = %e, "Failed to clear store during shutdown");
            }
        }
        tracing::info!(sessions = sessions.len(), "Application state shut down");
    }
}
