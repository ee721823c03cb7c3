//! Append-only interaction log.
//!
//! Records are numbered from 1 in append order and stamped with the server
//! receive time. The log is unbounded and lives for the lifetime of the
//! process; there is no pagination and no deduplication.

use std::sync::RwLock;

use chrono::Utc;
use vrlab_types::{InteractionRecord, InteractionSubmission, UserId};

use crate::error::StoreError;

const STORE: &str = "interaction";

/// Record fields a client-supplied extra field may not shadow.
const RESERVED_KEYS: [&str; 2] = ["id", "timestamp"];

/// Optional filters for [`InteractionStore::list`]. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionFilter {
    /// Only records submitted for this user.
    pub user_id: Option<UserId>,
    /// Only records carrying this session tag.
    pub session_id: Option<String>,
}

impl InteractionFilter {
    fn matches(&self, record: &InteractionRecord) -> bool {
        let submission = &record.submission;
        self.user_id.is_none_or(|id| submission.user_id == Some(id))
            && self
                .session_id
                .as_deref()
                .is_none_or(|tag| submission.session_id.as_deref() == Some(tag))
    }
}

/// Storage for interaction records.
pub trait InteractionStore: Send + Sync {
    /// Append a submission and return the stored record.
    fn append(&self, submission: InteractionSubmission) -> Result<InteractionRecord, StoreError>;

    /// Records matching `filter`, in append order.
    fn list(&self, filter: &InteractionFilter) -> Result<Vec<InteractionRecord>, StoreError>;

    /// Drop every record.
    fn clear(&self) -> Result<(), StoreError>;
}

/// [`InteractionStore`] backed by a vector.
#[derive(Debug, Default)]
pub struct MemoryInteractionStore {
    records: RwLock<Vec<InteractionRecord>>,
}

impl MemoryInteractionStore {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }
}

impl InteractionStore for MemoryInteractionStore {
    fn append(&self, mut submission: InteractionSubmission) -> Result<InteractionRecord, StoreError> {
        // The log assigns these.
        for key in RESERVED_KEYS {
            submission.extra.remove(key);
        }
        let mut records = self
            .records
            .write()
            .map_err(|_poisoned| StoreError::Poisoned(STORE))?;
        let id = u64::try_from(records.len())
            .unwrap_or(u64::MAX)
            .saturating_add(1);
        let record = InteractionRecord {
            id,
            submission,
            timestamp: Utc::now(),
        };
        records.push(record.clone());
        tracing::debug!(
            id,
            interaction_type = record.submission.interaction_type.as_deref().unwrap_or_default(),
            "Interaction recorded"
        );
        Ok(record)
    }

    fn list(&self, filter: &InteractionFilter) -> Result<Vec<InteractionRecord>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_poisoned| StoreError::Poisoned(STORE))?;
        Ok(records.iter().filter(|r| filter.matches(r)).cloned().collect())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.records
            .write()
            .map_err(|_poisoned| StoreError::Poisoned(STORE))?
            .clear();
        Ok(())
    }
}
