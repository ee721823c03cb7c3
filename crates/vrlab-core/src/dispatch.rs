//! The interaction dispatcher.
//!
//! Turns a pointer action on an entity into an [`InteractionEvent`],
//! highlights the entity, and hands the event to the [`Collector`]. The
//! highlight is applied before submission and is never rolled back, whatever
//! happens to the submission.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use rand::seq::IndexedRandom;
use serde_json::Value;
use tokio::time::Instant;
use vrlab_types::{
    ContentId, Entity, EntityId, InteractionEvent, InteractionSubmission, InteractionType, UserId,
    Weather,
};

use crate::collector::Collector;
use crate::error::DispatchError;
use crate::roster::{Behaviour, RosterEntry};
use crate::session::EnvironmentSession;

/// Activities the commander switches between when clicked.
pub const ASTRONAUT_ACTIVITIES: [&str; 4] = [
    "conducting experiments",
    "monitoring systems",
    "exercising",
    "communicating with Earth",
];

/// Who the dispatched interactions belong to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchContext {
    /// User driving the session.
    pub user_id: Option<UserId>,
    /// Catalog item the session was opened from.
    pub content_id: Option<ContentId>,
}

/// Builds interaction events and forwards them to a collector.
pub struct Dispatcher {
    collector: Arc<dyn Collector>,
    context: DispatchContext,
    last_timestamp: i64,
}

impl core::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("context", &self.context)
            .field("last_timestamp", &self.last_timestamp)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Create a dispatcher submitting to `collector`.
    pub fn new(collector: Arc<dyn Collector>, context: DispatchContext) -> Self {
        Self {
            collector,
            context,
            last_timestamp: 0,
        }
    }

    /// Dispatch an interaction of type `interaction` on `entity_id`.
    ///
    /// The details text is built from the entity. The entity is highlighted
    /// for its roster duration and the event is submitted to the collector.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::SessionClosed`] if the session was shut down.
    /// - [`DispatchError::UnknownEntity`] if the entity is not in the roster.
    /// - [`DispatchError::ForeignInteraction`] if the type belongs to another
    ///   environment.
    ///
    /// No event is produced on error.
    pub fn dispatch<F>(
        &mut self,
        session: &mut EnvironmentSession,
        entity_id: &EntityId,
        interaction: InteractionType,
        details: F,
        now: Instant,
    ) -> Result<InteractionEvent, DispatchError>
    where
        F: FnOnce(&Entity) -> Option<String>,
    {
        let entry = lookup(session, entity_id)?;
        if interaction.environment() != session.kind() {
            return Err(DispatchError::ForeignInteraction {
                interaction,
                environment: session.kind(),
            });
        }
        let details = details(&entry.entity);
        self.emit(session, &entry, interaction, details, BTreeMap::new(), now)
    }

    /// Handle a pointer click on `entity_id` using the entity's roster reaction.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch), minus `ForeignInteraction`.
    pub fn interact(
        &mut self,
        session: &mut EnvironmentSession,
        entity_id: &EntityId,
        now: Instant,
    ) -> Result<InteractionEvent, DispatchError> {
        let entry = lookup(session, entity_id)?;
        let mut extra = BTreeMap::new();

        match entry.behaviour {
            Behaviour::Plain => {}
            Behaviour::AdvancesPhase => {
                if let Some(phase) = session.advance_phase() {
                    tracing::info!(session_id = %session.id(), phase, "Phase advanced");
                    extra.insert("phase".to_owned(), Value::from(phase));
                }
            }
            Behaviour::ReportsActivity => {
                let activity = ASTRONAUT_ACTIVITIES
                    .choose(&mut rand::rng())
                    .copied()
                    .unwrap_or("monitoring systems");
                session.set_activity(activity);
                extra.insert("activity".to_owned(), Value::from(activity));
            }
            Behaviour::ReportsConditions => {
                let weather = session.weather().unwrap_or(Weather::Clear);
                extra.insert("weather".to_owned(), Value::from(weather.as_str()));
                if let Some(altitude) = session.altitude_m() {
                    extra.insert("altitude".to_owned(), Value::from(altitude));
                }
            }
        }

        let details = entry.details.clone();
        self.emit(session, &entry, entry.interaction, details, extra, now)
    }

    fn emit(
        &mut self,
        session: &mut EnvironmentSession,
        entry: &RosterEntry,
        interaction: InteractionType,
        details: Option<String>,
        extra: BTreeMap<String, Value>,
        now: Instant,
    ) -> Result<InteractionEvent, DispatchError> {
        session.set_highlight(&entry.entity.id, entry.highlight, now)?;

        let timestamp = Utc::now().timestamp_millis().max(self.last_timestamp);
        self.last_timestamp = timestamp;

        let event = InteractionEvent {
            kind: interaction,
            target: entry.entity.id.clone(),
            timestamp,
            details,
            extra: (!extra.is_empty()).then_some(extra),
        };

        tracing::debug!(
            session_id = %session.id(),
            interaction_type = %event.kind,
            target = %event.target,
            "Interaction dispatched"
        );

        self.collector.submit(self.submission(session, &event));
        Ok(event)
    }

    fn submission(&self, session: &EnvironmentSession, event: &InteractionEvent) -> InteractionSubmission {
        let interaction_data = serde_json::to_value(event).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to encode interaction event");
            Value::Null
        });
        InteractionSubmission {
            user_id: self.context.user_id,
            content_id: self.context.content_id,
            session_id: Some(session.id().to_string()),
            interaction_type: Some(event.kind.as_str().to_owned()),
            interaction_data,
            position_data: None,
            extra: serde_json::Map::new(),
        }
    }
}

fn lookup(session: &EnvironmentSession, entity_id: &EntityId) -> Result<RosterEntry, DispatchError> {
    if session.is_closed() {
        return Err(DispatchError::SessionClosed);
    }
    session
        .entry(entity_id)
        .cloned()
        .ok_or_else(|| DispatchError::UnknownEntity(entity_id.clone()))
}
