//! The environment session: one environment's roster plus its transient UI
//! state.
//!
//! A session is plain data with no I/O and no timers of its own. Expiry is
//! driven from outside by calling [`EnvironmentSession::clear_expired`] with
//! the current time; the [`runtime`](crate::runtime) actor does that when the
//! earliest deadline passes.

use std::time::Duration;

use tokio::time::Instant;
use vrlab_types::{
    Entity, EntityId, EntityKind, EntityView, EnvironmentKind, SessionId, SessionView, Weather,
};

use crate::error::DispatchError;
use crate::highlight::HighlightBoard;
use crate::phase::PhaseRing;
use crate::roster::{self, RosterEntry};

/// Commander activity before the first click.
pub const INITIAL_ACTIVITY: &str = "monitoring";

/// Base camp altitude in metres.
pub const BASE_CAMP_ALTITUDE_M: u32 = 5364;

/// A running environment session.
#[derive(Debug, Clone)]
pub struct EnvironmentSession {
    id: SessionId,
    kind: EnvironmentKind,
    entries: Vec<RosterEntry>,
    highlights: HighlightBoard,
    phase: Option<PhaseRing>,
    activity: Option<String>,
    weather: Option<Weather>,
    altitude_m: Option<u32>,
    closed: bool,
}

impl EnvironmentSession {
    /// Load the fixed roster for `kind`.
    pub fn initialize(kind: EnvironmentKind) -> Self {
        let mountain = kind == EnvironmentKind::Mountain;
        Self {
            id: SessionId::new(),
            kind,
            entries: roster::roster(kind),
            highlights: HighlightBoard::new(),
            phase: PhaseRing::for_environment(kind),
            activity: (kind == EnvironmentKind::Space).then(|| INITIAL_ACTIVITY.to_owned()),
            weather: mountain.then_some(Weather::Clear),
            altitude_m: mountain.then_some(BASE_CAMP_ALTITUDE_M),
            closed: false,
        }
    }

    /// Load the roster named by a wire tag. Unrecognized tags load the
    /// underwater roster.
    pub fn initialize_from_tag(tag: &str) -> Self {
        let kind = EnvironmentKind::parse(tag).unwrap_or_else(|| {
            tracing::warn!(
                environment = tag,
                fallback = %EnvironmentKind::Underwater,
                "Unknown environment, loading default roster"
            );
            EnvironmentKind::Underwater
        });
        Self::initialize(kind)
    }

    /// Session id.
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Environment the roster was loaded from.
    pub const fn kind(&self) -> EnvironmentKind {
        self.kind
    }

    /// All roster entries, in scene order.
    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    /// Look up a roster entry by entity id.
    pub fn entry(&self, id: &EntityId) -> Option<&RosterEntry> {
        self.entries.iter().find(|e| &e.entity.id == id)
    }

    /// Look up an entity by id.
    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.entry(id).map(|e| &e.entity)
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Highlight an entity until `now + duration`. A second call before
    /// expiry replaces the deadline.
    pub fn set_highlight(
        &mut self,
        id: &EntityId,
        duration: Duration,
        now: Instant,
    ) -> Result<(), DispatchError> {
        if self.closed {
            return Err(DispatchError::SessionClosed);
        }
        if self.entry(id).is_none() {
            return Err(DispatchError::UnknownEntity(id.clone()));
        }
        self.highlights.set(id.clone(), now, duration);
        Ok(())
    }

    /// Whether an entity is highlighted at `now`.
    pub fn is_highlighted(&self, id: &EntityId, now: Instant) -> bool {
        self.highlights.is_active(id, now)
    }

    /// Remove highlights whose deadline is at or before `now`.
    pub fn clear_expired(&mut self, now: Instant) -> Vec<EntityId> {
        self.highlights.clear_expired(now)
    }

    /// The earliest pending highlight deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.highlights.next_deadline()
    }

    /// Current phase, for environments with a phase cycle.
    pub fn phase(&self) -> Option<&'static str> {
        self.phase.as_ref().map(PhaseRing::current)
    }

    /// Advance the phase ring and return the new phase.
    pub fn advance_phase(&mut self) -> Option<&'static str> {
        self.phase.as_mut().map(PhaseRing::advance)
    }

    /// What the commander is doing, in the space station.
    pub fn activity(&self) -> Option<&str> {
        self.activity.as_deref()
    }

    /// Replace the commander activity. Ignored outside the space station.
    pub fn set_activity(&mut self, activity: &str) {
        if let Some(current) = self.activity.as_mut() {
            activity.clone_into(current);
        }
    }

    /// Base camp weather, on the mountain.
    pub const fn weather(&self) -> Option<Weather> {
        self.weather
    }

    /// Replace the base camp weather. Ignored off the mountain.
    pub fn set_weather(&mut self, weather: Weather) {
        if let Some(current) = self.weather.as_mut() {
            *current = weather;
        }
    }

    /// Base camp altitude, on the mountain.
    pub const fn altitude_m(&self) -> Option<u32> {
        self.altitude_m
    }

    /// Tear the session down: drop every highlight and refuse further ones.
    pub fn shutdown(&mut self) {
        self.highlights.clear_all();
        self.closed = true;
    }

    /// Snapshot the session for the rendering client, as of `now`.
    pub fn view(&self, now: Instant) -> SessionView {
        let entities = self
            .entries
            .iter()
            .map(|entry| {
                let entity = &entry.entity;
                let highlighted = self.highlights.is_active(&entity.id, now);
                let speech = (highlighted && entity.kind == EntityKind::Avatar)
                    .then(|| roster::greeting(&entity.display_name));
                EntityView {
                    id: entity.id.clone(),
                    kind: entity.kind,
                    display_name: entity.display_name.clone(),
                    highlighted,
                    speech,
                }
            })
            .collect();

        SessionView {
            session_id: self.id,
            environment: self.kind,
            phase: self.phase().map(str::to_owned),
            activity: self.activity.clone(),
            weather: self.weather,
            altitude_m: self.altitude_m,
            entities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn unknown_tag_loads_ocean_roster() {
        for tag in ["volcano", "", "UNDERWATER"] {
            let session = EnvironmentSession::initialize_from_tag(tag);
            assert_eq!(session.kind(), EnvironmentKind::Underwater);
            assert!(session.entity(&EntityId::from("marine_biologist")).is_some());
        }
    }

    #[test]
    fn initialize_is_deterministic() {
        let a = EnvironmentSession::initialize(EnvironmentKind::Urban);
        let b = EnvironmentSession::initialize(EnvironmentKind::Urban);
        assert_eq!(a.entries(), b.entries());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn highlight_reset_is_not_additive() {
        let start = Instant::now();
        let fish = EntityId::from("tropical_fish_3");
        let mut session = EnvironmentSession::initialize(EnvironmentKind::Underwater);

        assert!(session.set_highlight(&fish, ms(2000), start).is_ok());
        assert!(session.set_highlight(&fish, ms(3000), start + ms(1000)).is_ok());

        assert!(session.clear_expired(start + ms(2500)).is_empty());
        assert!(session.is_highlighted(&fish, start + ms(2500)));
        assert_eq!(session.clear_expired(start + ms(4000)), vec![fish.clone()]);
        assert!(!session.is_highlighted(&fish, start + ms(4000)));
    }

    #[test]
    fn unknown_entity_cannot_be_highlighted() {
        let mut session = EnvironmentSession::initialize(EnvironmentKind::Forest);
        let err = session.set_highlight(&EntityId::from("bear_9"), ms(3000), Instant::now());
        assert_eq!(err, Err(DispatchError::UnknownEntity(EntityId::from("bear_9"))));
        assert!(session.next_deadline().is_none());
    }

    #[test]
    fn shutdown_drops_highlights_and_refuses_new_ones() {
        let now = Instant::now();
        let deer = EntityId::from("deer_1");
        let mut session = EnvironmentSession::initialize(EnvironmentKind::Forest);
        assert!(session.set_highlight(&deer, ms(3000), now).is_ok());

        session.shutdown();

        assert!(session.is_closed());
        assert!(session.next_deadline().is_none());
        assert_eq!(
            session.set_highlight(&deer, ms(3000), now),
            Err(DispatchError::SessionClosed)
        );
    }

    #[test]
    fn avatar_speech_follows_highlight() {
        let now = Instant::now();
        let ranger = EntityId::from("forest_ranger");
        let mut session = EnvironmentSession::initialize(EnvironmentKind::Forest);
        assert!(session.set_highlight(&ranger, ms(3000), now).is_ok());

        let speech = |view: &SessionView| {
            view.entities
                .iter()
                .find(|e| e.id == ranger)
                .and_then(|e| e.speech.clone())
        };
        assert_eq!(
            speech(&session.view(now)).as_deref(),
            Some("Hello! I'm Ranger Sarah. Welcome to this amazing place!")
        );
        assert_eq!(speech(&session.view(now + ms(3000))), None);
    }

    #[test]
    fn labels_only_exist_where_they_apply() {
        let space = EnvironmentSession::initialize(EnvironmentKind::Space);
        assert_eq!(space.activity(), Some(INITIAL_ACTIVITY));
        assert_eq!(space.weather(), None);

        let mut forest = EnvironmentSession::initialize(EnvironmentKind::Forest);
        forest.set_weather(Weather::Snowing);
        forest.set_activity("exercising");
        assert_eq!(forest.weather(), None);
        assert_eq!(forest.activity(), None);

        let mountain = EnvironmentSession::initialize(EnvironmentKind::Mountain);
        let view = mountain.view(Instant::now());
        assert_eq!(view.weather, Some(Weather::Clear));
        assert_eq!(view.altitude_m, Some(BASE_CAMP_ALTITUDE_M));
        assert_eq!(view.phase, None);
    }
}
