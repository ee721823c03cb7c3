//! Session runtime: a Tokio task that exclusively owns one
//! [`EnvironmentSession`] and its [`Dispatcher`].
//!
//! Callers talk to the task through a cloneable [`SessionHandle`]. Commands
//! arrive over an mpsc channel and are answered over oneshot channels, so all
//! mutation of a session happens on a single logical thread. Between
//! commands the task sleeps until the earliest highlight deadline and then
//! clears expired highlights. Mountain sessions also re-roll the base camp
//! weather on a fixed interval.
//!
//! [`SessionHandle::shutdown`] stops the task and drops every pending expiry.
//! Dropping every handle stops it too, and so does going a whole
//! `idle_timeout` without receiving a command.

use std::time::Duration;

use rand::seq::IndexedRandom;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};
use vrlab_types::{EntityId, EnvironmentKind, InteractionEvent, SessionId, SessionView, Weather};

use crate::config::SessionConfig;
use crate::dispatch::Dispatcher;
use crate::error::{DispatchError, RuntimeError};
use crate::session::EnvironmentSession;

/// Smallest weather period or idle timeout accepted; shorter configured
/// values are raised to this.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Longest idle timeout accepted.
const MAX_IDLE_TIMEOUT: Duration = Duration::from_secs(7 * 24 * 60 * 60);

enum Command {
    Interact {
        entity_id: EntityId,
        reply: oneshot::Sender<Result<InteractionEvent, DispatchError>>,
    },
    Highlight {
        entity_id: EntityId,
        duration: Duration,
        reply: oneshot::Sender<Result<(), DispatchError>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionView>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Cloneable handle to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    environment: EnvironmentKind,
    tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    /// Spawn the session actor on the current Tokio runtime.
    pub fn spawn(session: EnvironmentSession, dispatcher: Dispatcher, config: &SessionConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.command_buffer.max(1));
        let handle = Self {
            id: session.id(),
            environment: session.kind(),
            tx,
        };
        let actor = SessionActor {
            session,
            dispatcher,
            weather_interval: config.weather_interval().max(MIN_PERIOD),
            idle_timeout: config.idle_timeout().clamp(MIN_PERIOD, MAX_IDLE_TIMEOUT),
        };
        info!(
            session_id = %handle.id,
            environment = %handle.environment,
            "Session started"
        );
        tokio::spawn(actor.run(rx));
        handle
    }

    /// Session id.
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Environment the session runs.
    pub const fn environment(&self) -> EnvironmentKind {
        self.environment
    }

    /// Forward a pointer click on `entity_id`.
    pub async fn interact(&self, entity_id: EntityId) -> Result<InteractionEvent, RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Interact { entity_id, reply }).await?;
        rx.await
            .map_err(|_closed| RuntimeError::Closed)?
            .map_err(RuntimeError::from)
    }

    /// Highlight `entity_id` for `duration`, replacing any pending expiry.
    pub async fn highlight(&self, entity_id: EntityId, duration: Duration) -> Result<(), RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Highlight {
            entity_id,
            duration,
            reply,
        })
        .await?;
        rx.await
            .map_err(|_closed| RuntimeError::Closed)?
            .map_err(RuntimeError::from)
    }

    /// Snapshot the session as of now.
    pub async fn snapshot(&self) -> Result<SessionView, RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply }).await?;
        rx.await.map_err(|_closed| RuntimeError::Closed)
    }

    /// Stop the session. Pending expiries are dropped and later commands fail
    /// with [`RuntimeError::Closed`].
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Shutdown { reply }).await?;
        rx.await.map_err(|_closed| RuntimeError::Closed)
    }

    /// Whether the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    async fn send(&self, command: Command) -> Result<(), RuntimeError> {
        self.tx
            .send(command)
            .await
            .map_err(|_closed| RuntimeError::Closed)
    }
}

struct SessionActor {
    session: EnvironmentSession,
    dispatcher: Dispatcher,
    weather_interval: Duration,
    idle_timeout: Duration,
}

impl SessionActor {
    async fn run(mut self, mut rx: mpsc::Receiver<Command>) {
        let tracks_weather = self.session.weather().is_some();
        let first_change = Instant::now()
            .checked_add(self.weather_interval)
            .unwrap_or_else(Instant::now);
        let mut weather = tokio::time::interval_at(first_change, self.weather_interval);
        weather.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut idle_deadline = self.idle_deadline();

        loop {
            let deadline = self.session.next_deadline();
            tokio::select! {
                command = rx.recv() => {
                    match command {
                        Some(command) => {
                            if !self.handle(command) {
                                break;
                            }
                            idle_deadline = self.idle_deadline();
                        }
                        None => {
                            debug!(session_id = %self.session.id(), "All session handles dropped");
                            break;
                        }
                    }
                }
                () = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    let cleared = self.session.clear_expired(Instant::now());
                    if !cleared.is_empty() {
                        debug!(
                            session_id = %self.session.id(),
                            cleared = cleared.len(),
                            "Highlights expired"
                        );
                    }
                }
                _ = weather.tick(), if tracks_weather => {
                    self.roll_weather();
                }
                () = tokio::time::sleep_until(idle_deadline) => {
                    info!(
                        session_id = %self.session.id(),
                        idle = ?self.idle_timeout,
                        "Session idle, shutting down"
                    );
                    break;
                }
            }
        }

        self.session.shutdown();
        info!(session_id = %self.session.id(), "Session stopped");
    }

    fn idle_deadline(&self) -> Instant {
        let now = Instant::now();
        now.checked_add(self.idle_timeout).unwrap_or(now)
    }

    /// Apply one command. Returns `false` when the actor should stop.
    fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Interact { entity_id, reply } => {
                let result = self
                    .dispatcher
                    .interact(&mut self.session, &entity_id, Instant::now());
                let _ = reply.send(result);
            }
            Command::Highlight {
                entity_id,
                duration,
                reply,
            } => {
                let result = self
                    .session
                    .set_highlight(&entity_id, duration, Instant::now());
                let _ = reply.send(result);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.session.view(Instant::now()));
            }
            Command::Shutdown { reply } => {
                self.session.shutdown();
                let _ = reply.send(());
                return false;
            }
        }
        true
    }

    fn roll_weather(&mut self) {
        if let Some(weather) = Weather::ALL.choose(&mut rand::rng()).copied() {
            self.session.set_weather(weather);
            debug!(session_id = %self.session.id(), weather = weather.as_str(), "Weather changed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use vrlab_types::InteractionSubmission;

    use super::*;
    use crate::collector::Collector;
    use crate::dispatch::DispatchContext;

    #[derive(Default)]
    struct Recording {
        submissions: Mutex<Vec<InteractionSubmission>>,
    }

    impl Collector for Recording {
        fn submit(&self, submission: InteractionSubmission) {
            if let Ok(mut s) = self.submissions.lock() {
                s.push(submission);
            }
        }
    }

    fn start(kind: EnvironmentKind) -> (SessionHandle, Arc<Recording>) {
        start_with(kind, &SessionConfig::default())
    }

    fn start_with(kind: EnvironmentKind, config: &SessionConfig) -> (SessionHandle, Arc<Recording>) {
        let recording = Arc::new(Recording::default());
        let dispatcher = Dispatcher::new(recording.clone(), DispatchContext::default());
        let handle = SessionHandle::spawn(
            EnvironmentSession::initialize(kind),
            dispatcher,
            config,
        );
        (handle, recording)
    }

    async fn highlighted(handle: &SessionHandle, id: &str) -> bool {
        handle
            .snapshot()
            .await
            .ok()
            .and_then(|view| view.entities.into_iter().find(|e| e.id.as_str() == id))
            .is_some_and(|e| e.highlighted)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn forest_click_highlights_then_clears_after_three_seconds() {
        let (handle, recording) = start(EnvironmentKind::Forest);

        let event = handle.interact(EntityId::from("deer_1")).await;
        let event = event.unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(event.details.as_deref(), Some("Observed deer in natural habitat"));
        assert!(highlighted(&handle, "deer_1").await);

        tokio::time::sleep(ms(2999)).await;
        assert!(highlighted(&handle, "deer_1").await);

        tokio::time::sleep(ms(1)).await;
        assert!(!highlighted(&handle, "deer_1").await);

        assert_eq!(recording.submissions.lock().map(|s| s.len()).unwrap_or(0), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rehighlight_resets_expiry() {
        let (handle, _) = start(EnvironmentKind::Underwater);
        let fish = EntityId::from("tropical_fish_5");

        assert!(handle.highlight(fish.clone(), ms(2000)).await.is_ok());
        tokio::time::sleep(ms(1000)).await;
        assert!(handle.highlight(fish.clone(), ms(3000)).await.is_ok());

        tokio::time::sleep(ms(1500)).await;
        assert!(highlighted(&handle, "tropical_fish_5").await);

        tokio::time::sleep(ms(1500)).await;
        assert!(!highlighted(&handle, "tropical_fish_5").await);
    }

    #[tokio::test(start_paused = true)]
    async fn avatar_speech_clears_with_highlight() {
        let (handle, _) = start(EnvironmentKind::Urban);
        assert!(handle.interact(EntityId::from("community_representative")).await.is_ok());

        let speech = |view: SessionView| {
            view.entities
                .into_iter()
                .find(|e| e.id.as_str() == "community_representative")
                .and_then(|e| e.speech)
        };
        let before = handle.snapshot().await.ok().and_then(speech);
        assert_eq!(
            before.as_deref(),
            Some("Hello! I'm Community Rep. James. Welcome to this amazing place!")
        );

        tokio::time::sleep(ms(3000)).await;
        assert_eq!(handle.snapshot().await.ok().and_then(speech), None);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_entity_is_reported() {
        let (handle, recording) = start(EnvironmentKind::Space);
        let result = handle.interact(EntityId::from("airlock")).await;
        assert_eq!(
            result,
            Err(RuntimeError::Dispatch(DispatchError::UnknownEntity(EntityId::from("airlock"))))
        );
        assert_eq!(recording.submissions.lock().map(|s| s.len()).unwrap_or(0), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_rejects_later_commands() {
        let (handle, _) = start(EnvironmentKind::Forest);
        assert!(handle.interact(EntityId::from("bird_3")).await.is_ok());

        assert_eq!(handle.shutdown().await, Ok(()));
        tokio::time::sleep(ms(3000)).await;

        assert!(handle.is_closed());
        assert_eq!(handle.snapshot().await, Err(RuntimeError::Closed));
        assert_eq!(
            handle.interact(EntityId::from("bird_3")).await,
            Err(RuntimeError::Closed)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn mountain_weather_changes_over_time() {
        let (handle, _) = start(EnvironmentKind::Mountain);
        let initial = handle.snapshot().await.ok().and_then(|v| v.weather);
        assert_eq!(initial, Some(Weather::Clear));

        // Weather is random, so just check it stays a valid condition
        // across several re-rolls.
        for _ in 0..5 {
            tokio::time::sleep(ms(10_000)).await;
            let weather = handle.snapshot().await.ok().and_then(|v| v.weather);
            assert!(weather.is_some_and(|w| Weather::ALL.contains(&w)));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_all_handles_stops_the_actor() {
        let (handle, recording) = start(EnvironmentKind::Forest);
        let other = handle.clone();
        drop(handle);
        assert!(other.snapshot().await.is_ok());

        drop(other);
        tokio::time::sleep(ms(1)).await;
        // The actor owned the only other reference, through its dispatcher.
        assert_eq!(Arc::strong_count(&recording), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_session_shuts_itself_down() {
        let config = SessionConfig {
            idle_timeout_ms: 60_000,
            ..SessionConfig::default()
        };
        let (handle, _) = start_with(EnvironmentKind::Mountain, &config);

        // Each command pushes the deadline back.
        tokio::time::sleep(ms(59_000)).await;
        assert!(handle.interact(EntityId::from("sherpa_guide")).await.is_ok());
        tokio::time::sleep(ms(59_000)).await;
        assert!(handle.snapshot().await.is_ok());
        assert!(!handle.is_closed());

        // Weather re-rolls do not count as activity.
        tokio::time::sleep(ms(60_001)).await;
        assert!(handle.is_closed());
        assert_eq!(handle.snapshot().await, Err(RuntimeError::Closed));
    }
}
