//! Error types for the interaction pipeline.

use vrlab_types::{EntityId, EnvironmentKind, InteractionType};

/// Errors raised while highlighting or dispatching on a session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The entity is not part of the session's roster.
    #[error("unknown entity: {0}")]
    UnknownEntity(EntityId),

    /// The interaction type belongs to a different environment.
    #[error("interaction {interaction} does not belong to the {environment} environment")]
    ForeignInteraction {
        /// The rejected interaction type.
        interaction: InteractionType,
        /// The session's environment.
        environment: EnvironmentKind,
    },

    /// The session has been shut down.
    #[error("session is closed")]
    SessionClosed,
}

/// Errors returned by a [`SessionHandle`](crate::runtime::SessionHandle).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// The session actor has stopped.
    #[error("session runtime is closed")]
    Closed,

    /// The session rejected the command.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
