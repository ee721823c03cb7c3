//! Live environment session endpoints.
//!
//! Each session is a [`SessionHandle`] to an actor spawned on the server's
//! runtime. Interactions submitted through these endpoints go through the
//! dispatcher and reach the configured collector, exactly as a pointer
//! click in the rendering client would.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/sessions` | Start a session |
//! | `GET` | `/api/sessions/{id}` | Current session view |
//! | `POST` | `/api/sessions/{id}/interactions` | Click an entity |
//! | `DELETE` | `/api/sessions/{id}` | Shut a session down |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use vrlab_core::dispatch::{DispatchContext, Dispatcher};
use vrlab_core::error::{DispatchError, RuntimeError};
use vrlab_core::runtime::SessionHandle;
use vrlab_core::session::EnvironmentSession;
use vrlab_types::{ContentId, EntityId, SessionId, UserId};

use crate::error::ApiError;
use crate::handlers::rejected;
use crate::state::AppState;

/// Body of `POST /api/sessions`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Environment tag. Unknown or missing tags load the underwater roster.
    #[serde(default)]
    pub environment_type: Option<String>,
    /// User driving the session.
    #[serde(default)]
    pub user_id: Option<u64>,
    /// Catalog item the session was opened from.
    #[serde(default)]
    pub content_id: Option<u64>,
}

/// Body of `POST /api/sessions/{id}/interactions`.
#[derive(Debug, Deserialize)]
pub struct InteractRequest {
    /// Scene tag of the clicked entity.
    pub entity_id: String,
}

fn parse_session_id(raw: &str) -> Result<SessionId, ApiError> {
    Uuid::parse_str(raw)
        .map(SessionId::from)
        .map_err(|e| ApiError::Validation(format!("invalid session id {raw}: {e}")))
}

async fn find_session(state: &AppState, raw: &str) -> Result<SessionHandle, ApiError> {
    let id = parse_session_id(raw)?;
    state
        .session(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("session {id} not found")))
}

fn runtime_error(id: SessionId, error: RuntimeError) -> ApiError {
    match error {
        RuntimeError::Dispatch(DispatchError::UnknownEntity(entity)) => {
            ApiError::Validation(format!("unknown entity: {entity}"))
        }
        RuntimeError::Dispatch(e @ DispatchError::ForeignInteraction { .. }) => {
            ApiError::Validation(e.to_string())
        }
        RuntimeError::Closed | RuntimeError::Dispatch(DispatchError::SessionClosed) => {
            ApiError::NotFound(format!("session {id} is closed"))
        }
    }
}

/// Start a session for an environment.
///
/// # Route
///
/// `POST /api/sessions`
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body.map_err(|e| rejected(&e))?;
    let session =
        EnvironmentSession::initialize_from_tag(request.environment_type.as_deref().unwrap_or_default());
    let context = DispatchContext {
        user_id: request.user_id.map(UserId),
        content_id: request.content_id.map(ContentId),
    };
    let dispatcher = Dispatcher::new(Arc::clone(&state.collector), context);
    let handle = SessionHandle::spawn(session, dispatcher, &state.session_config);

    let view = handle
        .snapshot()
        .await
        .map_err(|e| ApiError::internal("Failed to start session", e))?;
    state.prune_closed().await;
    state.sessions.write().await.insert(handle.id(), handle);

    Ok(Json(json!({
        "success": true,
        "session": view,
    })))
}

/// Current view of a session.
///
/// # Route
///
/// `GET /api/sessions/{id}`
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let handle = find_session(&state, &id).await?;
    let view = handle
        .snapshot()
        .await
        .map_err(|e| runtime_error(handle.id(), e))?;

    Ok(Json(json!({
        "success": true,
        "session": view,
    })))
}

/// Click an entity in a session.
///
/// # Route
///
/// `POST /api/sessions/{id}/interactions`
pub async fn interact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<InteractRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let handle = find_session(&state, &id).await?;
    let Json(request) = body.map_err(|e| rejected(&e))?;
    let event = handle
        .interact(EntityId::new(request.entity_id))
        .await
        .map_err(|e| runtime_error(handle.id(), e))?;

    Ok(Json(json!({
        "success": true,
        "event": event,
    })))
}

/// Shut a session down and forget it.
///
/// # Route
///
/// `DELETE /api/sessions/{id}`
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id = parse_session_id(&id)?;
    let handle = state
        .sessions
        .write()
        .await
        .remove(&session_id)
        .ok_or_else(|| ApiError::NotFound(format!("session {session_id} not found")))?;

    if let Err(e) = handle.shutdown().await {
        tracing::debug!(session_id = %session_id, error = %e, "Session already stopped");
    }

    Ok(Json(json!({
        "success": true,
        "message": "Session closed",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_session_id_is_a_validation_error() {
        assert!(matches!(parse_session_id("not-a-uuid"), Err(ApiError::Validation(_))));
    }

    #[test]
    fn unknown_entity_maps_to_validation() {
        let err = runtime_error(
            SessionId::new(),
            RuntimeError::Dispatch(DispatchError::UnknownEntity(EntityId::from("yeti"))),
        );
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(matches!(
            runtime_error(SessionId::new(), RuntimeError::Closed),
            ApiError::NotFound(_)
        ));
    }
}
