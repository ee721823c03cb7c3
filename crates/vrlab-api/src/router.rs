//! Axum router construction for the API.
//!
//! Assembles all routes into a single [`Router`] with CORS middleware for
//! the browser client and request tracing.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::sessions;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- minimal HTML index
/// - `POST|GET /api/interactions` -- interaction log
/// - `GET|POST /api/vr-content` -- content catalog
/// - `GET|PUT /api/user-preferences` -- preference bundles
/// - `POST /api/auth/login` -- mock login
/// - `POST /api/sessions`, `GET|DELETE /api/sessions/{id}`,
///   `POST /api/sessions/{id}/interactions` -- live sessions
///
/// CORS allows any origin; the service is a demo backend.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/interactions",
            post(handlers::record_interaction).get(handlers::list_interactions),
        )
        .route(
            "/api/vr-content",
            get(handlers::list_content).post(handlers::create_content),
        )
        .route(
            "/api/user-preferences",
            get(handlers::get_preferences).put(handlers::update_preferences),
        )
        .route("/api/auth/login", post(handlers::login))
        .route("/api/sessions", post(sessions::create_session))
        .route(
            "/api/sessions/{id}",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/api/sessions/{id}/interactions", post(sessions::interact))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
