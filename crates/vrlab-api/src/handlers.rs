//! REST endpoint handlers for the mock API surface.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML index |
//! | `POST` | `/api/interactions` | Record an interaction |
//! | `GET` | `/api/interactions` | List interactions (by user or session) |
//! | `GET` | `/api/vr-content` | List catalog items (by environment or difficulty) |
//! | `POST` | `/api/vr-content` | Echo a new catalog item |
//! | `GET` | `/api/user-preferences` | Fetch a user's preferences |
//! | `PUT` | `/api/user-preferences` | Overwrite a user's preferences |
//! | `POST` | `/api/auth/login` | Mock login |
//!
//! Session endpoints live in [`crate::sessions`].

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use vrlab_store::{ContentFilter, InteractionFilter};
use vrlab_types::{InteractionSubmission, UserAccount, UserId};

use crate::error::ApiError;
use crate::state::AppState;

/// Shared password of every demo account.
const DEMO_PASSWORD: &str = "demo123";

const RECORD_FAILED: &str = "Failed to record interaction";

/// Demo accounts accepted by the mock login: `(id, email, username)`.
const DEMO_ACCOUNTS: [(u64, &str, &str); 3] = [
    (1, "name@gmail.com", "user"),
    (2, "name1@gmail.com", "user1"),
    (3, "name2@gmail.com", "vr_exp"),
];

// ---------------------------------------------------------------------------
// Query and body structs
// ---------------------------------------------------------------------------

/// Query parameters for `GET /api/interactions`.
#[derive(Debug, Default, Deserialize)]
pub struct InteractionsQuery {
    /// Only interactions by this user.
    pub user_id: Option<u64>,
    /// Only interactions with this session tag.
    pub session_id: Option<String>,
}

/// Query parameters for `GET /api/vr-content`.
#[derive(Debug, Default, Deserialize)]
pub struct ContentQuery {
    /// Environment tag.
    pub environment_type: Option<String>,
    /// Difficulty tag.
    pub difficulty: Option<String>,
}

/// Query parameters for `GET /api/user-preferences`.
#[derive(Debug, Default, Deserialize)]
pub struct PreferencesQuery {
    /// The user whose preferences to fetch. Required.
    pub user_id: Option<String>,
}

/// Body of `PUT /api/user-preferences`.
#[derive(Debug, Deserialize)]
pub struct PreferencesUpdate {
    /// The user whose preferences to overwrite. Required.
    #[serde(default)]
    pub user_id: Option<u64>,
    /// The new bundle, stored as-is.
    #[serde(default)]
    pub preferences: Value,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    #[serde(default)]
    pub email: Option<String>,
    /// Account password.
    #[serde(default)]
    pub password: Option<String>,
}

/// Turn an extractor rejection into a 400.
pub(crate) fn rejected(rejection: &impl core::fmt::Display) -> ApiError {
    ApiError::Validation(rejection.to_string())
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML index
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page listing the API endpoints.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prune_closed().await;
    let sessions = state.sessions.read().await.len();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>VR Lab API</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; }}
        code {{ color: #7ee787; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
    </style>
</head>
<body>
    <h1>VR Lab API</h1>
    <p>Live sessions: {sessions}</p>
    <ul>
        <li><code>POST</code> /api/interactions</li>
        <li><code>GET</code> <a href="/api/interactions">/api/interactions</a>?user_id=&amp;session_id=</li>
        <li><code>GET</code> <a href="/api/vr-content">/api/vr-content</a>?environment_type=&amp;difficulty=</li>
        <li><code>POST</code> /api/vr-content</li>
        <li><code>GET</code> /api/user-preferences?user_id=</li>
        <li><code>PUT</code> /api/user-preferences</li>
        <li><code>POST</code> /api/auth/login</li>
        <li><code>POST</code> /api/sessions</li>
        <li><code>GET</code> /api/sessions/{{id}}</li>
        <li><code>POST</code> /api/sessions/{{id}}/interactions</li>
        <li><code>DELETE</code> /api/sessions/{{id}}</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// Interactions
// ---------------------------------------------------------------------------

/// Append an interaction to the log.
///
/// A body that is not a valid submission answers 500, like any other
/// recording failure.
///
/// # Route
///
/// `POST /api/interactions`
pub async fn record_interaction(
    State(state): State<Arc<AppState>>,
    body: Result<Json<InteractionSubmission>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // An unreadable body is a collector failure, not a validation error.
    let Json(submission) = body.map_err(|e| ApiError::internal(RECORD_FAILED, e))?;
    let record = state
        .interactions
        .append(submission)
        .map_err(|e| ApiError::internal(RECORD_FAILED, e))?;

    Ok(Json(json!({
        "success": true,
        "interaction": record,
        "message": "Interaction recorded successfully",
    })))
}

/// List interactions, optionally filtered by user and session.
///
/// # Route
///
/// `GET /api/interactions?user_id=&session_id=`
pub async fn list_interactions(
    State(state): State<Arc<AppState>>,
    query: Result<Query<InteractionsQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query.map_err(|e| rejected(&e))?;
    let filter = InteractionFilter {
        user_id: query.user_id.map(UserId),
        session_id: query.session_id.filter(|s| !s.is_empty()),
    };
    let interactions = state
        .interactions
        .list(&filter)
        .map_err(|e| ApiError::internal("Failed to fetch interactions", e))?;

    Ok(Json(json!({
        "success": true,
        "total": interactions.len(),
        "interactions": interactions,
    })))
}

// ---------------------------------------------------------------------------
// Content catalog
// ---------------------------------------------------------------------------

/// List catalog items, optionally filtered.
///
/// # Route
///
/// `GET /api/vr-content?environment_type=&difficulty=`
pub async fn list_content(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ContentQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query.map_err(|e| rejected(&e))?;
    let filter = ContentFilter {
        environment_type: query.environment_type.filter(|s| !s.is_empty()),
        difficulty: query.difficulty.filter(|s| !s.is_empty()),
    };
    let content = state
        .catalog
        .list(&filter)
        .map_err(|e| ApiError::internal("Failed to fetch VR content", e))?;

    Ok(Json(json!({
        "success": true,
        "total": content.len(),
        "content": content,
    })))
}

/// Echo a new catalog item with a fresh id and creation time.
///
/// The item is not added to the catalog, so it never shows up in later
/// listings.
///
/// # Route
///
/// `POST /api/vr-content`
pub async fn create_content(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(fields) = body.map_err(|e| rejected(&e))?;
    let id = state
        .catalog
        .next_id()
        .map_err(|e| ApiError::internal("Failed to create VR content", e))?;

    let mut content = Map::new();
    content.insert("id".to_owned(), json!(id));
    content.extend(fields);
    content.insert("created_at".to_owned(), json!(Utc::now()));

    tracing::info!(id = %id, "VR content created (not persisted)");

    Ok(Json(json!({
        "success": true,
        "content": content,
        "message": "VR content created successfully",
    })))
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

fn require_user_id(raw: Option<&str>) -> Result<UserId, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("User ID is required".to_owned()))?;
    raw.parse::<u64>()
        .map(UserId)
        .map_err(|_invalid| ApiError::Validation(format!("Invalid user ID: {raw}")))
}

/// Fetch a user's stored preferences, or the default bundle.
///
/// # Route
///
/// `GET /api/user-preferences?user_id=`
pub async fn get_preferences(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PreferencesQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query.map_err(|e| rejected(&e))?;
    let user = require_user_id(query.user_id.as_deref())?;
    let preferences = state
        .preferences
        .get_or_default(user)
        .map_err(|e| ApiError::internal("Failed to fetch user preferences", e))?;

    Ok(Json(json!({
        "success": true,
        "preferences": preferences,
    })))
}

/// Overwrite a user's preferences.
///
/// # Route
///
/// `PUT /api/user-preferences`
pub async fn update_preferences(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PreferencesUpdate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(update) = body.map_err(|e| rejected(&e))?;
    let user = update
        .user_id
        .map(UserId)
        .ok_or_else(|| ApiError::Validation("User ID is required".to_owned()))?;
    state
        .preferences
        .put(user, update.preferences.clone())
        .map_err(|e| ApiError::internal("Failed to update preferences", e))?;

    Ok(Json(json!({
        "success": true,
        "message": "Preferences updated successfully",
        "preferences": update.preferences,
    })))
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Mock login against the demo allow-list.
///
/// The token is an opaque string that is never verified. An unreadable
/// body is a 500; unknown accounts and wrong passwords are a 401.
///
/// # Route
///
/// `POST /api/auth/login`
pub async fn login(body: Result<Json<LoginRequest>, JsonRejection>) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::internal("Authentication failed", e))?;
    let account = DEMO_ACCOUNTS
        .iter()
        .find(|(_, email, _)| request.email.as_deref() == Some(*email))
        .filter(|_| request.password.as_deref() == Some(DEMO_PASSWORD))
        .map(|&(id, email, username)| UserAccount {
            id: UserId(id),
            email: email.to_owned(),
            username: username.to_owned(),
        });

    let Some(user) = account else {
        tracing::info!(email = request.email.as_deref().unwrap_or_default(), "Login rejected");
        return Err(ApiError::Auth("Invalid credentials".to_owned()));
    };

    let token = format!("mock_token_{}_{}", user.id, Utc::now().timestamp_millis());
    tracing::info!(user_id = %user.id, "Login accepted");

    Ok(Json(json!({
        "success": true,
        "user": user,
        "token": token,
    })))
}
