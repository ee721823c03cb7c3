//! HTTP API for the VR Lab interaction service.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Mock API endpoints** over the injectable stores: interaction log,
//!   content catalog, user preferences, and a demo login
//! - **Session endpoints** that start environment sessions, forward
//!   entity clicks through the interaction dispatcher, and serve the
//!   session view the rendering client draws
//! - **Minimal HTML index** (`GET /`) listing the endpoints
//!
//! # Architecture
//!
//! Handlers share an [`AppState`] holding `Arc<dyn ...>` stores and a
//! registry of [`SessionHandle`]s. Each live session is an actor task that
//! owns its state exclusively; handlers only send it commands.
//!
//! [`SessionHandle`]: vrlab_core::runtime::SessionHandle

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod sessions;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use state::{AppState, StoreCollector};
