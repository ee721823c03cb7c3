//! Interaction event pipeline for VR Lab.
//!
//! This crate owns everything between a pointer click on an in-scene entity
//! and the interaction log: the per-environment rosters, the session's
//! transient UI state, the dispatcher that builds interaction events, the
//! collectors that receive them, and the actor that serializes all of it.
//!
//! # Modules
//!
//! - [`collector`] -- [`Collector`] trait plus the null and HTTP collectors.
//! - [`config`] -- Configuration loading from `vrlab-config.yaml` into
//!   strongly-typed structs.
//! - [`dispatch`] -- [`Dispatcher`]: event construction, highlight, submission.
//! - [`error`] -- Dispatch and runtime error types.
//! - [`highlight`] -- Per-entity highlight deadlines.
//! - [`phase`] -- Rotating phase cycles for director avatars.
//! - [`roster`] -- Fixed per-environment entity rosters.
//! - [`runtime`] -- Session actor and its [`SessionHandle`].
//! - [`session`] -- [`EnvironmentSession`] state.
//!
//! [`Collector`]: collector::Collector
//! [`Dispatcher`]: dispatch::Dispatcher
//! [`SessionHandle`]: runtime::SessionHandle
//! [`EnvironmentSession`]: session::EnvironmentSession

pub mod collector;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod highlight;
pub mod phase;
pub mod roster;
pub mod runtime;
pub mod session;
