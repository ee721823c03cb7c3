//! Shared type definitions for the VR Lab interaction service.
//!
//! This crate is the single source of truth for the records exchanged
//! between the interaction pipeline, the stores, and the HTTP API. Types
//! flow downstream to `TypeScript` via `ts-rs` for the web client.
//!
//! # Modules
//!
//! - [`ids`] -- Session, entity, user, and content identifiers
//! - [`enums`] -- Environments, entity kinds, the interaction taxonomy,
//!   difficulty, and weather
//! - [`structs`] -- Entities, interaction events, collector records,
//!   catalog items, preferences, accounts, and session views

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Difficulty, EntityKind, EnvironmentKind, InteractionType, Weather};
pub use ids::{ContentId, EntityId, SessionId, UserId};
pub use structs::{
    AudioPreferences, ComfortSettings, ContentItem, Entity, EntityView, InteractionEvent,
    InteractionRecord, InteractionSubmission, SessionView, UserAccount, UserPreferences,
    VisualPreferences,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for the web client.

    #[test]
    fn annotation_maps_are_optional_in_bindings() {
        use ts_rs::TS;

        let event = crate::structs::InteractionEvent::decl();
        assert!(event.contains("extra?:"), "{event}");

        // Unknown submission fields are open-ended and stay out of the type.
        let submission = crate::structs::InteractionSubmission::decl();
        assert!(!submission.contains("extra"), "{submission}");
    }

    #[test]
    fn export_bindings() {
        // The files are written to the `bindings/` directory relative to
        // the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::SessionId::export_all();
        let _ = crate::ids::UserId::export_all();
        let _ = crate::ids::ContentId::export_all();
        let _ = crate::ids::EntityId::export_all();

        // Enums
        let _ = crate::enums::EnvironmentKind::export_all();
        let _ = crate::enums::EntityKind::export_all();
        let _ = crate::enums::InteractionType::export_all();
        let _ = crate::enums::Difficulty::export_all();
        let _ = crate::enums::Weather::export_all();

        // Structs
        let _ = crate::structs::Entity::export_all();
        let _ = crate::structs::InteractionEvent::export_all();
        let _ = crate::structs::InteractionSubmission::export_all();
        let _ = crate::structs::InteractionRecord::export_all();
        let _ = crate::structs::ContentItem::export_all();
        let _ = crate::structs::UserPreferences::export_all();
        let _ = crate::structs::UserAccount::export_all();
        let _ = crate::structs::EntityView::export_all();
        let _ = crate::structs::SessionView::export_all();
    }
}
