//! Core record structs: entities, interaction events, collector records,
//! catalog items, preferences, accounts, and the session view handed to the
//! rendering client.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Difficulty, EntityKind, EnvironmentKind, InteractionType, Weather};
use crate::ids::{ContentId, EntityId, SessionId, UserId};

// ---------------------------------------------------------------------------
// Entities and interaction events
// ---------------------------------------------------------------------------

/// An interactive object placed within an environment scene.
///
/// Created from the environment's fixed roster when a session starts and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Entity {
    /// Scene tag, also used as the event `target`.
    pub id: EntityId,
    /// What kind of entity this is.
    pub kind: EntityKind,
    /// Name shown in the scene ("Dr. Marina", "Deer").
    pub display_name: String,
}

/// Structured record of one user action on an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InteractionEvent {
    /// Interaction type tag.
    #[serde(rename = "type")]
    pub kind: InteractionType,
    /// Entity the user interacted with.
    pub target: EntityId,
    /// Wall-clock time of the interaction, epoch milliseconds.
    pub timestamp: i64,
    /// Human-readable description, when the interaction has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Per-interaction annotations (`phase`, `activity`, `weather`, `altitude`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub extra: Option<BTreeMap<String, serde_json::Value>>,
}

// ---------------------------------------------------------------------------
// Collector records
// ---------------------------------------------------------------------------

/// Body submitted to the interaction collector.
///
/// Every field is optional on the wire. The ids must be JSON numbers when
/// present; a body that does not fit this shape is rejected as a whole.
/// Fields beyond the known ones (a pointer `position`, say) are kept in
/// [`extra`](Self::extra) and stored alongside the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InteractionSubmission {
    /// User who performed the interaction.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Catalog item the session was started from.
    #[serde(default)]
    pub content_id: Option<ContentId>,
    /// Client session tag.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Interaction type tag.
    #[serde(default)]
    pub interaction_type: Option<String>,
    /// The full interaction event, as sent by the client.
    #[serde(default)]
    pub interaction_data: serde_json::Value,
    /// Pointer position, when the client tracked one.
    #[serde(default)]
    pub position_data: Option<serde_json::Value>,
    /// Any other fields the client sent, stored verbatim.
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A submission after the collector appended it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InteractionRecord {
    /// 1-based position in the log.
    pub id: u64,
    /// The submission as received.
    #[serde(flatten)]
    pub submission: InteractionSubmission,
    /// Server-side receive time.
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Content catalog
// ---------------------------------------------------------------------------

/// One experience in the content library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ContentItem {
    /// Catalog id.
    pub id: ContentId,
    /// Display title.
    pub title: String,
    /// Short description for the library card.
    pub description: String,
    /// Which environment the experience opens.
    pub environment_type: EnvironmentKind,
    /// Client route of the experience.
    pub content_url: String,
    /// Thumbnail image URL.
    pub thumbnail_url: String,
    /// Difficulty rating.
    pub difficulty_level: Difficulty,
    /// Expected session length.
    pub duration_minutes: u32,
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// Comfort toggles for motion-sensitive users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ComfortSettings {
    /// Reduce camera motion.
    pub motion_sickness_reduction: bool,
    /// Teleport instead of smooth locomotion.
    pub teleport_movement: bool,
    /// Darken the periphery while moving.
    pub comfort_vignetting: bool,
}

/// Audio settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AudioPreferences {
    /// Master volume, 0.0 to 1.0.
    pub master_volume: f64,
    /// Positional audio.
    pub spatial_audio: bool,
    /// Environment ambience.
    pub ambient_sounds: bool,
}

/// Display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VisualPreferences {
    /// Brightness, 0.0 to 1.0.
    pub brightness: f64,
    /// Contrast, 0.0 to 1.0.
    pub contrast: f64,
    /// Field of view in degrees.
    pub field_of_view: u32,
}

/// A user's preference bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UserPreferences {
    /// Environment tags the user favours.
    pub preferred_environments: Vec<String>,
    /// Comfort toggles.
    pub comfort_settings: ComfortSettings,
    /// Audio settings.
    pub audio_preferences: AudioPreferences,
    /// Display settings.
    pub visual_preferences: VisualPreferences,
}

impl Default for UserPreferences {
    /// The bundle served to users who never saved preferences.
    fn default() -> Self {
        Self {
            preferred_environments: Vec::new(),
            comfort_settings: ComfortSettings {
                motion_sickness_reduction: true,
                teleport_movement: true,
                comfort_vignetting: true,
            },
            audio_preferences: AudioPreferences {
                master_volume: 0.8,
                spatial_audio: true,
                ambient_sounds: true,
            },
            visual_preferences: VisualPreferences {
                brightness: 0.7,
                contrast: 0.6,
                field_of_view: 90,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Public part of a mock user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UserAccount {
    /// Account id.
    pub id: UserId,
    /// Login email.
    pub email: String,
    /// Display handle.
    pub username: String,
}

// ---------------------------------------------------------------------------
// Session view
// ---------------------------------------------------------------------------

/// One entity as the rendering client should draw it right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EntityView {
    /// Scene tag.
    pub id: EntityId,
    /// Entity kind.
    pub kind: EntityKind,
    /// Display name.
    pub display_name: String,
    /// Whether the entity is currently highlighted.
    pub highlighted: bool,
    /// Speech bubble text, for avatars that were just clicked.
    pub speech: Option<String>,
}

/// Declarative snapshot of an environment session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SessionView {
    /// Session id.
    pub session_id: SessionId,
    /// Environment the roster was loaded from.
    pub environment: EnvironmentKind,
    /// Current phase, for environments with a phase cycle.
    pub phase: Option<String>,
    /// What the commander is doing, in the space station.
    pub activity: Option<String>,
    /// Base camp weather, on the mountain.
    pub weather: Option<Weather>,
    /// Base camp altitude in metres, on the mountain.
    pub altitude_m: Option<u32>,
    /// Every interactive entity, in roster order.
    pub entities: Vec<EntityView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_type_field() {
        let event = InteractionEvent {
            kind: InteractionType::WildlifeObservation,
            target: EntityId::from("deer_1"),
            timestamp: 1_700_000_000_000,
            details: Some("Observed deer in natural habitat".to_owned()),
            extra: None,
        };
        let json = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(json["type"], "wildlife_observation");
        assert_eq!(json["target"], "deer_1");
        assert!(json.get("extra").is_none());
    }

    #[test]
    fn submission_accepts_sparse_bodies() {
        let parsed: Result<InteractionSubmission, _> =
            serde_json::from_str(r#"{"user_id":1,"interaction_type":"expert_consultation"}"#);
        let submission = parsed.unwrap_or_default();
        assert_eq!(submission.user_id, Some(UserId(1)));
        assert_eq!(submission.content_id, None);
        assert!(submission.interaction_data.is_null());
        assert!(submission.extra.is_empty());
    }

    #[test]
    fn submission_keeps_unknown_fields() {
        let parsed: Result<InteractionSubmission, _> =
            serde_json::from_str(r#"{"user_id":1,"position":{"x":1,"y":2}}"#);
        let submission = parsed.unwrap_or_default();
        assert_eq!(submission.user_id, Some(UserId(1)));
        assert_eq!(
            submission.extra.get("position"),
            Some(&serde_json::json!({"x": 1, "y": 2}))
        );

        let json = serde_json::to_value(&submission).unwrap_or_default();
        assert_eq!(json["position"]["y"], 2);
        assert!(json.get("extra").is_none());
    }

    #[test]
    fn submission_rejects_string_ids() {
        let parsed: Result<InteractionSubmission, _> = serde_json::from_str(r#"{"user_id":"1"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn record_flattens_submission() {
        let record = InteractionRecord {
            id: 1,
            submission: InteractionSubmission {
                session_id: Some("s1".to_owned()),
                ..InteractionSubmission::default()
            },
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap_or_default();
        assert_eq!(json["id"], 1);
        assert_eq!(json["session_id"], "s1");

        let mut extra = serde_json::Map::new();
        extra.insert("position".to_owned(), serde_json::json!({"x": 1}));
        let with_extra = InteractionRecord {
            submission: InteractionSubmission {
                extra,
                ..InteractionSubmission::default()
            },
            ..record
        };
        let json = serde_json::to_value(&with_extra).unwrap_or_default();
        assert_eq!(json["position"]["x"], 1);
        assert_eq!(json["id"], 1);
    }

    #[test]
    fn default_preferences_bundle() {
        let prefs = UserPreferences::default();
        assert!(prefs.preferred_environments.is_empty());
        assert!(prefs.comfort_settings.teleport_movement);
        assert_eq!(prefs.visual_preferences.field_of_view, 90);
    }
}
