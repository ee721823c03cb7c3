//! Enumeration types shared by the pipeline and the HTTP API.
//!
//! Every enum serializes in `snake_case` so the wire format matches the
//! string tags the web client has always sent (`"underwater"`,
//! `"wildlife_observation"`, ...).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Environments
// ---------------------------------------------------------------------------

/// A themed scene configuration with its own roster and interaction taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EnvironmentKind {
    /// Deep ocean research station.
    Underwater,
    /// Orbiting space station.
    Space,
    /// Ancient forest with wildlife.
    Forest,
    /// Urban planning site.
    Urban,
    /// Himalayan expedition base camp.
    Mountain,
    /// Archaeological excavation.
    Archaeological,
}

impl EnvironmentKind {
    /// All environments, in catalog order.
    pub const ALL: [Self; 6] = [
        Self::Underwater,
        Self::Space,
        Self::Forest,
        Self::Urban,
        Self::Mountain,
        Self::Archaeological,
    ];

    /// The wire tag for this environment.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Underwater => "underwater",
            Self::Space => "space",
            Self::Forest => "forest",
            Self::Urban => "urban",
            Self::Mountain => "mountain",
            Self::Archaeological => "archaeological",
        }
    }

    /// Parse a wire tag. Returns `None` for unrecognized tags.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl core::fmt::Display for EnvironmentKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// What kind of thing an interactive entity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EntityKind {
    /// A human character that talks when clicked.
    Avatar,
    /// Wildlife or marine life.
    Animal,
    /// An excavated find.
    Artifact,
    /// A station module or a building.
    Module,
    /// Expedition gear.
    Equipment,
}

// ---------------------------------------------------------------------------
// Interaction taxonomy
// ---------------------------------------------------------------------------

/// The type tag of an interaction event.
///
/// Each variant belongs to exactly one [`EnvironmentKind`]; see
/// [`InteractionType::environment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum InteractionType {
    // --- Underwater ---
    /// Clicked a tropical fish.
    MarineLifeInteraction,
    /// Talked to the marine biologist.
    ExpertConsultation,

    // --- Space ---
    /// Accessed a station module.
    SpaceStationInteraction,
    /// Talked to the commander.
    AstronautInteraction,

    // --- Forest ---
    /// Observed an animal.
    WildlifeObservation,
    /// Talked to the ranger.
    RangerConsultation,

    // --- Urban ---
    /// Reviewed a building's development plans.
    UrbanPlanningInteraction,
    /// Talked to the planner (advances the planning phase).
    PlannerConsultation,
    /// Talked to the community representative.
    CommunityFeedback,
    /// Talked to the environmental consultant.
    EnvironmentalConsultation,

    // --- Mountain ---
    /// Inspected a piece of equipment.
    EquipmentInspection,
    /// Talked to the expedition leader.
    MountaineerConsultation,
    /// Talked to the sherpa.
    SherpaConsultation,

    // --- Archaeological ---
    /// Analyzed an artifact.
    ArtifactAnalysis,
    /// Talked to the lead archaeologist (advances the excavation phase).
    ArchaeologistConsultation,
    /// Talked to the field assistant.
    FieldAssistantConsultation,
    /// Talked to the conservation specialist.
    ConservationConsultation,
}

impl InteractionType {
    /// The environment whose taxonomy contains this interaction type.
    pub const fn environment(self) -> EnvironmentKind {
        match self {
            Self::MarineLifeInteraction | Self::ExpertConsultation => EnvironmentKind::Underwater,
            Self::SpaceStationInteraction | Self::AstronautInteraction => EnvironmentKind::Space,
            Self::WildlifeObservation | Self::RangerConsultation => EnvironmentKind::Forest,
            Self::UrbanPlanningInteraction
            | Self::PlannerConsultation
            | Self::CommunityFeedback
            | Self::EnvironmentalConsultation => EnvironmentKind::Urban,
            Self::EquipmentInspection
            | Self::MountaineerConsultation
            | Self::SherpaConsultation => EnvironmentKind::Mountain,
            Self::ArtifactAnalysis
            | Self::ArchaeologistConsultation
            | Self::FieldAssistantConsultation
            | Self::ConservationConsultation => EnvironmentKind::Archaeological,
        }
    }

    /// The wire tag for this interaction type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MarineLifeInteraction => "marine_life_interaction",
            Self::ExpertConsultation => "expert_consultation",
            Self::SpaceStationInteraction => "space_station_interaction",
            Self::AstronautInteraction => "astronaut_interaction",
            Self::WildlifeObservation => "wildlife_observation",
            Self::RangerConsultation => "ranger_consultation",
            Self::UrbanPlanningInteraction => "urban_planning_interaction",
            Self::PlannerConsultation => "planner_consultation",
            Self::CommunityFeedback => "community_feedback",
            Self::EnvironmentalConsultation => "environmental_consultation",
            Self::EquipmentInspection => "equipment_inspection",
            Self::MountaineerConsultation => "mountaineer_consultation",
            Self::SherpaConsultation => "sherpa_consultation",
            Self::ArtifactAnalysis => "artifact_analysis",
            Self::ArchaeologistConsultation => "archaeologist_consultation",
            Self::FieldAssistantConsultation => "field_assistant_consultation",
            Self::ConservationConsultation => "conservation_consultation",
        }
    }
}

impl core::fmt::Display for InteractionType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Difficulty rating of a catalog experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Difficulty {
    /// Suitable for first-time users.
    Beginner,
    /// Some prior experience expected.
    Intermediate,
    /// Long, demanding sessions.
    Advanced,
}

impl Difficulty {
    /// The wire tag for this difficulty.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

// ---------------------------------------------------------------------------
// Mountain conditions
// ---------------------------------------------------------------------------

/// Weather at the mountain base camp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Weather {
    /// Clear skies.
    Clear,
    /// Overcast.
    Cloudy,
    /// High winds.
    Windy,
    /// Snowfall.
    Snowing,
}

impl Weather {
    /// All weather conditions, in the order the camp cycles through them.
    pub const ALL: [Self; 4] = [Self::Clear, Self::Cloudy, Self::Windy, Self::Snowing];

    /// The wire tag for this weather condition.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Cloudy => "cloudy",
            Self::Windy => "windy",
            Self::Snowing => "snowing",
        }
    }
}
