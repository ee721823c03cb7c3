//! Fixed per-environment entity rosters.
//!
//! Each [`EnvironmentKind`] resolves, through an exhaustive match, to the
//! entities placed in its scene and the reaction each one has to a pointer
//! click: the interaction type it emits, the details text, how long it stays
//! highlighted, and any extra behaviour (phase advance, activity change,
//! condition report).

use std::time::Duration;

use vrlab_types::{Entity, EntityId, EntityKind, EnvironmentKind, InteractionType};

/// Highlight duration for tropical fish.
pub const FISH_HIGHLIGHT: Duration = Duration::from_millis(2000);

/// Highlight duration for every other entity.
pub const DEFAULT_HIGHLIGHT: Duration = Duration::from_millis(3000);

/// Number of tropical fish in the underwater scene.
const FISH_COUNT: usize = 12;

/// Extra state change triggered by clicking an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    /// Emit the event and highlight; nothing else.
    Plain,
    /// Advance the environment's phase ring and annotate `extra.phase`.
    AdvancesPhase,
    /// Pick a new commander activity and annotate `extra.activity`.
    ReportsActivity,
    /// Annotate `extra.weather` and `extra.altitude`.
    ReportsConditions,
}

/// One entity in a roster together with its click reaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// The entity placed in the scene.
    pub entity: Entity,
    /// Interaction type emitted on click.
    pub interaction: InteractionType,
    /// Details text attached to the event, if any.
    pub details: Option<String>,
    /// How long the entity stays highlighted after a click.
    pub highlight: Duration,
    /// Extra behaviour on click.
    pub behaviour: Behaviour,
}

impl RosterEntry {
    fn new(id: &str, kind: EntityKind, display_name: &str, interaction: InteractionType) -> Self {
        Self {
            entity: Entity {
                id: EntityId::new(id),
                kind,
                display_name: display_name.to_owned(),
            },
            interaction,
            details: None,
            highlight: DEFAULT_HIGHLIGHT,
            behaviour: Behaviour::Plain,
        }
    }

    fn details(mut self, details: String) -> Self {
        self.details = Some(details);
        self
    }

    const fn highlight(mut self, highlight: Duration) -> Self {
        self.highlight = highlight;
        self
    }

    const fn behaviour(mut self, behaviour: Behaviour) -> Self {
        self.behaviour = behaviour;
        self
    }
}

/// Speech bubble text shown while an avatar is highlighted.
pub fn greeting(display_name: &str) -> String {
    format!("Hello! I'm {display_name}. Welcome to this amazing place!")
}

/// Build the roster for an environment, in scene order.
pub fn roster(kind: EnvironmentKind) -> Vec<RosterEntry> {
    match kind {
        EnvironmentKind::Underwater => underwater(),
        EnvironmentKind::Space => space(),
        EnvironmentKind::Forest => forest(),
        EnvironmentKind::Urban => urban(),
        EnvironmentKind::Mountain => mountain(),
        EnvironmentKind::Archaeological => archaeological(),
    }
}

fn underwater() -> Vec<RosterEntry> {
    let mut entries: Vec<RosterEntry> = (0..FISH_COUNT)
        .map(|i| {
            let id = format!("tropical_fish_{i}");
            RosterEntry::new(
                &id,
                EntityKind::Animal,
                "Tropical Fish",
                InteractionType::MarineLifeInteraction,
            )
            .details("User observed tropical fish behavior".to_owned())
            .highlight(FISH_HIGHLIGHT)
        })
        .collect();
    entries.push(RosterEntry::new(
        "marine_biologist",
        EntityKind::Avatar,
        "Dr. Marina",
        InteractionType::ExpertConsultation,
    ));
    entries
}

fn space() -> Vec<RosterEntry> {
    let mut entries: Vec<RosterEntry> = ["habitat_module", "laboratory"]
        .into_iter()
        .map(|module| {
            RosterEntry::new(
                module,
                EntityKind::Module,
                module,
                InteractionType::SpaceStationInteraction,
            )
            .details(format!("Accessed {module} module systems"))
        })
        .collect();
    entries.push(
        RosterEntry::new(
            "commander_alex",
            EntityKind::Avatar,
            "Commander Alex",
            InteractionType::AstronautInteraction,
        )
        .behaviour(Behaviour::ReportsActivity),
    );
    entries
}

fn forest() -> Vec<RosterEntry> {
    let animals = [
        ("deer_1", "deer", "Deer"),
        ("rabbit_2", "rabbit", "Rabbit"),
        ("bird_3", "bird", "Bird"),
        ("squirrel_4", "squirrel", "Squirrel"),
    ];
    let mut entries: Vec<RosterEntry> = animals
        .into_iter()
        .map(|(id, species, name)| {
            RosterEntry::new(id, EntityKind::Animal, name, InteractionType::WildlifeObservation)
                .details(format!("Observed {species} in natural habitat"))
        })
        .collect();
    entries.push(
        RosterEntry::new(
            "forest_ranger",
            EntityKind::Avatar,
            "Ranger Sarah",
            InteractionType::RangerConsultation,
        )
        .details("Learned about forest conservation".to_owned()),
    );
    entries
}

fn urban() -> Vec<RosterEntry> {
    let buildings = [
        "residential_complex",
        "commercial_center",
        "office_tower",
        "sustainable_housing",
    ];
    let mut entries: Vec<RosterEntry> = buildings
        .into_iter()
        .map(|building| {
            RosterEntry::new(
                building,
                EntityKind::Module,
                building,
                InteractionType::UrbanPlanningInteraction,
            )
            .details(format!("Reviewed {building} development plans"))
        })
        .collect();
    entries.extend([
        RosterEntry::new(
            "city_planner",
            EntityKind::Avatar,
            "Architect Maya",
            InteractionType::PlannerConsultation,
        )
        .behaviour(Behaviour::AdvancesPhase),
        RosterEntry::new(
            "community_representative",
            EntityKind::Avatar,
            "Community Rep. James",
            InteractionType::CommunityFeedback,
        ),
        RosterEntry::new(
            "environmental_consultant",
            EntityKind::Avatar,
            "Environmental Consultant Lisa",
            InteractionType::EnvironmentalConsultation,
        ),
    ]);
    entries
}

fn mountain() -> Vec<RosterEntry> {
    let equipment = ["expedition_tent", "medical_tent", "oxygen_tanks", "climbing_ropes"];
    let mut entries: Vec<RosterEntry> = equipment
        .into_iter()
        .map(|item| {
            RosterEntry::new(
                item,
                EntityKind::Equipment,
                item,
                InteractionType::EquipmentInspection,
            )
            .details(format!("Examined {item} for mountain climbing"))
        })
        .collect();
    entries.extend([
        RosterEntry::new(
            "captain_rodriguez",
            EntityKind::Avatar,
            "Captain Rodriguez",
            InteractionType::MountaineerConsultation,
        )
        .behaviour(Behaviour::ReportsConditions),
        RosterEntry::new(
            "sherpa_guide",
            EntityKind::Avatar,
            "Sherpa Pemba",
            InteractionType::SherpaConsultation,
        ),
    ]);
    entries
}

fn archaeological() -> Vec<RosterEntry> {
    // coin_2 and tool_4 are still buried and never placed in the scene.
    let artifacts = [
        ("pottery_1", "pottery", "Pottery"),
        ("jewelry_3", "jewelry", "Jewelry"),
        ("tablet_5", "tablet", "Tablet"),
    ];
    let mut entries: Vec<RosterEntry> = artifacts
        .into_iter()
        .map(|(id, kind, name)| {
            RosterEntry::new(id, EntityKind::Artifact, name, InteractionType::ArtifactAnalysis)
                .details(format!("Analyzed {kind} artifact for historical significance"))
        })
        .collect();
    entries.extend([
        RosterEntry::new(
            "dr_thompson",
            EntityKind::Avatar,
            "Dr. Thompson",
            InteractionType::ArchaeologistConsultation,
        )
        .behaviour(Behaviour::AdvancesPhase),
        RosterEntry::new(
            "field_assistant",
            EntityKind::Avatar,
            "Field Assistant Maya",
            InteractionType::FieldAssistantConsultation,
        ),
        RosterEntry::new(
            "conservation_specialist",
            EntityKind::Avatar,
            "Conservation Specialist Dr. Kim",
            InteractionType::ConservationConsultation,
        ),
    ]);
    entries
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn ids(kind: EnvironmentKind) -> Vec<String> {
        roster(kind)
            .into_iter()
            .map(|e| e.entity.id.as_str().to_owned())
            .collect()
    }

    #[test]
    fn underwater_has_twelve_fish_and_a_biologist() {
        let entries = roster(EnvironmentKind::Underwater);
        assert_eq!(entries.len(), 13);
        let fish = entries
            .iter()
            .filter(|e| e.interaction == InteractionType::MarineLifeInteraction)
            .count();
        assert_eq!(fish, 12);
        assert!(entries.iter().any(|e| e.entity.id.as_str() == "tropical_fish_11"));
        assert!(
            entries
                .iter()
                .filter(|e| e.entity.kind == EntityKind::Animal)
                .all(|e| e.highlight == FISH_HIGHLIGHT)
        );
    }

    #[test]
    fn every_entry_belongs_to_its_environment() {
        for kind in EnvironmentKind::ALL {
            for entry in roster(kind) {
                assert_eq!(entry.interaction.environment(), kind, "{}", entry.entity.id);
            }
        }
    }

    #[test]
    fn entity_ids_are_unique_per_environment() {
        for kind in EnvironmentKind::ALL {
            let all = ids(kind);
            let unique: BTreeSet<&String> = all.iter().collect();
            assert_eq!(all.len(), unique.len(), "duplicate id in {kind}");
        }
    }

    #[test]
    fn buried_artifacts_are_not_placed() {
        let all = ids(EnvironmentKind::Archaeological);
        assert!(all.contains(&"jewelry_3".to_owned()));
        assert!(!all.contains(&"coin_2".to_owned()));
        assert!(!all.contains(&"tool_4".to_owned()));
    }

    #[test]
    fn directors_advance_phase() {
        let directors: Vec<String> = EnvironmentKind::ALL
            .into_iter()
            .flat_map(roster)
            .filter(|e| e.behaviour == Behaviour::AdvancesPhase)
            .map(|e| e.entity.id.as_str().to_owned())
            .collect();
        assert_eq!(directors, vec!["city_planner", "dr_thompson"]);
    }

    #[test]
    fn details_text_names_the_subject() {
        let deer = roster(EnvironmentKind::Forest)
            .into_iter()
            .find(|e| e.entity.id.as_str() == "deer_1");
        assert_eq!(
            deer.and_then(|e| e.details).as_deref(),
            Some("Observed deer in natural habitat")
        );
    }

    #[test]
    fn greeting_uses_display_name() {
        assert_eq!(
            greeting("Ranger Sarah"),
            "Hello! I'm Ranger Sarah. Welcome to this amazing place!"
        );
    }
}
