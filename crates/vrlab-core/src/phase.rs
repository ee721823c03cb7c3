//! Rotating phase cycles for the environments with a director avatar.
//!
//! A ring starts at index 0 and every director interaction advances it by
//! exactly one position, wrapping at the end. There is no terminal phase.

use vrlab_types::EnvironmentKind;

/// Urban planning cycle.
pub const PLANNING: [&str; 4] = [
    "design",
    "community_review",
    "environmental_assessment",
    "construction",
];

/// Archaeological excavation cycle.
pub const EXCAVATION: [&str; 4] = ["survey", "excavation", "analysis", "documentation"];

/// Cursor into a fixed, ordered list of phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseRing {
    phases: &'static [&'static str],
    index: usize,
}

impl PhaseRing {
    /// A ring over `phases`, positioned at the first phase.
    pub const fn new(phases: &'static [&'static str]) -> Self {
        Self { phases, index: 0 }
    }

    /// The phase ring an environment runs, if it has one.
    pub const fn for_environment(kind: EnvironmentKind) -> Option<Self> {
        match kind {
            EnvironmentKind::Urban => Some(Self::new(&PLANNING)),
            EnvironmentKind::Archaeological => Some(Self::new(&EXCAVATION)),
            EnvironmentKind::Underwater
            | EnvironmentKind::Space
            | EnvironmentKind::Forest
            | EnvironmentKind::Mountain => None,
        }
    }

    /// The current phase.
    pub fn current(&self) -> &'static str {
        self.phases.get(self.index).copied().unwrap_or_default()
    }

    /// Move to the next phase, wrapping, and return it.
    pub fn advance(&mut self) -> &'static str {
        let next = self.index.saturating_add(1);
        self.index = if next >= self.phases.len() { 0 } else { next };
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planning_cycles_through_all_phases() {
        let mut ring = PhaseRing::new(&PLANNING);
        assert_eq!(ring.current(), "design");
        let seen: Vec<&str> = (0..4).map(|_| ring.advance()).collect();
        assert_eq!(
            seen,
            vec!["community_review", "environmental_assessment", "construction", "design"]
        );
    }

    #[test]
    fn four_advances_return_to_start_from_any_phase() {
        for offset in 0..4 {
            let mut ring = PhaseRing::new(&PLANNING);
            for _ in 0..offset {
                ring.advance();
            }
            let start = ring.current();
            for _ in 0..4 {
                ring.advance();
            }
            assert_eq!(ring.current(), start);
        }
    }

    #[test]
    fn excavation_starts_at_survey() {
        let ring = PhaseRing::for_environment(EnvironmentKind::Archaeological);
        assert_eq!(ring.map(|r| r.current()), Some("survey"));
        assert!(PhaseRing::for_environment(EnvironmentKind::Forest).is_none());
    }
}
