//! Diagnostic algorithms, one pathway per presenting complaint.

use std::sync::LazyLock;

use crate::domain::ContentEnvelope;

use super::catalog::Collection;

pub const COLLECTION_NAME: &str = "diagnostic-algorithms";

static ALGORITHMS: LazyLock<Collection<ContentEnvelope>> = LazyLock::new(|| {
    Collection::load_bundled(
        COLLECTION_NAME,
        include_str!("../../content/diagnostic_algorithms.yaml"),
    )
});

/// The bundled diagnostic algorithms
pub fn diagnostic_algorithms() -> &'static Collection<ContentEnvelope> {
    &ALGORITHMS
}

/// Look up an algorithm by exact id (e.g. "algorithm-chest-pain")
pub fn get_algorithm(id: &str) -> Option<&'static ContentEnvelope> {
    ALGORITHMS.get(id)
}

/// Algorithms for a presenting complaint, ignoring case
pub fn algorithms_for_presentation(presentation: &str) -> Vec<&'static ContentEnvelope> {
    ALGORITHMS
        .iter()
        .filter(|envelope| {
            envelope
                .pathway
                .as_ref()
                .is_some_and(|p| p.presentation.eq_ignore_ascii_case(presentation))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContentType, Level, StepType, Urgency};

    #[test]
    fn test_bundled_algorithms_load() {
        let algorithms = diagnostic_algorithms();
        assert!(algorithms.load_error().is_none(), "{:?}", algorithms.load_error());
        assert_eq!(algorithms.len(), 1);

        let chest = get_algorithm("algorithm-chest-pain").unwrap();
        assert_eq!(chest.content_type, ContentType::Pathway);
        assert!(chest.framework.is_none());
    }

    #[test]
    fn test_chest_pain_pathway() {
        let chest = algorithms_for_presentation("chest pain");
        assert_eq!(chest.len(), 1);
        let pathway = chest[0].pathway.as_ref().unwrap();

        assert_eq!(pathway.steps.len(), 16);
        let start = pathway.start().unwrap();
        assert_eq!(start.id, "initial-assessment");

        let next: Vec<_> = pathway
            .next_steps(start)
            .into_iter()
            .map(|(_, target)| target.map(|s| s.step_type))
            .collect();
        assert_eq!(next, [Some(StepType::Warning), Some(StepType::Action)]);

        assert_eq!(pathway.differentials_with_urgency(Urgency::Emergent).len(), 4);
        assert_eq!(pathway.red_flags.len(), 8);
        assert!(pathway.urgent_steps().any(|s| s.id == "stemi-pathway"));

        let steps = pathway.steps_at(Level::Child);
        assert!(steps[1].content.starts_with("EMERGENCY"));
    }

    #[test]
    fn test_unknown_presentation() {
        assert!(algorithms_for_presentation("knee pain").is_empty());
        assert!(get_algorithm("algorithm-knee-pain").is_none());
    }
}
