//! Physical examination approaches by body system.

use std::sync::LazyLock;

use crate::domain::ContentEnvelope;

use super::catalog::Collection;

pub const COLLECTION_NAME: &str = "physical-exam";

static APPROACHES: LazyLock<Collection<ContentEnvelope>> = LazyLock::new(|| {
    Collection::load_bundled(
        COLLECTION_NAME,
        include_str!("../../content/physical_exam.yaml"),
    )
});

/// The bundled physical exam approaches
pub fn physical_exam_approaches() -> &'static Collection<ContentEnvelope> {
    &APPROACHES
}

/// Look up an approach by exact id (e.g. "exam-cardiovascular")
pub fn get_exam_approach(id: &str) -> Option<&'static ContentEnvelope> {
    APPROACHES.get(id)
}

/// Approaches examining `body_system`, ignoring case
pub fn exam_approaches_for_body_system(body_system: &str) -> Vec<&'static ContentEnvelope> {
    APPROACHES
        .iter()
        .filter(|envelope| {
            envelope
                .exam()
                .is_some_and(|e| e.body_system.eq_ignore_ascii_case(body_system))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Level;

    #[test]
    fn test_bundled_approaches_load() {
        let approaches = physical_exam_approaches();
        assert!(approaches.load_error().is_none(), "{:?}", approaches.load_error());
        assert_eq!(approaches.len(), 2);
    }

    #[test]
    fn test_cardiovascular_exam() {
        let exam = get_exam_approach("exam-cardiovascular").unwrap().exam().unwrap();
        assert_eq!(exam.region, "chest");
        assert_eq!(exam.sequence.len(), 3);
        assert_eq!(exam.special_tests.len(), 2);

        let steps = exam.steps_at(Level::MedicalStudent);
        let numbers: Vec<u32> = steps.iter().map(|s| s.step).collect();
        assert_eq!(numbers, [1, 2, 3]);

        let valsalva = exam
            .special_tests
            .iter()
            .find(|t| t.name.contains("Valsalva"))
            .unwrap();
        assert!(valsalva.sensitivity.is_none());
        assert!(valsalva.specificity.is_none());
    }

    #[test]
    fn test_approaches_for_body_system() {
        let gi = exam_approaches_for_body_system("Gastrointestinal");
        assert_eq!(gi.len(), 1);
        assert_eq!(gi[0].id, "exam-abdominal");
        assert_eq!(gi[0].exam().unwrap().sequence.len(), 4);

        assert!(exam_approaches_for_body_system("neurological").is_empty());
    }
}
