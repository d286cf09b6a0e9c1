//! Static guidance shown alongside the reference content.

use crate::domain::Level;

pub const PURPOSE: &str = "Reference material for learning how clinicians reason: \
diagnostic frameworks, cognitive biases, history-taking mnemonics, physical \
examination sequences and allergy and immunology topics, each explained for \
readers from children to practising physicians.";

pub const DISCLAIMER: &str = "This content is for education only. It is not medical \
advice and does not replace assessment by a qualified clinician. If you are \
worried about your health or someone else's, contact a healthcare provider or \
emergency services.";

/// Suggested ways to work through the material
pub const HOW_TO_USE: &[&str] = &[
    "Pick the level that matches your background; every framework and exam approach has content for all five.",
    "Search by name or keyword, or browse a category to see related concepts together.",
    "Use the history-taking mnemonics as a checklist when practising interviews.",
    "Work through exam sequences in order; findings are listed as normal and abnormal for each step.",
    "Follow cross-references to move between related frameworks, exams and algorithms.",
];

/// Framing note for readers at `level`
pub fn audience_note(level: Level) -> &'static str {
    match level {
        Level::Child => {
            "Simple words and everyday comparisons. Ask a grown-up or your doctor about anything that worries you."
        }
        Level::Patient => {
            "Plain-language explanations to help you understand what your care team asks and why."
        }
        Level::Nursing => {
            "Assessment-focused content with the clinical reasoning behind each question and finding."
        }
        Level::MedicalStudent => {
            "Mechanisms, differentials and exam technique at the depth expected on clerkships and board exams."
        }
        Level::Physician => {
            "Expert-level detail, test characteristics and pitfalls for practising clinicians and educators."
        }
    }
}
