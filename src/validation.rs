//! Load-time integrity checks for bundled content.
//!
//! Content is authored by hand, so nothing in the type system stops a level
//! slot from holding content for another level or a cross-reference from
//! naming an id that does not exist. The validator walks every collection in
//! a [`Library`] and reports what it finds:
//! - Collection load failures
//! - Duplicate ids
//! - Leveled content that is empty or filed under the wrong level
//! - Framework or pathway details that disagree with the envelope type
//! - Malformed mnemonics, exam sequences and test characteristics
//! - Pathways with repeated step ids, a missing start step or links to
//!   steps that were never authored
//! - Dangling cross-references and unused categories

use std::collections::HashSet;
use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ContentEnvelope, ContentType, DiagnosticPathway, Framework, Level};
use crate::library::{
    AllergyImmunologyCategory, CatalogEntry, ChiefComplaintCategory, ClinicalReasoningCategory,
    Collection, HistoryCategory, Library,
};

/// Which optional checks to run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Warn about cross-references whose target is not indexed, and pathway
    /// steps linking to steps that do not exist (default: true)
    #[serde(default = "default_true")]
    pub report_dangling_references: bool,

    /// Warn about declared categories no entry uses (default: true)
    #[serde(default = "default_true")]
    pub report_unused_categories: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            report_dangling_references: true,
            report_unused_categories: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single integrity problem
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Violation {
    #[error("Collection failed to load: {error}")]
    LoadFailed { error: String },

    #[error("Duplicate id '{id}' within the collection")]
    DuplicateId { id: String },

    #[error("Id '{id}' is already used in collection '{kept_in}'")]
    DuplicateIdAcrossCollections { id: String, kept_in: String },

    #[error("Level {slot} holds content declared as level {found}")]
    LevelMismatch { slot: Level, found: Level },

    #[error("Empty {field}{}", at_level(.level))]
    EmptyField {
        field: &'static str,
        level: Option<Level>,
    },

    #[error("Key term '{term}' appears more than once at level {level}")]
    DuplicateKeyTerm { term: String, level: Level },

    #[error("Envelope of type '{content_type}' {}", framework_presence(.has_framework))]
    FrameworkTypeMismatch {
        content_type: ContentType,
        has_framework: bool,
    },

    #[error("Envelope of type '{content_type}' {}", pathway_presence(.has_pathway))]
    PathwayTypeMismatch {
        content_type: ContentType,
        has_pathway: bool,
    },

    #[error("Pathway step id '{step_id}' is used more than once")]
    DuplicateStepId { step_id: String },

    #[error("Pathway starts at '{step_id}', which is not one of its steps")]
    UnknownStartStep { step_id: String },

    #[error("Step '{step_id}' leads to '{target_step_id}', which is not one of the pathway's steps")]
    UnknownStepTarget {
        step_id: String,
        target_step_id: String,
    },

    #[error("Mnemonic letter '{letter}' is used by more than one component")]
    DuplicateComponentLetter { letter: String },

    #[error("Component '{letter}' has no questions at level {level}")]
    MissingQuestions { letter: String, level: Level },

    #[error("Exam step {position} is numbered {step}")]
    StepNumbering { position: usize, step: u32 },

    #[error("{measure} of '{test}' is {value}, outside [0, 1]")]
    ProbabilityOutOfRange {
        test: String,
        measure: &'static str,
        value: f64,
    },

    #[error("Version must start at 1, found {version}")]
    InvalidVersion { version: u32 },

    #[error("Updated at {updated_at} before it was created at {created_at}")]
    UpdatedBeforeCreated {
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },

    #[error("Cross-reference to '{target_id}' does not resolve")]
    DanglingReference { target_id: String },

    #[error("Category '{category}' is declared but no entry uses it")]
    UnusedCategory { category: String },
}

fn at_level(level: &Option<Level>) -> String {
    level.map(|l| format!(" at level {}", l)).unwrap_or_default()
}

fn framework_presence(has_framework: &bool) -> &'static str {
    if *has_framework {
        "carries framework details"
    } else {
        "has no framework details"
    }
}

fn pathway_presence(has_pathway: &bool) -> &'static str {
    if *has_pathway {
        "carries pathway details"
    } else {
        "has no pathway details"
    }
}

impl Violation {
    pub fn severity(&self) -> Severity {
        match self {
            Violation::DuplicateIdAcrossCollections { .. }
            | Violation::DuplicateKeyTerm { .. }
            | Violation::StepNumbering { .. }
            | Violation::UnknownStepTarget { .. }
            | Violation::DanglingReference { .. }
            | Violation::UnusedCategory { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Stable kebab-case tag for the violation
    pub fn kind(&self) -> &'static str {
        match self {
            Violation::LoadFailed { .. } => "load-failed",
            Violation::DuplicateId { .. } => "duplicate-id",
            Violation::DuplicateIdAcrossCollections { .. } => "duplicate-id-across-collections",
            Violation::LevelMismatch { .. } => "level-mismatch",
            Violation::EmptyField { .. } => "empty-field",
            Violation::DuplicateKeyTerm { .. } => "duplicate-key-term",
            Violation::FrameworkTypeMismatch { .. } => "framework-type-mismatch",
            Violation::PathwayTypeMismatch { .. } => "pathway-type-mismatch",
            Violation::DuplicateStepId { .. } => "duplicate-step-id",
            Violation::UnknownStartStep { .. } => "unknown-start-step",
            Violation::UnknownStepTarget { .. } => "unknown-step-target",
            Violation::DuplicateComponentLetter { .. } => "duplicate-component-letter",
            Violation::MissingQuestions { .. } => "missing-questions",
            Violation::StepNumbering { .. } => "step-numbering",
            Violation::ProbabilityOutOfRange { .. } => "probability-out-of-range",
            Violation::InvalidVersion { .. } => "invalid-version",
            Violation::UpdatedBeforeCreated { .. } => "updated-before-created",
            Violation::DanglingReference { .. } => "dangling-reference",
            Violation::UnusedCategory { .. } => "unused-category",
        }
    }
}

/// A violation located in a collection and, usually, an entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub severity: Severity,
    pub collection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<String>,
    pub message: String,
    #[serde(flatten)]
    pub violation: Violation,
}

impl ValidationIssue {
    pub fn new(collection: &str, entry_id: Option<&str>, violation: Violation) -> Self {
        Self {
            severity: violation.severity(),
            collection: collection.to_string(),
            entry_id: entry_id.map(str::to_string),
            message: violation.to_string(),
            violation,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// No errors and no warnings
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues of one kind, e.g. "dangling-reference"
    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a ValidationIssue> {
        self.issues.iter().filter(move |i| i.violation.kind() == kind)
    }

    /// Emit one tracing event per issue, then a summary
    pub fn log(&self) {
        for issue in &self.issues {
            let entry = issue.entry_id.as_deref().unwrap_or("-");
            match issue.severity {
                Severity::Error => tracing::error!(
                    collection = %issue.collection,
                    entry,
                    kind = issue.violation.kind(),
                    "{}",
                    issue.message
                ),
                Severity::Warning => tracing::warn!(
                    collection = %issue.collection,
                    entry,
                    kind = issue.violation.kind(),
                    "{}",
                    issue.message
                ),
            }
        }

        tracing::info!(
            errors = self.errors().count(),
            warnings = self.warnings().count(),
            "Content validation finished"
        );
    }

    fn push(&mut self, collection: &str, entry_id: Option<&str>, violation: Violation) {
        self.issues
            .push(ValidationIssue::new(collection, entry_id, violation));
    }
}

/// Validate every collection in `library` with default options
pub fn validate(library: &Library<'_>) -> ValidationReport {
    validate_with(library, &ValidationOptions::default())
}

pub fn validate_with(library: &Library<'_>, options: &ValidationOptions) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (name, _, error) in library.collection_status() {
        if let Some(error) = error {
            report.push(
                name,
                None,
                Violation::LoadFailed {
                    error: error.to_string(),
                },
            );
        }
    }

    for duplicate in library.duplicates() {
        let violation = if duplicate.is_within_collection() {
            Violation::DuplicateId {
                id: duplicate.id.to_string(),
            }
        } else {
            Violation::DuplicateIdAcrossCollections {
                id: duplicate.id.to_string(),
                kept_in: duplicate.kept_in.to_string(),
            }
        };
        report.push(duplicate.shadowed_in, Some(duplicate.id), violation);
    }

    check_entry_text(library.clinical_reasoning(), &mut report, |e| {
        [("name", e.name.as_str()), ("description", e.description.as_str())]
    });
    check_entry_text(library.allergy_immunology(), &mut report, |e| {
        [("name", e.name.as_str()), ("description", e.description.as_str())]
    });
    check_entry_text(library.history_entries(), &mut report, |e| {
        [("name", e.name.as_str()), ("description", e.description.as_str())]
    });
    check_entry_text(library.differentials(), &mut report, |e| {
        [
            ("chiefComplaint", e.chief_complaint.as_str()),
            ("clinicalPearl", e.clinical_pearl.as_str()),
        ]
    });

    for collection in library.envelope_collections() {
        for envelope in collection.iter() {
            for violation in check_envelope(envelope) {
                report.push(collection.name(), Some(&envelope.id), violation);
            }

            if options.report_dangling_references {
                if let Some(pathway) = &envelope.pathway {
                    for violation in check_pathway_links(pathway) {
                        report.push(collection.name(), Some(&envelope.id), violation);
                    }
                }

                for (reference, target) in library.resolved_cross_references(envelope) {
                    if target.is_none() {
                        report.push(
                            collection.name(),
                            Some(&envelope.id),
                            Violation::DanglingReference {
                                target_id: reference.target_id.clone(),
                            },
                        );
                    }
                }
            }
        }
    }

    if options.report_unused_categories {
        let clinical = library.clinical_reasoning();
        for category in unused_categories(clinical, &ClinicalReasoningCategory::ALL) {
            report.push(
                clinical.name(),
                None,
                Violation::UnusedCategory {
                    category: category.to_string(),
                },
            );
        }

        let allergy = library.allergy_immunology();
        for category in unused_categories(allergy, &AllergyImmunologyCategory::ALL) {
            report.push(
                allergy.name(),
                None,
                Violation::UnusedCategory {
                    category: category.to_string(),
                },
            );
        }

        let history = library.history_entries();
        for category in unused_categories(history, &HistoryCategory::ALL) {
            report.push(
                history.name(),
                None,
                Violation::UnusedCategory {
                    category: category.to_string(),
                },
            );
        }

        let differentials = library.differentials();
        for category in unused_categories(differentials, &ChiefComplaintCategory::ALL) {
            report.push(
                differentials.name(),
                None,
                Violation::UnusedCategory {
                    category: category.to_string(),
                },
            );
        }
    }

    report
}

fn check_entry_text<T, const N: usize>(
    collection: &Collection<T>,
    report: &mut ValidationReport,
    fields: impl Fn(&T) -> [(&'static str, &str); N],
) where
    T: CatalogEntry,
{
    for entry in collection {
        for (field, value) in fields(entry) {
            if value.trim().is_empty() {
                report.push(
                    collection.name(),
                    Some(entry.id()),
                    Violation::EmptyField { field, level: None },
                );
            }
        }
    }
}

/// Declared categories that no entry in `collection` uses, in declaration order.
///
/// An empty collection (e.g. one that failed to load) reports nothing; the
/// load failure is the real problem.
pub fn unused_categories<T>(collection: &Collection<T>, declared: &[T::Category]) -> Vec<T::Category>
where
    T: CatalogEntry,
    T::Category: Display,
{
    if collection.is_empty() {
        return Vec::new();
    }

    let used: HashSet<T::Category> = collection.iter().map(CatalogEntry::category).collect();
    declared
        .iter()
        .copied()
        .filter(|c| !used.contains(c))
        .collect()
}

/// Integrity problems within a single envelope
pub fn check_envelope(envelope: &ContentEnvelope) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (slot, content) in envelope.levels.iter() {
        if content.level != slot {
            violations.push(Violation::LevelMismatch {
                slot,
                found: content.level,
            });
        }
        if content.summary.trim().is_empty() {
            violations.push(Violation::EmptyField {
                field: "summary",
                level: Some(slot),
            });
        }
        if content.explanation.trim().is_empty() {
            violations.push(Violation::EmptyField {
                field: "explanation",
                level: Some(slot),
            });
        }

        let mut seen = HashSet::new();
        for term in &content.key_terms {
            if !seen.insert(term.term.to_lowercase()) {
                violations.push(Violation::DuplicateKeyTerm {
                    term: term.term.clone(),
                    level: slot,
                });
            }
        }
    }

    let is_framework = envelope.content_type == ContentType::Framework;
    if is_framework != envelope.framework.is_some() {
        violations.push(Violation::FrameworkTypeMismatch {
            content_type: envelope.content_type,
            has_framework: envelope.framework.is_some(),
        });
    }

    match &envelope.framework {
        Some(Framework::History(history)) => {
            let mut letters = HashSet::new();
            for component in &history.components {
                if !letters.insert(component.letter.to_uppercase()) {
                    violations.push(Violation::DuplicateComponentLetter {
                        letter: component.letter.clone(),
                    });
                }
                for (level, questions) in component.questions.iter() {
                    if questions.is_empty() {
                        violations.push(Violation::MissingQuestions {
                            letter: component.letter.clone(),
                            level,
                        });
                    }
                }
            }
        }
        Some(Framework::PhysicalExam(exam)) => {
            for (position, step) in (1..).zip(&exam.sequence) {
                if step.step as usize != position {
                    violations.push(Violation::StepNumbering {
                        position,
                        step: step.step,
                    });
                }
            }

            for test in &exam.special_tests {
                let measures = [
                    ("Sensitivity", test.sensitivity),
                    ("Specificity", test.specificity),
                ];
                for (measure, value) in measures {
                    if let Some(value) = value.filter(|v| !(0.0..=1.0).contains(v)) {
                        violations.push(Violation::ProbabilityOutOfRange {
                            test: test.name.clone(),
                            measure,
                            value,
                        });
                    }
                }
            }
        }
        None => {}
    }

    let is_pathway = envelope.content_type == ContentType::Pathway;
    if is_pathway != envelope.pathway.is_some() {
        violations.push(Violation::PathwayTypeMismatch {
            content_type: envelope.content_type,
            has_pathway: envelope.pathway.is_some(),
        });
    }
    if let Some(pathway) = &envelope.pathway {
        violations.extend(check_pathway(pathway));
    }

    if envelope.version < 1 {
        violations.push(Violation::InvalidVersion {
            version: envelope.version,
        });
    }
    if envelope.updated_at < envelope.created_at {
        violations.push(Violation::UpdatedBeforeCreated {
            created_at: envelope.created_at,
            updated_at: envelope.updated_at,
        });
    }

    violations
}

/// Structural problems within a pathway's step graph
pub fn check_pathway(pathway: &DiagnosticPathway) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut ids = HashSet::new();
    for step in &pathway.steps {
        if !ids.insert(step.id.as_str()) {
            violations.push(Violation::DuplicateStepId {
                step_id: step.id.clone(),
            });
        }
        for (level, content) in step.content.iter() {
            if content.trim().is_empty() {
                violations.push(Violation::EmptyField {
                    field: "step content",
                    level: Some(level),
                });
            }
        }
    }

    if pathway.start().is_none() {
        violations.push(Violation::UnknownStartStep {
            step_id: pathway.start_step_id.clone(),
        });
    }

    violations
}

/// Branches whose target step was never authored
pub fn check_pathway_links(pathway: &DiagnosticPathway) -> Vec<Violation> {
    pathway
        .steps
        .iter()
        .flat_map(|step| {
            pathway
                .next_steps(step)
                .into_iter()
                .filter(|(_, target)| target.is_none())
                .map(|(next, _)| Violation::UnknownStepTarget {
                    step_id: step.id.clone(),
                    target_step_id: next.target_step_id.clone(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExamStep, Levels, PhysicalExamApproach, SpecialTest, TestInterpretation};
    use crate::library::{
        get_algorithm, get_concept, get_exam_approach, get_framework, library,
        ClinicalReasoningEntry,
    };

    #[test]
    fn test_default_options() {
        let options = ValidationOptions::default();
        assert!(options.report_dangling_references);
        assert!(options.report_unused_categories);

        let options: ValidationOptions = serde_yaml::from_str("{}").unwrap();
        assert!(options.report_dangling_references);
    }

    #[test]
    fn test_bundled_frameworks_are_consistent() {
        for id in ["history-oldcarts", "history-opqrst"] {
            assert!(check_envelope(get_framework(id).unwrap()).is_empty());
        }
        for id in ["exam-cardiovascular", "exam-abdominal"] {
            assert!(check_envelope(get_exam_approach(id).unwrap()).is_empty());
        }
    }

    #[test]
    fn test_bundled_concepts_and_pathways_are_consistent() {
        for id in [
            "clinical-reasoning-clinical-decision-making",
            "clinical-reasoning-evidence-based-medicine",
        ] {
            let concept = get_concept(id).unwrap();
            assert_eq!(concept.content_type, ContentType::Concept);
            assert!(check_envelope(concept).is_empty(), "{}", id);
        }

        let algorithm = get_algorithm("algorithm-chest-pain").unwrap();
        assert!(check_envelope(algorithm).is_empty());
    }

    #[test]
    fn test_concept_with_framework_or_pathway_is_flagged() {
        let mut concept = get_concept("clinical-reasoning-evidence-based-medicine")
            .unwrap()
            .clone();
        concept.framework = get_framework("history-opqrst").unwrap().framework.clone();
        concept.pathway = get_algorithm("algorithm-chest-pain").unwrap().pathway.clone();

        let violations = check_envelope(&concept);
        assert!(violations.contains(&Violation::FrameworkTypeMismatch {
            content_type: ContentType::Concept,
            has_framework: true,
        }));
        assert!(violations.contains(&Violation::PathwayTypeMismatch {
            content_type: ContentType::Concept,
            has_pathway: true,
        }));
    }

    #[test]
    fn test_pathway_without_details_is_flagged() {
        let mut algorithm = get_algorithm("algorithm-chest-pain").unwrap().clone();
        algorithm.pathway = None;

        let violations = check_envelope(&algorithm);
        assert_eq!(
            violations,
            [Violation::PathwayTypeMismatch {
                content_type: ContentType::Pathway,
                has_pathway: false,
            }]
        );
        assert!(violations[0].to_string().contains("has no pathway details"));
    }

    #[test]
    fn test_pathway_step_graph() {
        let mut pathway = get_algorithm("algorithm-chest-pain")
            .unwrap()
            .pathway
            .clone()
            .unwrap();
        pathway.start_step_id = "nowhere".to_string();
        let copy = pathway.steps[1].clone();
        pathway.steps.push(copy);
        pathway.steps[2].content = Levels::from_fn(|l| {
            if l == Level::Child {
                " ".to_string()
            } else {
                "Assess".to_string()
            }
        });

        let violations = check_pathway(&pathway);
        assert!(violations.contains(&Violation::UnknownStartStep {
            step_id: "nowhere".to_string()
        }));
        assert!(violations.contains(&Violation::DuplicateStepId {
            step_id: pathway.steps[1].id.clone()
        }));
        assert!(violations.contains(&Violation::EmptyField {
            field: "step content",
            level: Some(Level::Child),
        }));
        assert!(violations.iter().all(|v| v.severity() == Severity::Error));
    }

    #[test]
    fn test_unknown_step_targets_are_warnings() {
        let pathway = get_algorithm("algorithm-chest-pain")
            .unwrap()
            .pathway
            .as_ref()
            .unwrap();
        let violations = check_pathway_links(pathway);
        assert_eq!(violations.len(), 7);
        assert!(violations.contains(&Violation::UnknownStepTarget {
            step_id: "high-risk-acs".to_string(),
            target_step_id: "urgent-cath".to_string(),
        }));
        assert!(violations.iter().all(|v| v.severity() == Severity::Warning));
    }

    #[test]
    fn test_level_mismatch_and_empty_summary() {
        let mut envelope = get_framework("history-opqrst").unwrap().clone();
        let mut levels: Vec<_> = envelope.levels.values().cloned().collect();
        levels[1].level = Level::Physician;
        levels[2].summary = "  ".to_string();
        envelope.levels = Levels::from_fn(|l| levels[l.index()].clone());

        let violations = check_envelope(&envelope);
        assert!(violations.contains(&Violation::LevelMismatch {
            slot: Level::Patient,
            found: Level::Physician,
        }));
        assert!(violations.contains(&Violation::EmptyField {
            field: "summary",
            level: Some(Level::Nursing),
        }));
        assert!(violations.iter().all(|v| v.severity() == Severity::Error));
    }

    #[test]
    fn test_duplicate_letters_and_missing_questions() {
        let mut envelope = get_framework("history-oldcarts").unwrap().clone();
        let Some(Framework::History(history)) = envelope.framework.as_mut() else {
            panic!("expected a history framework");
        };
        history.components[1].letter = "o".to_string();
        history.components[2].questions = Levels::from_fn(|l| {
            if l == Level::Child {
                Vec::new()
            } else {
                vec!["How long?".to_string()]
            }
        });

        let violations = check_envelope(&envelope);
        assert!(violations.contains(&Violation::DuplicateComponentLetter {
            letter: "o".to_string()
        }));
        assert!(violations.contains(&Violation::MissingQuestions {
            letter: "D".to_string(),
            level: Level::Child,
        }));
    }

    #[test]
    fn test_exam_sequence_and_probabilities() {
        let envelope = get_exam_approach("exam-cardiovascular").unwrap();
        let mut envelope = envelope.clone();
        let exam = PhysicalExamApproach {
            body_system: "cardiovascular".to_string(),
            region: "chest".to_string(),
            sequence: vec![ExamStep {
                step: 2,
                technique: "Palpation".to_string(),
                description: Levels::from_fn(|l| format!("feel ({})", l)),
                normal_findings: "Normal".to_string(),
                abnormal_findings: Vec::new(),
                patient_position: "Supine".to_string(),
                equipment_needed: None,
                clinical_pearl: None,
            }],
            special_tests: vec![SpecialTest {
                name: "Made-up sign".to_string(),
                indication: "Testing".to_string(),
                technique: "Press".to_string(),
                interpretation: TestInterpretation {
                    positive: "Pain".to_string(),
                    negative: "No pain".to_string(),
                },
                sensitivity: Some(1.2),
                specificity: Some(0.5),
                clinical_utility: "None".to_string(),
            }],
        };
        envelope.framework = Some(Framework::PhysicalExam(exam));

        let violations = check_envelope(&envelope);
        assert_eq!(violations.len(), 2, "{:?}", violations);
        assert!(violations.contains(&Violation::StepNumbering {
            position: 1,
            step: 2
        }));
        let out_of_range = violations
            .iter()
            .find(|v| v.kind() == "probability-out-of-range")
            .unwrap();
        assert_eq!(out_of_range.severity(), Severity::Error);
        assert!(out_of_range.to_string().contains("Sensitivity"));
    }

    #[test]
    fn test_framework_type_and_dates() {
        let mut envelope = get_framework("history-opqrst").unwrap().clone();
        envelope.content_type = ContentType::Concept;
        envelope.version = 0;
        envelope.updated_at = envelope.created_at - chrono::Duration::days(1);

        let kinds: Vec<_> = check_envelope(&envelope).iter().map(Violation::kind).collect();
        assert_eq!(
            kinds,
            [
                "framework-type-mismatch",
                "invalid-version",
                "updated-before-created"
            ]
        );
    }

    #[test]
    fn test_unused_categories() {
        let yaml = "collection: clinical-reasoning\nentries:\n  - id: a\n    name: A\n    category: cognitive-bias\n    description: d\n    conceptExplanation: c\n    clinicalApplication: x\n";
        let collection =
            Collection::<ClinicalReasoningEntry>::from_yaml("clinical-reasoning", yaml).unwrap();
        let unused = unused_categories(&collection, &ClinicalReasoningCategory::ALL);
        assert_eq!(unused.len(), 7);
        assert!(!unused.contains(&ClinicalReasoningCategory::CognitiveBias));

        let empty = Collection::<ClinicalReasoningEntry>::new("clinical-reasoning", Vec::new());
        assert!(unused_categories(&empty, &ClinicalReasoningCategory::ALL).is_empty());
    }

    #[test]
    fn test_bundled_library_has_no_errors() {
        let report = validate(library());
        let errors: Vec<_> = report.errors().collect();
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(report.of_kind("dangling-reference").count(), 7);
        assert_eq!(report.of_kind("unknown-step-target").count(), 7);
        assert_eq!(report.warnings().count(), 14);
        assert!(!report.is_clean());

        let quiet = validate_with(
            library(),
            &ValidationOptions {
                report_dangling_references: false,
                ..Default::default()
            },
        );
        assert!(quiet.is_clean());
    }

    #[test]
    fn test_issue_serializes_with_kind() {
        let issue = ValidationIssue::new(
            "physical-exam",
            Some("exam-abdominal"),
            Violation::DanglingReference {
                target_id: "algorithm-abdominal-pain".to_string(),
            },
        );
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["kind"], "dangling-reference");
        assert_eq!(json["entryId"], "exam-abdominal");
        assert_eq!(json["targetId"], "algorithm-abdominal-pain");
    }
}
