//! Mnemonic and exam-sequence specializations of a content envelope.
//!
//! Both variants mix leveled fields (questions, step descriptions) with
//! fixed ones (rationale, findings, positions). Leveled fields are always
//! `Levels<_>`; fixed fields are plain values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::level::{Level, Levels};

/// Framework details attached to an envelope of type `framework`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Framework {
    /// Mnemonic history-taking framework (OLDCARTS, OPQRST, ...)
    History(HistoryFramework),

    /// Ordered physical examination sequence
    PhysicalExam(PhysicalExamApproach),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryFramework {
    pub acronym: String,

    /// What each letter of the acronym stands for, spelled out
    pub full_name: String,

    /// Complaints the framework applies to
    #[serde(default)]
    pub applicable_to: Vec<String>,

    /// One component per mnemonic letter, in acronym order
    pub components: Vec<FrameworkComponent>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sample_cases: Vec<SampleCase>,
}

impl HistoryFramework {
    /// Questions to ask at `level`, paired with their mnemonic letter
    pub fn questions_at(&self, level: Level) -> Vec<(&str, &[String])> {
        self.components
            .iter()
            .map(|c| (c.letter.as_str(), c.questions.get(level).as_slice()))
            .collect()
    }

    /// Component for a mnemonic letter (case-insensitive)
    pub fn component(&self, letter: &str) -> Option<&FrameworkComponent> {
        self.components
            .iter()
            .find(|c| c.letter.eq_ignore_ascii_case(letter))
    }

    /// Sample cases written for `level`
    pub fn sample_cases_at(&self, level: Level) -> impl Iterator<Item = &SampleCase> {
        self.sample_cases.iter().filter(move |c| c.level == level)
    }
}

/// One mnemonic letter of a history-taking framework
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkComponent {
    pub letter: String,
    pub meaning: String,
    pub questions: Levels<Vec<String>>,
    pub clinical_rationale: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// Worked example applying a framework to a presentation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleCase {
    pub presentation: String,

    /// Mnemonic letter to the history captured under it
    pub application_of_framework: BTreeMap<String, String>,

    pub level: Level,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalExamApproach {
    pub body_system: String,
    pub region: String,

    /// Examination steps in the order they are performed
    pub sequence: Vec<ExamStep>,

    #[serde(default)]
    pub special_tests: Vec<SpecialTest>,
}

impl PhysicalExamApproach {
    /// Steps with their description for `level`; fixed fields are shared
    pub fn steps_at(&self, level: Level) -> Vec<StepView<'_>> {
        self.sequence
            .iter()
            .map(|step| StepView {
                step: step.step,
                technique: &step.technique,
                description: step.description.get(level),
                details: step,
            })
            .collect()
    }
}

/// One step of an examination sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamStep {
    /// 1-based position in the sequence
    pub step: u32,
    pub technique: String,
    pub description: Levels<String>,
    pub normal_findings: String,
    #[serde(default)]
    pub abnormal_findings: Vec<AbnormalFinding>,
    pub patient_position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_needed: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_pearl: Option<String>,
}

/// A step as seen at one level
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepView<'a> {
    pub step: u32,
    pub technique: &'a str,
    pub description: &'a str,
    #[serde(skip)]
    pub details: &'a ExamStep,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbnormalFinding {
    pub finding: String,
    #[serde(default)]
    pub possible_causes: Vec<String>,
    pub significance: String,
}

/// Named bedside test; accuracy figures are descriptive only
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialTest {
    pub name: String,
    pub indication: String,
    pub technique: String,
    pub interpretation: TestInterpretation,
    /// In [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<f64>,
    /// In [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specificity: Option<f64>,
    pub clinical_utility: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestInterpretation {
    pub positive: String,
    pub negative: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(letter: &str) -> FrameworkComponent {
        FrameworkComponent {
            letter: letter.to_string(),
            meaning: format!("{} meaning", letter),
            questions: Levels::from_fn(|l| vec![format!("{}{}?", letter, l)]),
            clinical_rationale: String::new(),
            examples: Vec::new(),
        }
    }

    #[test]
    fn test_questions_at_level_keeps_component_order() {
        let framework = HistoryFramework {
            acronym: "AB".to_string(),
            full_name: "A, B".to_string(),
            applicable_to: Vec::new(),
            components: vec![component("A"), component("B")],
            sample_cases: Vec::new(),
        };

        let questions = framework.questions_at(Level::Nursing);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].0, "A");
        assert_eq!(questions[0].1, ["A3?".to_string()]);
        assert_eq!(questions[1].1, ["B3?".to_string()]);

        assert!(framework.component("b").is_some());
        assert!(framework.component("z").is_none());
    }

    #[test]
    fn test_framework_kind_tag() {
        let yaml = r#"
kind: physical-exam
bodySystem: cardiovascular
region: chest
sequence:
  - step: 1
    technique: Inspection
    description:
      1: look
      2: observe
      3: inspect
      4: assess
      5: survey
    normalFindings: Comfortable
    patientPosition: Supine
"#;
        let framework: Framework = serde_yaml::from_str(yaml).unwrap();
        let Framework::PhysicalExam(exam) = framework else {
            panic!("expected a physical exam framework");
        };

        let steps = exam.steps_at(Level::Physician);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].description, "survey");
        assert_eq!(steps[0].details.normal_findings, "Comfortable");
        assert!(exam.special_tests.is_empty());
    }
}
