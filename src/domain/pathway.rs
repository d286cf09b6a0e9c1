//! Diagnostic pathways: a presenting complaint worked up as a graph of steps.
//!
//! Steps link to each other by id. A link whose target was never authored is
//! kept as data and resolves to `None`, the same way cross-references do.

use serde::{Deserialize, Serialize};

use super::level::{Level, Levels};

/// Pathway details attached to an envelope of type `pathway`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticPathway {
    /// Presenting complaint the pathway starts from (e.g. "Chest Pain")
    pub presentation: String,

    #[serde(default)]
    pub icd_codes: Vec<String>,

    /// Id of the first step
    pub start_step_id: String,

    pub steps: Vec<PathwayStep>,

    #[serde(default)]
    pub differentials: Vec<PathwayDifferential>,

    #[serde(default)]
    pub red_flags: Vec<RedFlag>,
}

impl DiagnosticPathway {
    /// Step by id
    pub fn step(&self, id: &str) -> Option<&PathwayStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Entry point of the pathway
    pub fn start(&self) -> Option<&PathwayStep> {
        self.step(&self.start_step_id)
    }

    /// Branches leaving `step`, each paired with its target if it exists
    pub fn next_steps<'a>(
        &'a self,
        step: &'a PathwayStep,
    ) -> Vec<(&'a NextStep, Option<&'a PathwayStep>)> {
        step.next_steps
            .iter()
            .map(|next| (next, self.step(&next.target_step_id)))
            .collect()
    }

    /// Steps that flag danger or demand immediate action, in order
    pub fn urgent_steps(&self) -> impl Iterator<Item = &PathwayStep> {
        self.steps
            .iter()
            .filter(|s| s.is_red_flag || s.requires_urgent_action)
    }

    /// Differentials at `urgency`, in authored order
    pub fn differentials_with_urgency(&self, urgency: Urgency) -> Vec<&PathwayDifferential> {
        self.differentials
            .iter()
            .filter(|d| d.urgency == urgency)
            .collect()
    }

    /// Steps with their content for `level`
    pub fn steps_at(&self, level: Level) -> Vec<PathwayStepView<'_>> {
        self.steps
            .iter()
            .map(|step| PathwayStepView {
                id: &step.id,
                step_type: step.step_type,
                content: step.content.get(level),
                details: step,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathwayStep {
    /// Unique within the pathway
    pub id: String,

    #[serde(rename = "type")]
    pub step_type: StepType,

    /// What to do or decide at this step, per level
    pub content: Levels<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_steps: Vec<NextStep>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_red_flag: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub requires_urgent_action: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_pearl: Option<String>,
}

impl PathwayStep {
    /// No branch leaves this step
    pub fn is_terminal(&self) -> bool {
        self.next_steps.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepType {
    Question,
    Decision,
    Action,
    Warning,
    Endpoint,
}

impl std::fmt::Display for StepType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StepType::Question => "question",
            StepType::Decision => "decision",
            StepType::Action => "action",
            StepType::Warning => "warning",
            StepType::Endpoint => "endpoint",
        };
        write!(f, "{}", s)
    }
}

/// Conditional edge to another step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextStep {
    pub condition: String,
    pub target_step_id: String,
}

/// A step as seen at one level
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathwayStepView<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub content: &'a str,
    #[serde(skip)]
    pub details: &'a PathwayStep,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathwayDifferential {
    pub diagnosis: String,
    pub prevalence: Prevalence,
    pub urgency: Urgency,
    #[serde(default)]
    pub key_features: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Prevalence {
    Common,
    Uncommon,
    Rare,
}

/// How quickly a diagnosis must be pursued; most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Urgency {
    Emergent,
    Urgent,
    Routine,
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Urgency::Emergent => "emergent",
            Urgency::Urgent => "urgent",
            Urgency::Routine => "routine",
        };
        write!(f, "{}", s)
    }
}

/// Finding that should prompt escalation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedFlag {
    pub finding: String,
    pub implication: String,
    pub action: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATHWAY: &str = r#"
presentation: Headache
startStepId: triage
steps:
  - id: triage
    type: question
    content: { 1: a, 2: b, 3: c, 4: d, 5: e }
    nextSteps:
      - condition: Thunderclap onset
        targetStepId: imaging
      - condition: Fever and neck stiffness
        targetStepId: lumbar-puncture
  - id: imaging
    type: warning
    content: { 1: scan, 2: scan, 3: CT head, 4: CT head, 5: CT then LP }
    isRedFlag: true
    requiresUrgentAction: true
differentials:
  - diagnosis: Subarachnoid hemorrhage
    prevalence: rare
    urgency: emergent
  - diagnosis: Tension headache
    prevalence: common
    urgency: routine
"#;

    #[test]
    fn test_next_steps_resolve_by_id() {
        let pathway: DiagnosticPathway = serde_yaml::from_str(PATHWAY).unwrap();
        let start = pathway.start().unwrap();
        assert_eq!(start.step_type, StepType::Question);
        assert!(!start.is_terminal());

        let next = pathway.next_steps(start);
        assert_eq!(next.len(), 2);
        assert_eq!(next[0].1.map(|s| s.id.as_str()), Some("imaging"));
        // Never authored
        assert!(next[1].1.is_none());

        assert!(pathway.step("imaging").unwrap().is_terminal());
    }

    #[test]
    fn test_urgent_steps_and_differentials() {
        let pathway: DiagnosticPathway = serde_yaml::from_str(PATHWAY).unwrap();

        let urgent: Vec<_> = pathway.urgent_steps().map(|s| s.id.as_str()).collect();
        assert_eq!(urgent, ["imaging"]);

        let emergent = pathway.differentials_with_urgency(Urgency::Emergent);
        assert_eq!(emergent.len(), 1);
        assert_eq!(emergent[0].diagnosis, "Subarachnoid hemorrhage");
        assert!(pathway.red_flags.is_empty());
    }

    #[test]
    fn test_steps_at_level() {
        let pathway: DiagnosticPathway = serde_yaml::from_str(PATHWAY).unwrap();
        let steps = pathway.steps_at(Level::Physician);
        assert_eq!(steps[0].content, "e");
        assert_eq!(steps[1].content, "CT then LP");

        let json = serde_json::to_value(steps[1]).unwrap();
        assert_eq!(json["type"], "warning");
        assert_eq!(json["id"], "imaging");
    }
}
