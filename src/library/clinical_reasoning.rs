//! Clinical reasoning reference database.
//!
//! Diagnostic frameworks, differential diagnosis strategies, cognitive
//! biases, test interpretation, Bayesian reasoning, clinical decision rules
//! and management reasoning.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::catalog::{contains_lower, CatalogEntry, Collection};

/// Top-level grouping of clinical reasoning entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClinicalReasoningCategory {
    DiagnosticFramework,
    DifferentialDiagnosis,
    ClinicalDecisionMaking,
    CognitiveBias,
    ProbabilityReasoning,
    TestInterpretation,
    ManagementReasoning,
    CasePresentation,
}

impl ClinicalReasoningCategory {
    /// Every category, in display order
    pub const ALL: [ClinicalReasoningCategory; 8] = [
        ClinicalReasoningCategory::DiagnosticFramework,
        ClinicalReasoningCategory::DifferentialDiagnosis,
        ClinicalReasoningCategory::ClinicalDecisionMaking,
        ClinicalReasoningCategory::CognitiveBias,
        ClinicalReasoningCategory::ProbabilityReasoning,
        ClinicalReasoningCategory::TestInterpretation,
        ClinicalReasoningCategory::ManagementReasoning,
        ClinicalReasoningCategory::CasePresentation,
    ];

    /// Kebab-case tag as it appears in content
    pub fn as_str(self) -> &'static str {
        match self {
            ClinicalReasoningCategory::DiagnosticFramework => "diagnostic-framework",
            ClinicalReasoningCategory::DifferentialDiagnosis => "differential-diagnosis",
            ClinicalReasoningCategory::ClinicalDecisionMaking => "clinical-decision-making",
            ClinicalReasoningCategory::CognitiveBias => "cognitive-bias",
            ClinicalReasoningCategory::ProbabilityReasoning => "probability-reasoning",
            ClinicalReasoningCategory::TestInterpretation => "test-interpretation",
            ClinicalReasoningCategory::ManagementReasoning => "management-reasoning",
            ClinicalReasoningCategory::CasePresentation => "case-presentation",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            ClinicalReasoningCategory::DiagnosticFramework => "Diagnostic Frameworks",
            ClinicalReasoningCategory::DifferentialDiagnosis => "Differential Diagnosis",
            ClinicalReasoningCategory::ClinicalDecisionMaking => "Clinical Decision Rules",
            ClinicalReasoningCategory::CognitiveBias => "Cognitive Biases",
            ClinicalReasoningCategory::ProbabilityReasoning => "Probability Reasoning",
            ClinicalReasoningCategory::TestInterpretation => "Test Interpretation",
            ClinicalReasoningCategory::ManagementReasoning => "Management Reasoning",
            ClinicalReasoningCategory::CasePresentation => "Case Presentation",
        }
    }
}

impl std::fmt::Display for ClinicalReasoningCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ClinicalReasoningCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.to_lowercase();
        ClinicalReasoningCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown clinical reasoning category: {}", s))
    }
}

/// A clinical reasoning concept with its application and teaching points
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalReasoningEntry {
    pub id: String,
    pub name: String,
    pub category: ClinicalReasoningCategory,
    pub description: String,
    pub concept_explanation: String,
    pub clinical_application: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub pitfalls: Vec<String>,
    #[serde(default)]
    pub key_pearls: Vec<String>,
    #[serde(default)]
    pub references: Vec<String>,
}

impl CatalogEntry for ClinicalReasoningEntry {
    type Category = ClinicalReasoningCategory;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> ClinicalReasoningCategory {
        self.category
    }

    fn matches(&self, needle: &str) -> bool {
        contains_lower(&self.name, needle)
            || contains_lower(&self.description, needle)
            || contains_lower(&self.concept_explanation, needle)
            || contains_lower(&self.clinical_application, needle)
    }
}

pub const COLLECTION_NAME: &str = "clinical-reasoning";

static DATABASE: LazyLock<Collection<ClinicalReasoningEntry>> = LazyLock::new(|| {
    Collection::load_bundled(
        COLLECTION_NAME,
        include_str!("../../content/clinical_reasoning.yaml"),
    )
});

/// The bundled clinical reasoning collection
pub fn clinical_reasoning_database() -> &'static Collection<ClinicalReasoningEntry> {
    &DATABASE
}

/// Entries whose name, description, concept explanation or clinical
/// application contains `query`, ignoring case.
///
/// An empty query returns every entry.
pub fn search_clinical_reasoning_entries(query: &str) -> Vec<&'static ClinicalReasoningEntry> {
    DATABASE.search(query)
}

/// Entries in any of the given categories; no categories means no entries
pub fn filter_by_category(
    categories: &[ClinicalReasoningCategory],
) -> Vec<&'static ClinicalReasoningEntry> {
    DATABASE.filter_by_category(categories)
}

/// Look up a single entry by exact id
pub fn get_entry_by_id(id: &str) -> Option<&'static ClinicalReasoningEntry> {
    DATABASE.get(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_database_loads() {
        let db = clinical_reasoning_database();
        assert!(db.load_error().is_none(), "{:?}", db.load_error());
        assert_eq!(db.len(), 43);
        assert_eq!(db.name(), COLLECTION_NAME);
    }

    #[test]
    fn test_category_round_trip() {
        for category in ClinicalReasoningCategory::ALL {
            assert_eq!(
                category.as_str().parse::<ClinicalReasoningCategory>().unwrap(),
                category
            );
            let yaml = serde_yaml::to_string(&category).unwrap();
            assert_eq!(yaml.trim(), category.as_str());
        }
        assert!("cognitive bias".parse::<ClinicalReasoningCategory>().is_err());
    }

    #[test]
    fn test_search_matches_any_field() {
        // Name only
        let results = search_clinical_reasoning_entries("hickam");
        assert!(results.iter().any(|e| e.id == "occams-razor-vs-hickams-dictum"));

        // Concept explanation only
        let results = search_clinical_reasoning_entries("enabling conditions");
        assert!(results.iter().any(|e| e.id == "illness-scripts"));
    }

    #[test]
    fn test_search_ignores_key_pearls() {
        // Only appears in a key pearl of illness-scripts
        let entry = get_entry_by_id("illness-scripts").unwrap();
        assert!(entry.key_pearls.iter().any(|p| p.contains("three-component format")));
        assert!(search_clinical_reasoning_entries("three-component format").is_empty());
    }
}
