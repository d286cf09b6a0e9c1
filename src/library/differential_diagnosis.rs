//! Differential diagnosis by chief complaint.
//!
//! Each entry lists must-not-miss, common and uncommon diagnoses for one
//! presenting complaint, with the questions, red flags and first-line workup
//! that separate them.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::catalog::{contains_lower, CatalogEntry, Collection};

/// Organ system a chief complaint is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChiefComplaintCategory {
    Cardiovascular,
    Pulmonary,
    Gastrointestinal,
    Neurological,
    Musculoskeletal,
    Hematologic,
    Endocrine,
    Infectious,
    Renal,
    General,
}

impl ChiefComplaintCategory {
    pub const ALL: [ChiefComplaintCategory; 10] = [
        ChiefComplaintCategory::Cardiovascular,
        ChiefComplaintCategory::Pulmonary,
        ChiefComplaintCategory::Gastrointestinal,
        ChiefComplaintCategory::Neurological,
        ChiefComplaintCategory::Musculoskeletal,
        ChiefComplaintCategory::Hematologic,
        ChiefComplaintCategory::Endocrine,
        ChiefComplaintCategory::Infectious,
        ChiefComplaintCategory::Renal,
        ChiefComplaintCategory::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChiefComplaintCategory::Cardiovascular => "cardiovascular",
            ChiefComplaintCategory::Pulmonary => "pulmonary",
            ChiefComplaintCategory::Gastrointestinal => "gastrointestinal",
            ChiefComplaintCategory::Neurological => "neurological",
            ChiefComplaintCategory::Musculoskeletal => "musculoskeletal",
            ChiefComplaintCategory::Hematologic => "hematologic",
            ChiefComplaintCategory::Endocrine => "endocrine",
            ChiefComplaintCategory::Infectious => "infectious",
            ChiefComplaintCategory::Renal => "renal",
            ChiefComplaintCategory::General => "general",
        }
    }
}

impl std::fmt::Display for ChiefComplaintCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ChiefComplaintCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.to_lowercase();
        ChiefComplaintCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown chief complaint category: {}", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifferentialDiagnosisEntry {
    pub id: String,
    pub chief_complaint: String,
    pub category: ChiefComplaintCategory,
    /// Must-not-miss diagnoses
    #[serde(rename = "emergencyDDx")]
    pub emergency_ddx: Vec<String>,
    #[serde(rename = "commonDDx")]
    pub common_ddx: Vec<String>,
    #[serde(rename = "uncommonDDx")]
    pub uncommon_ddx: Vec<String>,
    pub key_questions: Vec<String>,
    pub red_flags: Vec<String>,
    pub initial_workup: Vec<String>,
    pub clinical_pearl: String,
}

impl DifferentialDiagnosisEntry {
    /// Every listed diagnosis, most urgent list first
    pub fn diagnoses(&self) -> impl Iterator<Item = &str> {
        self.emergency_ddx
            .iter()
            .chain(&self.common_ddx)
            .chain(&self.uncommon_ddx)
            .map(String::as_str)
    }

    fn lists_diagnosis(&self, needle: &str) -> bool {
        self.diagnoses().any(|d| contains_lower(d, needle))
    }
}

impl CatalogEntry for DifferentialDiagnosisEntry {
    type Category = ChiefComplaintCategory;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.chief_complaint
    }

    fn category(&self) -> ChiefComplaintCategory {
        self.category
    }

    fn matches(&self, needle: &str) -> bool {
        contains_lower(&self.chief_complaint, needle)
            || self.lists_diagnosis(needle)
            || contains_lower(&self.clinical_pearl, needle)
    }
}

pub const COLLECTION_NAME: &str = "differential-diagnosis";

static DATABASE: LazyLock<Collection<DifferentialDiagnosisEntry>> = LazyLock::new(|| {
    Collection::load_bundled(
        COLLECTION_NAME,
        include_str!("../../content/differential_diagnosis.yaml"),
    )
});

/// The bundled differential diagnosis collection
pub fn differential_diagnosis_database() -> &'static Collection<DifferentialDiagnosisEntry> {
    &DATABASE
}

/// Entries whose complaint, diagnoses or pearl contain `query`, ignoring case
pub fn search_differential_diagnoses(query: &str) -> Vec<&'static DifferentialDiagnosisEntry> {
    DATABASE.search(query)
}

pub fn filter_differentials_by_category(
    categories: &[ChiefComplaintCategory],
) -> Vec<&'static DifferentialDiagnosisEntry> {
    DATABASE.filter_by_category(categories)
}

pub fn get_differential_by_id(id: &str) -> Option<&'static DifferentialDiagnosisEntry> {
    DATABASE.get(id)
}

/// Chief complaints in source order
pub fn chief_complaints() -> Vec<&'static str> {
    DATABASE.iter().map(|e| e.chief_complaint.as_str()).collect()
}

/// Entries with a red flag containing `query`, ignoring case
pub fn search_differentials_by_red_flag(query: &str) -> Vec<&'static DifferentialDiagnosisEntry> {
    let query = query.to_lowercase();
    DATABASE
        .iter()
        .filter(|e| e.red_flags.iter().any(|f| contains_lower(f, &query)))
        .collect()
}

/// Complaints whose differential mentions `diagnosis` in any list
pub fn find_entries_by_diagnosis(diagnosis: &str) -> Vec<&'static DifferentialDiagnosisEntry> {
    let diagnosis = diagnosis.to_lowercase();
    DATABASE
        .iter()
        .filter(|e| e.lists_diagnosis(&diagnosis))
        .collect()
}
