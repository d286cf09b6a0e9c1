//! Allergy and immunology reference database.
//!
//! Allergic disease, immunodeficiency, autoimmune conditions,
//! hypersensitivity reactions and immunotherapy.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::catalog::{CatalogEntry, Collection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllergyImmunologyCategory {
    AllergicRhinitis,
    FoodAllergy,
    DrugAllergy,
    Anaphylaxis,
    Immunodeficiency,
    Autoimmune,
    Hypersensitivity,
    Immunotherapy,
    Eosinophilic,
}

impl AllergyImmunologyCategory {
    pub const ALL: [AllergyImmunologyCategory; 9] = [
        AllergyImmunologyCategory::AllergicRhinitis,
        AllergyImmunologyCategory::FoodAllergy,
        AllergyImmunologyCategory::DrugAllergy,
        AllergyImmunologyCategory::Anaphylaxis,
        AllergyImmunologyCategory::Immunodeficiency,
        AllergyImmunologyCategory::Autoimmune,
        AllergyImmunologyCategory::Hypersensitivity,
        AllergyImmunologyCategory::Immunotherapy,
        AllergyImmunologyCategory::Eosinophilic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AllergyImmunologyCategory::AllergicRhinitis => "allergic-rhinitis",
            AllergyImmunologyCategory::FoodAllergy => "food-allergy",
            AllergyImmunologyCategory::DrugAllergy => "drug-allergy",
            AllergyImmunologyCategory::Anaphylaxis => "anaphylaxis",
            AllergyImmunologyCategory::Immunodeficiency => "immunodeficiency",
            AllergyImmunologyCategory::Autoimmune => "autoimmune",
            AllergyImmunologyCategory::Hypersensitivity => "hypersensitivity",
            AllergyImmunologyCategory::Immunotherapy => "immunotherapy",
            AllergyImmunologyCategory::Eosinophilic => "eosinophilic",
        }
    }
}

impl std::fmt::Display for AllergyImmunologyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AllergyImmunologyCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.to_lowercase();
        AllergyImmunologyCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown allergy/immunology category: {}", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergyImmunologyEntry {
    pub id: String,
    pub name: String,
    pub category: AllergyImmunologyCategory,
    pub description: String,
    pub pathophysiology: String,
    pub clinical_presentation: String,
    pub diagnostic_workup: String,
    pub management: String,
    pub complications: String,
    #[serde(default)]
    pub key_pearls: Vec<String>,
    #[serde(default)]
    pub references: Vec<String>,
}

impl AllergyImmunologyEntry {
    /// Searchable text: every prose field and pearl joined by single spaces
    fn haystack(&self) -> String {
        let fields = [
            self.name.as_str(),
            self.description.as_str(),
            self.pathophysiology.as_str(),
            self.clinical_presentation.as_str(),
            self.diagnostic_workup.as_str(),
            self.management.as_str(),
            self.complications.as_str(),
        ];

        fields
            .into_iter()
            .chain(self.key_pearls.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

impl CatalogEntry for AllergyImmunologyEntry {
    type Category = AllergyImmunologyCategory;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> AllergyImmunologyCategory {
        self.category
    }

    fn matches(&self, needle: &str) -> bool {
        self.haystack().contains(needle)
    }
}

pub const COLLECTION_NAME: &str = "allergy-immunology";

static DATABASE: LazyLock<Collection<AllergyImmunologyEntry>> = LazyLock::new(|| {
    Collection::load_bundled(
        COLLECTION_NAME,
        include_str!("../../content/allergy_immunology.yaml"),
    )
});

/// The bundled allergy and immunology collection
pub fn allergy_immunology_database() -> &'static Collection<AllergyImmunologyEntry> {
    &DATABASE
}

/// Entries whose prose fields or key pearls contain `query`, ignoring case
pub fn search_allergy_entries(query: &str) -> Vec<&'static AllergyImmunologyEntry> {
    DATABASE.search(query)
}

pub fn filter_allergy_by_category(
    categories: &[AllergyImmunologyCategory],
) -> Vec<&'static AllergyImmunologyEntry> {
    DATABASE.filter_by_category(categories)
}

pub fn get_allergy_entry_by_id(id: &str) -> Option<&'static AllergyImmunologyEntry> {
    DATABASE.get(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_database_loads() {
        let db = allergy_immunology_database();
        assert!(db.load_error().is_none(), "{:?}", db.load_error());
        assert_eq!(db.len(), 44);
    }

    #[test]
    fn test_search_covers_pearls() {
        // Only in a key pearl
        let results = search_allergy_entries("allergic salute");
        let ids: Vec<_> = results.iter().map(|e| e.id.as_str()).collect();
        assert!(ids.contains(&"seasonal-allergic-rhinitis"));
    }

    #[test]
    fn test_filter_and_lookup() {
        let anaphylaxis = filter_allergy_by_category(&[AllergyImmunologyCategory::Anaphylaxis]);
        assert_eq!(anaphylaxis.len(), 3);
        assert!(anaphylaxis
            .iter()
            .all(|e| e.category == AllergyImmunologyCategory::Anaphylaxis));

        let entry = get_allergy_entry_by_id("penicillin-allergy").unwrap();
        assert_eq!(entry.category, AllergyImmunologyCategory::DrugAllergy);
        assert!(get_allergy_entry_by_id("Penicillin-Allergy").is_none());
    }
}
