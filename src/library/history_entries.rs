//! History-taking reference database.
//!
//! Interview frameworks, system- and population-specific histories,
//! screening instruments and assessment tools. Unlike the leveled framework
//! envelopes in [`super::history_taking`], these are single-audience
//! reference cards.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::catalog::{contains_lower, CatalogEntry, Collection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryCategory {
    Framework,
    SystemSpecific,
    PopulationSpecific,
    ScreeningTool,
    AssessmentTool,
}

impl HistoryCategory {
    pub const ALL: [HistoryCategory; 5] = [
        HistoryCategory::Framework,
        HistoryCategory::SystemSpecific,
        HistoryCategory::PopulationSpecific,
        HistoryCategory::ScreeningTool,
        HistoryCategory::AssessmentTool,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HistoryCategory::Framework => "framework",
            HistoryCategory::SystemSpecific => "system-specific",
            HistoryCategory::PopulationSpecific => "population-specific",
            HistoryCategory::ScreeningTool => "screening-tool",
            HistoryCategory::AssessmentTool => "assessment-tool",
        }
    }
}

impl std::fmt::Display for HistoryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for HistoryCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.to_lowercase();
        HistoryCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown history category: {}", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryTakingEntry {
    pub id: String,
    pub name: String,
    pub category: HistoryCategory,
    pub description: String,
    pub key_questions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnemonics: Option<String>,
    #[serde(default)]
    pub red_flags: Vec<String>,
    pub clinical_pearl: String,
    pub documentation_tips: String,
}

impl CatalogEntry for HistoryTakingEntry {
    type Category = HistoryCategory;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> HistoryCategory {
        self.category
    }

    fn matches(&self, needle: &str) -> bool {
        contains_lower(&self.name, needle)
            || contains_lower(&self.description, needle)
            || contains_lower(&self.clinical_pearl, needle)
            || self.key_questions.iter().any(|q| contains_lower(q, needle))
    }
}

pub const COLLECTION_NAME: &str = "history-entries";

static DATABASE: LazyLock<Collection<HistoryTakingEntry>> = LazyLock::new(|| {
    Collection::load_bundled(
        COLLECTION_NAME,
        include_str!("../../content/history_entries.yaml"),
    )
});

/// The bundled history-taking reference collection
pub fn history_entries_database() -> &'static Collection<HistoryTakingEntry> {
    &DATABASE
}

/// Entries whose name, description, pearl or key questions contain `query`
pub fn search_history_taking_entries(query: &str) -> Vec<&'static HistoryTakingEntry> {
    DATABASE.search(query)
}

pub fn filter_history_by_category(
    categories: &[HistoryCategory],
) -> Vec<&'static HistoryTakingEntry> {
    DATABASE.filter_by_category(categories)
}

pub fn get_history_entry_by_id(id: &str) -> Option<&'static HistoryTakingEntry> {
    DATABASE.get(id)
}

/// Entries with a red flag containing `query`, ignoring case
pub fn search_history_by_red_flag(query: &str) -> Vec<&'static HistoryTakingEntry> {
    let query = query.to_lowercase();
    DATABASE
        .iter()
        .filter(|e| e.red_flags.iter().any(|f| contains_lower(f, &query)))
        .collect()
}

/// Entry count for every category, including empty ones, in declaration order
pub fn history_category_counts() -> Vec<(HistoryCategory, usize)> {
    let counts = DATABASE.category_counts();
    HistoryCategory::ALL
        .into_iter()
        .map(|category| {
            let n = counts
                .iter()
                .find(|(c, _)| *c == category)
                .map_or(0, |(_, n)| *n);
            (category, n)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_database_loads() {
        let db = history_entries_database();
        assert!(db.load_error().is_none(), "{:?}", db.load_error());
        assert_eq!(db.len(), 31);
    }

    #[test]
    fn test_search_covers_key_questions() {
        // Only in OLDCARTS' key questions
        let results = search_history_taking_entries("what were you doing?");
        let ids: Vec<_> = results.iter().map(|e| e.id.as_str()).collect();
        assert!(ids.contains(&"hpi-oldcarts"));
    }

    #[test]
    fn test_search_by_red_flag() {
        let results = search_history_by_red_flag("THUNDERCLAP");
        assert!(results.iter().any(|e| e.id == "hpi-oldcarts"));
        assert!(results
            .iter()
            .all(|e| e.red_flags.iter().any(|f| f.to_lowercase().contains("thunderclap"))));
        assert!(search_history_by_red_flag("zzz-no-such-flag").is_empty());
    }

    #[test]
    fn test_category_counts_cover_every_category() {
        let counts = history_category_counts();
        assert_eq!(
            counts,
            vec![
                (HistoryCategory::Framework, 8),
                (HistoryCategory::SystemSpecific, 8),
                (HistoryCategory::PopulationSpecific, 4),
                (HistoryCategory::ScreeningTool, 6),
                (HistoryCategory::AssessmentTool, 5),
            ]
        );
        assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), 31);
    }

    #[test]
    fn test_filter_and_lookup() {
        let screening = filter_history_by_category(&[HistoryCategory::ScreeningTool]);
        assert!(screening.iter().any(|e| e.id == "phq9-depression-screen"));

        let entry = get_history_entry_by_id("hpi-opqrst").unwrap();
        assert_eq!(entry.category, HistoryCategory::Framework);
        assert!(entry.mnemonics.as_deref().unwrap().starts_with("OPQRST"));
        assert!(get_history_entry_by_id("history-opqrst").is_none());
    }
}
