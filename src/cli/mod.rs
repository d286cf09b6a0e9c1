//! Command-line interface for medlearn.
//!
//! Provides commands for searching and browsing the bundled reference
//! content, showing an entry at a chosen level, and validating content.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::config::{self, ResolvedConfig};
use crate::domain::Level;
use crate::library::{
    self, allergy_immunology_database, clinical_reasoning_concepts, clinical_reasoning_database,
    diagnostic_algorithms, differential_diagnosis_database, history_entries_database,
    history_taking_frameworks, physical_exam_approaches, AllergyImmunologyCategory, CatalogEntry,
    ChiefComplaintCategory, ClinicalReasoningCategory, Collection, EntryRef, HistoryCategory,
};
use crate::validation::{self, Severity};

pub mod show;

/// medlearn - Leveled clinical reasoning and medical reference content
#[derive(Parser, Debug)]
#[command(name = "medlearn")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search entries by name and content
    Search {
        /// Search query (case-insensitive substring)
        query: String,

        /// Collection to search
        #[arg(short, long, value_enum, default_value_t = CollectionSelector::All)]
        collection: CollectionSelector,

        /// Maximum number of results to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List entries in one or more categories
    Filter {
        /// Category tags (e.g. cognitive-bias, anaphylaxis, screening-tool, neurological)
        #[arg(required = true)]
        categories: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show an entry by id (frameworks also by acronym)
    Show {
        /// Entry id, e.g. anchoring-bias or history-oldcarts
        id: String,

        /// Explanation level 1-5 (out-of-range values clamp)
        #[arg(short = 'L', long, allow_negative_numbers = true)]
        level: Option<i64>,

        /// Print the entry as JSON
        #[arg(long)]
        json: bool,
    },

    /// List categories with entry counts
    Categories,

    /// Describe the five explanation levels
    Levels,

    /// Show purpose, disclaimer and usage notes
    Guide {
        /// Level whose audience note to show
        #[arg(short = 'L', long, allow_negative_numbers = true)]
        level: Option<i64>,
    },

    /// Check bundled content for integrity problems
    Validate {
        /// Exit with an error if any error-level issue is found
        #[arg(long)]
        strict: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Which collection a search runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CollectionSelector {
    /// Every collection
    All,

    /// Clinical reasoning concepts and biases
    ClinicalReasoning,

    /// Allergy and immunology
    AllergyImmunology,

    /// History-taking reference cards and screening tools
    HistoryEntries,

    /// Differential diagnosis by chief complaint
    Differentials,

    /// History-taking frameworks
    HistoryTaking,

    /// Physical exam approaches
    PhysicalExam,

    /// Leveled clinical reasoning concepts
    Concepts,

    /// Diagnostic pathways
    Algorithms,
}

impl CollectionSelector {
    fn includes(self, other: CollectionSelector) -> bool {
        self == CollectionSelector::All || self == other
    }
}

/// One row of search or filter output
#[derive(Debug, Serialize)]
pub struct Hit<'a> {
    pub collection: &'a str,
    pub id: &'a str,
    pub name: &'a str,
    pub kind: String,
}

impl<'a> Hit<'a> {
    fn new(collection: &'a str, entry: EntryRef<'a>) -> Self {
        Self {
            collection,
            id: entry.id(),
            name: entry.name(),
            kind: entry.kind(),
        }
    }
}

/// Category named on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryArg {
    ClinicalReasoning(ClinicalReasoningCategory),
    AllergyImmunology(AllergyImmunologyCategory),
    History(HistoryCategory),
    ChiefComplaint(ChiefComplaintCategory),
}

impl std::str::FromStr for CategoryArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(category) = s.parse::<ClinicalReasoningCategory>() {
            return Ok(CategoryArg::ClinicalReasoning(category));
        }
        if let Ok(category) = s.parse::<AllergyImmunologyCategory>() {
            return Ok(CategoryArg::AllergyImmunology(category));
        }
        if let Ok(category) = s.parse::<HistoryCategory>() {
            return Ok(CategoryArg::History(category));
        }
        if let Ok(category) = s.parse::<ChiefComplaintCategory>() {
            return Ok(CategoryArg::ChiefComplaint(category));
        }
        anyhow::bail!(
            "Unknown category: {} (run 'medlearn categories' to list them)",
            s
        )
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let cfg = config::config()?;

        if cfg.validate_on_load && !matches!(self.command, Commands::Validate { .. }) {
            validate_on_load(cfg);
        }

        match self.command {
            Commands::Search {
                query,
                collection,
                limit,
                json,
            } => search(&query, collection, limit.unwrap_or(cfg.list_limit), json),
            Commands::Filter { categories, json } => filter(&categories, json),
            Commands::Show { id, level, json } => {
                let level = level.map(Level::nearest).unwrap_or(cfg.default_level);
                show::show_entry(&id, level, json)
            }
            Commands::Categories => list_categories(),
            Commands::Levels => list_levels(),
            Commands::Guide { level } => {
                let level = level.map(Level::nearest).unwrap_or(cfg.default_level);
                show_guide(level)
            }
            Commands::Validate { strict, json } => run_validation(cfg, strict, json),
            Commands::Config => show_config(cfg),
        }
    }
}

/// Quiet startup check: only error-level issues are logged in full
fn validate_on_load(cfg: &ResolvedConfig) {
    let report = validation::validate_with(library::library(), &cfg.validation);
    if report.has_errors() {
        report.log();
    } else {
        tracing::debug!(
            warnings = report.warnings().count(),
            "Bundled content validated"
        );
    }
}

fn collect_hits<'a, T: CatalogEntry>(
    collection: &'a Collection<T>,
    entries: Vec<&'a T>,
    wrap: fn(&'a T) -> EntryRef<'a>,
) -> Vec<Hit<'a>> {
    entries
        .into_iter()
        .map(|e| Hit::new(collection.name(), wrap(e)))
        .collect()
}

/// Search one or all collections
fn search(query: &str, selector: CollectionSelector, limit: usize, json: bool) -> Result<()> {
    let mut hits = Vec::new();

    if selector.includes(CollectionSelector::ClinicalReasoning) {
        let db = clinical_reasoning_database();
        hits.extend(collect_hits(db, db.search(query), EntryRef::ClinicalReasoning));
    }
    if selector.includes(CollectionSelector::AllergyImmunology) {
        let db = allergy_immunology_database();
        hits.extend(collect_hits(db, db.search(query), EntryRef::AllergyImmunology));
    }
    if selector.includes(CollectionSelector::HistoryEntries) {
        let db = history_entries_database();
        hits.extend(collect_hits(db, db.search(query), EntryRef::HistoryTaking));
    }
    if selector.includes(CollectionSelector::Differentials) {
        let db = differential_diagnosis_database();
        hits.extend(collect_hits(db, db.search(query), EntryRef::Differential));
    }

    let envelopes = [
        (CollectionSelector::HistoryTaking, history_taking_frameworks()),
        (CollectionSelector::PhysicalExam, physical_exam_approaches()),
        (CollectionSelector::Concepts, clinical_reasoning_concepts()),
        (CollectionSelector::Algorithms, diagnostic_algorithms()),
    ];
    for (which, db) in envelopes {
        if selector.includes(which) {
            hits.extend(collect_hits(db, db.search(query), EntryRef::Envelope));
        }
    }

    tracing::debug!(query, hits = hits.len(), "Search finished");

    if json {
        return print_json(&hits);
    }

    if hits.is_empty() {
        println!("No results found for: {}", query);
        return Ok(());
    }

    println!("Found {} result(s) for \"{}\":\n", hits.len(), query);
    print_hits(hits.iter().take(limit));
    if hits.len() > limit {
        println!("\n... {} more (use --limit to show more)", hits.len() - limit);
    }

    Ok(())
}

/// List entries in any of the given categories
fn filter(categories: &[String], json: bool) -> Result<()> {
    let parsed = categories
        .iter()
        .map(|c| c.parse::<CategoryArg>())
        .collect::<Result<Vec<_>>>()?;

    let clinical: Vec<_> = parsed
        .iter()
        .filter_map(|c| match c {
            CategoryArg::ClinicalReasoning(c) => Some(*c),
            _ => None,
        })
        .collect();
    let allergy: Vec<_> = parsed
        .iter()
        .filter_map(|c| match c {
            CategoryArg::AllergyImmunology(c) => Some(*c),
            _ => None,
        })
        .collect();
    let history: Vec<_> = parsed
        .iter()
        .filter_map(|c| match c {
            CategoryArg::History(c) => Some(*c),
            _ => None,
        })
        .collect();
    let complaints: Vec<_> = parsed
        .iter()
        .filter_map(|c| match c {
            CategoryArg::ChiefComplaint(c) => Some(*c),
            _ => None,
        })
        .collect();

    let clinical_db = clinical_reasoning_database();
    let allergy_db = allergy_immunology_database();
    let mut hits = collect_hits(
        clinical_db,
        library::filter_by_category(&clinical),
        EntryRef::ClinicalReasoning,
    );
    hits.extend(collect_hits(
        allergy_db,
        library::filter_allergy_by_category(&allergy),
        EntryRef::AllergyImmunology,
    ));
    hits.extend(collect_hits(
        history_entries_database(),
        library::filter_history_by_category(&history),
        EntryRef::HistoryTaking,
    ));
    hits.extend(collect_hits(
        differential_diagnosis_database(),
        library::filter_differentials_by_category(&complaints),
        EntryRef::Differential,
    ));

    if json {
        return print_json(&hits);
    }

    if hits.is_empty() {
        println!("No entries in: {}", categories.join(", "));
        return Ok(());
    }

    print_hits(hits.iter());
    println!("\nTotal: {} entries", hits.len());

    Ok(())
}

fn print_hits<'a>(hits: impl Iterator<Item = &'a Hit<'a>>) {
    println!("{:<40} {:<26} {:<50}", "ID", "CATEGORY", "NAME");
    println!("{}", "-".repeat(116));

    for hit in hits {
        println!(
            "{:<40} {:<26} {:<50}",
            hit.id,
            hit.kind,
            truncate(hit.name, 50)
        );
    }
}

/// List every category with its entry count
fn list_categories() -> Result<()> {
    let clinical_db = clinical_reasoning_database();
    let counts = clinical_db.category_counts();
    println!("Clinical reasoning ({} entries):", clinical_db.len());
    for category in library::CLINICAL_REASONING_CATEGORIES {
        let n = count_of(&counts, category);
        println!("  {:<28} {:>3}  {}", category.as_str(), n, category.label());
    }

    let allergy_db = allergy_immunology_database();
    let counts = allergy_db.category_counts();
    println!("\nAllergy & immunology ({} entries):", allergy_db.len());
    for category in library::ALLERGY_IMMUNOLOGY_CATEGORIES {
        let n = count_of(&counts, category);
        println!("  {:<28} {:>3}", category.as_str(), n);
    }

    let history_db = history_entries_database();
    println!("\nHistory taking ({} entries):", history_db.len());
    for (category, n) in library::history_category_counts() {
        println!("  {:<28} {:>3}", category.as_str(), n);
    }

    let differential_db = differential_diagnosis_database();
    let counts = differential_db.category_counts();
    println!("\nChief complaints ({} entries):", differential_db.len());
    for category in library::ALL_CHIEF_COMPLAINT_CATEGORIES {
        let n = count_of(&counts, category);
        println!("  {:<28} {:>3}", category.as_str(), n);
    }

    println!("\nLeveled content:");
    for envelope in history_taking_frameworks()
        .iter()
        .chain(physical_exam_approaches().iter())
        .chain(clinical_reasoning_concepts().iter())
        .chain(diagnostic_algorithms().iter())
    {
        println!("  {:<44} {:<10} {}", envelope.id, envelope.content_type, envelope.name);
    }

    Ok(())
}

fn count_of<C: PartialEq>(counts: &[(C, usize)], category: C) -> usize {
    counts
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, n)| *n)
        .unwrap_or(0)
}

/// Describe the explanation levels
fn list_levels() -> Result<()> {
    println!("{:<6} {:<22} {:<60}", "LEVEL", "NAME", "AUDIENCE");
    println!("{}", "-".repeat(88));
    for level in Level::ALL {
        println!("{:<6} {:<22} {:<60}", level.number(), level.name(), level.audience());
    }
    Ok(())
}

/// Print the static guidance
fn show_guide(level: Level) -> Result<()> {
    println!("{}\n", library::PURPOSE);
    println!("How to use:");
    for tip in library::HOW_TO_USE {
        println!("  - {}", tip);
    }
    println!("\nFor {} readers: {}", level.name(), library::audience_note(level));
    println!("\n{}", library::DISCLAIMER);
    Ok(())
}

/// Validate the bundled content and print the report
fn run_validation(cfg: &ResolvedConfig, strict: bool, json: bool) -> Result<()> {
    let report = validation::validate_with(library::library(), &cfg.validation);

    if json {
        print_json(&report)?;
    } else {
        for (name, entries, error) in library::library().collection_status() {
            match error {
                Some(_) => println!("  {:<22} failed to load", name),
                None => println!("  {:<22} {} entries", name, entries),
            }
        }
        println!();

        for issue in &report.issues {
            let marker = match issue.severity {
                Severity::Error => "ERROR",
                Severity::Warning => "WARN ",
            };
            println!(
                "{} [{}] {}: {}",
                marker,
                issue.collection,
                issue.entry_id.as_deref().unwrap_or("-"),
                issue.message
            );
        }

        println!(
            "\n{} error(s), {} warning(s)",
            report.errors().count(),
            report.warnings().count()
        );
    }

    if strict && report.has_errors() {
        anyhow::bail!(
            "Content validation failed with {} error(s)",
            report.errors().count()
        );
    }

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config(cfg: &ResolvedConfig) -> Result<()> {
    println!("medlearn configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Display:");
    println!(
        "  Default level: {} ({})",
        cfg.default_level,
        cfg.default_level.name()
    );
    println!("  List limit:    {}", cfg.list_limit);
    println!();
    println!("Validation:");
    println!("  On load:              {}", cfg.validate_on_load);
    println!(
        "  Dangling references:  {}",
        cfg.validation.report_dangling_references
    );
    println!(
        "  Unused categories:    {}",
        cfg.validation.report_unused_categories
    );

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Shorten `s` to at most `width` characters, marking the cut with "..."
pub(crate) fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let kept: String = s.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_command() {
        let cli = Cli::try_parse_from([
            "medlearn",
            "search",
            "bias",
            "--collection",
            "clinical-reasoning",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Search {
                query,
                collection,
                limit,
                json,
            } => {
                assert_eq!(query, "bias");
                assert_eq!(collection, CollectionSelector::ClinicalReasoning);
                assert!(limit.is_none());
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_show_with_level() {
        let cli = Cli::try_parse_from(["medlearn", "show", "history-oldcarts", "-L", "7"]).unwrap();
        match cli.command {
            Commands::Show { id, level, .. } => {
                assert_eq!(id, "history-oldcarts");
                assert_eq!(level.map(Level::nearest), Some(Level::Physician));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_filter_requires_category() {
        assert!(Cli::try_parse_from(["medlearn", "filter"]).is_err());
    }

    #[test]
    fn test_category_arg() {
        assert_eq!(
            "cognitive-bias".parse::<CategoryArg>().unwrap(),
            CategoryArg::ClinicalReasoning(ClinicalReasoningCategory::CognitiveBias)
        );
        assert_eq!(
            "Anaphylaxis".parse::<CategoryArg>().unwrap(),
            CategoryArg::AllergyImmunology(AllergyImmunologyCategory::Anaphylaxis)
        );
        assert_eq!(
            "screening-tool".parse::<CategoryArg>().unwrap(),
            CategoryArg::History(HistoryCategory::ScreeningTool)
        );
        assert_eq!(
            "NEUROLOGICAL".parse::<CategoryArg>().unwrap(),
            CategoryArg::ChiefComplaint(ChiefComplaintCategory::Neurological)
        );
        assert!("cardiology".parse::<CategoryArg>().is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Hickam's dictum and Occam's razor", 10), "Hickam'...");
        // Multi-byte characters are never split
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_selector_includes() {
        assert!(CollectionSelector::All.includes(CollectionSelector::PhysicalExam));
        assert!(CollectionSelector::HistoryTaking.includes(CollectionSelector::HistoryTaking));
        assert!(!CollectionSelector::HistoryTaking.includes(CollectionSelector::PhysicalExam));
        assert!(!CollectionSelector::HistoryEntries.includes(CollectionSelector::HistoryTaking));
    }

    #[test]
    fn test_parse_new_collection_selectors() {
        for (arg, expected) in [
            ("history-entries", CollectionSelector::HistoryEntries),
            ("differentials", CollectionSelector::Differentials),
            ("concepts", CollectionSelector::Concepts),
            ("algorithms", CollectionSelector::Algorithms),
        ] {
            let cli = Cli::try_parse_from(["medlearn", "search", "pain", "-c", arg]).unwrap();
            match cli.command {
                Commands::Search { collection, .. } => assert_eq!(collection, expected),
                other => panic!("unexpected command: {:?}", other),
            }
        }
    }
}
