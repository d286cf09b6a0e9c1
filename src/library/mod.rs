//! Bundled reference content and the queries over it.
//!
//! Every collection is embedded at compile time as a YAML document under
//! `content/`, parsed on first use and then shared read-only.
//!
//! # Collections
//!
//! ```text
//! content/
//! ├── clinical_reasoning.yaml            # Reasoning concepts, biases, decision rules
//! ├── allergy_immunology.yaml            # Allergic and immune disease
//! ├── history_entries.yaml               # History-taking reference cards
//! ├── differential_diagnosis.yaml        # Differentials by chief complaint
//! ├── history_taking.yaml                # OLDCARTS, OPQRST (leveled envelopes)
//! ├── physical_exam.yaml                 # Exam sequences (leveled envelopes)
//! ├── clinical_reasoning_concepts.yaml   # Concepts (leveled envelopes)
//! └── diagnostic_algorithms.yaml         # Pathways (leveled envelopes)
//! ```
//!
//! [`Library`] indexes every collection by id so cross-references can be
//! resolved regardless of which collection owns the target.

pub mod allergy_immunology;
pub mod catalog;
pub mod clinical_reasoning;
pub mod concepts;
pub mod content;
pub mod diagnostic_algorithms;
pub mod differential_diagnosis;
pub mod guidance;
pub mod history_entries;
pub mod history_taking;
pub mod physical_exam;

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

use crate::domain::{ContentEnvelope, CrossReference};

pub use allergy_immunology::{
    allergy_immunology_database, filter_allergy_by_category, get_allergy_entry_by_id,
    search_allergy_entries, AllergyImmunologyCategory, AllergyImmunologyEntry,
};
pub use catalog::{CatalogEntry, Collection, LoadError};
pub use clinical_reasoning::{
    clinical_reasoning_database, filter_by_category, get_entry_by_id,
    search_clinical_reasoning_entries, ClinicalReasoningCategory, ClinicalReasoningEntry,
};
pub use concepts::{clinical_reasoning_concepts, get_concept};
pub use diagnostic_algorithms::{algorithms_for_presentation, diagnostic_algorithms, get_algorithm};
pub use differential_diagnosis::{
    chief_complaints, differential_diagnosis_database, filter_differentials_by_category,
    find_entries_by_diagnosis, get_differential_by_id, search_differential_diagnoses,
    search_differentials_by_red_flag, ChiefComplaintCategory, DifferentialDiagnosisEntry,
};
pub use guidance::{audience_note, DISCLAIMER, HOW_TO_USE, PURPOSE};
pub use history_entries::{
    filter_history_by_category, get_history_entry_by_id, history_category_counts,
    history_entries_database, search_history_by_red_flag, search_history_taking_entries,
    HistoryCategory, HistoryTakingEntry,
};
pub use history_taking::{get_framework, get_framework_by_acronym, history_taking_frameworks};
pub use physical_exam::{
    exam_approaches_for_body_system, get_exam_approach, physical_exam_approaches,
};

/// Every clinical reasoning category, in display order
pub const CLINICAL_REASONING_CATEGORIES: [ClinicalReasoningCategory; 8] =
    ClinicalReasoningCategory::ALL;

/// Every allergy and immunology category, in display order
pub const ALLERGY_IMMUNOLOGY_CATEGORIES: [AllergyImmunologyCategory; 9] =
    AllergyImmunologyCategory::ALL;

/// Every history-taking reference category, in display order
pub const HISTORY_CATEGORIES: [HistoryCategory; 5] = HistoryCategory::ALL;

/// Every chief complaint category, in display order
pub const ALL_CHIEF_COMPLAINT_CATEGORIES: [ChiefComplaintCategory; 10] =
    ChiefComplaintCategory::ALL;

/// Borrowed view of an entry in any collection
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum EntryRef<'a> {
    ClinicalReasoning(&'a ClinicalReasoningEntry),
    AllergyImmunology(&'a AllergyImmunologyEntry),
    HistoryTaking(&'a HistoryTakingEntry),
    Differential(&'a DifferentialDiagnosisEntry),
    Envelope(&'a ContentEnvelope),
}

impl<'a> EntryRef<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            EntryRef::ClinicalReasoning(e) => &e.id,
            EntryRef::AllergyImmunology(e) => &e.id,
            EntryRef::HistoryTaking(e) => &e.id,
            EntryRef::Differential(e) => &e.id,
            EntryRef::Envelope(e) => &e.id,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            EntryRef::ClinicalReasoning(e) => &e.name,
            EntryRef::AllergyImmunology(e) => &e.name,
            EntryRef::HistoryTaking(e) => &e.name,
            EntryRef::Differential(e) => &e.chief_complaint,
            EntryRef::Envelope(e) => &e.name,
        }
    }

    /// Category or content type tag, as it appears in content
    pub fn kind(&self) -> String {
        match self {
            EntryRef::ClinicalReasoning(e) => e.category.to_string(),
            EntryRef::AllergyImmunology(e) => e.category.to_string(),
            EntryRef::HistoryTaking(e) => e.category.to_string(),
            EntryRef::Differential(e) => e.category.to_string(),
            EntryRef::Envelope(e) => e.content_type.to_string(),
        }
    }
}

/// An id that appeared more than once across the indexed collections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateId<'a> {
    pub id: &'a str,
    /// Collection whose entry the index kept
    pub kept_in: &'a str,
    /// Collection holding the later, shadowed entry
    pub shadowed_in: &'a str,
}

impl DuplicateId<'_> {
    pub fn is_within_collection(&self) -> bool {
        self.kept_in == self.shadowed_in
    }
}

#[derive(Debug, Clone, Copy)]
struct Indexed<'a> {
    collection: &'a str,
    entry: EntryRef<'a>,
}

/// The collections a [`Library`] indexes
#[derive(Debug, Clone)]
pub struct Collections<'a> {
    pub clinical_reasoning: &'a Collection<ClinicalReasoningEntry>,
    pub allergy_immunology: &'a Collection<AllergyImmunologyEntry>,
    pub history_entries: &'a Collection<HistoryTakingEntry>,
    pub differentials: &'a Collection<DifferentialDiagnosisEntry>,
    /// Leveled envelope collections, indexed in this order
    pub envelopes: Vec<&'a Collection<ContentEnvelope>>,
}

impl<'a> Collections<'a> {
    /// Every bundled collection
    pub fn bundled() -> Self {
        Self {
            clinical_reasoning: clinical_reasoning_database(),
            allergy_immunology: allergy_immunology_database(),
            history_entries: history_entries_database(),
            differentials: differential_diagnosis_database(),
            envelopes: vec![
                history_taking_frameworks(),
                physical_exam_approaches(),
                clinical_reasoning_concepts(),
                diagnostic_algorithms(),
            ],
        }
    }
}

/// Id index over a set of collections
#[derive(Debug)]
pub struct Library<'a> {
    collections: Collections<'a>,
    index: HashMap<&'a str, Indexed<'a>>,
    duplicates: Vec<DuplicateId<'a>>,
}

impl<'a> Library<'a> {
    /// Index the given collections; the first occurrence of an id wins
    pub fn new(collections: Collections<'a>) -> Self {
        let mut library = Self {
            collections,
            index: HashMap::new(),
            duplicates: Vec::new(),
        };

        let collection = library.collections.clinical_reasoning;
        for entry in collection {
            library.insert(collection.name(), EntryRef::ClinicalReasoning(entry));
        }

        let collection = library.collections.allergy_immunology;
        for entry in collection {
            library.insert(collection.name(), EntryRef::AllergyImmunology(entry));
        }

        let collection = library.collections.history_entries;
        for entry in collection {
            library.insert(collection.name(), EntryRef::HistoryTaking(entry));
        }

        let collection = library.collections.differentials;
        for entry in collection {
            library.insert(collection.name(), EntryRef::Differential(entry));
        }

        for collection in library.collections.envelopes.clone() {
            for entry in collection {
                library.insert(collection.name(), EntryRef::Envelope(entry));
            }
        }

        tracing::debug!(
            entries = library.index.len(),
            duplicates = library.duplicates.len(),
            "Indexed library"
        );
        library
    }

    fn insert(&mut self, collection: &'a str, entry: EntryRef<'a>) {
        let id = entry.id();
        match self.index.get(id) {
            Some(existing) => self.duplicates.push(DuplicateId {
                id,
                kept_in: existing.collection,
                shadowed_in: collection,
            }),
            None => {
                self.index.insert(id, Indexed { collection, entry });
            }
        }
    }

    pub fn clinical_reasoning(&self) -> &'a Collection<ClinicalReasoningEntry> {
        self.collections.clinical_reasoning
    }

    pub fn allergy_immunology(&self) -> &'a Collection<AllergyImmunologyEntry> {
        self.collections.allergy_immunology
    }

    pub fn history_entries(&self) -> &'a Collection<HistoryTakingEntry> {
        self.collections.history_entries
    }

    pub fn differentials(&self) -> &'a Collection<DifferentialDiagnosisEntry> {
        self.collections.differentials
    }

    /// Envelope collections (history-taking, physical exam, ...)
    pub fn envelope_collections(&self) -> &[&'a Collection<ContentEnvelope>] {
        &self.collections.envelopes
    }

    /// Every envelope across all envelope collections
    pub fn envelopes(&self) -> impl Iterator<Item = &'a ContentEnvelope> + '_ {
        self.collections
            .envelopes
            .iter()
            .copied()
            .flat_map(|c| c.iter())
    }

    /// Name, size and load error of every indexed collection
    pub fn collection_status(&self) -> Vec<(&'a str, usize, Option<&'a str>)> {
        let c = &self.collections;
        let mut status = vec![
            status_of(c.clinical_reasoning),
            status_of(c.allergy_immunology),
            status_of(c.history_entries),
            status_of(c.differentials),
        ];
        status.extend(c.envelopes.iter().copied().map(status_of));
        status
    }

    /// Find an entry in any collection by exact id
    pub fn lookup(&self, id: &str) -> Option<EntryRef<'a>> {
        self.index.get(id).map(|i| i.entry)
    }

    /// Name of the collection owning `id`
    pub fn collection_of(&self, id: &str) -> Option<&'a str> {
        self.index.get(id).map(|i| i.collection)
    }

    /// Target of a cross-reference; dangling references resolve to `None`
    pub fn resolve(&self, reference: &CrossReference) -> Option<EntryRef<'a>> {
        self.lookup(&reference.target_id)
    }

    /// Each of the envelope's cross-references paired with its target
    pub fn resolved_cross_references<'e>(
        &self,
        envelope: &'e ContentEnvelope,
    ) -> Vec<(&'e CrossReference, Option<EntryRef<'a>>)> {
        envelope
            .cross_references
            .iter()
            .map(|r| (r, self.resolve(r)))
            .collect()
    }

    /// Ids seen more than once, in indexing order
    pub fn duplicates(&self) -> &[DuplicateId<'a>] {
        &self.duplicates
    }

    /// Number of distinct ids
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

fn status_of<T>(collection: &Collection<T>) -> (&str, usize, Option<&str>) {
    (collection.name(), collection.len(), collection.load_error())
}

static LIBRARY: LazyLock<Library<'static>> =
    LazyLock::new(|| Library::new(Collections::bundled()));

/// Index over every bundled collection
pub fn library() -> &'static Library<'static> {
    &LIBRARY
}
