//! medlearn - Leveled medical education content
//!
//! A read-only library of clinical reasoning concepts, allergy and
//! immunology topics, history-taking references, differential diagnoses by
//! chief complaint, physical examination sequences and diagnostic pathways.
//! Leveled content is written for five audiences, from children to
//! practising physicians.
//!
//! # Architecture
//!
//! Content is embedded at compile time and parsed once on first use:
//! - Collections are immutable after load and shared as `&'static` borrows
//! - Queries are linear scans that preserve source order
//! - Problems in the content are reported by the validator, never by queries
//!
//! # Modules
//!
//! - `domain`: Content model (Level, ContentEnvelope, Framework, DiagnosticPathway)
//! - `library`: Bundled collections, queries and the cross-collection index
//! - `validation`: Load-time integrity checks
//! - `config`: Display and validation settings
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Search every collection
//! medlearn search bias
//!
//! # Show a framework for nursing readers
//! medlearn show oldcarts --level 3
//!
//! # Walk the chest pain pathway at physician level
//! medlearn show algorithm-chest-pain --level 5
//!
//! # Check bundled content
//! medlearn validate --strict
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod library;
pub mod validation;

// Re-export main types at crate root for convenience
pub use domain::{
    ContentEnvelope, ContentType, DiagnosticPathway, Framework, Level, LevelContent, Levels,
};
pub use library::{
    filter_by_category, get_entry_by_id, search_clinical_reasoning_entries, Collections, EntryRef,
    Library, CLINICAL_REASONING_CATEGORIES,
};
pub use validation::{validate, ValidationReport};
