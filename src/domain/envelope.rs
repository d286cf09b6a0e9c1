//! Content envelopes: one addressable topic with its leveled explanations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::framework::{Framework, HistoryFramework, PhysicalExamApproach};
use super::level::{Level, Levels};
use super::pathway::DiagnosticPathway;

/// Top-level unit of retrievable educational content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEnvelope {
    /// Stable identifier used for lookup and cross-references
    pub id: String,

    /// Kind of content this envelope describes
    #[serde(rename = "type")]
    pub content_type: ContentType,

    /// Display name
    pub name: String,

    /// Other names the topic is known by
    #[serde(default)]
    pub alternate_names: Vec<String>,

    /// Explanations for each audience tier
    pub levels: Levels<LevelContent>,

    /// Diagrams, images and other media, in display order
    #[serde(default)]
    pub media: Vec<MediaReference>,

    /// Bibliographic sources
    #[serde(default)]
    pub citations: Vec<Citation>,

    /// Weak, id-based links to other entries
    #[serde(default)]
    pub cross_references: Vec<CrossReference>,

    /// Classification used for filtering
    #[serde(default)]
    pub tags: ContentTags,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Content revision, starting at 1
    pub version: u32,

    pub status: ContentStatus,

    /// Mnemonic or exam-sequence specialization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<Framework>,

    /// Step graph of a diagnostic algorithm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pathway: Option<DiagnosticPathway>,
}

impl ContentEnvelope {
    /// Content for one audience tier
    pub fn level(&self, level: Level) -> &LevelContent {
        self.levels.get(level)
    }

    /// History-taking framework details, if this is one
    pub fn history(&self) -> Option<&HistoryFramework> {
        match &self.framework {
            Some(Framework::History(history)) => Some(history),
            _ => None,
        }
    }

    /// Physical exam sequence details, if this is one
    pub fn exam(&self) -> Option<&PhysicalExamApproach> {
        match &self.framework {
            Some(Framework::PhysicalExam(exam)) => Some(exam),
            _ => None,
        }
    }
}

/// Kind of content an envelope holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    Structure,
    System,
    Pathway,
    Process,
    Condition,
    Concept,
    Topic,

    /// Mnemonic or stepwise clinical framework
    Framework,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ContentType::Structure => "structure",
            ContentType::System => "system",
            ContentType::Pathway => "pathway",
            ContentType::Process => "process",
            ContentType::Condition => "condition",
            ContentType::Concept => "concept",
            ContentType::Topic => "topic",
            ContentType::Framework => "framework",
        };
        write!(f, "{}", s)
    }
}

/// Publication state of an envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Draft,
    Review,
    Published,
}

/// Explanation of a topic for one audience tier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelContent {
    /// Must match the slot this content occupies
    pub level: Level,

    /// One-sentence takeaway
    pub summary: String,

    /// Long-form, markdown-like text
    pub explanation: String,

    #[serde(default)]
    pub key_terms: Vec<KeyTerm>,

    #[serde(default)]
    pub analogies: Vec<String>,

    #[serde(default)]
    pub examples: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_counseling_points: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyTerm {
    pub term: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
}

/// Reference to a media asset shipped alongside the content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaReference {
    pub id: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub filename: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Diagram,
    Image,
    Video,
    Animation,
}

/// Bibliographic record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub id: String,
    #[serde(rename = "type")]
    pub citation_type: CitationType,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(
        default,
        rename = "accessedDate",
        skip_serializing_if = "Option::is_none"
    )]
    pub accessed_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationType {
    Textbook,
    Article,
    Guideline,
    Website,
}

/// Weak link to another entry, resolved by id at lookup time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossReference {
    pub target_id: String,
    pub target_type: ContentType,
    pub relationship: Relationship,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relationship {
    Parent,
    Child,
    Sibling,
    Related,
    SeeAlso,
    Prerequisite,
}

/// Free-form classification bag; never part of identity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTags {
    #[serde(default)]
    pub systems: Vec<String>,

    #[serde(default)]
    pub topics: Vec<String>,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_relevance: Option<ClinicalRelevance>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_relevance: Option<ExamRelevance>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClinicalRelevance {
    Low,
    Medium,
    High,
    Critical,
}

/// Which licensing exams the topic is relevant to
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamRelevance {
    #[serde(default)]
    pub usmle: bool,
    #[serde(default)]
    pub nbme: bool,
    /// Shelf exam disciplines
    #[serde(default)]
    pub shelf: Vec<String>,
}
