//! Content model for leveled educational material.
//!
//! This module contains the core data structures:
//! - Level: The five audience tiers and the `Levels<T>` container
//! - Envelope: Addressable topics with leveled explanations and metadata
//! - Framework: Mnemonic and exam-sequence specializations
//! - Pathway: Diagnostic algorithms as a graph of leveled steps

pub mod envelope;
pub mod framework;
pub mod level;
pub mod pathway;

// Re-export commonly used types
pub use envelope::{
    Citation, CitationType, ClinicalRelevance, ContentEnvelope, ContentStatus, ContentTags,
    ContentType, CrossReference, ExamRelevance, KeyTerm, LevelContent, MediaReference, MediaType,
    Relationship,
};
pub use framework::{
    AbnormalFinding, ExamStep, Framework, FrameworkComponent, HistoryFramework,
    PhysicalExamApproach, SampleCase, SpecialTest, StepView, TestInterpretation,
};
pub use level::{Level, LevelError, Levels};
pub use pathway::{
    DiagnosticPathway, NextStep, PathwayDifferential, PathwayStep, PathwayStepView, Prevalence,
    RedFlag, StepType, Urgency,
};
