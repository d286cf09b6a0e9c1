//! Leveled explanations of clinical reasoning concepts.

use std::sync::LazyLock;

use crate::domain::ContentEnvelope;

use super::catalog::Collection;

pub const COLLECTION_NAME: &str = "clinical-reasoning-concepts";

static CONCEPTS: LazyLock<Collection<ContentEnvelope>> = LazyLock::new(|| {
    Collection::load_bundled(
        COLLECTION_NAME,
        include_str!("../../content/clinical_reasoning_concepts.yaml"),
    )
});

/// The bundled concept envelopes
pub fn clinical_reasoning_concepts() -> &'static Collection<ContentEnvelope> {
    &CONCEPTS
}

/// Look up a concept by exact id
pub fn get_concept(id: &str) -> Option<&'static ContentEnvelope> {
    CONCEPTS.get(id)
}
