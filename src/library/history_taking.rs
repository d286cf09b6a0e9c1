//! History-taking frameworks (OLDCARTS, OPQRST).

use std::sync::LazyLock;

use crate::domain::ContentEnvelope;

use super::catalog::Collection;

pub const COLLECTION_NAME: &str = "history-taking";

static FRAMEWORKS: LazyLock<Collection<ContentEnvelope>> = LazyLock::new(|| {
    Collection::load_bundled(
        COLLECTION_NAME,
        include_str!("../../content/history_taking.yaml"),
    )
});

/// The bundled history-taking frameworks
pub fn history_taking_frameworks() -> &'static Collection<ContentEnvelope> {
    &FRAMEWORKS
}

/// Look up a framework by exact id (e.g. "history-oldcarts")
pub fn get_framework(id: &str) -> Option<&'static ContentEnvelope> {
    FRAMEWORKS.get(id)
}

/// Look up a framework by its mnemonic, ignoring case
pub fn get_framework_by_acronym(acronym: &str) -> Option<&'static ContentEnvelope> {
    FRAMEWORKS.iter().find(|envelope| {
        envelope
            .history()
            .is_some_and(|h| h.acronym.eq_ignore_ascii_case(acronym))
    })
}
