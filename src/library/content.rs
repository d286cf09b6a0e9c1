//! Catalog support for content envelopes.
//!
//! Envelope collections are categorised by content type and searched by
//! name, alternate names and level summaries.

use crate::domain::{ContentEnvelope, ContentType};

use super::catalog::{contains_lower, CatalogEntry};

impl CatalogEntry for ContentEnvelope {
    type Category = ContentType;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> ContentType {
        self.content_type
    }

    fn matches(&self, needle: &str) -> bool {
        contains_lower(&self.name, needle)
            || self.alternate_names.iter().any(|n| contains_lower(n, needle))
            || self.levels.values().any(|l| contains_lower(&l.summary, needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Level;
    use crate::library::catalog::Collection;

    const ENVELOPE: &str = r#"
collection: test
entries:
  - id: topic-sample
    type: topic
    name: Sample Topic
    alternateNames: [Example Subject]
    levels:
      1: { level: 1, summary: A tiny summary., explanation: Plain words. }
      2: { level: 2, summary: A patient summary., explanation: More words. }
      3: { level: 3, summary: A nursing summary about perfusion., explanation: Clinical words. }
      4: { level: 4, summary: A student summary., explanation: Detailed words. }
      5: { level: 5, summary: An expert summary., explanation: Expert words. }
    createdAt: 2026-01-24T00:00:00.000Z
    updatedAt: 2026-01-24T00:00:00.000Z
    version: 1
    status: draft
"#;

    #[test]
    fn test_envelope_search_fields() {
        let collection = Collection::<ContentEnvelope>::from_yaml("test", ENVELOPE).unwrap();
        assert_eq!(collection.search("sample topic").len(), 1);
        assert_eq!(collection.search("EXAMPLE SUBJECT").len(), 1);
        assert_eq!(collection.search("perfusion").len(), 1);
        // Explanations are not searched
        assert!(collection.search("clinical words").is_empty());

        let envelope = collection.get("topic-sample").unwrap();
        assert_eq!(envelope.level(Level::Nursing).explanation, "Clinical words.");
        assert!(envelope.framework.is_none());
        assert_eq!(collection.filter_by_category(&[ContentType::Topic]).len(), 1);
    }
}
