//! Cross-referencing classification results against the species catalog.
//!
//! A pure, synchronous transform: suggestions whose name exactly matches a
//! catalog entry get that entry's canonical imagery backfilled. The model's
//! own `confidence` and `description` are never touched, and a missing match
//! is not an error.

use avis_core::{ClassificationResult, SpeciesCatalogEntry, SpeciesSuggestions};

/// Augment a classification result with canonical catalog imagery.
///
/// Single-subject results carry no imagery fields and pass through
/// unchanged. Matching is case-sensitive exact on `name`; duplicate catalog
/// names resolve to the first hit.
pub fn augment(
    result: ClassificationResult,
    catalog: &[SpeciesCatalogEntry],
) -> ClassificationResult {
    match result {
        ClassificationResult::Single(s) => ClassificationResult::Single(s),
        ClassificationResult::Suggestions(s) => {
            ClassificationResult::Suggestions(augment_suggestions(s, catalog))
        }
    }
}

/// Augment each suggestion in a multi-subject result.
pub fn augment_suggestions(
    mut suggestions: SpeciesSuggestions,
    catalog: &[SpeciesCatalogEntry],
) -> SpeciesSuggestions {
    for bird in &mut suggestions.birds {
        if let Some(known) = catalog.iter().find(|entry| entry.name == bird.name) {
            bird.image_url = known.image_url.clone();
            bird.image_hint = known.image_hint.clone();
        }
    }
    suggestions
}
