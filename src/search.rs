//! Local substring search over the loaded word list

use crate::words::WordRecord;

/// Words whose `character` contains `query`, in cache order.
///
/// Matching is a literal, case-sensitive substring test with no
/// normalization. Records with an empty `character` never match.
pub fn search_words(cache: &[WordRecord], query: &str) -> Vec<WordRecord> {
    cache
        .iter()
        .filter(|w| w.is_searchable() && w.character.contains(query))
        .cloned()
        .collect()
}
