//! Display policy for the word list

use crate::words::{WordFilterType, WordRecord};

/// Reduce and order `words` for display. The input is left untouched.
///
/// `Recent` keeps the same words as `Active`, newest first. The sort is
/// stable, so words created at the same instant keep repository order.
pub fn apply_filter(words: &[WordRecord], filter: WordFilterType) -> Vec<WordRecord> {
    match filter {
        WordFilterType::All => words.to_vec(),
        WordFilterType::Recent => {
            let mut recent = active_words(words);
            recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            recent
        }
        WordFilterType::Active => active_words(words),
    }
}

fn active_words(words: &[WordRecord]) -> Vec<WordRecord> {
    words.iter().filter(|w| w.is_active()).cloned().collect()
}
