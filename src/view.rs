//! Presentation boundary driven by the presenter

use crate::words::WordRecord;

/// Calls the presenter makes outward. Every call happens on the context
/// that owns the presenter, so implementations need not be thread safe.
pub trait WordsView {
    fn set_loading_indicator(&mut self, active: bool);

    fn show_words(&mut self, words: &[WordRecord]);

    fn show_word_detail(&mut self, word: &WordRecord);

    /// The word list could not be read from the repository
    fn show_loading_words_error(&mut self);
}
