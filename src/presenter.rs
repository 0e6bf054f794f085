//! Word list presenter
//!
//! Decides between local and remote search, runs repository reads and
//! dictionary lookups in the background, and publishes results to a
//! [`WordsView`].
//!
//! The presenter is confined to one context: whoever holds it (and calls
//! its `&mut self` methods) is the UI context. Background tasks only get
//! `Arc` handles to the repository or lookup and a sender for [`UiTask`]s.
//! They never touch the view or the cached word list. Completions are
//! applied in [`WordsPresenter::dispatch`], back on the owning context, so
//! no locks guard presenter state. Methods that start background work
//! spawn onto the current tokio runtime and must be called inside one.
//!
//! Searches are not cancelled or sequenced. When two remote lookups
//! overlap, whichever completion is dispatched last is what stays on
//! screen, even if it belongs to the older query.
//!
//! Dictionary responses are decoded inside the background lookup task;
//! only the resulting records cross back to the owning context.
//!
//! Every background operation posts exactly one completion, also when it
//! panics, so `pending` always drains.

use crate::error::LookupError;
use crate::filter::apply_filter;
use crate::lookup::WordLookup;
use crate::repository::WordsDataSource;
use crate::search::search_words;
use crate::view::WordsView;
use crate::words::{WordFilterType, WordRecord};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Background completion posted back to the presenter's context
#[derive(Debug)]
pub enum UiTask {
    WordsLoaded {
        words: Vec<WordRecord>,
        show_loading_ui: bool,
    },
    WordsNotAvailable(String),
    RemoteCompleted {
        query: String,
        result: Result<Vec<WordRecord>, LookupError>,
    },
}

pub struct WordsPresenter<V: WordsView> {
    repository: Arc<dyn WordsDataSource>,
    lookup: Arc<dyn WordLookup>,
    view: V,
    current_filter: WordFilterType,
    /// Unfiltered result of the last load; local search runs over this
    search_words: Vec<WordRecord>,
    ui_tx: mpsc::UnboundedSender<UiTask>,
    ui_rx: mpsc::UnboundedReceiver<UiTask>,
    pending: usize,
}

impl<V: WordsView> WordsPresenter<V> {
    pub fn new(
        repository: Arc<dyn WordsDataSource>,
        lookup: Arc<dyn WordLookup>,
        view: V,
    ) -> Self {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        Self {
            repository,
            lookup,
            view,
            current_filter: WordFilterType::default(),
            search_words: Vec::new(),
            ui_tx,
            ui_rx,
            pending: 0,
        }
    }

    /// Initial load, with the loading indicator
    pub fn init(&mut self) {
        self.load_words(false);
    }

    pub fn load_words(&mut self, force_update: bool) {
        self.load_words_with(force_update, true);
    }

    /// Start reading the word list.
    ///
    /// * `force_update` - refresh the repository before reading
    /// * `show_loading_ui` - raise the loading indicator, and clear it once
    ///   the list is shown. A failed read leaves it raised.
    pub fn load_words_with(&mut self, force_update: bool, show_loading_ui: bool) {
        if show_loading_ui {
            self.view.set_loading_indicator(true);
        }
        if force_update {
            self.repository.refresh_words();
        }

        let repository = Arc::clone(&self.repository);
        let ui_tx = self.ui_tx.clone();
        self.pending += 1;
        tokio::spawn(async move {
            let read = tokio::spawn(async move { repository.get_words().await });
            let task = match read.await {
                Ok(Ok(words)) => UiTask::WordsLoaded {
                    words,
                    show_loading_ui,
                },
                Ok(Err(e)) => UiTask::WordsNotAvailable(e.to_string()),
                Err(e) => UiTask::WordsNotAvailable(format!("Task join error: {}", e)),
            };
            // Presenter dropped: nobody left to show this
            let _ = ui_tx.send(task);
        });
    }

    /// Search the loaded words, falling back to the dictionary when
    /// nothing matches.
    pub fn search(&mut self, query: &str) {
        self.view.set_loading_indicator(true);

        let matches = search_words(&self.search_words, query);
        if matches.is_empty() {
            debug!(query, "no local match, searching remotely");
            self.search_remote(query);
        } else {
            debug!(query, count = matches.len(), "local match");
            self.view.show_words(&matches);
            self.view.set_loading_indicator(false);
        }
    }

    /// Look `query` up in the dictionary without scanning local words
    pub fn search_remote(&mut self, query: &str) {
        let lookup = Arc::clone(&self.lookup);
        let ui_tx = self.ui_tx.clone();
        let query = query.to_string();
        self.pending += 1;
        tokio::spawn(async move {
            let fetch_query = query.clone();
            let fetch = tokio::spawn(async move { lookup.fetch_remote(&fetch_query).await });
            let result = fetch.await.unwrap_or_else(|e| {
                Err(LookupError::Transport(format!("Task join error: {}", e)))
            });
            let _ = ui_tx.send(UiTask::RemoteCompleted { query, result });
        });
    }

    /// Persist `word` and show it in the detail view
    pub fn open_word_details(&mut self, word: &WordRecord) {
        self.save_word(word);
        self.view.show_word_detail(word);
    }

    pub fn save_word(&self, word: &WordRecord) {
        self.repository.save_word(word);
    }

    pub fn set_filter_type(&mut self, filter: WordFilterType) {
        self.current_filter = filter;
    }

    pub fn filter_type(&self) -> WordFilterType {
        self.current_filter
    }

    /// Background operations whose completion has not been dispatched yet
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn cached_words(&self) -> &[WordRecord] {
        &self.search_words
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Wait for the next background completion
    pub async fn next_task(&mut self) -> Option<UiTask> {
        self.ui_rx.recv().await
    }

    /// Apply a background completion to the cache and the view
    pub fn dispatch(&mut self, task: UiTask) {
        self.pending = self.pending.saturating_sub(1);

        match task {
            UiTask::WordsLoaded {
                words,
                show_loading_ui,
            } => {
                let shown = apply_filter(&words, self.current_filter);
                info!(
                    loaded = words.len(),
                    shown = shown.len(),
                    filter = %self.current_filter,
                    "words loaded"
                );
                self.search_words = words;
                self.view.show_words(&shown);
                if show_loading_ui {
                    self.view.set_loading_indicator(false);
                }
            }
            UiTask::WordsNotAvailable(reason) => {
                warn!(%reason, "words not available");
                self.view.show_loading_words_error();
            }
            UiTask::RemoteCompleted { query, result } => match result {
                Ok(words) => {
                    debug!(%query, count = words.len(), "remote search finished");
                    self.view.show_words(&words);
                    self.view.set_loading_indicator(false);
                }
                Err(e) => {
                    warn!(%query, error = %e, "remote search failed");
                    self.view.set_loading_indicator(false);
                }
            },
        }
    }

    /// Wait for one completion and dispatch it
    pub async fn process_next(&mut self) {
        if let Some(task) = self.next_task().await {
            self.dispatch(task);
        }
    }

    /// Dispatch completions until no background work is outstanding
    pub async fn run_until_idle(&mut self) {
        while self.pending > 0 {
            self.process_next().await;
        }
    }
}
