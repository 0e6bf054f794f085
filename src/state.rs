//! Application state management

use crate::config::MemorizeConfig;
use crate::lookup::{JishoClient, WordLookup};
use crate::presenter::WordsPresenter;
use crate::repository::{SqliteWordsRepository, WordsDataSource};
use crate::view::WordsView;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Application state holding the word store and dictionary client
pub struct AppState {
    pub config: MemorizeConfig,
    pub repository: Arc<SqliteWordsRepository>,
    pub lookup: Arc<JishoClient>,
}

impl AppState {
    /// Initialize application state
    pub fn new(config: MemorizeConfig) -> Result<Self> {
        let db_path = config.words_db_path();
        let repository = Arc::new(
            SqliteWordsRepository::open(&db_path)
                .with_context(|| format!("Failed to open words database at {:?}", db_path))?,
        );
        let lookup = Arc::new(
            JishoClient::new(&config.lookup).context("Failed to create dictionary client")?,
        );

        Ok(Self {
            config,
            repository,
            lookup,
        })
    }

    /// Presenter wired to this state's collaborators
    pub fn presenter<V: WordsView>(&self, view: V) -> WordsPresenter<V> {
        let repository: Arc<dyn WordsDataSource> = self.repository.clone();
        let lookup: Arc<dyn WordLookup> = self.lookup.clone();
        WordsPresenter::new(repository, lookup, view)
    }
}
