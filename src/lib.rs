//! Memorize - vocabulary list with dictionary lookup
//!
//! Loads the saved word list, filters it for display, searches it locally
//! and falls back to the Jisho dictionary when nothing local matches.

pub mod words;
pub mod filter;
pub mod search;
pub mod lookup;
pub mod repository;
pub mod view;
pub mod presenter;
pub mod config;
pub mod error;
pub mod state;

pub use config::{get_data_dir, LookupConfig, MemorizeConfig, JISHO_SEARCH_URL};
pub use error::{LookupError, MemorizeError};
pub use filter::apply_filter;
pub use lookup::{decode_words, JishoClient, WordLookup};
pub use presenter::{UiTask, WordsPresenter};
pub use repository::{SqliteWordsRepository, WordsDataSource};
pub use search::search_words;
pub use state::AppState;
pub use view::WordsView;
pub use words::{WordFilterType, WordRecord};
