//! Word records and display filter types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A vocabulary entry, either loaded from the repository or built from a
/// dictionary response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub id: String,
    /// Phonetic form, the field local search matches against.
    pub character: String,
    pub meanings: Vec<String>,
    pub notes: Option<String>,
    /// Written form, e.g. the kanji spelling of `character`.
    pub primary_form: String,
    pub parts_of_speech: Vec<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub memorized: bool,
}

impl WordRecord {
    /// Build a record for a dictionary hit. Remote records get a fresh id,
    /// no notes and the current time as creation time.
    pub fn from_lookup(
        character: String,
        primary_form: String,
        meanings: Vec<String>,
        parts_of_speech: Vec<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            character,
            meanings,
            notes: None,
            primary_form,
            parts_of_speech,
            tags,
            created_at: Utc::now(),
            favorite: false,
            memorized: false,
        }
    }

    /// Neither favorited nor memorized.
    pub fn is_active(&self) -> bool {
        !self.favorite && !self.memorized
    }

    pub fn is_searchable(&self) -> bool {
        !self.character.is_empty()
    }
}

/// Which part of the word list is shown.
///
/// Names that don't parse to a known mode fall back to `Active`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum WordFilterType {
    All,
    #[default]
    Active,
    Recent,
}

impl From<&str> for WordFilterType {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "all" => WordFilterType::All,
            "recent" | "recently" => WordFilterType::Recent,
            _ => WordFilterType::Active,
        }
    }
}

impl From<String> for WordFilterType {
    fn from(name: String) -> Self {
        WordFilterType::from(name.as_str())
    }
}

impl fmt::Display for WordFilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WordFilterType::All => "all",
            WordFilterType::Active => "active",
            WordFilterType::Recent => "recent",
        };
        f.write_str(name)
    }
}
