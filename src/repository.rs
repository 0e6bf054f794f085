//! Word storage, backed by SQLite

use crate::error::MemorizeError;
use crate::words::WordRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Persistent word collection consumed by the presenter.
#[async_trait]
pub trait WordsDataSource: Send + Sync {
    /// Full word collection. Failure is reported as `DataNotAvailable`.
    async fn get_words(&self) -> Result<Vec<WordRecord>, MemorizeError>;

    /// Drop any cached snapshot so the next read goes to storage.
    fn refresh_words(&self);

    /// Persist a single word. Fire-and-forget: failures are logged.
    fn save_word(&self, word: &WordRecord);
}

const WORD_COLUMNS: &str = "id, character, meanings, notes, kanji, parts_of_speech, tags, created_at, favorite, memorized";

/// SQLite word store with an in-memory snapshot of the last read
pub struct SqliteWordsRepository {
    conn: Arc<Mutex<Connection>>,
    cached: Mutex<Option<Vec<WordRecord>>>,
}

impl SqliteWordsRepository {
    /// Open (or create) the words database at `path`
    pub fn open(path: &Path) -> Result<Self, MemorizeError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MemorizeError::Database(format!("Failed to create {:?}: {}", parent, e))
            })?;
        }
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, MemorizeError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, MemorizeError> {
        Self::init_db(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            cached: Mutex::new(None),
        })
    }

    fn init_db(conn: &Connection) -> Result<(), MemorizeError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS words (
                id TEXT PRIMARY KEY,
                character TEXT NOT NULL,
                meanings TEXT NOT NULL,
                notes TEXT,
                kanji TEXT NOT NULL,
                parts_of_speech TEXT NOT NULL,
                tags TEXT NOT NULL,
                created_at TEXT NOT NULL,
                favorite INTEGER NOT NULL DEFAULT 0,
                memorized INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_words_created
            ON words(created_at DESC);
            "#,
        )?;
        Ok(())
    }

    /// Insert or update a word, keeping its original position for updates
    pub fn insert_word(&self, word: &WordRecord) -> Result<(), MemorizeError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| MemorizeError::Database("Failed to acquire connection lock".to_string()))?;
        write_word(&conn, word)?;
        drop(conn);

        // Keep the snapshot in step with storage
        if let Ok(mut cached) = self.cached.lock() {
            if let Some(words) = cached.as_mut() {
                match words.iter_mut().find(|w| w.id == word.id) {
                    Some(existing) => *existing = word.clone(),
                    None => words.push(word.clone()),
                }
            }
        }
        Ok(())
    }

    fn load_words(conn: &Connection) -> Result<Vec<WordRecord>, MemorizeError> {
        let mut stmt = conn.prepare(&format!("SELECT {} FROM words ORDER BY rowid", WORD_COLUMNS))?;
        let rows = stmt
            .query_map([], RawWord::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(RawWord::into_word).collect()
    }
}

#[async_trait]
impl WordsDataSource for SqliteWordsRepository {
    async fn get_words(&self) -> Result<Vec<WordRecord>, MemorizeError> {
        let cached = self.cached.lock().ok().and_then(|c| c.clone());
        if let Some(words) = cached {
            debug!(count = words.len(), "serving cached words");
            return Ok(words);
        }

        let conn = Arc::clone(&self.conn);
        let words = tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| MemorizeError::Database("Failed to acquire connection lock".to_string()))?;
            Self::load_words(&conn)
        })
        .await
        .map_err(|e| MemorizeError::DataNotAvailable(format!("Task join error: {}", e)))?
        .map_err(|e| MemorizeError::DataNotAvailable(e.to_string()))?;

        if let Ok(mut cached) = self.cached.lock() {
            *cached = Some(words.clone());
        }
        debug!(count = words.len(), "loaded words from database");
        Ok(words)
    }

    fn refresh_words(&self) {
        if let Ok(mut cached) = self.cached.lock() {
            *cached = None;
        }
    }

    fn save_word(&self, word: &WordRecord) {
        if let Err(e) = self.insert_word(word) {
            warn!(id = %word.id, error = %e, "failed to save word");
        }
    }
}

fn write_word(conn: &Connection, word: &WordRecord) -> Result<(), MemorizeError> {
    conn.execute(
        &format!(
            "INSERT INTO words ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(id) DO UPDATE SET
                character = excluded.character,
                meanings = excluded.meanings,
                notes = excluded.notes,
                kanji = excluded.kanji,
                parts_of_speech = excluded.parts_of_speech,
                tags = excluded.tags,
                created_at = excluded.created_at,
                favorite = excluded.favorite,
                memorized = excluded.memorized",
            WORD_COLUMNS
        ),
        params![
            word.id,
            word.character,
            to_json(&word.meanings)?,
            word.notes,
            word.primary_form,
            to_json(&word.parts_of_speech)?,
            to_json(&word.tags)?,
            word.created_at.to_rfc3339(),
            word.favorite,
            word.memorized,
        ],
    )?;
    Ok(())
}

fn to_json(list: &[String]) -> Result<String, MemorizeError> {
    serde_json::to_string(list).map_err(|e| MemorizeError::Database(e.to_string()))
}

/// Row as stored, before list and timestamp columns are parsed
struct RawWord {
    id: String,
    character: String,
    meanings: String,
    notes: Option<String>,
    kanji: String,
    parts_of_speech: String,
    tags: String,
    created_at: String,
    favorite: bool,
    memorized: bool,
}

impl RawWord {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            character: row.get(1)?,
            meanings: row.get(2)?,
            notes: row.get(3)?,
            kanji: row.get(4)?,
            parts_of_speech: row.get(5)?,
            tags: row.get(6)?,
            created_at: row.get(7)?,
            favorite: row.get(8)?,
            memorized: row.get(9)?,
        })
    }

    fn into_word(self) -> Result<WordRecord, MemorizeError> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| MemorizeError::Database(format!("Bad created_at for {}: {}", self.id, e)))?
            .with_timezone(&Utc);

        Ok(WordRecord {
            meanings: parse_list(&self.meanings),
            parts_of_speech: parse_list(&self.parts_of_speech),
            tags: parse_list(&self.tags),
            id: self.id,
            character: self.character,
            notes: self.notes,
            primary_form: self.kanji,
            created_at,
            favorite: self.favorite,
            memorized: self.memorized,
        })
    }
}

/// Malformed list columns read as empty
fn parse_list(json: &str) -> Vec<String> {
    serde_json::from_str(json).unwrap_or_default()
}
