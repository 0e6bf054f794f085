//! Runtime configuration and data directory resolution

use crate::error::MemorizeError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Jisho word search endpoint
pub const JISHO_SEARCH_URL: &str = "https://jisho.org/api/v1/search/words";

const CONFIG_FILE_NAME: &str = "config.json";
const WORDS_DB_NAME: &str = "words.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Dictionary search URL; the query goes in the `keyword` parameter
    pub endpoint: String,
    /// Request timeout. Unset means the HTTP client default (none).
    pub timeout_secs: Option<u64>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            endpoint: JISHO_SEARCH_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl LookupConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorizeConfig {
    #[serde(skip)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub lookup: LookupConfig,
}

impl MemorizeConfig {
    /// Defaults rooted at `data_dir`
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            lookup: LookupConfig::default(),
        }
    }

    /// Load `config.json` from `data_dir`. A missing file yields defaults.
    pub fn load(data_dir: &Path) -> Result<Self, MemorizeError> {
        let config_path = data_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Ok(Self::with_data_dir(data_dir.to_path_buf()));
        }

        let content = fs::read_to_string(&config_path).map_err(|e| {
            MemorizeError::Config(format!("Failed to read {:?}: {}", config_path, e))
        })?;
        let mut config: MemorizeConfig = serde_json::from_str(&content).map_err(|e| {
            MemorizeError::Config(format!("Failed to parse {:?}: {}", config_path, e))
        })?;
        config.data_dir = data_dir.to_path_buf();
        Ok(config)
    }

    pub fn words_db_path(&self) -> PathBuf {
        self.data_dir.join(WORDS_DB_NAME)
    }
}

/// Get the data directory
///
/// - Platform data dir (e.g. ~/.local/share/Memorize) when known
/// - Otherwise `data` under the working directory
pub fn get_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("Memorize");
    }
    PathBuf::from("data")
}
