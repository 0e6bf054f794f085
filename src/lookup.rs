//! Remote dictionary lookup
//!
//! Fetches word entries from the Jisho search API and turns them into
//! [`WordRecord`]s. Only the first reading and the first sense of an entry
//! are kept. An entry without any reading or sense fails the whole
//! response rather than being skipped.

use crate::config::LookupConfig;
use crate::error::{LookupError, MemorizeError};
use crate::words::WordRecord;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Source of dictionary hits for a query that had no local match.
#[async_trait]
pub trait WordLookup: Send + Sync {
    async fn fetch_remote(&self, query: &str) -> Result<Vec<WordRecord>, LookupError>;
}

/// Search response body
#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: Vec<DictionaryEntry>,
}

#[derive(Debug, Deserialize)]
struct DictionaryEntry {
    tags: Vec<String>,
    japanese: Vec<Reading>,
    senses: Vec<Sense>,
}

#[derive(Debug, Deserialize)]
struct Reading {
    word: String,
    reading: String,
}

#[derive(Debug, Deserialize)]
struct Sense {
    english_definitions: Vec<String>,
    parts_of_speech: Vec<String>,
}

/// Decode a search response body into fresh word records
pub fn decode_words(body: &str) -> Result<Vec<WordRecord>, LookupError> {
    let response: SearchResponse = serde_json::from_str(body)?;

    response
        .data
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let DictionaryEntry { tags, japanese, senses } = entry;
            let reading = japanese
                .into_iter()
                .next()
                .ok_or_else(|| LookupError::Decode(format!("entry {} has no japanese form", i)))?;
            let sense = senses
                .into_iter()
                .next()
                .ok_or_else(|| LookupError::Decode(format!("entry {} has no senses", i)))?;

            Ok(WordRecord::from_lookup(
                reading.reading,
                reading.word,
                sense.english_definitions,
                sense.parts_of_speech,
                tags,
            ))
        })
        .collect()
}

/// HTTP client for the Jisho word search
pub struct JishoClient {
    client: reqwest::Client,
    endpoint: String,
}

impl JishoClient {
    pub fn new(config: &LookupConfig) -> Result<Self, MemorizeError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| MemorizeError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl WordLookup for JishoClient {
    async fn fetch_remote(&self, query: &str) -> Result<Vec<WordRecord>, LookupError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("keyword", query)])
            .send()
            .await?;

        // Error statuses still carry a body worth decoding
        let status = response.status();
        let body = response.text().await?;
        let words = decode_words(&body)?;
        debug!(query, %status, count = words.len(), "decoded dictionary response");
        Ok(words)
    }
}
