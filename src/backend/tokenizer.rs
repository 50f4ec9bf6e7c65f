//! Word-index tokenizer loaded from a JSON artifact.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::Tokenizer;
use crate::error::ArtifactError;

const DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

fn default_true() -> bool {
    true
}

fn default_filters() -> String {
    DEFAULT_FILTERS.to_string()
}

fn default_split() -> String {
    " ".to_string()
}

/// Maps words (or characters, when `char_level`) to ids through a fixed
/// vocabulary.
///
/// Unknown tokens map to the `oov_token` id when one is configured and
/// are dropped otherwise. With `num_words`, ids at or above the limit are
/// treated as unknown.
#[derive(Debug, Clone, Deserialize)]
pub struct WordIndexTokenizer {
    word_index: HashMap<String, u32>,
    #[serde(default)]
    char_level: bool,
    #[serde(default = "default_true")]
    lower: bool,
    #[serde(default = "default_filters")]
    filters: String,
    #[serde(default = "default_split")]
    split: String,
    #[serde(default)]
    oov_token: Option<String>,
    #[serde(default)]
    num_words: Option<u32>,
}

impl WordIndexTokenizer {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ArtifactError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let tokenizer: WordIndexTokenizer = serde_json::from_str(json)?;
        if tokenizer.word_index.is_empty() {
            return Err(ArtifactError::Invalid("tokenizer has no vocabulary".to_string()));
        }
        if tokenizer.word_index.values().any(|id| *id == 0) {
            return Err(ArtifactError::Invalid("token id 0 is reserved for padding".to_string()));
        }
        if !tokenizer.char_level && tokenizer.split.is_empty() {
            return Err(ArtifactError::Invalid("split separator is empty".to_string()));
        }
        Ok(tokenizer)
    }

    /// Largest id `texts_to_sequences` can emit: vocabulary ids below
    /// `num_words`, and the OOV id when one is configured.
    pub fn max_emitted_id(&self) -> u32 {
        let known = self
            .word_index
            .values()
            .copied()
            .filter(|id| self.within_limit(*id))
            .max()
            .unwrap_or(0);
        known.max(self.oov_id().unwrap_or(0))
    }

    fn within_limit(&self, id: u32) -> bool {
        self.num_words.is_none_or(|limit| id < limit)
    }

    fn oov_id(&self) -> Option<u32> {
        self.oov_token
            .as_ref()
            .and_then(|oov| self.word_index.get(oov).copied())
    }

    fn tokens(&self, text: &str) -> Vec<String> {
        let text = if self.lower {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        if self.char_level {
            return text.chars().map(String::from).collect();
        }

        let filtered: String = text
            .chars()
            .map(|c| {
                if self.filters.contains(c) {
                    self.split.clone()
                } else {
                    c.to_string()
                }
            })
            .collect();

        filtered
            .split(self.split.as_str())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn lookup(&self, token: &str) -> Option<u32> {
        self.word_index
            .get(token)
            .copied()
            .filter(|id| self.within_limit(*id))
            .or_else(|| self.oov_id())
    }
}

impl Tokenizer for WordIndexTokenizer {
    fn texts_to_sequences(&self, texts: &[&str]) -> Vec<Vec<u32>> {
        texts
            .iter()
            .map(|text| {
                self.tokens(text)
                    .iter()
                    .filter_map(|token| self.lookup(token))
                    .collect()
            })
            .collect()
    }
}
