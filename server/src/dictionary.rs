//! Word lookup
//!
//! Word list files hold one word per line, optionally followed by whitespace
//! and a description. Blank lines and lines starting with `#` are skipped.
//! Lookups are case-insensitive.

use log::{info, warn};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub word: String,
    pub description: Option<String>,
}

pub trait Dictionary: Send + Sync {
    fn lookup(&self, word: &str) -> Option<WordEntry>;

    fn is_valid_word(&self, word: &str) -> bool {
        self.lookup(word).is_some()
    }
}

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("failed to read dictionary {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("dictionary {0} contains no words")]
    Empty(String),
}

fn parse_line(line: &str) -> Option<(String, Option<String>)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let mut parts = line.splitn(2, char::is_whitespace);
    let word = parts.next()?.to_ascii_uppercase();
    let description = parts
        .next()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);
    Some((word, description))
}

/// Whole word list held in memory
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: HashMap<String, Option<String>>,
}

impl WordList {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .filter_map(|w| parse_line(w.as_ref()))
                .collect(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let read_error = |source| DictionaryError::Read {
            path: path.display().to_string(),
            source,
        };

        let file = File::open(path).map_err(read_error)?;
        let mut words = HashMap::new();
        for line in BufReader::new(file).lines() {
            if let Some((word, description)) = parse_line(&line.map_err(read_error)?) {
                words.insert(word, description);
            }
        }

        if words.is_empty() {
            return Err(DictionaryError::Empty(path.display().to_string()));
        }
        info!("Loaded {} words from {}", words.len(), path.display());
        Ok(Self { words })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Dictionary for WordList {
    fn lookup(&self, word: &str) -> Option<WordEntry> {
        let key = word.trim().to_ascii_uppercase();
        self.words.get(&key).map(|description| WordEntry {
            word: key.clone(),
            description: description.clone(),
        })
    }
}

/// Scans the word list file on every lookup
///
/// Uses little memory at the cost of one file read per word checked.
#[derive(Debug, Clone)]
pub struct StreamingDictionary {
    path: PathBuf,
}

impl StreamingDictionary {
    /// Opens the file once to make sure it is readable
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let path = path.as_ref().to_path_buf();
        File::open(&path).map_err(|source| DictionaryError::Read {
            path: path.display().to_string(),
            source,
        })?;
        info!("Streaming words from {}", path.display());
        Ok(Self { path })
    }
}

impl Dictionary for StreamingDictionary {
    fn lookup(&self, word: &str) -> Option<WordEntry> {
        let key = word.trim().to_ascii_uppercase();
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) => {
                warn!("Dictionary {} unreadable: {}", self.path.display(), e);
                return None;
            }
        };

        for line in BufReader::new(file).lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Error scanning {}: {}", self.path.display(), e);
                    return None;
                }
            };
            if let Some((candidate, description)) = parse_line(&line) {
                if candidate == key {
                    return Some(WordEntry {
                        word: candidate,
                        description,
                    });
                }
            }
        }
        None
    }
}
