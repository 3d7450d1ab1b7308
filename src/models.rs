use crate::error::MatchingError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Best reference for one query.
///
/// `index` is `None` when there was no reference to compare against; the
/// score is then `0.0`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct MatchResult {
    pub score: f64,
    pub index: Option<usize>,
}

impl MatchResult {
    /// Result for an empty reference corpus.
    pub fn none() -> Self {
        MatchResult {
            score: 0.0,
            index: None,
        }
    }

    /// Index using `-1` for "no match available".
    pub fn signed_index(&self) -> i64 {
        self.index.map_or(-1, |idx| idx as i64)
    }
}

/// How the vocabulary is scoped when matching one query.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyScope {
    /// One vocabulary over the query and all references.
    #[default]
    Batch,
    /// A fresh two-document vocabulary for every query/reference pair.
    Pairwise,
}

/// Structured fields pulled out of invoice text. Missing fields are empty.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct InvoiceFields {
    pub invoice_number: String,
    pub date: String,
    pub amount: String,
}

/// Matching report for a single query document
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DocumentMatch {
    pub query_document: String,
    pub best_match_document: Option<String>,
    pub similarity: f64,
    pub reference_index: i64,
    pub fields: InvoiceFields,
}

/// Configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    /// Documents to find counterparts for
    pub test_dir: PathBuf,
    /// Reference corpus
    pub train_dir: PathBuf,
    /// File extension (without the dot) selecting documents in both folders
    pub extension: String,
    pub output_dir: Option<PathBuf>,
    pub scope: VocabularyScope,
}

impl Config {
    /// Both document folders must exist and the extension must name something.
    pub fn validate(&self) -> Result<(), MatchingError> {
        for dir in [&self.test_dir, &self.train_dir] {
            if !dir.is_dir() {
                return Err(MatchingError::InvalidConfig(format!(
                    "Document directory does not exist: {:?}",
                    dir
                )));
            }
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(MatchingError::InvalidConfig(
                "File extension must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
