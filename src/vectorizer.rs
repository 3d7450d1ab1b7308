//! TF-IDF vectorization of a batch of documents over one shared vocabulary.
//!
//! A batch is fitted as a whole: the vocabulary and the document frequencies
//! come from every text in the batch, so vectors from different batches are
//! not comparable with each other.

use crate::tokenizer::tokenize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Mapping from term to a dense index in `0..len()`.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: HashMap<String, usize>,
}

impl Vocabulary {
    /// Assign indices in lexicographic term order.
    fn from_terms(terms: BTreeSet<&str>) -> Self {
        let terms = terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term.to_string(), idx))
            .collect();
        Vocabulary { terms }
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms.get(term).copied()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Sparse weighted-term vector with its cached L2 norm.
///
/// Entries are kept sorted by ascending index and hold only non-zero weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentVector {
    entries: Vec<(usize, f64)>,
    norm: f64,
}

impl DocumentVector {
    /// Build a vector from `(index, weight)` pairs. Zero weights are dropped.
    pub fn new(mut entries: Vec<(usize, f64)>) -> Self {
        entries.retain(|&(_, weight)| weight != 0.0);
        entries.sort_by_key(|&(idx, _)| idx);
        entries.dedup_by_key(|&mut (idx, _)| idx);
        let norm = entries
            .iter()
            .map(|&(_, weight)| weight * weight)
            .sum::<f64>()
            .sqrt();
        DocumentVector { entries, norm }
    }

    pub fn zero() -> Self {
        DocumentVector::default()
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn norm(&self) -> f64 {
        self.norm
    }

    pub fn is_zero(&self) -> bool {
        self.norm == 0.0
    }

    /// Dot product over the indices both vectors share.
    pub fn dot(&self, other: &DocumentVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_weight) = self.entries[i];
            let (b_idx, b_weight) = other.entries[j];
            if a_idx == b_idx {
                sum += a_weight * b_weight;
                i += 1;
                j += 1;
            } else if a_idx < b_idx {
                i += 1;
            } else {
                j += 1;
            }
        }
        sum
    }
}

/// Result of fitting one batch: the shared vocabulary and one vector per input,
/// in input order.
#[derive(Debug, Clone)]
pub struct FittedBatch {
    vocabulary: Vocabulary,
    vectors: Vec<DocumentVector>,
}

impl FittedBatch {
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn vectors(&self) -> &[DocumentVector] {
        &self.vectors
    }

    pub fn into_vectors(self) -> Vec<DocumentVector> {
        self.vectors
    }
}

/// Smoothed TF-IDF vectorizer.
///
/// `tf(d, t) = count(t, d) / tokens(d)` and
/// `idf(t) = ln((1 + n) / (1 + df(t))) + 1`, which stays positive even for a
/// term present in every document of the batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdfVectorizer;

impl TfIdfVectorizer {
    pub fn new() -> Self {
        TfIdfVectorizer
    }

    pub fn fit_transform<S: AsRef<str>>(&self, texts: &[S]) -> FittedBatch {
        let tokenized: Vec<Vec<String>> = texts.iter().map(|t| tokenize(t.as_ref())).collect();

        let terms: BTreeSet<&str> = tokenized
            .iter()
            .flat_map(|tokens| tokens.iter().map(String::as_str))
            .collect();
        let vocabulary = Vocabulary::from_terms(terms);

        // Per-document term counts keyed by vocabulary index
        let counts: Vec<BTreeMap<usize, usize>> = tokenized
            .iter()
            .map(|tokens| {
                let mut counts = BTreeMap::new();
                for token in tokens {
                    if let Some(idx) = vocabulary.index_of(token) {
                        *counts.entry(idx).or_insert(0) += 1;
                    }
                }
                counts
            })
            .collect();

        let mut doc_freq = vec![0usize; vocabulary.len()];
        for doc_counts in &counts {
            for &idx in doc_counts.keys() {
                doc_freq[idx] += 1;
            }
        }

        let n = texts.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let vectors = counts
            .iter()
            .zip(&tokenized)
            .map(|(doc_counts, tokens)| {
                if tokens.is_empty() {
                    return DocumentVector::zero();
                }
                let total = tokens.len() as f64;
                let entries = doc_counts
                    .iter()
                    .map(|(&idx, &count)| (idx, count as f64 / total * idf[idx]))
                    .collect();
                DocumentVector::new(entries)
            })
            .collect();

        debug!(
            "Fitted {} documents over a vocabulary of {} terms",
            texts.len(),
            vocabulary.len()
        );

        FittedBatch { vocabulary, vectors }
    }
}
