use crate::error::MatchingError;
use crate::extraction::{extract_fields, TextExtractor};
use crate::models::{Config, DocumentMatch, MatchResult, VocabularyScope};
use crate::similarity_search::{best_match, select_best, similarity};
use crate::vectorizer::TfIdfVectorizer;
use anyhow::Result;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

/// Match one query text against an ordered reference corpus with the default
/// vocabulary scope.
pub fn match_text<S: AsRef<str>>(query: &str, references: &[S]) -> MatchResult {
    TextMatcher::default().match_text(query, references)
}

/// Match every query independently against the same references.
pub fn match_many<Q, S>(queries: &[Q], references: &[S]) -> Vec<MatchResult>
where
    Q: AsRef<str> + Sync,
    S: AsRef<str> + Sync,
{
    TextMatcher::default().match_many(queries, references)
}

/// Stateless query-vs-corpus matcher. Every call fits its own vocabulary.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextMatcher {
    scope: VocabularyScope,
}

impl TextMatcher {
    pub fn new(scope: VocabularyScope) -> Self {
        TextMatcher { scope }
    }

    /// Best reference for `query`. The returned index points into `references`.
    pub fn match_text<S: AsRef<str>>(&self, query: &str, references: &[S]) -> MatchResult {
        if references.is_empty() {
            return MatchResult::none();
        }
        match self.scope {
            VocabularyScope::Batch => Self::match_batch(query, references),
            VocabularyScope::Pairwise => Self::match_pairwise(query, references),
        }
    }

    /// One result per query, in query order. Queries run in parallel and share
    /// nothing but the read-only references.
    pub fn match_many<Q, S>(&self, queries: &[Q], references: &[S]) -> Vec<MatchResult>
    where
        Q: AsRef<str> + Sync,
        S: AsRef<str> + Sync,
    {
        queries
            .par_iter()
            .map(|query| self.match_text(query.as_ref(), references))
            .collect()
    }

    fn match_batch<S: AsRef<str>>(query: &str, references: &[S]) -> MatchResult {
        // Query sits at position 0 of the batch
        let mut batch: Vec<&str> = Vec::with_capacity(references.len() + 1);
        batch.push(query);
        batch.extend(references.iter().map(AsRef::as_ref));

        let vectors = TfIdfVectorizer::new().fit_transform(&batch).into_vectors();
        match vectors.split_first() {
            Some((query_vector, reference_vectors)) => best_match(query_vector, reference_vectors),
            None => MatchResult::none(),
        }
    }

    fn match_pairwise<S: AsRef<str>>(query: &str, references: &[S]) -> MatchResult {
        let vectorizer = TfIdfVectorizer::new();
        select_best(references.iter().map(|reference| {
            let batch = vectorizer.fit_transform(&[query, reference.as_ref()]);
            let vectors = batch.vectors();
            similarity(&vectors[0], &vectors[1])
        }))
    }
}

/// A document read from disk, identified by its file name.
#[derive(Debug, Clone)]
struct LoadedDocument {
    name: String,
    text: String,
}

/// Runs a query folder against a reference folder.
pub struct DocumentMatcher {
    config: Config,
    extractor: Arc<dyn TextExtractor>,
    matcher: TextMatcher,
}

impl DocumentMatcher {
    pub fn new(config: Config, extractor: Arc<dyn TextExtractor>) -> Result<Self> {
        config.validate()?;

        info!("Initializing DocumentMatcher with {:?} vocabulary scope", config.scope);
        let matcher = TextMatcher::new(config.scope);

        Ok(DocumentMatcher {
            config,
            extractor,
            matcher,
        })
    }

    pub async fn process_all(&self) -> Result<Vec<DocumentMatch>> {
        info!("Loading reference documents");
        let references = self.load_documents(&self.config.train_dir).await?;

        info!("Loading query documents");
        let queries = self.load_documents(&self.config.test_dir).await?;

        info!(
            "Matching {} query documents against {} references",
            queries.len(),
            references.len()
        );
        let matcher = self.matcher;
        let matches =
            tokio::task::spawn_blocking(move || build_matches(matcher, &queries, &references))
                .await
                .map_err(MatchingError::from)?;

        if let Some(output_dir) = &self.config.output_dir {
            self.save_results(output_dir, &matches).await?;
        }

        Ok(matches)
    }

    async fn load_documents(&self, dir: &Path) -> Result<Vec<LoadedDocument>> {
        let extension = self.config.extension.trim_start_matches('.');

        let mut paths = Vec::new();
        let mut entries = fs::read_dir(dir).await.map_err(MatchingError::from)?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some(extension)
                && entry.file_type().await?.is_file()
            {
                paths.push(path);
            }
        }
        paths.sort();

        let extractor = Arc::clone(&self.extractor);
        let documents = tokio::task::spawn_blocking(move || read_documents(&*extractor, paths))
            .await
            .map_err(MatchingError::from)?;

        info!("Loaded {} documents from {:?}", documents.len(), dir);
        Ok(documents)
    }

    async fn save_results(&self, output_dir: &Path, matches: &[DocumentMatch]) -> Result<()> {
        fs::create_dir_all(output_dir).await?;

        for document_match in matches {
            let stem = Path::new(&document_match.query_document)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown");
            let output_path = output_dir.join(format!("{}_match.json", stem));
            let json_content =
                serde_json::to_string_pretty(document_match).map_err(MatchingError::from)?;
            fs::write(&output_path, json_content).await?;
            debug!("Saved matching result to {:?}", output_path);
        }

        let summary_path = output_dir.join("summary.json");
        let json_content = serde_json::to_string_pretty(matches).map_err(MatchingError::from)?;
        fs::write(&summary_path, json_content).await?;
        info!("Saved {} matching results to {:?}", matches.len(), output_dir);

        Ok(())
    }
}

fn read_documents(extractor: &dyn TextExtractor, paths: Vec<PathBuf>) -> Vec<LoadedDocument> {
    paths
        .into_iter()
        .map(|path| {
            let text = extractor.extract(&path);
            if text.is_empty() {
                warn!("No extractable text in {:?}", path);
            }
            let name = path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            LoadedDocument { name, text }
        })
        .collect()
}

fn build_matches(
    matcher: TextMatcher,
    queries: &[LoadedDocument],
    references: &[LoadedDocument],
) -> Vec<DocumentMatch> {
    let query_texts: Vec<&str> = queries.iter().map(|d| d.text.as_str()).collect();
    let reference_texts: Vec<&str> = references.iter().map(|d| d.text.as_str()).collect();
    let results = matcher.match_many(&query_texts, &reference_texts);

    queries
        .iter()
        .zip(results)
        .map(|(query, result)| {
            // References keep their positions, so the index maps straight to a file
            let best_match_document = result.index.map(|idx| references[idx].name.clone());
            debug!(
                "Best match for {}: {:?} (score: {:.4})",
                query.name, best_match_document, result.score
            );
            DocumentMatch {
                query_document: query.name.clone(),
                best_match_document,
                similarity: result.score,
                reference_index: result.signed_index(),
                fields: extract_fields(&query.text),
            }
        })
        .collect()
}
