use crate::models::MatchResult;
use crate::vectorizer::DocumentVector;

/// Cosine similarity of two TF-IDF vectors, clamped to `[0, 1]`.
///
/// A zero vector has similarity 0 with everything.
pub fn similarity(a: &DocumentVector, b: &DocumentVector) -> f64 {
    if a.is_zero() || b.is_zero() {
        return 0.0;
    }
    (a.dot(b) / (a.norm() * b.norm())).clamp(0.0, 1.0)
}

/// Pick the highest-scoring reference for `query`.
///
/// Ties resolve to the lowest index. An empty reference set yields
/// [`MatchResult::none`].
pub fn best_match(query: &DocumentVector, references: &[DocumentVector]) -> MatchResult {
    select_best(references.iter().map(|reference| similarity(query, reference)))
}

/// First occurrence of the maximum score. Only a strictly greater score
/// replaces the current best.
pub(crate) fn select_best<I>(scores: I) -> MatchResult
where
    I: IntoIterator<Item = f64>,
{
    let mut best = MatchResult::none();
    for (idx, score) in scores.into_iter().enumerate() {
        if best.index.is_none() || score > best.score {
            best = MatchResult {
                score,
                index: Some(idx),
            };
        }
    }
    best
}
