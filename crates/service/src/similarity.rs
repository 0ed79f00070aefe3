//! Lexical similarity between job postings.

use std::collections::HashSet;

use crate::domain::{Job, ScoredJob};

pub const SIMILAR_JOBS_LIMIT: usize = 5;

/// Lower-cased word set of title, description and requirements.
///
/// Words are maximal runs of ASCII alphanumerics and `_`.
pub fn tokenize(job: &Job) -> HashSet<String> {
    let text = format!("{} {} {}", job.title, job.description, job.requirements).to_lowercase();
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// |a ∩ b| / max(|a|, |b|); 0 when both are empty.
pub fn score(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let denom = a.len().max(b.len());
    if denom == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / denom as f64
}

/// Top candidates by score, best first. The reference itself is never
/// included and equal scores keep candidate order.
pub fn rank(reference: &Job, candidates: &[Job]) -> Vec<ScoredJob> {
    let reference_words = tokenize(reference);
    let mut scored: Vec<ScoredJob> = candidates
        .iter()
        .filter(|c| c.id != reference.id)
        .map(|c| ScoredJob { similarity_score: score(&reference_words, &tokenize(c)), job: c.clone() })
        .collect();
    scored.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
    scored.truncate(SIMILAR_JOBS_LIMIT);
    scored
}
