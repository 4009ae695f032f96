use super::distance::{normalize_text, normalized_levenshtein, sum_words};
use super::ScoringContext;
use crate::alignment::{Edit, EditKind};
use clap::ValueEnum;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::ops::Bound;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScholieMatch {
    /// Every headword starting with the looked-up text.
    Prefix,
    /// Only the headword equal to the looked-up text.
    Exact,
}

/// Commentary keyed by normalized headword. Headwords and entries are normalized on insertion.
#[derive(Clone, Debug, Default)]
pub struct ScholieIndex {
    entries: BTreeMap<String, Vec<String>>,
}

impl ScholieIndex {
    pub fn new() -> ScholieIndex {
        ScholieIndex::default()
    }

    pub fn insert<S: AsRef<str>>(&mut self, headword: &str, comments: impl IntoIterator<Item = S>) {
        self.entries
            .entry(normalize_text(headword))
            .or_default()
            .extend(comments.into_iter().map(|comment| normalize_text(comment.as_ref())));
    }

    pub fn exact(&self, headword: &str) -> &[String] {
        self.entries.get(headword).map(Vec::as_slice).unwrap_or_default()
    }

    /// Entries of all headwords starting with `prefix`, in headword order.
    pub fn prefix(&self, prefix: &str) -> Vec<String> {
        self.entries
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(headword, _)| headword.starts_with(prefix))
            .flat_map(|(_, comments)| comments.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `1 - min normalized_levenshtein(target, entry)` over the commentary on the source text.
/// Bare insertions and deletions, and sources without commentary, get the configured defaults.
pub fn scholie_score(edit: &Edit, ctx: &ScoringContext) -> f64 {
    let data = ctx.data();
    if let EditKind::Ins(_) | EditKind::Del(_) = edit.kind() {
        return data.scholie_unpaired_score;
    }

    let (from, to) = edit.words();
    let headword = normalize_text(&sum_words(from).text);
    if headword.is_empty() {
        return data.scholie_missing_score;
    }
    let entries = ctx.scholie_entries(&headword);
    if entries.is_empty() {
        return data.scholie_missing_score;
    }

    let target = normalize_text(&sum_words(to).text);
    let mut best = f64::INFINITY;
    for entry in entries.iter() {
        best = best.min(normalized_levenshtein(&target, entry));
        if best == 0.0 {
            break;
        }
    }
    1.0 - best
}
