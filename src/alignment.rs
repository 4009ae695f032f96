mod edit;
pub mod greek;
pub mod json;
pub mod search;

pub use self::edit::{Edit, EditId, EditKind, EditType};

use crate::features::{Feature, ScoringContext};
use crate::word::{WordRef, WordsBag};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// A set of edits keyed by edit identity. Cloning is shallow: edits are shared, never mutated.
#[derive(Clone, Debug, Default)]
pub struct Alignment {
    edits: BTreeMap<EditId, Rc<Edit>>,
}

impl Alignment {
    pub fn new() -> Alignment {
        Alignment::default()
    }

    /// Starting point of a search: a `Del` per source word and an `Ins` per target word.
    pub fn from_word_bags(from: &WordsBag, to: &WordsBag) -> Alignment {
        let mut alignment = Alignment::new();
        for word in from.values() {
            alignment.add(Edit::del(word.clone()));
        }
        for word in to.values() {
            alignment.add(Edit::ins(word.clone()));
        }
        alignment
    }

    pub fn from_edits(edits: impl IntoIterator<Item = Edit>) -> Alignment {
        let mut alignment = Alignment::new();
        for edit in edits {
            alignment.add(edit);
        }
        alignment
    }

    pub fn add(&mut self, edit: impl Into<Rc<Edit>>) {
        let edit = edit.into();
        self.edits.insert(edit.id(), edit);
    }

    /// Removing an edit that is not a member does nothing.
    pub fn remove(&mut self, id: EditId) {
        self.edits.remove(&id);
    }

    /// Removes every edit that uses one of `words` (compared by word id).
    pub fn remove_edits_with_words<'a>(&mut self, words: impl IntoIterator<Item = &'a WordRef>) {
        for word in words {
            self.edits.retain(|_, edit| !edit.touches(&word.id));
        }
    }

    pub fn contains(&self, id: EditId) -> bool {
        self.edits.contains_key(&id)
    }

    /// Content membership, see [`Edit::same_content`].
    pub fn includes(&self, edit: &Edit) -> bool {
        self.edits.values().any(|member| member.same_content(edit))
    }

    /// Members in construction order.
    pub fn edits(&self) -> impl Iterator<Item = &Rc<Edit>> + '_ {
        self.edits.values()
    }

    pub fn filter(&self, edit_type: EditType) -> Vec<Rc<Edit>> {
        self.edits
            .values()
            .filter(|edit| edit.edit_type() == edit_type)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn score(&self, features: &[Feature], weights: &[f64], ctx: &ScoringContext) -> f64 {
        self.edits.values().map(|edit| edit.score(features, weights, ctx)).sum()
    }

    /// Fraction of the gold edits that this alignment includes. An empty gold alignment scores 1.0
    /// against an empty candidate and 0.0 against anything else.
    pub fn edits_accuracy(&self, gold: &Alignment) -> f64 {
        if gold.is_empty() {
            return if self.is_empty() { 1.0 } else { 0.0 };
        }
        let found = gold.edits().filter(|edit| self.includes(edit)).count();
        found as f64 / gold.len() as f64
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for edit in self.edits.values() {
            write!(f, "{edit} ")?;
        }
        write!(f, "}}")
    }
}

/// `1 - |score(a) - score(b)| / max(score(a), score(b))`, 0.0 when the larger score is 0.
pub fn score_accuracy(a: &Alignment, b: &Alignment, features: &[Feature], weights: &[f64], ctx: &ScoringContext) -> f64 {
    let score_a = a.score(features, weights, ctx);
    let score_b = b.score(features, weights, ctx);
    let max = score_a.max(score_b);
    if max == 0.0 {
        return 0.0;
    }
    1.0 - (score_a - score_b).abs() / max
}

/// One alignable unit, usually a verse and its paraphrase.
#[derive(Clone, Debug, Default)]
pub struct Problem {
    pub from: WordsBag,
    pub to: WordsBag,
}

impl Problem {
    pub fn word_count(&self) -> usize {
        self.from.len() + self.to.len()
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for word in self.from.values() {
            write!(f, "{} ", word.text)?;
        }
        write!(f, " -> ")?;
        for word in self.to.values() {
            write!(f, "{} ", word.text)?;
        }
        write!(f, "]")
    }
}

/// A problem with its human-annotated reference alignment.
#[derive(Clone, Debug)]
pub struct GoldStandard {
    pub id: String,
    pub problem: Problem,
    pub alignment: Alignment,
}
