pub mod dictionary;
pub mod distance;
pub mod scholie;

use self::dictionary::Glossary;
use self::scholie::{ScholieIndex, ScholieMatch};
use crate::alignment::{Edit, EditId, EditType};
use clap::ValueEnum;
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A scalar function of an edit, one term of the linear scoring model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    /// Constant per edit variant, a strong prior towards equalities.
    EditType,
    LexicalSimilarity,
    LemmaDistance,
    TagDistance,
    /// Shared gloss in the vocabulary.
    VocDistance,
    /// Listed as an equivalent term.
    EqEquivTermDistance,
    /// Closeness of the target to the commentary on the source.
    ScholieDistance,
    /// Maximum of all the similarity features above.
    MaxDistance,
}

impl Feature {
    pub const DEFAULT: [Feature; 7] = [
        Feature::EditType,
        Feature::LexicalSimilarity,
        Feature::LemmaDistance,
        Feature::TagDistance,
        Feature::VocDistance,
        Feature::ScholieDistance,
        Feature::MaxDistance,
    ];

    const SIMILARITIES: [Feature; 6] = [
        Feature::LexicalSimilarity,
        Feature::LemmaDistance,
        Feature::TagDistance,
        Feature::VocDistance,
        Feature::ScholieDistance,
        Feature::EqEquivTermDistance,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Feature::EditType => "EditType",
            Feature::LexicalSimilarity => "LexicalSimilarity",
            Feature::LemmaDistance => "LemmaDistance",
            Feature::TagDistance => "TagDistance",
            Feature::VocDistance => "VocDistance",
            Feature::EqEquivTermDistance => "EqEquivTermDistance",
            Feature::ScholieDistance => "ScholieDistance",
            Feature::MaxDistance => "MaxDistance",
        }
    }

    fn compute(self, edit: &Edit, ctx: &ScoringContext) -> f64 {
        let data = ctx.data();
        match self {
            Feature::EditType => edit_type_score(edit),
            Feature::LexicalSimilarity => distance::field_similarity(edit, |word| word.text.as_str()),
            Feature::LemmaDistance => distance::field_similarity(edit, |word| word.lemma.as_str()),
            Feature::TagDistance => distance::field_similarity(edit, |word| word.tag.as_str()),
            Feature::VocDistance => dictionary::vocabulary_score(edit, &data.vocabulary),
            Feature::EqEquivTermDistance => dictionary::equivalent_term_score(edit, &data.equivalent_terms),
            Feature::ScholieDistance => scholie::scholie_score(edit, ctx),
            Feature::MaxDistance => Feature::SIMILARITIES
                .iter()
                .map(|&feature| ctx.value(feature, edit))
                .fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn edit_type_score(edit: &Edit) -> f64 {
    match edit.edit_type() {
        EditType::Ins => 1.0,
        EditType::Del => 2.0,
        EditType::Eq => 10.0,
        EditType::Sub => 1.0,
    }
}

/// Lexical resources the features look things up in.
#[derive(Clone, Debug)]
pub struct AuxiliaryData {
    pub vocabulary: Glossary,
    pub equivalent_terms: Glossary,
    pub scholie: ScholieIndex,
    pub scholie_match: ScholieMatch,
    /// ScholieDistance of a bare `Ins` or `Del`.
    pub scholie_unpaired_score: f64,
    /// ScholieDistance when the index has no commentary on the source.
    pub scholie_missing_score: f64,
}

impl Default for AuxiliaryData {
    fn default() -> AuxiliaryData {
        AuxiliaryData {
            vocabulary: Glossary::new(),
            equivalent_terms: Glossary::new(),
            scholie: ScholieIndex::new(),
            scholie_match: ScholieMatch::Prefix,
            scholie_unpaired_score: 1.0,
            scholie_missing_score: 1.0,
        }
    }
}

/// State for scoring the edits of one alignment run: the auxiliary data and memoized feature
/// values. Build a new one for every problem; values are keyed by edit identity only.
pub struct ScoringContext<'a> {
    data: &'a AuxiliaryData,
    values: RefCell<HashMap<(Feature, EditId), f64>>,
    scholie_entries: RefCell<HashMap<String, Rc<[String]>>>,
}

impl<'a> ScoringContext<'a> {
    pub fn new(data: &'a AuxiliaryData) -> ScoringContext<'a> {
        ScoringContext {
            data,
            values: RefCell::default(),
            scholie_entries: RefCell::default(),
        }
    }

    pub fn data(&self) -> &'a AuxiliaryData {
        self.data
    }

    pub fn value(&self, feature: Feature, edit: &Edit) -> f64 {
        let key = (feature, edit.id());
        if let Some(&value) = self.values.borrow().get(&key) {
            return value;
        }
        // Not holding the borrow: MaxDistance recurses into this cache.
        let value = feature.compute(edit, self);
        self.values.borrow_mut().insert(key, value);
        value
    }

    /// Commentary entries for a normalized headword, per the configured match mode.
    pub fn scholie_entries(&self, headword: &str) -> Rc<[String]> {
        if let Some(entries) = self.scholie_entries.borrow().get(headword) {
            return entries.clone();
        }
        let entries: Rc<[String]> = match self.data.scholie_match {
            ScholieMatch::Prefix => self.data.scholie.prefix(headword).into(),
            ScholieMatch::Exact => self.data.scholie.exact(headword).into(),
        };
        self.scholie_entries
            .borrow_mut()
            .insert(headword.to_owned(), entries.clone());
        entries
    }

    pub fn cached_values(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn clear(&self) {
        self.values.borrow_mut().clear();
        self.scholie_entries.borrow_mut().clear();
    }
}
