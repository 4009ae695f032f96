use crate::features::{Feature, ScoringContext};
use crate::word::{WordId, WordRef};
use std::collections::BTreeSet;
use std::fmt;
use std::slice;
use std::sync::atomic::{AtomicUsize, Ordering};

index_vec::define_index_type! {
    /// Identity of one constructed edit. Two edits with the same content still get different ids.
    pub struct EditId = usize;
}

static NEXT_EDIT_ID: AtomicUsize = AtomicUsize::new(0);

impl EditId {
    fn fresh() -> EditId {
        EditId::new(NEXT_EDIT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditType {
    Ins,
    Del,
    Eq,
    Sub,
}

#[derive(Clone, Debug)]
pub enum EditKind {
    /// Word present only in the target sequence.
    Ins(WordRef),
    /// Word present only in the source sequence.
    Del(WordRef),
    Eq { from: WordRef, to: WordRef },
    Sub { from: Vec<WordRef>, to: Vec<WordRef> },
}

/// One correspondence between source and target words. Immutable once built.
#[derive(Debug)]
pub struct Edit {
    id: EditId,
    kind: EditKind,
}

impl Edit {
    pub fn new(kind: EditKind) -> Edit {
        Edit {
            id: EditId::fresh(),
            kind,
        }
    }

    pub fn ins(word: WordRef) -> Edit {
        Edit::new(EditKind::Ins(word))
    }

    pub fn del(word: WordRef) -> Edit {
        Edit::new(EditKind::Del(word))
    }

    pub fn eq(from: WordRef, to: WordRef) -> Edit {
        Edit::new(EditKind::Eq { from, to })
    }

    pub fn sub(from: Vec<WordRef>, to: Vec<WordRef>) -> Edit {
        Edit::new(EditKind::Sub { from, to })
    }

    pub fn id(&self) -> EditId {
        self.id
    }

    pub fn kind(&self) -> &EditKind {
        &self.kind
    }

    pub fn edit_type(&self) -> EditType {
        match self.kind {
            EditKind::Ins(_) => EditType::Ins,
            EditKind::Del(_) => EditType::Del,
            EditKind::Eq { .. } => EditType::Eq,
            EditKind::Sub { .. } => EditType::Sub,
        }
    }

    /// Source-side and target-side words.
    pub fn words(&self) -> (&[WordRef], &[WordRef]) {
        let none: &[WordRef] = &[];
        match &self.kind {
            EditKind::Ins(word) => (none, slice::from_ref(word)),
            EditKind::Del(word) => (slice::from_ref(word), none),
            EditKind::Eq { from, to } => (slice::from_ref(from), slice::from_ref(to)),
            EditKind::Sub { from, to } => (from.as_slice(), to.as_slice()),
        }
    }

    /// The word of an `Ins` or `Del` edit.
    pub fn unpaired_word(&self) -> Option<&WordRef> {
        match &self.kind {
            EditKind::Ins(word) | EditKind::Del(word) => Some(word),
            EditKind::Eq { .. } | EditKind::Sub { .. } => None,
        }
    }

    pub fn touches(&self, word: &WordId) -> bool {
        let (from, to) = self.words();
        from.iter().chain(to).any(|w| &w.id == word)
    }

    /// Chant and verse of the first constituent word.
    pub fn problem_id(&self) -> String {
        let (from, to) = self.words();
        match from.first().or_else(|| to.first()) {
            Some(word) => word.problem_id(),
            None => panic!("problem id requested for an edit without words: {self}"),
        }
    }

    /// Σ weight_i * feature_i(edit).
    pub fn score(&self, features: &[Feature], weights: &[f64], ctx: &ScoringContext) -> f64 {
        assert_eq!(features.len(), weights.len(), "features and weights length mismatch");
        features
            .iter()
            .zip(weights)
            .map(|(&feature, weight)| weight * ctx.value(feature, self))
            .sum()
    }

    /// Content equality used for accuracy: same variant and same word texts (Ins/Del/Eq), or the
    /// same word ids on each side regardless of order (Sub).
    pub fn same_content(&self, other: &Edit) -> bool {
        match (&self.kind, &other.kind) {
            (EditKind::Ins(a), EditKind::Ins(b)) | (EditKind::Del(a), EditKind::Del(b)) => a.text == b.text,
            (EditKind::Eq { from: f1, to: t1 }, EditKind::Eq { from: f2, to: t2 }) => {
                f1.text == f2.text && t1.text == t2.text
            }
            (EditKind::Sub { from: f1, to: t1 }, EditKind::Sub { from: f2, to: t2 }) => {
                fn ids(words: &[WordRef]) -> BTreeSet<&WordId> {
                    words.iter().map(|w| &w.id).collect()
                }
                ids(f1) == ids(f2) && ids(t1) == ids(t2)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn texts(words: &[WordRef]) -> String {
            words.iter().map(|w| w.text.as_str()).collect::<Vec<_>>().join(" ")
        }
        match &self.kind {
            EditKind::Ins(word) => write!(f, "Ins({})", word.text),
            EditKind::Del(word) => write!(f, "Del({})", word.text),
            EditKind::Eq { from, to } => write!(f, "Eq({} , {})", from.text, to.text),
            EditKind::Sub { from, to } => write!(f, "Sub({} , {})", texts(from), texts(to)),
        }
    }
}
