use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Word identity, `"{source}.{raw id}"`, e.g. `"HOM.123"`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct WordId(String);

impl WordId {
    pub fn new(source: &str, raw_id: &str) -> WordId {
        WordId(format!("{source}.{raw_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WordId {
    fn from(value: &str) -> WordId {
        WordId(value.to_owned())
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compares dot-separated ids segment by segment, numerically where both segments parse, so
/// "HOM.9" sorts before "HOM.10" and "1.9" before "1.10".
pub fn compare_dotted(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        let ordering = match (left.next(), right.next()) {
            (None, None) => break,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match (x.parse::<u64>(), y.parse::<u64>()) {
                (Ok(m), Ok(n)) => m.cmp(&n),
                _ => x.cmp(y),
            },
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.cmp(b)
}

// Source tag first, then the numeric id.
impl Ord for WordId {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_dotted(&self.0, &other.0)
    }
}

impl PartialOrd for WordId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Word {
    pub id: WordId,
    /// Normalized surface form.
    pub text: String,
    pub lemma: String,
    /// Morphosyntactic tag.
    pub tag: String,
    pub verse: String,
    pub chant: String,
    /// Corpus the word belongs to ("HOM", "PARA", ...).
    pub source: String,
}

impl Word {
    pub fn problem_id(&self) -> String {
        problem_id(&self.chant, &self.verse)
    }
}

pub fn problem_id(chant: &str, verse: &str) -> String {
    format!("{chant}.{verse}")
}

pub type WordRef = Rc<Word>;

/// Word id -> word, iterated in [`WordId`] order.
pub type WordsBag = BTreeMap<WordId, WordRef>;

/// Every word of every corpus.
pub type WordDb = BTreeMap<WordId, WordRef>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn numeric_segments_sort_numerically() {
        let mut ids: Vec<WordId> = ["HOM.10", "HOM.9", "HOM.1.2", "HOM.1", "HOM.1.10"]
            .into_iter()
            .map(WordId::from)
            .collect();
        ids.sort();
        let sorted: Vec<&str> = ids.iter().map(WordId::as_str).collect();
        assert_eq!(sorted, ["HOM.1", "HOM.1.2", "HOM.1.10", "HOM.9", "HOM.10"]);
    }

    #[test]
    fn source_tag_sorts_first() {
        assert!(WordId::from("HOM.500") < WordId::from("PARA.1"));
        assert_eq!(WordId::new("PARA", "7"), WordId::from("PARA.7"));
    }

    #[test]
    fn leading_zeros_keep_a_total_order() {
        let a = WordId::from("HOM.01");
        let b = WordId::from("HOM.1");
        assert_ne!(a.cmp(&b), Ordering::Equal);
        assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
    }

    #[test]
    fn problem_id_is_chant_dot_verse() {
        let word = Word {
            chant: "2".to_owned(),
            verse: "265".to_owned(),
            ..Word::default()
        };
        assert_eq!(word.problem_id(), "2.265");
    }
}
