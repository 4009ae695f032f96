use super::distance::normalize_text;
use crate::alignment::{Edit, EditKind};
use crate::word::Word;
use std::collections::HashMap;

/// Lemma -> glosses (or equivalent terms).
pub type Glossary = HashMap<String, Vec<String>>;

fn lookup<'a>(glossary: &'a Glossary, lemma: &str) -> &'a [String] {
    glossary.get(lemma).map(Vec::as_slice).unwrap_or_default()
}

/// True when both lists have the same length and share at least one gloss, ignoring case and
/// diacritics.
pub fn has_same_meaning(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let b: Vec<String> = b.iter().map(|gloss| normalize_text(gloss)).collect();
    a.iter().any(|gloss| b.contains(&normalize_text(gloss)))
}

/// The source and target word of an edit pairing exactly one word with one word.
fn single_pair(edit: &Edit) -> Option<(&Word, &Word)> {
    match edit.kind() {
        EditKind::Eq { from, to } => Some((&**from, &**to)),
        // TODO: compare glosses of multi-word groups too.
        EditKind::Sub { from, to } if from.len() == 1 && to.len() == 1 => Some((&*from[0], &*to[0])),
        _ => None,
    }
}

/// 1.0 when the two lemmas have a gloss in common.
pub fn vocabulary_score(edit: &Edit, vocabulary: &Glossary) -> f64 {
    match single_pair(edit) {
        Some((from, to)) if has_same_meaning(lookup(vocabulary, &from.lemma), lookup(vocabulary, &to.lemma)) => 1.0,
        _ => 0.0,
    }
}

/// 1.0 when the target lemma is listed as the equivalent term of the source lemma.
pub fn equivalent_term_score(edit: &Edit, equivalent_terms: &Glossary) -> f64 {
    match single_pair(edit) {
        Some((from, to)) if has_same_meaning(lookup(equivalent_terms, &from.lemma), &[to.lemma.clone()]) => 1.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::word::WordRef;
    use std::rc::Rc;

    // Glosses are written "x - y", as in the vocabulary files.
    fn glossary(entries: &[(&str, &str)]) -> Glossary {
        entries
            .iter()
            .map(|(lemma, glosses)| (lemma.to_string(), glosses.split('-').map(|g| g.trim().to_owned()).collect()))
            .collect()
    }

    fn word(lemma: &str) -> WordRef {
        Rc::new(Word {
            text: lemma.to_owned(),
            lemma: lemma.to_owned(),
            ..Word::default()
        })
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn same_meaning_needs_equal_length_and_a_shared_gloss() {
        assert!(has_same_meaning(&strings(&["x", "y"]), &strings(&["y", "z"])));
        assert!(!has_same_meaning(&strings(&["x", "y"]), &strings(&["x"])));
        assert!(!has_same_meaning(&strings(&["x"]), &strings(&["y"])));
        assert!(!has_same_meaning(&[], &[]));
        assert!(has_same_meaning(&strings(&["Étonnant"]), &strings(&["etonnant"])));
    }

    #[test]
    fn vocabulary_matches_lemmas_with_shared_gloss() {
        let voc = glossary(&[("a", "x - y"), ("b", "y - w"), ("c", "x")]);
        assert_eq!(vocabulary_score(&Edit::eq(word("a"), word("a")), &voc), 1.0);
        assert_eq!(vocabulary_score(&Edit::eq(word("a"), word("b")), &voc), 1.0);
        assert_eq!(vocabulary_score(&Edit::sub(vec![word("a")], vec![word("b")]), &voc), 1.0);
        // Overlapping content, different list lengths.
        assert_eq!(vocabulary_score(&Edit::eq(word("a"), word("c")), &voc), 0.0);
        assert_eq!(vocabulary_score(&Edit::eq(word("a"), word("unknown")), &voc), 0.0);
    }

    #[test]
    fn vocabulary_ignores_unpaired_and_group_edits() {
        let voc = glossary(&[("a", "x - y")]);
        assert_eq!(vocabulary_score(&Edit::ins(word("a")), &voc), 0.0);
        assert_eq!(vocabulary_score(&Edit::del(word("a")), &voc), 0.0);
        let group = Edit::sub(vec![word("a"), word("a")], vec![word("a")]);
        assert_eq!(vocabulary_score(&group, &voc), 0.0);
        assert_eq!(vocabulary_score(&Edit::sub(vec![word("a")], vec![]), &voc), 0.0);
    }

    #[test]
    fn equivalent_terms_compare_against_target_lemma() {
        let terms = glossary(&[
            ("ἕννυμι", "ἐνδύω"),
            ("οἴγνυμι", "ἀνοίγνυμι"),
            ("ἐκπάγλως", "ἐκπληκτικῶς - κακῶς - μεγάλως"),
        ]);
        assert_eq!(equivalent_term_score(&Edit::sub(vec![word("ἕννυμι")], vec![word("ἐνδύω")]), &terms), 1.0);
        assert_eq!(equivalent_term_score(&Edit::eq(word("ἕννυμι"), word("ἐνδύω")), &terms), 1.0);
        assert_eq!(equivalent_term_score(&Edit::sub(vec![word("ἕννυμι")], vec![word("ἕννυμι")]), &terms), 0.0);
        assert_eq!(equivalent_term_score(&Edit::ins(word("ἕννυμι")), &terms), 0.0);
        // Several equivalents never match a single target lemma.
        assert_eq!(equivalent_term_score(&Edit::eq(word("ἐκπάγλως"), word("κακῶς")), &terms), 0.0);
    }
}
