use crate::alignment::Edit;
use crate::word::{Word, WordRef};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Edit distance in code points.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev_row: Vec<usize> = (0..=b.len()).collect();
    let mut curr_row = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr_row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr_row[j + 1] = (curr_row[j] + 1).min(prev_row[j + 1] + 1).min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }
    prev_row[b.len()]
}

/// Levenshtein distance divided by the longer length, in [0, 1]. Two empty strings are at 0.
pub fn normalized_levenshtein(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0.0;
    }
    levenshtein(a, b) as f64 / longest as f64
}

/// Strips diacritics and folds case, so "Πηληιάδεω" and "πηληιαδεω" compare equal.
pub fn normalize_text(text: &str) -> String {
    text.nfd()
        .filter(|&c| !is_combining_mark(c))
        .nfc()
        .collect::<String>()
        .to_lowercase()
}

/// A group of words seen as one: their texts, lemmas and tags concatenated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SummedWord {
    pub text: String,
    pub lemma: String,
    pub tag: String,
}

pub fn sum_words(words: &[WordRef]) -> SummedWord {
    let mut summed = SummedWord::default();
    for word in words {
        summed.text.push_str(&word.text);
        summed.lemma.push_str(&word.lemma);
        summed.tag.push_str(&word.tag);
    }
    summed
}

/// `1 - normalized_levenshtein` between one field of the source group and of the target group.
pub fn field_similarity<F>(edit: &Edit, field: F) -> f64
where
    F: Fn(&Word) -> &str,
{
    let (from, to) = edit.words();
    let concat = |words: &[WordRef]| words.iter().map(|word| field(word.as_ref())).collect::<String>();
    1.0 - normalized_levenshtein(&concat(from), &concat(to))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::rc::Rc;

    fn word(text: &str) -> WordRef {
        Rc::new(Word {
            text: text.to_owned(),
            lemma: text.to_owned(),
            tag: text.to_owned(),
            ..Word::default()
        })
    }

    fn text_similarity(edit: &Edit) -> f64 {
        field_similarity(edit, |word| word.text.as_str())
    }

    #[test]
    fn levenshtein_counts_code_points() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("a", "aa"), 1);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        // Two bytes each, one code point each.
        assert_eq!(levenshtein("αειδε", "αδε"), 2);
        assert_eq!(normalized_levenshtein("αειδε", "αδε"), 0.4);
    }

    #[test]
    fn identical_strings_are_fully_similar() {
        assert_eq!(text_similarity(&Edit::eq(word("μῆνιν"), word("μῆνιν"))), 1.0);
        assert_eq!(text_similarity(&Edit::sub(vec![word("a")], vec![word("a")])), 1.0);
    }

    #[test]
    fn similarity_is_normalized_by_longer_string() {
        assert_eq!(text_similarity(&Edit::sub(vec![word("a")], vec![word("aa")])), 0.5);
        assert_eq!(text_similarity(&Edit::sub(vec![word("")], vec![word("aa")])), 0.0);
        assert_eq!(text_similarity(&Edit::eq(word("a"), word("\u{e0}"))), 0.0);
    }

    #[test]
    fn unpaired_edits_have_no_similarity() {
        assert_eq!(text_similarity(&Edit::ins(word("a"))), 0.0);
        assert_eq!(text_similarity(&Edit::del(word("aa"))), 0.0);
    }

    #[test]
    fn groups_are_compared_as_summed_words() {
        let edit = Edit::sub(vec![word("a"), word("a")], vec![word("aa")]);
        assert_eq!(text_similarity(&edit), 1.0);
        let summed = sum_words(&[word("ab"), word("c")]);
        assert_eq!(summed.text, "abc");
        assert_eq!(summed.tag, "abc");
    }

    #[test]
    fn normalization_strips_diacritics_and_case() {
        assert_eq!(normalize_text("Πηληιάδεω"), "πηληιαδεω");
        assert_eq!(normalize_text("ἄειδε"), "αειδε");
        assert_eq!(normalize_text("Étonnant"), "etonnant");
    }
}
