use super::{Alignment, Edit, EditType};
use crate::word::WordRef;
use std::rc::Rc;

/// Proposes the alignments one greedy step further than the given one.
pub trait Aligner {
    /// `max_group` bounds the number of words on each side of a proposed substitution.
    /// An empty result means the search is over.
    fn next(&self, alignment: &Alignment, max_group: usize) -> Vec<Alignment>;
}

const PUNCTUATION: &[char] = &['·', '\u{0387}', '\u{037E}', '«', '»', '“', '”', '‘', '’', '—', '–'];

pub fn remove_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_ascii_punctuation() && !PUNCTUATION.contains(c))
        .collect()
}

/// Pairs leftover deletions with leftover insertions. Equalities (same text once punctuation is
/// stripped) are proposed exclusively while any exist; otherwise every pairing of a group of up to
/// `max_group` deleted words with a group of up to `max_group` inserted words becomes a candidate
/// substitution.
///
/// Candidate order is fixed: words sorted by id, deleted-word groups in the outer loop, groups by
/// size and then lexicographically by index (see [`limited_subsets`]).
#[derive(Clone, Copy, Debug, Default)]
pub struct GreekAligner;

impl GreekAligner {
    pub fn new() -> GreekAligner {
        GreekAligner
    }
}

fn unpaired_words(edits: &[Rc<Edit>]) -> Vec<(Rc<Edit>, WordRef)> {
    let mut words: Vec<_> = edits
        .iter()
        .filter_map(|edit| edit.unpaired_word().map(|word| (edit.clone(), word.clone())))
        .collect();
    words.sort_by(|a, b| a.1.id.cmp(&b.1.id));
    words
}

impl Aligner for GreekAligner {
    fn next(&self, alignment: &Alignment, max_group: usize) -> Vec<Alignment> {
        let dels = unpaired_words(&alignment.filter(EditType::Del));
        if dels.is_empty() {
            return vec![];
        }
        let inss = unpaired_words(&alignment.filter(EditType::Ins));

        let mut candidates = vec![];
        let ins_texts: Vec<String> = inss.iter().map(|(_, word)| remove_punctuation(&word.text)).collect();
        for (del, del_word) in &dels {
            let del_text = remove_punctuation(&del_word.text);
            for ((ins, ins_word), ins_text) in inss.iter().zip(&ins_texts) {
                if &del_text != ins_text {
                    continue;
                }
                let mut candidate = alignment.clone();
                candidate.remove(del.id());
                candidate.remove(ins.id());
                candidate.add(Edit::eq(del_word.clone(), ins_word.clone()));
                candidates.push(candidate);
            }
        }
        if !candidates.is_empty() {
            return candidates;
        }

        let del_words: Vec<WordRef> = dels.into_iter().map(|(_, word)| word).collect();
        let ins_words: Vec<WordRef> = inss.into_iter().map(|(_, word)| word).collect();
        let del_groups = limited_subsets(&del_words, max_group);
        let ins_groups = limited_subsets(&ins_words, max_group);
        for del_group in &del_groups {
            for ins_group in &ins_groups {
                let mut candidate = alignment.clone();
                candidate.remove_edits_with_words(del_group.iter().chain(ins_group));
                candidate.add(Edit::sub(del_group.clone(), ins_group.clone()));
                candidates.push(candidate);
            }
        }
        candidates
    }
}

/// All subsets of `items` with 1 to `limit` elements, keeping the relative order of `items`.
/// Smaller subsets come first; subsets of one size are in lexicographic order of their indices.
pub fn limited_subsets<T: Clone>(items: &[T], limit: usize) -> Vec<Vec<T>> {
    let mut subsets = vec![];
    let n = items.len();
    for size in 1..=limit.min(n) {
        let mut indices: Vec<usize> = (0..size).collect();
        loop {
            subsets.push(indices.iter().map(|&i| items[i].clone()).collect());

            // Advance the rightmost index that still has room.
            let Some(pos) = (0..size).rev().find(|&pos| indices[pos] < n - size + pos) else {
                break;
            };
            indices[pos] += 1;
            for next in pos + 1..size {
                indices[next] = indices[next - 1] + 1;
            }
        }
    }
    subsets
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn subsets_are_ordered_by_size_then_lexicographically() {
        let subsets = limited_subsets(&['a', 'b', 'c'], 2);
        let expected: Vec<Vec<char>> = vec![
            vec!['a'],
            vec!['b'],
            vec!['c'],
            vec!['a', 'b'],
            vec!['a', 'c'],
            vec!['b', 'c'],
        ];
        assert_eq!(subsets, expected);
    }

    #[test]
    fn subset_limit_is_clamped_to_length() {
        assert_eq!(limited_subsets(&[1, 2, 3], 5).len(), 7);
        assert!(limited_subsets(&[1, 2, 3], 0).is_empty());
        assert!(limited_subsets::<u8>(&[], 3).is_empty());
    }

    #[test]
    fn greek_punctuation_is_stripped() {
        assert_eq!(remove_punctuation("ἄειδε·"), "ἄειδε");
        assert_eq!(remove_punctuation("θεά,"), "θεά");
        assert_eq!(remove_punctuation("τί\u{037E}"), "τί");
        assert_eq!(remove_punctuation("lupus."), "lupus");
    }
}
