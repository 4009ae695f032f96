use crate::alignment::{Alignment, Problem};
use crate::word::{WordId, WordsBag};
use std::collections::BTreeMap;
use tracing::warn;

/// Checks that `alignment` partitions the words of `problem`: every word is used by exactly one
/// edit, on the side it belongs to.
pub fn validate(alignment: &Alignment, problem: &Problem) -> Vec<String> {
    let mut errors = vec![];

    let mut used: [BTreeMap<&WordId, Vec<String>>; 2] = Default::default();
    for (edit_index, edit) in alignment.edits().enumerate() {
        let (from, to) = edit.words();
        if from.is_empty() && to.is_empty() {
            errors.push(format!("Edit #{edit_index} {edit} has no words"));
        }
        for (side, words) in [from, to].into_iter().enumerate() {
            for word in words {
                used[side].entry(&word.id).or_default().push(format!("{edit} (#{edit_index})"));
            }
        }
    }

    let bags: [&WordsBag; 2] = [&problem.from, &problem.to];
    for side in 0..2 {
        let side_name = ["Source", "Target"][side];

        // Each word should be used by at most one edit.
        for (id, edits) in &used[side] {
            if edits.len() > 1 {
                errors.push(format!("{side_name} word {id} is used by multiple edits: {}", edits.join(", ")));
            }
        }

        // Each word of the problem should be used somewhere.
        for id in bags[side].keys() {
            if !used[side].contains_key(id) {
                errors.push(format!("{side_name} word {id} is not used by any edit"));
            }
        }

        // Edits should only use words of the problem.
        for (id, edits) in &used[side] {
            if !bags[side].contains_key(*id) {
                errors.push(format!("{side_name} word {id} is not part of the problem, but it is used by {}", edits[0]));
            }
        }
    }

    errors
}

pub fn print_errors(errors: &[String]) {
    if !errors.is_empty() {
        warn!(count = errors.len(), "alignment validation errors");
        for error in errors {
            warn!("  {error}");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::alignment::Edit;
    use crate::word::{Word, WordRef};
    use std::rc::Rc;

    fn word(id: &str) -> WordRef {
        Rc::new(Word {
            id: id.into(),
            text: id.to_owned(),
            ..Word::default()
        })
    }

    fn problem(from: &[&WordRef], to: &[&WordRef]) -> Problem {
        let bag = |words: &[&WordRef]| words.iter().map(|&w| (w.id.clone(), w.clone())).collect();
        Problem {
            from: bag(from),
            to: bag(to),
        }
    }

    #[test]
    fn starting_alignment_is_valid() {
        let (a, b, c) = (word("HOM.1"), word("HOM.2"), word("PARA.1"));
        let p = problem(&[&a, &b], &[&c]);
        assert!(validate(&Alignment::from_word_bags(&p.from, &p.to), &p).is_empty());
        let aligned = Alignment::from_edits([Edit::sub(vec![a, b], vec![c])]);
        assert!(validate(&aligned, &p).is_empty());
    }

    #[test]
    fn reports_missing_reused_and_foreign_words() {
        let (a, b, c, x) = (word("HOM.1"), word("HOM.2"), word("PARA.1"), word("PARA.9"));
        let p = problem(&[&a, &b], &[&c]);
        let alignment = Alignment::from_edits([
            Edit::eq(a.clone(), c.clone()),
            Edit::sub(vec![a], vec![x]),
            Edit::sub(vec![], vec![]),
        ]);
        let errors = validate(&alignment, &p);
        assert_eq!(errors.len(), 4, "{errors:#?}");
        assert!(errors[0].ends_with("has no words"));
        assert!(errors[1].starts_with("Source word HOM.1 is used by multiple edits"));
        assert_eq!(errors[2], "Source word HOM.2 is not used by any edit");
        assert!(errors[3].starts_with("Target word PARA.9 is not part of the problem"));
        assert!(validate(&Alignment::from_word_bags(&p.from, &Default::default()), &p)
            .contains(&"Target word PARA.1 is not used by any edit".to_owned()));
    }
}
