use crate::alignment::greek::Aligner;
use crate::alignment::search::{align_problem, AlignError};
use crate::alignment::{score_accuracy, Alignment, GoldStandard};
use crate::features::{AuxiliaryData, Feature, ScoringContext};
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Clone, Debug)]
pub struct ProblemEvaluation {
    pub id: String,
    pub predicted: Alignment,
    /// Fraction of the gold edits found.
    pub edit_accuracy: f64,
    pub score_accuracy: f64,
}

#[derive(Clone, Debug, Default)]
pub struct Evaluation {
    pub problems: Vec<ProblemEvaluation>,
    pub elapsed: Duration,
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}

impl Evaluation {
    pub fn mean_edit_accuracy(&self) -> f64 {
        mean(self.problems.iter().map(|p| p.edit_accuracy))
    }

    pub fn mean_score_accuracy(&self) -> f64 {
        mean(self.problems.iter().map(|p| p.score_accuracy))
    }
}

/// Aligns every test problem with fixed weights and compares the result with its gold alignment.
pub fn evaluate(
    test: &[GoldStandard],
    aligner: &dyn Aligner,
    features: &[Feature],
    weights: &[f64],
    max_group: usize,
    data: &AuxiliaryData,
) -> Result<Evaluation, AlignError> {
    let start = Instant::now();
    let mut problems = Vec::with_capacity(test.len());
    for (i, gold) in test.iter().enumerate() {
        let ctx = ScoringContext::new(data);
        let predicted = align_problem(&gold.problem, aligner, features, weights, max_group, &ctx)?;
        let edit_accuracy = predicted.edits_accuracy(&gold.alignment);
        let score_accuracy = score_accuracy(&gold.alignment, &predicted, features, weights, &ctx);
        info!(
            id = %gold.id,
            progress = i * 100 / test.len(),
            edit_accuracy,
            score_accuracy,
            "aligned test problem"
        );
        debug!(expected = %gold.alignment, got = %predicted);
        problems.push(ProblemEvaluation {
            id: gold.id.clone(),
            predicted,
            edit_accuracy,
            score_accuracy,
        });
    }
    Ok(Evaluation {
        problems,
        elapsed: start.elapsed(),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::alignment::greek::GreekAligner;
    use crate::alignment::{Edit, Problem};
    use crate::word::{Word, WordId, WordRef, WordsBag};
    use std::rc::Rc;

    fn word(id: &str, text: &str) -> WordRef {
        Rc::new(Word {
            id: WordId::from(id),
            text: text.to_owned(),
            lemma: text.to_owned(),
            chant: "1".to_owned(),
            verse: "1".to_owned(),
            ..Word::default()
        })
    }

    fn bag(words: &[&WordRef]) -> WordsBag {
        words.iter().map(|&word| (word.id.clone(), word.clone())).collect()
    }

    #[test]
    fn no_problems_means_zero_accuracy() {
        let evaluation = Evaluation::default();
        assert_eq!(evaluation.mean_edit_accuracy(), 0.0);
        assert_eq!(evaluation.mean_score_accuracy(), 0.0);
    }

    #[test]
    fn evaluates_each_test_problem() {
        let (rex, rex2) = (word("HOM.1", "rex"), word("PARA.1", "rex"));
        let (dux, ducem) = (word("HOM.2", "dux"), word("PARA.2", "ducem"));
        let gold = GoldStandard {
            id: "1.1".to_owned(),
            problem: Problem {
                from: bag(&[&rex, &dux]),
                to: bag(&[&rex2, &ducem]),
            },
            alignment: Alignment::from_edits([
                Edit::eq(rex.clone(), rex2.clone()),
                Edit::del(dux.clone()),
                Edit::ins(ducem.clone()),
            ]),
        };
        let features = [Feature::EditType, Feature::LexicalSimilarity];
        let data = AuxiliaryData::default();
        let evaluation = evaluate(&[gold], &GreekAligner::new(), &features, &[1.0, 1.0], 1, &data).unwrap();

        assert_eq!(evaluation.problems.len(), 1);
        let result = &evaluation.problems[0];
        assert_eq!(result.id, "1.1");
        // Eq(rex) is found, dux/ducem end up substituted rather than deleted and inserted.
        assert_eq!(result.predicted.to_string(), "{ Eq(rex , rex) Sub(dux , ducem) }");
        assert!((result.edit_accuracy - 1.0 / 3.0).abs() < 1e-12);
        assert!(result.score_accuracy > 0.0 && result.score_accuracy < 1.0);
        assert_eq!(evaluation.mean_edit_accuracy(), result.edit_accuracy);
    }
}
