use crate::alignment::{Alignment, Edit, GoldStandard, Problem};
use crate::config::Config;
use crate::features::dictionary::Glossary;
use crate::features::AuxiliaryData;
use crate::features::scholie::ScholieIndex;
use crate::word::{compare_dotted, problem_id, Word, WordDb, WordId, WordRef};
use regex::Regex;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("{origin}: {source}")]
    Io { origin: String, source: io::Error },
    #[error("{origin}:{line}: {message}")]
    Malformed {
        origin: String,
        line: usize,
        message: String,
    },
    #[error("{origin}: {source}")]
    Json { origin: String, source: serde_json::Error },
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

fn open(path: &Path) -> Result<BufReader<File>, InputError> {
    File::open(path).map(BufReader::new).map_err(|source| InputError::Io {
        origin: path.display().to_string(),
        source,
    })
}

/// Numbered lines of `reader`, starting at 1, without trailing `\r`.
fn lines<'a>(reader: impl BufRead + 'a, origin: &'a str) -> impl Iterator<Item = Result<(usize, String), InputError>> + 'a {
    reader.lines().enumerate().map(move |(i, line)| match line {
        Ok(mut line) => {
            if line.ends_with('\r') {
                line.pop();
            }
            Ok((i + 1, line))
        }
        Err(source) => Err(InputError::Io {
            origin: origin.to_owned(),
            source,
        }),
    })
}

const WORD_COLUMNS: [&str; 7] = ["id", "source", "chant", "verse", "text", "lemma", "tag"];

/// Adds the words of a tab-separated table to `db`: a header line, then
/// `id source chant verse text lemma tag`. Rows without an id or a verse are skipped.
/// Returns the number of words read.
pub fn read_words(reader: impl BufRead, origin: &str, db: &mut WordDb) -> Result<usize, InputError> {
    let mut count = 0;
    for line in lines(reader, origin).skip(1) {
        let (number, line) = line?;
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split('\t').map(str::trim).collect();
        if cells.len() < WORD_COLUMNS.len() {
            return Err(InputError::Malformed {
                origin: origin.to_owned(),
                line: number,
                message: format!("expected columns {}, got {} cells", WORD_COLUMNS.join(" "), cells.len()),
            });
        }
        let [id, source, chant, verse, text, lemma, tag] = [cells[0], cells[1], cells[2], cells[3], cells[4], cells[5], cells[6]];
        if id.is_empty() || verse.is_empty() {
            debug!(origin, line = number, "skipping row without id or verse");
            continue;
        }
        let word = Word {
            id: WordId::new(source, id),
            text: text.to_owned(),
            lemma: lemma.to_owned(),
            tag: tag.to_owned(),
            verse: verse.to_owned(),
            chant: chant.to_owned(),
            source: source.to_owned(),
        };
        db.insert(word.id.clone(), Rc::new(word));
        count += 1;
    }
    Ok(count)
}

pub fn load_words<P: AsRef<Path>>(paths: &[P]) -> Result<WordDb, InputError> {
    let mut db = WordDb::new();
    for path in paths {
        let path = path.as_ref();
        let count = read_words(open(path)?, &path.display().to_string(), &mut db)?;
        info!(path = %path.display(), count, "loaded words");
    }
    Ok(db)
}

/// `lemma<TAB>gloss - gloss - ...` lines. Repeated lemmas collect all their glosses; lines
/// without a tab are skipped.
pub fn read_glossary(reader: impl BufRead, origin: &str) -> Result<Glossary, InputError> {
    let mut glossary = Glossary::new();
    for line in lines(reader, origin) {
        let (number, line) = line?;
        let Some((lemma, glosses)) = line.split_once('\t') else {
            if !line.trim().is_empty() {
                debug!(origin, line = number, "skipping line without glosses");
            }
            continue;
        };
        glossary
            .entry(lemma.trim().to_owned())
            .or_default()
            .extend(glosses.split('-').map(|gloss| gloss.trim().to_owned()));
    }
    Ok(glossary)
}

pub fn load_glossary(path: &Path) -> Result<Glossary, InputError> {
    let glossary = read_glossary(open(path)?, &path.display().to_string())?;
    info!(path = %path.display(), lemmas = glossary.len(), "loaded glossary");
    Ok(glossary)
}

/// JSON object `verse -> headword -> [commentary]`. Verses are merged into one index.
pub fn read_scholie(reader: impl io::Read, origin: &str) -> Result<ScholieIndex, InputError> {
    let verses: BTreeMap<String, BTreeMap<String, Vec<String>>> =
        serde_json::from_reader(reader).map_err(|source| InputError::Json {
            origin: origin.to_owned(),
            source,
        })?;
    let mut index = ScholieIndex::new();
    for headwords in verses.into_values() {
        for (headword, comments) in headwords {
            index.insert(&headword, comments);
        }
    }
    Ok(index)
}

pub fn load_scholie(path: &Path) -> Result<ScholieIndex, InputError> {
    let index = read_scholie(open(path)?, &path.display().to_string())?;
    info!(path = %path.display(), headwords = index.len(), "loaded scholie");
    Ok(index)
}

/// Lexical resources named by `config`. Empty paths leave the resource empty.
pub fn load_auxiliary_data(config: &Config) -> Result<AuxiliaryData, InputError> {
    let mut data = AuxiliaryData {
        scholie_match: config.scholie_match,
        scholie_unpaired_score: config.scholie_unpaired_score,
        scholie_missing_score: config.scholie_missing_score,
        ..AuxiliaryData::default()
    };
    if !config.vocabulary.as_os_str().is_empty() {
        data.vocabulary = load_glossary(&config.vocabulary)?;
    }
    if !config.equivalent_terms.as_os_str().is_empty() {
        data.equivalent_terms = load_glossary(&config.equivalent_terms)?;
    }
    if !config.scholie.as_os_str().is_empty() {
        data.scholie = load_scholie(&config.scholie)?;
    }
    Ok(data)
}

/// Empty problems for every chant and verse in the database: `source_tag` words go to the
/// source side, `target_tag` words to the target side.
pub fn problems_from_words(words: &WordDb, source_tag: &str, target_tag: &str) -> BTreeMap<String, GoldStandard> {
    let mut problems = BTreeMap::new();
    for word in words.values() {
        let id = problem_id(&word.chant, &word.verse);
        let gold = problems.entry(id.clone()).or_insert_with(|| GoldStandard {
            id,
            problem: Problem::default(),
            alignment: Alignment::new(),
        });
        if word.source == source_tag {
            gold.problem.from.insert(word.id.clone(), word.clone());
        } else if word.source == target_tag {
            gold.problem.to.insert(word.id.clone(), word.clone());
        }
    }
    problems
}

/// The edit an annotated unit stands for, `None` for shapes that are not edits.
pub fn edit_from_unit(from: Vec<WordRef>, to: Vec<WordRef>) -> Option<Edit> {
    match (from.len(), to.len()) {
        (0, 0) => None,
        (1, 0) => from.into_iter().next().map(Edit::del),
        (0, 1) => to.into_iter().next().map(Edit::ins),
        (_, 0) | (0, _) => None,
        (1, 1) if from[0].text == to[0].text => Some(Edit::eq(from[0].clone(), to[0].clone())),
        _ => Some(Edit::sub(from, to)),
    }
}

struct SegmentParser<'a> {
    marker: Regex,
    words: &'a WordDb,
    origin: &'a str,
}

impl<'a> SegmentParser<'a> {
    fn words(&self, segment: &str, tag: &str, line: usize) -> Result<Vec<WordRef>, InputError> {
        let mut result = vec![];
        for token in segment.split_whitespace() {
            let Some(captures) = self.marker.captures(token) else {
                return Err(InputError::Malformed {
                    origin: self.origin.to_owned(),
                    line,
                    message: format!("token without word marker: {token}"),
                });
            };
            let id = WordId::new(tag, &captures["first"]);
            match self.words.get(&id) {
                Some(word) => result.push(word.clone()),
                None => debug!(origin = self.origin, line, %id, "ignoring unknown word"),
            }
        }
        Ok(result)
    }
}

/// Reference alignments: one annotated unit per line, `source segment<TAB>target segment`, where
/// each token of a segment ends with a `{first-last}` word-number marker. Every chant and verse
/// of `words` yields one entry, sorted by problem id, with the edits of its annotated units.
pub fn read_gold_standard(
    reader: impl BufRead,
    origin: &str,
    words: &WordDb,
    source_tag: &str,
    target_tag: &str,
) -> Result<Vec<GoldStandard>, InputError> {
    let mut problems = problems_from_words(words, source_tag, target_tag);
    let parser = SegmentParser {
        marker: Regex::new(r"\{(?P<first>\d+)-\d+\}")?,
        words,
        origin,
    };

    for line in lines(reader, origin) {
        let (number, line) = line?;
        if line.trim().is_empty() {
            continue;
        }
        let Some((source, target)) = line.split_once('\t') else {
            return Err(InputError::Malformed {
                origin: origin.to_owned(),
                line: number,
                message: "expected a source and a target segment separated by a tab".to_owned(),
            });
        };
        let from = parser.words(source, source_tag, number)?;
        let to = parser.words(target, target_tag, number)?;
        let Some(edit) = edit_from_unit(from, to) else {
            debug!(origin, line = number, "skipping unit that is not an edit");
            continue;
        };
        if let Some(gold) = problems.get_mut(&edit.problem_id()) {
            gold.alignment.add(edit);
        }
    }

    let mut gold: Vec<GoldStandard> = problems.into_values().collect();
    gold.sort_by(|a, b| compare_dotted(&a.id, &b.id));
    Ok(gold)
}

pub fn load_gold_standard(
    path: &Path,
    words: &WordDb,
    source_tag: &str,
    target_tag: &str,
) -> Result<Vec<GoldStandard>, InputError> {
    let gold = read_gold_standard(open(path)?, &path.display().to_string(), words, source_tag, target_tag)?;
    info!(path = %path.display(), problems = gold.len(), "loaded gold standard");
    Ok(gold)
}

/// The first `fraction` of `gold` for training, the rest for testing.
pub fn split_gold(mut gold: Vec<GoldStandard>, fraction: f64) -> (Vec<GoldStandard>, Vec<GoldStandard>) {
    let index = ((fraction.clamp(0.0, 1.0) * gold.len() as f64) as usize).min(gold.len());
    let test = gold.split_off(index);
    (gold, test)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::alignment::EditType;

    const WORDS: &str = "id\tsource\tchant\tverse\ttext\tlemma\ttag
1\tHOM\t1\t1\tμῆνιν\tμῆνις\tn-s---fa-
2\tHOM\t1\t1\tἄειδε\tἀείδω\tv2spma---
3\tHOM\t1\t1\tθεὰ\tθεά\tn-s---fv-
1\tPARA\t1\t1\tτὴν\tὁ\tl-s---fa-
2\tPARA\t1\t1\tὀργὴν\tὀργή\tn-s---fa-
3\tPARA\t1\t1\tἄειδε\tἀείδω\tv2spma---
4\tHOM\t1\t10\tπολλὰς\tπολύς\ta-p---fa-
5\tHOM\t1\t2\tοὐλομένην\tοὐλόμενος\tt-sapmfa-
\tHOM\t1\t2\tglose\t\t
6\tHOM\t1\t\tmarge\t\t
";

    fn words() -> WordDb {
        let mut db = WordDb::new();
        read_words(WORDS.as_bytes(), "words.tsv", &mut db).unwrap();
        db
    }

    #[test]
    fn words_are_keyed_by_source_and_id() {
        let db = words();
        assert_eq!(db.len(), 8);
        let word = &db[&WordId::from("PARA.2")];
        assert_eq!(word.text, "ὀργὴν");
        assert_eq!(word.lemma, "ὀργή");
        assert_eq!(word.problem_id(), "1.1");
        assert_eq!(word.source, "PARA");
    }

    #[test]
    fn short_word_rows_are_rejected() {
        let mut db = WordDb::new();
        let err = read_words("header\n1\tHOM\t1\n".as_bytes(), "words.tsv", &mut db).unwrap_err();
        assert!(matches!(err, InputError::Malformed { line: 2, .. }), "{err}");
    }

    #[test]
    fn glossary_splits_and_accumulates_glosses() {
        let text = "ἀείδω\tchanter - célébrer\nθεά\tdéesse\nsans tabulation\nἀείδω\tdire\n";
        let glossary = read_glossary(text.as_bytes(), "voc.tsv").unwrap();
        assert_eq!(glossary.len(), 2);
        assert_eq!(glossary["ἀείδω"], ["chanter", "célébrer", "dire"]);
        assert_eq!(glossary["θεά"], ["déesse"]);
    }

    #[test]
    fn scholie_verses_are_merged() {
        let json = r#"{"1.1": {"ἄειδε": ["ᾆδε", "λέγε"]}, "1.2": {"οὐλομένην": ["ὀλεθρίαν"]}}"#;
        let index = read_scholie(json.as_bytes(), "scholie.json").unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.exact("αειδε"), ["αδε", "λεγε"]);
        assert_eq!(index.exact("ουλομενην"), ["ολεθριαν"]);
    }

    #[test]
    fn malformed_scholie_fails() {
        let err = read_scholie("[1, 2]".as_bytes(), "scholie.json").unwrap_err();
        assert!(matches!(err, InputError::Json { .. }));
    }

    #[test]
    fn gold_units_become_edits() {
        let gold_text = "μῆνιν{1-1}\tτὴν{1-1} ὀργὴν{2-2}\n\
                         ἄειδε{2-2}\tἄειδε{3-3}\n\
                         θεὰ{3-3}\t\n\
                         \n\
                         οὐλομένην{5-5}\tὀλεθρίαν{99-99}\n";
        let gold = read_gold_standard(gold_text.as_bytes(), "gold.tsv", &words(), "HOM", "PARA").unwrap();
        let ids: Vec<&str> = gold.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["1.1", "1.2", "1.10"]);

        let first = &gold[0];
        assert_eq!(first.problem.from.len(), 3);
        assert_eq!(first.problem.to.len(), 3);
        assert_eq!(first.alignment.to_string(), "{ Sub(μῆνιν , τὴν ὀργὴν) Eq(ἄειδε , ἄειδε) Del(θεὰ) }");

        // The unknown target word leaves a bare deletion.
        assert_eq!(gold[1].alignment.filter(EditType::Del).len(), 1);
        assert!(gold[2].alignment.is_empty());
    }

    #[test]
    fn gold_tokens_need_markers() {
        let err = read_gold_standard("μῆνιν\tτὴν{1-1}\n".as_bytes(), "gold.tsv", &words(), "HOM", "PARA").unwrap_err();
        assert!(err.to_string().starts_with("gold.tsv:1: token without word marker"), "{err}");
    }

    #[test]
    fn unit_shapes() {
        let db = words();
        let w = |id: &str| db[&WordId::from(id)].clone();
        assert!(edit_from_unit(vec![], vec![]).is_none());
        assert!(edit_from_unit(vec![w("HOM.1"), w("HOM.2")], vec![]).is_none());
        assert_eq!(edit_from_unit(vec![], vec![w("PARA.1")]).map(|e| e.edit_type()), Some(EditType::Ins));
        assert_eq!(edit_from_unit(vec![w("HOM.1")], vec![w("PARA.1")]).map(|e| e.edit_type()), Some(EditType::Sub));
        assert_eq!(edit_from_unit(vec![w("HOM.2")], vec![w("PARA.3")]).map(|e| e.edit_type()), Some(EditType::Eq));
    }

    #[test]
    fn split_keeps_order() {
        let gold = read_gold_standard("".as_bytes(), "gold.tsv", &words(), "HOM", "PARA").unwrap();
        let (training, test) = split_gold(gold.clone(), 0.3);
        assert!(training.is_empty());
        assert_eq!(test.len(), 3);

        let (training, test) = split_gold(gold.clone(), 0.5);
        assert_eq!(training.len(), 1);
        assert_eq!(training[0].id, "1.1");
        assert_eq!(test.len(), 2);

        assert_eq!(split_gold(gold, 2.0).0.len(), 3);
    }
}
