use super::{Alignment, Edit, EditKind};
use crate::word::WordRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serialized edit: its type and the word ids on each side.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonEdit {
    #[serde(rename = "type")]
    pub edit_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target: Vec<String>,
}

fn ids(words: &[WordRef]) -> Vec<String> {
    words.iter().map(|word| word.id.to_string()).collect()
}

fn without(index: usize, items: &[String]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != index)
        .map(|(_, item)| item.clone())
        .collect()
}

impl JsonEdit {
    /// Views of this edit from each of its words. A word's view keeps the edit type, lists the
    /// other words of its own side as `source` and the words of the opposite side as `target`.
    /// Returns the views keyed by source-word id and by target-word id.
    pub fn explode(&self) -> (BTreeMap<String, JsonEdit>, BTreeMap<String, JsonEdit>) {
        let view = |index: usize, own: &[String], other: &[String]| JsonEdit {
            edit_type: self.edit_type.clone(),
            source: without(index, own),
            target: other.to_vec(),
        };
        let by_source = self
            .source
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), view(i, &self.source, &self.target)))
            .collect();
        let by_target = self
            .target
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), view(i, &self.target, &self.source)))
            .collect();
        (by_source, by_target)
    }
}

impl Edit {
    pub fn to_json_edit(&self) -> JsonEdit {
        let edit_type = match self.kind() {
            EditKind::Ins(_) => "ins",
            EditKind::Del(_) => "del",
            EditKind::Eq { .. } => "eq",
            EditKind::Sub { .. } => "sub",
        };
        let (from, to) = self.words();
        JsonEdit {
            edit_type: edit_type.to_owned(),
            source: ids(from),
            target: ids(to),
        }
    }
}

impl Alignment {
    pub fn to_json(&self) -> Vec<JsonEdit> {
        self.edits().map(|edit| edit.to_json_edit()).collect()
    }

    /// Per-word views of every edit (see [`JsonEdit::explode`]), keyed by source-word id and by
    /// target-word id. When a word appears in several edits the earliest edit wins.
    pub fn to_json_edits(&self) -> (BTreeMap<String, JsonEdit>, BTreeMap<String, JsonEdit>) {
        let mut by_source = BTreeMap::new();
        let mut by_target = BTreeMap::new();
        for edit in self.edits() {
            let (source_views, target_views) = edit.to_json_edit().explode();
            for (id, view) in source_views {
                by_source.entry(id).or_insert(view);
            }
            for (id, view) in target_views {
                by_target.entry(id).or_insert(view);
            }
        }
        (by_source, by_target)
    }
}

/// Alignment holding the edits of both `a` and `b`.
pub fn merge_alignments(a: &Alignment, b: &Alignment) -> Alignment {
    let mut merged = a.clone();
    for edit in b.edits() {
        merged.add(edit.clone());
    }
    merged
}
