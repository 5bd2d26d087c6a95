use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OntoNotesSnapshot {
    pub groupings: Vec<GroupingSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GroupingSnapshot {
    pub lemma: String,
    pub n: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pb: Vec<String>,
    #[serde(default)]
    pub vn: Vec<String>,
    #[serde(default, rename = "fn")]
    pub fn_frames: Vec<String>,
}

/// One coarse sense of a lemma with its links into the other resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenseGrouping {
    pub lemma: String,
    pub n: String,
    pub group: Option<String>,
    pub name: Option<String>,
    pub pb_mappings: Vec<String>,
    pub vn_mappings: Vec<String>,
    pub fn_mappings: Vec<String>,
}

impl SenseGrouping {
    /// `lemma-v-n`, the key sense annotations are checked against.
    #[must_use]
    pub fn key(&self) -> String {
        grouping_key(&self.lemma, &self.n)
    }
}

#[must_use]
fn grouping_key(lemma: &str, group: &str) -> String {
    format!("{lemma}-v-{group}")
}

#[derive(Debug, Clone, Default)]
pub struct OntoNotesIndex {
    groupings: HashMap<String, SenseGrouping>,
}

impl OntoNotesIndex {
    #[must_use]
    pub fn from_snapshot(snapshot: &OntoNotesSnapshot) -> Self {
        let mut index = Self::default();
        for raw in &snapshot.groupings {
            index.insert(SenseGrouping {
                lemma: raw.lemma.clone(),
                n: raw.n.clone(),
                group: raw.group.clone(),
                name: raw.name.clone(),
                pb_mappings: raw.pb.clone(),
                vn_mappings: raw.vn.clone(),
                fn_mappings: raw.fn_frames.clone(),
            });
        }
        index
    }

    pub fn insert(&mut self, grouping: SenseGrouping) {
        self.groupings.insert(grouping.key(), grouping);
    }

    #[must_use]
    pub fn get(&self, lemma: &str, group: &str) -> Option<&SenseGrouping> {
        self.groupings.get(&grouping_key(lemma, group))
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.groupings.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groupings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groupings.is_empty()
    }
}
