use semlink_model::FrameName;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FrameNetSnapshot {
    pub lexical_units: Vec<LexicalUnitSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LexicalUnitSnapshot {
    pub lemma: String,
    pub frame: String,
}

/// Frames evoked by each verb lemma.
#[derive(Debug, Clone, Default)]
pub struct FrameNetIndex {
    frames_by_lemma: HashMap<String, Vec<FrameName>>,
}

impl FrameNetIndex {
    #[must_use]
    pub fn from_snapshot(snapshot: &FrameNetSnapshot) -> Self {
        let mut index = Self::default();
        for lu in &snapshot.lexical_units {
            match FrameName::parse(&lu.frame) {
                Ok(frame) => index.insert(&lu.lemma, frame),
                Err(e) => tracing::debug!(lemma = %lu.lemma, "skipping lexical unit: {e}"),
            }
        }
        index
    }

    pub fn insert(&mut self, lemma: &str, frame: FrameName) {
        let frames = self.frames_by_lemma.entry(lemma.to_string()).or_default();
        if !frames.contains(&frame) {
            frames.push(frame);
        }
    }

    #[must_use]
    pub fn frames_by_lemma(&self, lemma: &str) -> &[FrameName] {
        self.frames_by_lemma
            .get(lemma)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn evokes(&self, lemma: &str, frame: &FrameName) -> bool {
        self.frames_by_lemma(lemma).contains(frame)
    }

    /// Whether any lexical unit evokes `frame`.
    #[must_use]
    pub fn has_frame(&self, frame: &FrameName) -> bool {
        self.frames_by_lemma.values().any(|frames| frames.contains(frame))
    }
}
