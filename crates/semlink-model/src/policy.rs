use serde::{Deserialize, Serialize};

/// What to do with an OntoNotes sense record whose instance is not yet known.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum OntoNotesOrphanPolicy {
    #[default]
    Insert,
    Skip,
}

/// Whether VerbNet ingestion may correct a class/member pair before accepting it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum VerbNetIngestPolicy {
    #[default]
    Repair,
    ExactOnly,
}

impl VerbNetIngestPolicy {
    #[must_use]
    pub const fn allows_repair(self) -> bool {
        matches!(self, Self::Repair)
    }
}
