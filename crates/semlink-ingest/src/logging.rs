// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Load,
    Bootstrap,
    VerbnetFromPropbank,
    FramenetFromVerbnet,
    Dependencies,
    Ingest,
    Report,
}

impl Stage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Bootstrap => "bootstrap",
            Self::VerbnetFromPropbank => "verbnet_from_propbank",
            Self::FramenetFromVerbnet => "framenet_from_verbnet",
            Self::Dependencies => "dependencies",
            Self::Ingest => "ingest",
            Self::Report => "report",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconcileEvent {
    pub stage: Stage,
    pub name: String,
    pub fields: BTreeMap<String, String>,
}

/// Ordered record of every non-fatal diagnostic a run produced.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticLog {
    events: Vec<ReconcileEvent>,
}

impl DiagnosticLog {
    /// Records the event and mirrors it to `tracing` at debug level.
    pub fn emit(&mut self, stage: Stage, name: impl Into<String>, fields: BTreeMap<String, String>) {
        let name = name.into();
        tracing::debug!(stage = stage.as_str(), event = %name, fields = ?fields, "diagnostic");
        self.events.push(ReconcileEvent {
            stage,
            name,
            fields,
        });
    }

    #[must_use]
    pub fn events(&self) -> &[ReconcileEvent] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events called `name`.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.events.iter().filter(|e| e.name == name).count()
    }
}

/// Builds an event field map from `(key, value)` pairs.
#[must_use]
pub fn event_fields<const N: usize>(pairs: [(&str, String); N]) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
