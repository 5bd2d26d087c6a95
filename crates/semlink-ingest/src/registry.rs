// SPDX-License-Identifier: Apache-2.0

use crate::logging::{event_fields, DiagnosticLog, Stage};
use semlink_model::{Instance, InstanceFragment, InstanceId, MergeField};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Merged {
        filled: Vec<MergeField>,
        overwritten: Vec<MergeField>,
    },
    Unchanged,
}

/// Every known instance, one row per id.
#[derive(Debug, Clone, Default)]
pub struct InstanceRegistry {
    instances: HashMap<InstanceId, Instance>,
}

impl InstanceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &InstanceId) -> bool {
        self.instances.contains_key(id)
    }

    #[must_use]
    pub fn get(&self, id: &InstanceId) -> Option<&Instance> {
        self.instances.get(id)
    }

    pub fn get_mut(&mut self, id: &InstanceId) -> Option<&mut Instance> {
        self.instances.get_mut(id)
    }

    /// Unordered iteration; use [`Self::sorted_ids`] for output.
    pub fn iter(&self) -> impl Iterator<Item = &Instance> {
        self.instances.values()
    }

    #[must_use]
    pub fn sorted_ids(&self) -> Vec<InstanceId> {
        let mut ids: Vec<InstanceId> = self.instances.keys().cloned().collect();
        ids.sort();
        ids
    }

    #[must_use]
    pub fn sorted(&self) -> Vec<&Instance> {
        let mut rows: Vec<&Instance> = self.instances.values().collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        rows
    }

    /// Inserts `fragment` when its id is new, otherwise merges `fields`.
    ///
    /// Empty incoming values never clear a populated field. A populated
    /// incoming value that differs from the current one wins and is logged.
    /// `NF`/`IN` only ever replace an unresolved frame; once set they stay,
    /// and they never replace a resolved frame either.
    pub fn upsert(
        &mut self,
        fragment: InstanceFragment,
        fields: &[MergeField],
        stage: Stage,
        log: &mut DiagnosticLog,
    ) -> UpsertOutcome {
        let Some(current) = self.instances.get_mut(&fragment.id) else {
            self.instances
                .insert(fragment.id.clone(), Instance::from(fragment));
            return UpsertOutcome::Inserted;
        };

        let mut filled = Vec::new();
        let mut overwritten = Vec::new();
        for &field in fields {
            let Some(incoming) = fragment.field_token(field) else {
                continue;
            };
            match current.field_token(field) {
                None => {
                    current.take_field(field, &fragment);
                    filled.push(field);
                }
                Some(existing) if existing == incoming => {}
                Some(existing) => {
                    if field == MergeField::FnFrame
                        && (current.fn_frame.is_sentinel() || fragment.fn_frame.is_sentinel())
                    {
                        log.emit(
                            stage,
                            "registry.sentinel_ignored",
                            event_fields([
                                ("instance", current.id.to_string()),
                                ("current", existing),
                                ("incoming", incoming),
                            ]),
                        );
                        continue;
                    }
                    tracing::info!(
                        instance = %current.id,
                        field = field.as_str(),
                        previous = %existing,
                        incoming = %incoming,
                        source = fragment.provenance.as_str(),
                        "merge conflict; keeping incoming value"
                    );
                    log.emit(
                        stage,
                        "registry.merge_conflict",
                        event_fields([
                            ("instance", current.id.to_string()),
                            ("field", field.as_str().to_string()),
                            ("previous", existing),
                            ("incoming", incoming),
                            ("source", fragment.provenance.as_str().to_string()),
                        ]),
                    );
                    current.take_field(field, &fragment);
                    overwritten.push(field);
                }
            }
        }

        if filled.is_empty() && overwritten.is_empty() {
            UpsertOutcome::Unchanged
        } else {
            current.provenance = fragment.provenance;
            UpsertOutcome::Merged {
                filled,
                overwritten,
            }
        }
    }
}
