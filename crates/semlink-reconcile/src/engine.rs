// SPDX-License-Identifier: Apache-2.0

use crate::validate::{check_fn, check_pb, check_vn};
use semlink_ingest::{
    event_fields, DiagnosticLog, InstanceRegistry, RecordKind, SourceBatch, Stage, UpsertOutcome,
};
use semlink_model::{
    ClassId, FrameResolution, Instance, OntoNotesOrphanPolicy, Provenance, VerbNetIngestPolicy,
};
use semlink_resources::ResourceContext;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnginePolicy {
    #[serde(default)]
    pub verbnet_ingest: VerbNetIngestPolicy,
    #[serde(default)]
    pub ontonotes_orphans: OntoNotesOrphanPolicy,
}

/// Tally of one sweep over the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PassReport {
    pub stage: Stage,
    pub examined: u64,
    pub changed: u64,
    pub outcomes: BTreeMap<String, u64>,
}

impl PassReport {
    fn new(stage: Stage) -> Self {
        Self {
            stage,
            examined: 0,
            changed: 0,
            outcomes: BTreeMap::new(),
        }
    }

    fn tally(&mut self, outcome: &str) {
        *self.outcomes.entry(outcome.to_string()).or_default() += 1;
    }

    #[must_use]
    pub fn outcome(&self, name: &str) -> u64 {
        self.outcomes.get(name).copied().unwrap_or(0)
    }
}

/// Applies the inference passes and bulk ingestion to a registry.
///
/// Resources are borrowed for the engine's lifetime and never mutated.
#[derive(Debug, Clone, Copy)]
pub struct ReconcileEngine<'a> {
    ctx: &'a ResourceContext,
    policy: EnginePolicy,
}

impl<'a> ReconcileEngine<'a> {
    #[must_use]
    pub const fn new(ctx: &'a ResourceContext, policy: EnginePolicy) -> Self {
        Self { ctx, policy }
    }

    #[must_use]
    pub const fn context(&self) -> &'a ResourceContext {
        self.ctx
    }

    /// Passes 1 to 3 in order.
    pub fn run_inference(
        &self,
        registry: &mut InstanceRegistry,
        log: &mut DiagnosticLog,
    ) -> Vec<PassReport> {
        vec![
            self.verbnet_from_propbank(registry, log),
            self.framenet_from_verbnet(registry, log),
            self.propagate_dependencies(registry, log),
        ]
    }

    /// Pass 1: fills an invalid or missing VerbNet class from the roleset.
    pub fn verbnet_from_propbank(
        &self,
        registry: &mut InstanceRegistry,
        log: &mut DiagnosticLog,
    ) -> PassReport {
        let stage = Stage::VerbnetFromPropbank;
        let mut report = PassReport::new(stage);
        for id in registry.sorted_ids() {
            let Some(instance) = registry.get_mut(&id) else {
                continue;
            };
            if self.current_class_valid(instance) {
                continue;
            }
            if !check_pb(instance.pb_roleset.as_ref(), &self.ctx.propbank) {
                continue;
            }
            report.examined += 1;
            match self.infer_class(instance) {
                ClassInference::Unique(class, source) => {
                    tracing::info!(instance = %id, verb = %instance.verb, vn_class = %class, source, "vn class inferred from roleset");
                    log.emit(
                        stage,
                        "pass1.assigned",
                        event_fields([
                            ("instance", id.to_string()),
                            ("vn_class", class.to_string()),
                            ("source", source.to_string()),
                        ]),
                    );
                    instance.vn_class = Some(class);
                    instance.provenance = Provenance::Inferred;
                    report.changed += 1;
                    report.tally(source);
                }
                ClassInference::NotUnique(candidates) => {
                    let outcome = if candidates.is_empty() { "no_candidate" } else { "ambiguous" };
                    let joined = candidates
                        .iter()
                        .map(ClassId::as_str)
                        .collect::<Vec<_>>()
                        .join(",");
                    tracing::info!(instance = %id, verb = %instance.verb, candidates = %joined, "no unique vn class for roleset");
                    log.emit(
                        stage,
                        format!("pass1.{outcome}"),
                        event_fields([("instance", id.to_string()), ("candidates", joined)]),
                    );
                    report.tally(outcome);
                }
            }
        }
        report
    }

    fn current_class_valid(&self, instance: &Instance) -> bool {
        instance.vn_class.as_ref().is_some_and(|class| {
            check_vn(class.as_str(), &instance.verb, &self.ctx.verbnet, true).is_some()
        })
    }

    fn infer_class(&self, instance: &Instance) -> ClassInference {
        let vn = &self.ctx.verbnet;
        let Some(roleset) = instance
            .pb_roleset
            .as_ref()
            .and_then(|r| self.ctx.propbank.get(r))
        else {
            return ClassInference::NotUnique(BTreeSet::new());
        };

        let mut pooled = BTreeSet::new();
        for declared in &roleset.vn_classes {
            if let Some(class) = check_vn(declared.as_str(), &instance.verb, vn, true) {
                pooled.insert(class);
            }
        }
        if roleset.vn_classes.len() == 1 {
            if let Some(class) = pooled.first().cloned() {
                return ClassInference::Unique(class, "roleset");
            }
        }

        for curated in self.ctx.curated_pb_vn.classes_for_roleset(&roleset.id) {
            if let Some(class) = check_vn(curated.as_str(), &instance.verb, vn, true) {
                pooled.insert(class);
            }
        }
        if pooled.len() == 1 {
            if let Some(class) = pooled.pop_first() {
                return ClassInference::Unique(class, "pooled");
            }
        }
        ClassInference::NotUnique(pooled)
    }

    /// Pass 2: resolves the FrameNet frame from the class/member table.
    ///
    /// `NF` and `IN` are never revisited. A resolved but invalid frame is
    /// only replaced by a unique candidate.
    pub fn framenet_from_verbnet(
        &self,
        registry: &mut InstanceRegistry,
        log: &mut DiagnosticLog,
    ) -> PassReport {
        let stage = Stage::FramenetFromVerbnet;
        let mut report = PassReport::new(stage);
        for id in registry.sorted_ids() {
            let Some(instance) = registry.get_mut(&id) else {
                continue;
            };
            if instance.fn_frame.is_sentinel()
                || check_fn(&instance.verb, &instance.fn_frame, &self.ctx.framenet)
            {
                continue;
            }
            let Some(class) = instance
                .vn_class
                .as_ref()
                .and_then(|c| check_vn(c.as_str(), &instance.verb, &self.ctx.verbnet, false))
            else {
                continue;
            };
            report.examined += 1;

            let candidates = self.ctx.vn_fn_frames.candidates(&class, &instance.verb);
            let next = match candidates {
                [frame] => FrameResolution::Resolved(frame.clone()),
                [] => FrameResolution::NoMapping,
                _ => FrameResolution::Ambiguous,
            };
            if next.is_sentinel() && !instance.fn_frame.is_unresolved() {
                log.emit(
                    stage,
                    "pass2.kept_existing",
                    event_fields([
                        ("instance", id.to_string()),
                        ("fn_frame", instance.fn_frame.as_token().to_string()),
                        ("candidates", candidates.len().to_string()),
                    ]),
                );
                report.tally("kept_existing");
                continue;
            }
            if next == instance.fn_frame {
                report.tally("unchanged");
                continue;
            }

            let outcome = match &next {
                FrameResolution::Resolved(_) => "resolved",
                FrameResolution::NoMapping => "no_mapping",
                _ => "ambiguous",
            };
            tracing::info!(instance = %id, key = %format!("{class}-{}", instance.verb), fn_frame = next.as_token(), "fn frame from vn-fn table");
            log.emit(
                stage,
                format!("pass2.{outcome}"),
                event_fields([
                    ("instance", id.to_string()),
                    ("vn_class", class.to_string()),
                    ("fn_frame", next.as_token().to_string()),
                ]),
            );
            instance.fn_frame = next;
            instance.provenance = Provenance::Inferred;
            report.changed += 1;
            report.tally(outcome);
        }
        report
    }

    /// Pass 3: annotates dependency strings with VerbNet and FrameNet roles.
    pub fn propagate_dependencies(
        &self,
        registry: &mut InstanceRegistry,
        log: &mut DiagnosticLog,
    ) -> PassReport {
        let stage = Stage::Dependencies;
        let mut report = PassReport::new(stage);
        for id in registry.sorted_ids() {
            let Some(instance) = registry.get_mut(&id) else {
                continue;
            };
            let Some(deps) = instance.dependencies.as_ref().filter(|d| !d.is_empty()) else {
                continue;
            };
            report.examined += 1;

            let annotated: Vec<String> = deps
                .iter()
                .map(|dep| self.annotate_dependency(instance, dep))
                .collect();
            if Some(&annotated) != instance.dependencies.as_ref() {
                let vn_roles = annotated.iter().filter(|d| d.contains(';')).count();
                log.emit(
                    stage,
                    "pass3.annotated",
                    event_fields([
                        ("instance", id.to_string()),
                        ("annotated", vn_roles.to_string()),
                    ]),
                );
                instance.dependencies = Some(annotated);
                report.changed += 1;
            }
        }
        report
    }

    fn annotate_dependency(&self, instance: &Instance, raw: &str) -> String {
        let mut dep = base_dependency(raw).to_string();

        if let Some(roleset) = instance
            .pb_roleset
            .as_ref()
            .and_then(|r| self.ctx.propbank.get(r))
        {
            for (arg, by_class) in &roleset.role_mappings {
                if !dep.contains(arg.as_str()) {
                    continue;
                }
                let valid: BTreeMap<ClassId, &str> = by_class
                    .iter()
                    .filter_map(|(class, role)| {
                        check_vn(class.as_str(), &instance.verb, &self.ctx.verbnet, true)
                            .map(|c| (c, role.as_str()))
                    })
                    .collect();
                if let Some(role) = instance.vn_class.as_ref().and_then(|c| valid.get(c)) {
                    dep.push(';');
                    dep.push_str(&capitalize(role));
                }
            }
        }

        if let (Some(class), Some(frame)) = (&instance.vn_class, instance.fn_frame.frame()) {
            if let Some(roles) = self.ctx.vn_fn_roles.roles_for(class, frame) {
                let last = dep.rsplit(';').next().unwrap_or_default().to_lowercase();
                if let Some(fn_role) = roles.get(&last) {
                    dep.push(';');
                    dep.push_str(fn_role);
                }
            }
        }
        dep
    }

    /// Pass 4: merges one annotation batch into the registry.
    pub fn ingest(
        &self,
        registry: &mut InstanceRegistry,
        batch: SourceBatch,
        log: &mut DiagnosticLog,
    ) -> PassReport {
        let stage = Stage::Ingest;
        let mut report = PassReport::new(stage);
        let kind = batch.kind;
        for id in batch.rejected {
            log.emit(
                stage,
                "ingest.rejected",
                event_fields([("instance", id.to_string()), ("source", kind.as_str().to_string())]),
            );
            report.tally("rejected");
        }

        for mut fragment in batch.fragments {
            report.examined += 1;
            match kind {
                RecordKind::VerbNet => {
                    let Some(raw) = fragment.vn_class.take() else {
                        if registry.contains(&fragment.id) {
                            report.tally("no_class");
                            continue;
                        }
                        registry.upsert(fragment, kind.merge_fields(), stage, log);
                        report.changed += 1;
                        report.tally("inserted");
                        continue;
                    };
                    let repair = self.policy.verbnet_ingest.allows_repair();
                    let Some(class) =
                        check_vn(raw.as_str(), &fragment.verb, &self.ctx.verbnet, repair)
                    else {
                        tracing::info!(instance = %fragment.id, verb = %fragment.verb, vn_class = %raw, "vn annotation class is invalid");
                        log.emit(
                            stage,
                            "ingest.vn_invalid",
                            event_fields([
                                ("instance", fragment.id.to_string()),
                                ("verb", fragment.verb.clone()),
                                ("vn_class", raw.to_string()),
                            ]),
                        );
                        report.tally("invalid");
                        continue;
                    };
                    fragment.vn_class = Some(class);
                }
                RecordKind::OntoNotes => {
                    if !registry.contains(&fragment.id)
                        && self.policy.ontonotes_orphans == OntoNotesOrphanPolicy::Skip
                    {
                        log.emit(
                            stage,
                            "ingest.on_orphan",
                            event_fields([
                                ("instance", fragment.id.to_string()),
                                ("verb", fragment.verb.clone()),
                            ]),
                        );
                        report.tally("orphan_skipped");
                        continue;
                    }
                }
                RecordKind::PropBank | RecordKind::Unified => {}
            }

            match registry.upsert(fragment, kind.merge_fields(), stage, log) {
                UpsertOutcome::Inserted => {
                    report.changed += 1;
                    report.tally("inserted");
                }
                UpsertOutcome::Merged { overwritten, .. } => {
                    report.changed += 1;
                    report.tally(if overwritten.is_empty() { "filled" } else { "overwritten" });
                }
                UpsertOutcome::Unchanged => report.tally("unchanged"),
            }
        }
        tracing::info!(source = kind.as_str(), examined = report.examined, changed = report.changed, "annotation batch merged");
        report
    }
}

enum ClassInference {
    Unique(ClassId, &'static str),
    NotUnique(BTreeSet<ClassId>),
}

/// Dependency text before any earlier role annotation (`=` or `;`).
fn base_dependency(raw: &str) -> &str {
    let raw = raw.split('=').next().unwrap_or(raw);
    raw.split(';').next().unwrap_or(raw)
}

fn capitalize(role: &str) -> String {
    let mut chars = role.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
