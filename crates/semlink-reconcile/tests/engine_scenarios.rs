// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use semlink_ingest::{DiagnosticLog, InstanceRegistry, RecordKind, SourceBatch, Stage};
use semlink_model::{
    ClassId, FrameName, FrameResolution, GroupId, InstanceFragment, InstanceId,
    OntoNotesOrphanPolicy, Provenance, RolesetId, VerbNetIngestPolicy, ALL_MERGE_FIELDS,
};
use semlink_reconcile::{check_vn, EnginePolicy, ReconcileEngine};
use semlink_resources::{
    ClassSnapshot, FrameNetIndex, PropBankIndex, ResourceContext, Roleset, VerbNetIndex,
    VerbNetSnapshot,
};

fn class(id: &str, members: &[&str], subclasses: Vec<ClassSnapshot>) -> ClassSnapshot {
    ClassSnapshot {
        id: id.to_string(),
        members: members.iter().map(|m| (*m).to_string()).collect(),
        subclasses,
    }
}

fn cid(raw: &str) -> ClassId {
    ClassId::parse(raw).expect("class")
}

fn rid(raw: &str) -> RolesetId {
    RolesetId::parse(raw).expect("roleset")
}

fn roleset(id: &str, classes: &[&str], roles: &[(&str, &str, &str)]) -> Roleset {
    let mut role_mappings: BTreeMap<String, BTreeMap<ClassId, String>> = BTreeMap::new();
    for (arg, class, role) in roles {
        role_mappings
            .entry((*arg).to_string())
            .or_default()
            .insert(cid(class), (*role).to_string());
    }
    Roleset {
        id: rid(id),
        vn_classes: classes.iter().map(|c| cid(c)).collect(),
        role_mappings,
    }
}

fn context() -> ResourceContext {
    let verbnet = VerbNetIndex::from_snapshot(&VerbNetSnapshot {
        classes: vec![
            class(
                "give-13.1",
                &["give", "lend"],
                vec![class("give-13.1-1", &["sell", "rent"], vec![])],
            ),
            class("contribute-13.2", &["give", "donate"], vec![]),
            class(
                "put-9.1",
                &["put"],
                vec![
                    class("put-9.1-1", &["set"], vec![]),
                    class("put-9.1-2", &["place", "position"], vec![]),
                ],
            ),
        ],
    })
    .expect("verbnet");

    let mut propbank = PropBankIndex::default();
    propbank.insert(roleset(
        "give.01",
        &["13.1"],
        &[("ARG0", "13.1", "agent"), ("ARG2", "13.1", "recipient")],
    ));
    propbank.insert(roleset("give.02", &["13.1", "13.2"], &[]));
    propbank.insert(roleset("sell.01", &[], &[]));
    propbank.insert(roleset("place.01", &["9.1-1"], &[]));
    propbank.insert(roleset("donate.01", &[], &[]));

    let mut framenet = FrameNetIndex::default();
    framenet.insert("give", FrameName::parse("Giving").expect("frame"));

    let mut ctx = ResourceContext {
        verbnet,
        propbank,
        framenet,
        ..ResourceContext::default()
    };
    ctx.curated_pb_vn.insert(cid("13.1-1"), rid("sell.01"));
    ctx.curated_pb_vn.insert(cid("13.1"), rid("donate.01"));
    ctx.curated_pb_vn.insert(cid("13.2"), rid("donate.01"));
    ctx.vn_fn_frames
        .insert(&cid("13.1"), "give", FrameName::parse("Giving").expect("frame"));
    ctx.vn_fn_frames.insert_empty(&cid("9.1-2"), "place");
    ctx.vn_fn_frames
        .insert(&cid("13.2"), "give", FrameName::parse("Giving").expect("frame"));
    ctx.vn_fn_frames
        .insert(&cid("13.2"), "give", FrameName::parse("Supply").expect("frame"));
    ctx.vn_fn_roles.insert(
        &cid("13.1"),
        &FrameName::parse("Giving").expect("frame"),
        "Agent",
        "Donor",
    );
    ctx
}

fn iid(file: &str, sent: u64, tok: u64) -> InstanceId {
    InstanceId::new(file, sent, tok).expect("id")
}

fn seed(registry: &mut InstanceRegistry, fragment: InstanceFragment) {
    let mut log = DiagnosticLog::default();
    registry.upsert(fragment, &ALL_MERGE_FIELDS, Stage::Bootstrap, &mut log);
}

fn fragment(id: InstanceId, verb: &str) -> InstanceFragment {
    InstanceFragment::new(id, verb, Provenance::PriorRelease)
}

fn vn_of(registry: &InstanceRegistry, id: &InstanceId) -> Option<String> {
    registry
        .get(id)
        .and_then(|r| r.vn_class.as_ref())
        .map(ToString::to_string)
}

#[test]
fn single_declared_class_is_assigned_from_the_roleset() {
    let ctx = context();
    let engine = ReconcileEngine::new(&ctx, EnginePolicy::default());
    let mut registry = InstanceRegistry::new();
    let id = iid("doc1", 3, 5);
    let mut f = fragment(id.clone(), "give");
    f.pb_roleset = Some(rid("give.01"));
    f.vn_class = Some(cid("99.9"));
    seed(&mut registry, f);

    let mut log = DiagnosticLog::default();
    let report = engine.verbnet_from_propbank(&mut registry, &mut log);
    assert_eq!(vn_of(&registry, &id).as_deref(), Some("13.1"));
    assert_eq!(report.changed, 1);
    assert_eq!(report.outcome("roleset"), 1);
    assert_eq!(log.count("pass1.assigned"), 1);
}

#[test]
fn curated_map_fills_rolesets_without_classes() {
    let ctx = context();
    let engine = ReconcileEngine::new(&ctx, EnginePolicy::default());
    let mut registry = InstanceRegistry::new();
    let id = iid("wsj_0004.mrg", 1, 1);
    let mut f = fragment(id.clone(), "sell");
    f.pb_roleset = Some(rid("sell.01"));
    seed(&mut registry, f);

    let mut log = DiagnosticLog::default();
    engine.verbnet_from_propbank(&mut registry, &mut log);
    assert_eq!(vn_of(&registry, &id).as_deref(), Some("13.1-1"));
}

#[test]
fn several_valid_candidates_leave_the_class_unset() {
    let ctx = context();
    let engine = ReconcileEngine::new(&ctx, EnginePolicy::default());
    let mut registry = InstanceRegistry::new();
    let declared = iid("wsj_0005.mrg", 1, 1);
    let mut f = fragment(declared.clone(), "give");
    f.pb_roleset = Some(rid("give.02"));
    seed(&mut registry, f);
    let curated = iid("wsj_0005.mrg", 1, 2);
    let mut f = fragment(curated.clone(), "give");
    f.pb_roleset = Some(rid("donate.01"));
    seed(&mut registry, f);

    let mut log = DiagnosticLog::default();
    let report = engine.verbnet_from_propbank(&mut registry, &mut log);
    assert_eq!(vn_of(&registry, &declared), None);
    assert_eq!(vn_of(&registry, &curated), None);
    assert_eq!(report.outcome("ambiguous"), 2);
    assert_eq!(log.count("pass1.ambiguous"), 2);
}

#[test]
fn verbnet_pass_is_idempotent() {
    let ctx = context();
    let engine = ReconcileEngine::new(&ctx, EnginePolicy::default());
    let mut registry = InstanceRegistry::new();
    for (tok, verb, roleset) in [(1, "give", "give.01"), (2, "give", "give.02"), (3, "sell", "sell.01")] {
        let mut f = fragment(iid("wsj_0006.mrg", 0, tok), verb);
        f.pb_roleset = Some(rid(roleset));
        seed(&mut registry, f);
    }
    let mut log = DiagnosticLog::default();
    engine.verbnet_from_propbank(&mut registry, &mut log);
    let first: Vec<Option<String>> = registry
        .sorted_ids()
        .iter()
        .map(|id| vn_of(&registry, id))
        .collect();
    let again = engine.verbnet_from_propbank(&mut registry, &mut log);
    let second: Vec<Option<String>> = registry
        .sorted_ids()
        .iter()
        .map(|id| vn_of(&registry, id))
        .collect();
    assert_eq!(first, second);
    assert_eq!(again.changed, 0);
}

#[test]
fn empty_and_multiple_frame_candidates_become_sentinels() {
    let ctx = context();
    let engine = ReconcileEngine::new(&ctx, EnginePolicy::default());
    let mut registry = InstanceRegistry::new();
    let none = iid("wsj_0007.mrg", 0, 1);
    let mut f = fragment(none.clone(), "place");
    f.vn_class = Some(cid("9.1-2"));
    seed(&mut registry, f);
    let many = iid("wsj_0007.mrg", 0, 2);
    let mut f = fragment(many.clone(), "give");
    f.vn_class = Some(cid("13.2"));
    seed(&mut registry, f);
    let one = iid("wsj_0007.mrg", 0, 3);
    let mut f = fragment(one.clone(), "give");
    f.vn_class = Some(cid("13.1"));
    seed(&mut registry, f);

    let mut log = DiagnosticLog::default();
    engine.framenet_from_verbnet(&mut registry, &mut log);
    let frame = |id: &InstanceId| registry.get(id).map(|r| r.fn_frame.clone());
    assert_eq!(frame(&none), Some(FrameResolution::NoMapping));
    assert_eq!(frame(&many), Some(FrameResolution::Ambiguous));
    assert_eq!(
        frame(&one).as_ref().map(FrameResolution::as_token),
        Some("Giving")
    );
}

#[test]
fn sentinels_survive_a_second_frame_pass() {
    let ctx = context();
    let engine = ReconcileEngine::new(&ctx, EnginePolicy::default());
    let mut registry = InstanceRegistry::new();
    let id = iid("wsj_0008.mrg", 0, 1);
    let mut f = fragment(id.clone(), "give");
    f.vn_class = Some(cid("13.1"));
    f.fn_frame = FrameResolution::NoMapping;
    seed(&mut registry, f);

    let mut log = DiagnosticLog::default();
    let report = engine.framenet_from_verbnet(&mut registry, &mut log);
    assert_eq!(report.examined, 0);
    assert_eq!(
        registry.get(&id).map(|r| r.fn_frame.clone()),
        Some(FrameResolution::NoMapping)
    );
}

#[test]
fn invalid_resolved_frame_is_kept_without_a_unique_candidate() {
    let ctx = context();
    let engine = ReconcileEngine::new(&ctx, EnginePolicy::default());
    let mut registry = InstanceRegistry::new();
    let id = iid("wsj_0009.mrg", 0, 1);
    let mut f = fragment(id.clone(), "place");
    f.vn_class = Some(cid("9.1-2"));
    f.fn_frame = FrameResolution::from_token("Placing");
    seed(&mut registry, f);

    let mut log = DiagnosticLog::default();
    let report = engine.framenet_from_verbnet(&mut registry, &mut log);
    assert_eq!(report.outcome("kept_existing"), 1);
    assert_eq!(
        registry.get(&id).map(|r| r.fn_frame.as_token().to_string()),
        Some("Placing".to_string())
    );
}

#[test]
fn class_member_correction_repairs_prefixed_labels() {
    let ctx = context();
    let repaired = check_vn("vncls-9.1-2", "place", &ctx.verbnet, true);
    assert_eq!(repaired.as_ref().map(ClassId::as_str), Some("9.1-2"));
    assert!(check_vn("vncls-9.1-2", "place", &ctx.verbnet, false).is_none());
}

#[test]
fn dependencies_gain_verbnet_then_framenet_roles() {
    let ctx = context();
    let engine = ReconcileEngine::new(&ctx, EnginePolicy::default());
    let mut registry = InstanceRegistry::new();
    let id = iid("wsj_0010.mrg", 2, 4);
    let mut f = fragment(id.clone(), "give");
    f.vn_class = Some(cid("13.1"));
    f.pb_roleset = Some(rid("give.01"));
    f.fn_frame = FrameResolution::from_token("Giving");
    f.dependencies = Some(vec![
        "0:1-ARG0=Agent".to_string(),
        "3:2-ARG2".to_string(),
        "2:0-rel".to_string(),
    ]);
    seed(&mut registry, f);

    let mut log = DiagnosticLog::default();
    engine.propagate_dependencies(&mut registry, &mut log);
    let deps = registry
        .get(&id)
        .and_then(|r| r.dependencies.clone())
        .expect("deps");
    assert_eq!(
        deps,
        vec![
            "0:1-ARG0;Agent;Donor".to_string(),
            "3:2-ARG2;Recipient".to_string(),
            "2:0-rel".to_string(),
        ]
    );

    let report = engine.propagate_dependencies(&mut registry, &mut log);
    assert_eq!(report.changed, 0);
}

#[test]
fn verbnet_ingest_repairs_drops_and_inserts() {
    let ctx = context();
    let engine = ReconcileEngine::new(&ctx, EnginePolicy::default());
    let mut registry = InstanceRegistry::new();
    let known = iid("wsj_0011.mrg", 0, 1);
    seed(&mut registry, fragment(known.clone(), "place"));

    let mut repaired = InstanceFragment::new(known.clone(), "place", Provenance::VerbNet);
    repaired.vn_class = Some(cid("9.1"));
    let mut bad = InstanceFragment::new(iid("wsj_0011.mrg", 0, 2), "place", Provenance::VerbNet);
    bad.vn_class = Some(cid("13.1"));
    let bare = InstanceFragment::new(iid("wsj_0011.mrg", 0, 3), "put", Provenance::VerbNet);
    let batch = SourceBatch {
        kind: RecordKind::VerbNet,
        fragments: vec![repaired, bad, bare],
        rejected: vec![],
        files: 1,
    };

    let mut log = DiagnosticLog::default();
    let report = engine.ingest(&mut registry, batch, &mut log);
    assert_eq!(vn_of(&registry, &known).as_deref(), Some("9.1-2"));
    assert!(!registry.contains(&iid("wsj_0011.mrg", 0, 2)));
    assert!(registry.contains(&iid("wsj_0011.mrg", 0, 3)));
    assert_eq!(report.outcome("invalid"), 1);
    assert_eq!(log.count("ingest.vn_invalid"), 1);
}

#[test]
fn exact_only_policy_rejects_correctable_classes() {
    let ctx = context();
    let policy = EnginePolicy {
        verbnet_ingest: VerbNetIngestPolicy::ExactOnly,
        ..EnginePolicy::default()
    };
    let engine = ReconcileEngine::new(&ctx, policy);
    let mut registry = InstanceRegistry::new();
    let mut f = InstanceFragment::new(iid("wsj_0012.mrg", 0, 1), "place", Provenance::VerbNet);
    f.vn_class = Some(cid("9.1"));
    let batch = SourceBatch {
        kind: RecordKind::VerbNet,
        fragments: vec![f],
        rejected: vec![],
        files: 1,
    };
    let mut log = DiagnosticLog::default();
    engine.ingest(&mut registry, batch, &mut log);
    assert!(registry.is_empty());
}

#[test]
fn propbank_ingest_only_merges_the_roleset_into_known_instances() {
    let ctx = context();
    let engine = ReconcileEngine::new(&ctx, EnginePolicy::default());
    let mut registry = InstanceRegistry::new();
    let id = iid("wsj_0013.mrg", 0, 1);
    let mut f = fragment(id.clone(), "give");
    f.dependencies = Some(vec!["0:1-ARG0".to_string()]);
    seed(&mut registry, f);

    let mut pb = InstanceFragment::new(id.clone(), "give", Provenance::PropBank);
    pb.pb_roleset = Some(rid("give.01"));
    pb.dependencies = Some(vec!["9:9-ARG1".to_string()]);
    let batch = SourceBatch {
        kind: RecordKind::PropBank,
        fragments: vec![pb],
        rejected: vec![],
        files: 1,
    };
    let mut log = DiagnosticLog::default();
    engine.ingest(&mut registry, batch, &mut log);
    let row = registry.get(&id).expect("row");
    assert_eq!(row.pb_roleset.as_ref().map(RolesetId::as_str), Some("give.01"));
    assert_eq!(row.dependencies, Some(vec!["0:1-ARG0".to_string()]));
}

#[test]
fn ontonotes_orphans_follow_the_policy() {
    let ctx = context();
    let orphan = || {
        let mut f = InstanceFragment::new(iid("wsj_0014.mrg", 0, 1), "give", Provenance::OntoNotes);
        f.on_group = Some(GroupId::parse("1").expect("group"));
        SourceBatch {
            kind: RecordKind::OntoNotes,
            fragments: vec![f],
            rejected: vec![iid("wsj_0014.mrg", 0, 9)],
            files: 1,
        }
    };

    let mut registry = InstanceRegistry::new();
    let mut log = DiagnosticLog::default();
    ReconcileEngine::new(&ctx, EnginePolicy::default()).ingest(&mut registry, orphan(), &mut log);
    assert_eq!(registry.len(), 1);
    assert_eq!(log.count("ingest.rejected"), 1);

    let skip = EnginePolicy {
        ontonotes_orphans: OntoNotesOrphanPolicy::Skip,
        ..EnginePolicy::default()
    };
    let mut registry = InstanceRegistry::new();
    let mut log = DiagnosticLog::default();
    ReconcileEngine::new(&ctx, skip).ingest(&mut registry, orphan(), &mut log);
    assert!(registry.is_empty());
    assert_eq!(log.count("ingest.on_orphan"), 1);
}
