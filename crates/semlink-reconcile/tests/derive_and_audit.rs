// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::path::PathBuf;

use semlink_ingest::{load_release, DiagnosticLog};
use semlink_model::{ClassId, RolesetId};
use semlink_reconcile::{audit, check_pb_vn, derive_roleset_class_roles, PbVnLink};
use semlink_resources::{PropBankIndex, ResourceContext, Roleset, VerbNetIndex, VerbNetSnapshot};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(path)
}

fn cid(raw: &str) -> ClassId {
    ClassId::parse(raw).expect("class")
}

fn rid(raw: &str) -> RolesetId {
    RolesetId::parse(raw).expect("roleset")
}

fn context() -> ResourceContext {
    let snapshot: VerbNetSnapshot = serde_json::from_str(
        r#"{"classes": [
            {"id": "give-13.1", "members": ["give"], "subclasses": [
                {"id": "give-13.1-1", "members": ["sell"]}
            ]},
            {"id": "put-9.1", "members": ["put"], "subclasses": [
                {"id": "put-9.1-2", "members": ["place"]}
            ]}
        ]}"#,
    )
    .expect("snapshot");
    let verbnet = VerbNetIndex::from_snapshot(&snapshot).expect("verbnet");

    let roles = |pairs: &[(&str, &str, &str)]| {
        let mut out: BTreeMap<String, BTreeMap<ClassId, String>> = BTreeMap::new();
        for (arg, class, role) in pairs {
            out.entry((*arg).to_string())
                .or_default()
                .insert(cid(class), (*role).to_string());
        }
        out
    };
    let mut propbank = PropBankIndex::default();
    propbank.insert(Roleset {
        id: rid("give.01"),
        vn_classes: vec![cid("13.1")],
        role_mappings: roles(&[("ARG0", "13.1", "agent")]),
    });
    propbank.insert(Roleset {
        id: rid("give.02"),
        vn_classes: vec![cid("13.1")],
        role_mappings: roles(&[("ARG1", "13.1", "theme")]),
    });
    propbank.insert(Roleset {
        id: rid("give.04"),
        vn_classes: vec![],
        role_mappings: BTreeMap::new(),
    });
    propbank.insert(Roleset {
        id: rid("sell.01"),
        vn_classes: vec![],
        role_mappings: roles(&[("ARG0", "13.1-1", "agent")]),
    });
    propbank.insert(Roleset {
        id: rid("place.01"),
        vn_classes: vec![cid("9.1")],
        role_mappings: roles(&[("ARG0", "9.1", "agent")]),
    });
    propbank.insert(Roleset {
        id: rid("put.02"),
        vn_classes: vec![cid("26.1")],
        role_mappings: BTreeMap::new(),
    });

    let mut ctx = ResourceContext {
        verbnet,
        propbank,
        ..ResourceContext::default()
    };
    ctx.curated_pb_vn.insert(cid("13.1-1"), rid("sell.01"));
    ctx.curated_pb_vn.insert(cid("9.1-2"), rid("place.01"));
    ctx.curated_pb_vn.insert(cid("13.1"), rid("give.03"));
    ctx
}

#[test]
fn derived_table_shares_roles_between_sibling_rolesets() {
    let table = derive_roleset_class_roles(&context());

    let give01 = &table[&rid("give.01")][&cid("13.1")];
    let give02 = &table[&rid("give.02")][&cid("13.1")];
    assert_eq!(give01, give02);
    assert_eq!(give01.get("ARG0").map(String::as_str), Some("agent"));
    assert_eq!(give01.get("ARG1").map(String::as_str), Some("theme"));

    let sell = &table[&rid("sell.01")];
    assert_eq!(sell.keys().map(ClassId::as_str).collect::<Vec<_>>(), vec!["13.1-1"]);

    let place = &table[&rid("place.01")];
    assert_eq!(place.keys().map(ClassId::as_str).collect::<Vec<_>>(), vec!["9.1-2"]);
    assert!(place[&cid("9.1-2")].is_empty());

    assert!(!table.contains_key(&rid("put.02")));
    assert!(!table.contains_key(&rid("give.04")));
}

#[test]
fn pb_vn_links_are_classified() {
    let ctx = context();
    let mut log = DiagnosticLog::default();
    let registry = load_release(&fixture("tests/fixtures/audit_release.txt"), &mut log).expect("release");
    let link = |file_tok: u64| {
        let row = registry
            .iter()
            .find(|r| r.id.token() == file_tok)
            .expect("row");
        check_pb_vn(row, &ctx)
    };
    assert_eq!(link(1), PbVnLink::DeclaredByRoleset);
    assert_eq!(link(2), PbVnLink::CuratedMap);
    assert_eq!(link(3), PbVnLink::CorrectedRoleset(rid("give.03")));
    assert_eq!(link(4), PbVnLink::Unchecked);
}

#[test]
fn audit_counts_each_field() {
    let ctx = context();
    let mut log = DiagnosticLog::default();
    let registry = load_release(&fixture("tests/fixtures/audit_release.txt"), &mut log).expect("release");
    let report = audit(&registry, &ctx);
    assert_eq!(report.total, 4);
    assert_eq!(report.vn.valid, 3);
    assert_eq!(report.vn.invalid, 1);
    assert_eq!(report.vn_repairable, 1);
    assert_eq!(report.pb.valid, 3);
    assert_eq!(report.pb.invalid, 1);
    assert_eq!(report.fn_no_mapping, 1);
    assert_eq!(report.fn_ambiguous, 1);
    assert_eq!(report.fn_frames.absent, 1);
    assert_eq!(report.fn_frames.invalid, 1);
    assert_eq!(report.on.absent, 4);
    assert_eq!(report.pb_vn.get("declared_by_roleset"), Some(&1));
}
