// SPDX-License-Identifier: Apache-2.0

use proptest::prelude::*;
use semlink_ingest::{DiagnosticLog, InstanceRegistry, Stage};
use semlink_model::{
    ClassId, GroupId, InstanceFragment, InstanceId, MergeField, Provenance, RolesetId,
    ALL_MERGE_FIELDS,
};

fn fragment(vn: Option<&str>, pb: Option<&str>, on: Option<&str>) -> InstanceFragment {
    let id = InstanceId::new("wsj_0001.mrg", 1, 2).expect("id");
    let mut f = InstanceFragment::new(id, "give", Provenance::PriorRelease);
    f.vn_class = vn.map(|v| ClassId::parse(v).expect("class"));
    f.pb_roleset = pb.map(|p| RolesetId::parse(p).expect("roleset"));
    f.on_group = on.map(|g| GroupId::parse(g).expect("group"));
    f
}

fn token() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[a-z0-9.]{1,6}")
}

proptest! {
    #[test]
    fn empty_incoming_fields_never_erase(
        vn in "[0-9]{1,2}\\.[0-9]", pb in "[a-z]{1,5}\\.0[1-9]", on in "[1-9]",
        vn2 in token(), pb2 in token(), on2 in token(),
    ) {
        let mut registry = InstanceRegistry::new();
        let mut log = DiagnosticLog::default();
        registry.upsert(fragment(Some(&vn), Some(&pb), Some(&on)), &ALL_MERGE_FIELDS, Stage::Ingest, &mut log);
        registry.upsert(
            fragment(vn2.as_deref(), pb2.as_deref(), on2.as_deref()),
            &ALL_MERGE_FIELDS,
            Stage::Ingest,
            &mut log,
        );
        let row = registry.iter().next().expect("row");
        let expect = |incoming: &Option<String>, original: &str| {
            incoming.clone().unwrap_or_else(|| original.to_string())
        };
        prop_assert_eq!(registry.len(), 1);
        prop_assert_eq!(row.field_token(MergeField::VnClass), Some(expect(&vn2, &vn)));
        prop_assert_eq!(row.field_token(MergeField::PbRoleset), Some(expect(&pb2, &pb)));
        prop_assert_eq!(row.field_token(MergeField::OnGroup), Some(expect(&on2, &on)));

        let conflicts = [(&vn2, &vn), (&pb2, &pb), (&on2, &on)]
            .iter()
            .filter(|(incoming, original)| incoming.as_deref().is_some_and(|v| v != original.as_str()))
            .count();
        prop_assert_eq!(log.count("registry.merge_conflict"), conflicts);
    }
}
