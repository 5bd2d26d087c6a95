// SPDX-License-Identifier: Apache-2.0

use crate::validate::{check_fn, check_on, check_pb, check_pb_vn, check_vn};
use semlink_ingest::InstanceRegistry;
use semlink_model::{ClassId, FrameName, FrameResolution};
use semlink_resources::{ResourceContext, VnFnFrameMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldAudit {
    pub valid: u64,
    pub invalid: u64,
    pub absent: u64,
}

impl FieldAudit {
    fn record(&mut self, present: bool, valid: bool) {
        match (present, valid) {
            (false, _) => self.absent += 1,
            (true, true) => self.valid += 1,
            (true, false) => self.invalid += 1,
        }
    }
}

/// Field-level consistency of a registry against the current resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationReport {
    pub total: u64,
    pub vn: FieldAudit,
    /// Invalid VerbNet pairs that class/member correction would fix.
    pub vn_repairable: u64,
    pub pb: FieldAudit,
    #[serde(rename = "fn")]
    pub fn_frames: FieldAudit,
    pub fn_no_mapping: u64,
    pub fn_ambiguous: u64,
    pub on: FieldAudit,
    pub pb_vn: BTreeMap<String, u64>,
}

#[must_use]
pub fn audit(registry: &InstanceRegistry, ctx: &ResourceContext) -> ValidationReport {
    let mut report = ValidationReport::default();
    for row in registry.iter() {
        report.total += 1;

        let exact = row
            .vn_class
            .as_ref()
            .and_then(|c| check_vn(c.as_str(), &row.verb, &ctx.verbnet, false));
        report.vn.record(row.vn_class.is_some(), exact.is_some());
        if exact.is_none() {
            let repaired = row
                .vn_class
                .as_ref()
                .and_then(|c| check_vn(c.as_str(), &row.verb, &ctx.verbnet, true));
            report.vn_repairable += u64::from(repaired.is_some());
        }

        report.pb.record(
            row.pb_roleset.is_some(),
            check_pb(row.pb_roleset.as_ref(), &ctx.propbank),
        );
        report.on.record(
            row.on_group.is_some(),
            check_on(&row.verb, row.on_group.as_ref(), &ctx.ontonotes),
        );
        match &row.fn_frame {
            FrameResolution::NoMapping => report.fn_no_mapping += 1,
            FrameResolution::Ambiguous => report.fn_ambiguous += 1,
            frame => report.fn_frames.record(
                !frame.is_unresolved(),
                check_fn(&row.verb, frame, &ctx.framenet),
            ),
        }

        let link = check_pb_vn(row, ctx);
        *report.pb_vn.entry(link.as_str().to_string()).or_default() += 1;
    }
    report
}

/// Why a VerbNet -> FrameNet link does not hold against the resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VnFnIssue {
    ClassMissing,
    VerbNotInClass,
    FrameMissing,
    VerbNotInFrame,
}

impl VnFnIssue {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClassMissing => "class_missing",
            Self::VerbNotInClass => "verb_not_in_class",
            Self::FrameMissing => "frame_missing",
            Self::VerbNotInFrame => "verb_not_in_frame",
        }
    }
}

/// Checks the class side and the frame side of one link independently.
#[must_use]
pub fn check_vn_fn_link(
    class: &ClassId,
    member: &str,
    frame: &FrameName,
    ctx: &ResourceContext,
) -> Vec<VnFnIssue> {
    let mut issues = Vec::new();
    if !ctx.verbnet.contains(class.as_str()) {
        issues.push(VnFnIssue::ClassMissing);
    } else if !ctx.verbnet.is_direct_member(class.as_str(), member) {
        issues.push(VnFnIssue::VerbNotInClass);
    }
    if !ctx.framenet.has_frame(frame) {
        issues.push(VnFnIssue::FrameMissing);
    } else if !ctx.framenet.evokes(member, frame) {
        issues.push(VnFnIssue::VerbNotInFrame);
    }
    issues
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VnFnReport {
    pub links: u64,
    pub clean: u64,
    pub issues: BTreeMap<String, u64>,
}

/// Verifies every link of a VerbNet -> FrameNet table.
#[must_use]
pub fn audit_vn_fn(map: &VnFnFrameMap, ctx: &ResourceContext) -> VnFnReport {
    let mut report = VnFnReport::default();
    for (class, member, frame) in map.links() {
        report.links += 1;
        let issues = check_vn_fn_link(class, member, frame, ctx);
        if issues.is_empty() {
            report.clean += 1;
        }
        for issue in issues {
            tracing::debug!(vn_class = %class, member, fn_frame = %frame, issue = issue.as_str(), "vn-fn link fails");
            *report.issues.entry(issue.as_str().to_string()).or_default() += 1;
        }
    }
    report
}

/// Result of folding a corrected link table over an older one.
#[derive(Debug, Clone, Default)]
pub struct CombinedVnFn {
    pub map: VnFnFrameMap,
    pub kept_old: u64,
    pub dropped_old: u64,
    pub fixed: u64,
}

/// Old links survive only when they check out; every fixed link is taken.
#[must_use]
pub fn combine_vn_fn_maps(
    old: &VnFnFrameMap,
    fixed: &VnFnFrameMap,
    ctx: &ResourceContext,
) -> CombinedVnFn {
    let mut out = CombinedVnFn::default();
    for (class, member, frame) in old.links() {
        if check_vn_fn_link(class, member, frame, ctx).is_empty() {
            out.map.insert(class, member, frame.clone());
            out.kept_old += 1;
        } else {
            out.dropped_old += 1;
        }
    }
    for (class, member, frame) in fixed.links() {
        out.map.insert(class, member, frame.clone());
        out.fixed += 1;
    }
    tracing::info!(
        kept_old = out.kept_old,
        dropped_old = out.dropped_old,
        fixed = out.fixed,
        "vn-fn tables combined"
    );
    out
}
