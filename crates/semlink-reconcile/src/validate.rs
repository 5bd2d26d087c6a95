// SPDX-License-Identifier: Apache-2.0

//! Consistency checks of instance fields against the loaded resources.

use semlink_model::{normalize_class_label, ClassId, FrameResolution, GroupId, Instance, RolesetId};
use semlink_resources::{FrameNetIndex, OntoNotesIndex, PropBankIndex, ResourceContext, VerbNetIndex};
use serde::{Deserialize, Serialize};

/// Validated class for `verb`, possibly corrected to another subclass.
///
/// Without repair only an exact class/member pair passes. With repair the
/// label is normalized, reduced to its root class, and the root plus its
/// subclasses are searched in stable pre-order for one listing `verb`.
#[must_use]
pub fn check_vn(class: &str, verb: &str, vn: &VerbNetIndex, allow_repair: bool) -> Option<ClassId> {
    if class.is_empty() {
        return None;
    }
    if let Some(node) = vn.get(class).filter(|node| node.members.contains(verb)) {
        return Some(node.id.clone());
    }
    if !allow_repair {
        return None;
    }
    let normalized = normalize_class_label(class)?;
    let root = normalized.root();
    if !vn.contains(root) {
        return None;
    }
    vn.walk_preorder(root)
        .into_iter()
        .find(|node| node.members.contains(verb))
        .map(|node| node.id.clone())
}

#[must_use]
pub fn check_pb(roleset: Option<&RolesetId>, pb: &PropBankIndex) -> bool {
    roleset.is_some_and(|r| pb.contains(r))
}

#[must_use]
pub fn check_on(verb: &str, group: Option<&GroupId>, on: &OntoNotesIndex) -> bool {
    group.is_some_and(|g| on.contains_key(&format!("{verb}-v-{g}")))
}

/// Only a resolved frame evoked by `verb` passes; sentinels never do.
#[must_use]
pub fn check_fn(verb: &str, frame: &FrameResolution, fn_index: &FrameNetIndex) -> bool {
    frame.frame().is_some_and(|f| fn_index.evokes(verb, f))
}

/// How an instance's roleset and class relate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PbVnLink {
    Unchecked,
    DeclaredByRoleset,
    CuratedMap,
    /// The curated map suggests this roleset of the same lemma instead.
    CorrectedRoleset(RolesetId),
    Mismatch,
}

impl PbVnLink {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unchecked => "unchecked",
            Self::DeclaredByRoleset => "declared_by_roleset",
            Self::CuratedMap => "curated_map",
            Self::CorrectedRoleset(_) => "corrected_roleset",
            Self::Mismatch => "mismatch",
        }
    }
}

#[must_use]
pub fn check_pb_vn(instance: &Instance, ctx: &ResourceContext) -> PbVnLink {
    let (Some(roleset_id), Some(class)) = (&instance.pb_roleset, &instance.vn_class) else {
        return PbVnLink::Unchecked;
    };
    if check_vn(class.as_str(), &instance.verb, &ctx.verbnet, false).is_none() {
        return PbVnLink::Unchecked;
    }
    let Some(roleset) = ctx.propbank.get(roleset_id) else {
        return PbVnLink::Unchecked;
    };
    if roleset.vn_classes.contains(class) {
        return PbVnLink::DeclaredByRoleset;
    }
    let curated = ctx.curated_pb_vn.rolesets_for_class(class);
    if curated.contains(roleset_id) {
        return PbVnLink::CuratedMap;
    }
    curated
        .iter()
        .find(|candidate| candidate.as_str().starts_with(instance.verb.as_str()))
        .map_or(PbVnLink::Mismatch, |candidate| {
            PbVnLink::CorrectedRoleset(candidate.clone())
        })
}
