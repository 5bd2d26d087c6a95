use crate::validate::check_vn;
use semlink_model::{ClassId, RolesetId};
use semlink_resources::ResourceContext;
use std::collections::BTreeMap;

/// Roleset -> validated VerbNet class -> `ARGn` -> thematic role.
pub type RolesetClassRoles = BTreeMap<RolesetId, BTreeMap<ClassId, BTreeMap<String, String>>>;

/// Validated PropBank/VerbNet role table.
///
/// Rolesets without declared classes fall back to the curated map. Every
/// class is repaired against the roleset lemma; classes that fail are
/// dropped. Rolesets of one lemma that land on the same class share their
/// argument roles, later rolesets (in id order) winning on conflict.
/// Rolesets left without any class are omitted.
#[must_use]
pub fn derive_roleset_class_roles(ctx: &ResourceContext) -> RolesetClassRoles {
    let mut out = RolesetClassRoles::new();
    for roleset in ctx.propbank.sorted() {
        let lemma = roleset.id.lemma();
        let declared: Vec<&ClassId> = if roleset.vn_classes.is_empty() {
            ctx.curated_pb_vn.classes_for_roleset(&roleset.id)
        } else {
            roleset.vn_classes.iter().collect()
        };

        let mut classes: BTreeMap<ClassId, BTreeMap<String, String>> = BTreeMap::new();
        for class in declared {
            match check_vn(class.as_str(), lemma, &ctx.verbnet, true) {
                Some(valid) => {
                    if &valid != class {
                        tracing::debug!(roleset = %roleset.id, from = %class, to = %valid, "roleset class corrected");
                    }
                    classes.entry(valid).or_default();
                }
                None => tracing::debug!(roleset = %roleset.id, class = %class, "roleset class not found"),
            }
        }
        for (arg, by_class) in &roleset.role_mappings {
            for (class, roles) in &mut classes {
                if let Some(role) = by_class.get(class) {
                    roles.insert(arg.clone(), role.clone());
                }
            }
        }
        if !classes.is_empty() {
            out.insert(roleset.id.clone(), classes);
        }
    }

    let mut shared: BTreeMap<(String, ClassId), BTreeMap<String, String>> = BTreeMap::new();
    for (roleset, classes) in &out {
        for (class, roles) in classes {
            shared
                .entry((roleset.lemma().to_string(), class.clone()))
                .or_default()
                .extend(roles.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }
    for (roleset, classes) in &mut out {
        for (class, roles) in classes.iter_mut() {
            if let Some(merged) = shared.get(&(roleset.lemma().to_string(), class.clone())) {
                roles.clone_from(merged);
            }
        }
    }
    out
}
