// SPDX-License-Identifier: Apache-2.0

use crate::loader::load_json;
use crate::ResourceError;
use semlink_model::{normalize_class_label, ClassId, FrameName, RolesetId};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Hand-curated VerbNet -> PropBank links, keyed by normalized class.
///
/// Source keys look like `give-13.1-1`; the member prefix is dropped.
#[derive(Debug, Clone, Default)]
pub struct CuratedPbVnMap {
    rolesets_by_class: BTreeMap<ClassId, Vec<RolesetId>>,
}

impl CuratedPbVnMap {
    pub fn from_raw(raw: &BTreeMap<String, Vec<String>>) -> Result<Self, ResourceError> {
        let mut map = Self::default();
        for (raw_class, rolesets) in raw {
            let Some(class) = normalize_class_label(raw_class) else {
                tracing::debug!(class = %raw_class, "curated map key has no numerical class");
                continue;
            };
            for raw_roleset in rolesets {
                let roleset = RolesetId::parse(raw_roleset).map_err(|e| {
                    ResourceError(format!("curated map entry {raw_class}: {e}"))
                })?;
                map.insert(class.clone(), roleset);
            }
        }
        Ok(map)
    }

    pub fn insert(&mut self, class: ClassId, roleset: RolesetId) {
        let rolesets = self.rolesets_by_class.entry(class).or_default();
        if !rolesets.contains(&roleset) {
            rolesets.push(roleset);
        }
    }

    /// Every class whose roleset list names `roleset`, in class order.
    #[must_use]
    pub fn classes_for_roleset(&self, roleset: &RolesetId) -> Vec<&ClassId> {
        self.rolesets_by_class
            .iter()
            .filter(|(_, rolesets)| rolesets.contains(roleset))
            .map(|(class, _)| class)
            .collect()
    }

    #[must_use]
    pub fn rolesets_for_class(&self, class: &ClassId) -> &[RolesetId] {
        self.rolesets_by_class
            .get(class)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rolesets_by_class.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rolesets_by_class.is_empty()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawFrameMap {
    Keyed(BTreeMap<String, Vec<String>>),
    Rows(Vec<FrameMapRow>),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FrameMapRow {
    class: String,
    vnmember: String,
    fnframe: String,
}

/// VerbNet class + member -> candidate FrameNet frames (`13.1-give`).
#[derive(Debug, Clone, Default)]
pub struct VnFnFrameMap {
    frames: BTreeMap<ClassId, BTreeMap<String, Vec<FrameName>>>,
}

impl VnFnFrameMap {
    pub(crate) fn from_raw(raw: RawFrameMap) -> Result<Self, ResourceError> {
        let mut map = Self::default();
        match raw {
            RawFrameMap::Keyed(keyed) => {
                for (key, frames) in keyed {
                    let Some((class, member)) = split_frame_key(&key) else {
                        tracing::debug!(key = %key, "vn-fn key has no class/member split");
                        continue;
                    };
                    map.insert_empty(&class, member);
                    for frame in frames {
                        let frame = FrameName::parse(&frame)
                            .map_err(|e| ResourceError(format!("vn-fn entry {key}: {e}")))?;
                        map.insert(&class, member, frame);
                    }
                }
            }
            RawFrameMap::Rows(rows) => {
                for row in rows {
                    let Some(class) = normalize_class_label(&row.class) else {
                        continue;
                    };
                    let frame = FrameName::parse(&row.fnframe)
                        .map_err(|e| ResourceError(format!("vn-fn row {}: {e}", row.class)))?;
                    map.insert(&class, &row.vnmember, frame);
                }
            }
        }
        Ok(map)
    }

    /// Reads a keyed or row-form JSON table.
    pub fn load(path: &Path) -> Result<Self, ResourceError> {
        Self::from_raw(load_json::<RawFrameMap>(path)?)
    }

    pub fn insert(&mut self, class: &ClassId, member: &str, frame: FrameName) {
        let slot = self.slot(class, member);
        if !slot.contains(&frame) {
            slot.push(frame);
        }
    }

    /// Declares `class`/`member` as known with no frame.
    pub fn insert_empty(&mut self, class: &ClassId, member: &str) {
        self.slot(class, member);
    }

    fn slot(&mut self, class: &ClassId, member: &str) -> &mut Vec<FrameName> {
        self.frames
            .entry(class.clone())
            .or_default()
            .entry(member.to_string())
            .or_default()
    }

    /// Candidate frames; an unknown key has no candidates.
    #[must_use]
    pub fn candidates(&self, class: &ClassId, member: &str) -> &[FrameName] {
        self.frames
            .get(class)
            .and_then(|members| members.get(member))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every `(class, member, frame)` link in class then member order.
    pub fn links(&self) -> impl Iterator<Item = (&ClassId, &str, &FrameName)> {
        self.frames.iter().flat_map(|(class, members)| {
            members.iter().flat_map(move |(member, frames)| {
                frames.iter().map(move |frame| (class, member.as_str(), frame))
            })
        })
    }

    /// Keyed JSON form, `{"13.1-give": ["Giving"]}`.
    #[must_use]
    pub fn to_keyed(&self) -> BTreeMap<String, Vec<String>> {
        let mut out = BTreeMap::new();
        for (class, members) in &self.frames {
            for (member, frames) in members {
                out.insert(
                    frame_key(class, member),
                    frames.iter().map(ToString::to_string).collect(),
                );
            }
        }
        out
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn frame_key(class: &ClassId, member: &str) -> String {
    format!("{class}-{member}")
}

/// `13.1-1-give` -> (`13.1-1`, `give`): the member starts at the first `-`
/// not followed by a digit.
fn split_frame_key(key: &str) -> Option<(ClassId, &str)> {
    let (split, _) = key.char_indices().find(|&(idx, c)| {
        c == '-' && !key[idx + 1..].starts_with(|d: char| d.is_ascii_digit())
    })?;
    let member = &key[split + 1..];
    if member.is_empty() {
        return None;
    }
    Some((normalize_class_label(&key[..split])?, member))
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawRoleMap {
    Keyed(BTreeMap<String, BTreeMap<String, String>>),
    Rows(Vec<RoleMapRow>),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RoleMapRow {
    class: String,
    fnframe: String,
    roles: Vec<RolePair>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RolePair {
    vnrole: String,
    fnrole: String,
}

/// `class;frame` -> VerbNet thematic role (lower-cased) -> frame element.
#[derive(Debug, Clone, Default)]
pub struct VnFnRoleMap {
    roles: HashMap<String, BTreeMap<String, String>>,
}

impl VnFnRoleMap {
    pub(crate) fn from_raw(raw: RawRoleMap) -> Self {
        let mut map = Self::default();
        match raw {
            RawRoleMap::Keyed(keyed) => {
                for (key, roles) in keyed {
                    let slot = map.roles.entry(key).or_default();
                    for (vn_role, fn_role) in roles {
                        slot.insert(vn_role.to_lowercase(), fn_role);
                    }
                }
            }
            RawRoleMap::Rows(rows) => {
                for row in rows {
                    let Some(class) = normalize_class_label(&row.class) else {
                        continue;
                    };
                    let slot = map
                        .roles
                        .entry(role_key(&class, &row.fnframe))
                        .or_default();
                    for pair in row.roles {
                        slot.insert(pair.vnrole.to_lowercase(), pair.fnrole);
                    }
                }
            }
        }
        map
    }

    pub fn insert(&mut self, class: &ClassId, frame: &FrameName, vn_role: &str, fn_role: &str) {
        self.roles
            .entry(role_key(class, frame.as_str()))
            .or_default()
            .insert(vn_role.to_lowercase(), fn_role.to_string());
    }

    #[must_use]
    pub fn roles_for(&self, class: &ClassId, frame: &FrameName) -> Option<&BTreeMap<String, String>> {
        self.roles.get(&role_key(class, frame.as_str()))
    }
}

fn role_key(class: &ClassId, frame: &str) -> String {
    format!("{class};{frame}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curated_keys_drop_member_prefix() {
        let raw = BTreeMap::from([
            ("give-13.1-1".to_string(), vec!["give.01".to_string()]),
            ("contribute-13.2".to_string(), vec!["give.01".to_string(), "donate.01".to_string()]),
        ]);
        let map = CuratedPbVnMap::from_raw(&raw).expect("curated map");
        let give = RolesetId::parse("give.01").expect("roleset");
        let classes: Vec<&str> = map.classes_for_roleset(&give).iter().map(|c| c.as_str()).collect();
        assert_eq!(classes, vec!["13.1-1", "13.2"]);
    }

    #[test]
    fn frame_rows_collapse_into_keyed_candidates() {
        let rows: RawFrameMap = serde_json::from_str(
            r#"[{"class":"give-13.1","vnmember":"give","fnframe":"Giving"},
                {"class":"give-13.1","vnmember":"give","fnframe":"Giving"},
                {"class":"give-13.1","vnmember":"give","fnframe":"Supply"}]"#,
        )
        .expect("rows");
        let map = VnFnFrameMap::from_raw(rows).expect("map");
        let class = ClassId::parse("13.1").expect("class");
        assert_eq!(map.candidates(&class, "give").len(), 2);
        assert!(map.candidates(&class, "hand").is_empty());
    }

    #[test]
    fn keyed_frames_split_class_from_member() {
        let keyed: RawFrameMap = serde_json::from_str(
            r#"{"13.1-1-sell": ["Commerce_sell"], "13.1-give": ["Giving"], "give": ["Giving"]}"#,
        )
        .expect("keyed");
        let map = VnFnFrameMap::from_raw(keyed).expect("map");
        assert_eq!(map.len(), 2);
        let sub = ClassId::parse("13.1-1").expect("class");
        assert_eq!(map.candidates(&sub, "sell").len(), 1);
        let links: Vec<String> = map
            .links()
            .map(|(class, member, frame)| format!("{class} {member} {frame}"))
            .collect();
        assert_eq!(links, vec!["13.1 give Giving", "13.1-1 sell Commerce_sell"]);
        assert_eq!(
            map.to_keyed().keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["13.1-1-sell", "13.1-give"]
        );
    }

    #[test]
    fn role_map_lowercases_verbnet_roles() {
        let keyed: RawRoleMap =
            serde_json::from_str(r#"{"13.1;Giving":{"Agent":"Donor","Recipient":"Recipient"}}"#)
                .expect("keyed");
        let map = VnFnRoleMap::from_raw(keyed);
        let class = ClassId::parse("13.1").expect("class");
        let frame = FrameName::parse("Giving").expect("frame");
        let roles = map.roles_for(&class, &frame).expect("roles");
        assert_eq!(roles.get("agent").map(String::as_str), Some("Donor"));
    }
}
