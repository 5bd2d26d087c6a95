use crate::ResourceError;
use semlink_model::{normalize_class_label, ClassId, RolesetId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PropBankSnapshot {
    pub rolesets: Vec<RolesetSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RolesetSnapshot {
    pub id: String,
    #[serde(default)]
    pub vn_classes: Vec<String>,
    /// Argument number (`0`, `ARG0`, ...) -> VerbNet class -> thematic role.
    #[serde(default)]
    pub roles: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roleset {
    pub id: RolesetId,
    pub vn_classes: Vec<ClassId>,
    /// `ARGn` -> VerbNet class -> lower-cased thematic role.
    pub role_mappings: BTreeMap<String, BTreeMap<ClassId, String>>,
}

impl Roleset {
    pub fn from_snapshot(snapshot: &RolesetSnapshot) -> Result<Self, ResourceError> {
        let id = RolesetId::parse(&snapshot.id)
            .map_err(|e| ResourceError(format!("invalid PropBank roleset id: {e}")))?;
        let mut vn_classes: Vec<ClassId> = Vec::new();
        for raw in &snapshot.vn_classes {
            match normalize_class_label(raw) {
                Some(class) if !vn_classes.contains(&class) => vn_classes.push(class),
                Some(_) => {}
                None => tracing::debug!(roleset = %id, class = %raw, "skipping non-numerical vn class"),
            }
        }
        let mut role_mappings = BTreeMap::new();
        for (arg, by_class) in &snapshot.roles {
            let label = if arg.starts_with("ARG") {
                arg.clone()
            } else {
                format!("ARG{arg}")
            };
            let entry: &mut BTreeMap<ClassId, String> = role_mappings.entry(label).or_default();
            for (raw_class, theta) in by_class {
                if let Some(class) = normalize_class_label(raw_class) {
                    entry.insert(class, theta.to_lowercase());
                }
            }
        }
        Ok(Self {
            id,
            vn_classes,
            role_mappings,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct PropBankIndex {
    rolesets: HashMap<RolesetId, Roleset>,
}

impl PropBankIndex {
    pub fn from_snapshot(snapshot: &PropBankSnapshot) -> Result<Self, ResourceError> {
        let mut index = Self::default();
        for raw in &snapshot.rolesets {
            index.insert(Roleset::from_snapshot(raw)?);
        }
        Ok(index)
    }

    /// Later definitions of the same roleset replace earlier ones.
    pub fn insert(&mut self, roleset: Roleset) {
        self.rolesets.insert(roleset.id.clone(), roleset);
    }

    #[must_use]
    pub fn get(&self, id: &RolesetId) -> Option<&Roleset> {
        self.rolesets.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &RolesetId) -> bool {
        self.rolesets.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rolesets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rolesets.is_empty()
    }

    /// Rolesets sorted by id.
    #[must_use]
    pub fn sorted(&self) -> Vec<&Roleset> {
        let mut out: Vec<&Roleset> = self.rolesets.values().collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_keyed_by_arg_label_and_lowercased() {
        let snapshot = RolesetSnapshot {
            id: "give.01".to_string(),
            vn_classes: vec!["13.1-1".to_string(), "give-13.1-1".to_string()],
            roles: BTreeMap::from([(
                "0".to_string(),
                BTreeMap::from([("13.1-1".to_string(), "Agent".to_string())]),
            )]),
        };
        let roleset = Roleset::from_snapshot(&snapshot).expect("roleset");
        assert_eq!(roleset.vn_classes.len(), 1);
        let class = ClassId::parse("13.1-1").expect("class");
        assert_eq!(
            roleset.role_mappings.get("ARG0").and_then(|m| m.get(&class)),
            Some(&"agent".to_string())
        );
    }
}
