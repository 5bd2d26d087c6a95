use crate::registry::InstanceRegistry;
use crate::IngestError;
use semlink_core::{sha256_hex, NONE_TOKEN};
use semlink_model::Instance;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Populated-field totals for a registry. `fn` excludes `NF`/`IN`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Counts {
    pub total: u64,
    pub pb: u64,
    pub vn: u64,
    #[serde(rename = "fn")]
    pub fn_frames: u64,
    pub on: u64,
}

#[must_use]
pub fn counts(registry: &InstanceRegistry) -> Counts {
    let mut out = Counts::default();
    for row in registry.iter() {
        out.total += 1;
        out.pb += u64::from(row.pb_roleset.is_some());
        out.vn += u64::from(row.vn_class.is_some());
        out.fn_frames += u64::from(row.fn_frame.frame().is_some());
        out.on += u64::from(row.on_group.is_some());
    }
    out
}

#[must_use]
pub fn render_line(row: &Instance) -> String {
    fn or_none(value: Option<&str>) -> &str {
        value.unwrap_or(NONE_TOKEN)
    }
    let deps = match &row.dependencies {
        Some(deps) if !deps.is_empty() => deps.join(" "),
        _ => NONE_TOKEN.to_string(),
    };
    format!(
        "{} {} {} {} {} {} {}",
        row.id,
        row.verb,
        or_none(row.vn_class.as_ref().map(|c| c.as_str())),
        row.fn_frame.as_token(),
        or_none(row.pb_roleset.as_ref().map(|r| r.as_str())),
        or_none(row.on_group.as_ref().map(|g| g.as_str())),
        deps
    )
}

/// Whole release text, one line per instance in id order.
#[must_use]
pub fn render_release(registry: &InstanceRegistry) -> String {
    let mut out = String::new();
    for row in registry.sorted() {
        out.push_str(&render_line(row));
        out.push('\n');
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WrittenRelease {
    pub path: PathBuf,
    pub lines: u64,
    pub sha256: String,
}

pub fn write_release(registry: &InstanceRegistry, path: &Path) -> Result<WrittenRelease, IngestError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| IngestError(format!("cannot create {}: {e}", parent.display())))?;
    }
    let text = render_release(registry);
    fs::write(path, text.as_bytes())
        .map_err(|e| IngestError(format!("cannot write {}: {e}", path.display())))?;
    Ok(WrittenRelease {
        path: path.to_path_buf(),
        lines: registry.len() as u64,
        sha256: sha256_hex(text.as_bytes()),
    })
}
