use crate::ResourceError;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ResourceError> {
    let bytes = fs::read(path)
        .map_err(|e| ResourceError(format!("failed to read {}: {e}", path.display())))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ResourceError(format!("failed to parse {}: {e}", path.display())))
}
