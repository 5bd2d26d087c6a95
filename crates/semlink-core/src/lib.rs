// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

pub mod domain;
pub mod errors;

pub use domain::canonical;
pub use domain::canonical::sha256_hex;
pub use domain::config::{load_toml_file, resolve_semlink_config_path, resolve_semlink_config_candidates};
pub use errors::{ConfigPathScope, Error, ExitCode, MachineError, Result};

pub const CRATE_NAME: &str = "semlink-core";

pub const ENV_SEMLINK_CONFIG: &str = "SEMLINK_CONFIG";
pub const ENV_SEMLINK_LOG_LEVEL: &str = "SEMLINK_LOG_LEVEL";
pub const ENV_SEMLINK_LOG_JSON: &str = "SEMLINK_LOG_JSON";

/// Placeholder written for absent fields in release files.
pub const NONE_TOKEN: &str = "None";
