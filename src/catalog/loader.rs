//! Loads one version directory of dumped command documents.
//!
//! Listing failures are fatal; a single bad document is not. The dump tool
//! writes one file per command, so a truncated or hand-edited file should cost
//! that command, not the whole release.

use crate::catalog::model::{CommandRecord, VersionCatalog};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Suffix that marks a command document.
pub const COMMAND_FILE_SUFFIX: &str = ".json";

/// Read every `<command>.json` under `dir` into a catalog.
pub fn load_version_catalog(dir: &Path) -> Result<VersionCatalog> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("reading version directory {}", dir.display()))?;

    let mut catalog = VersionCatalog::default();
    for entry in entries {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            warn!(path = %path.display(), "skipping command file with non UTF-8 name");
            continue;
        };
        let Some(command) = file_name.strip_suffix(COMMAND_FILE_SUFFIX) else {
            continue;
        };
        if command.is_empty() {
            warn!(path = %path.display(), "skipping misnamed command file");
            continue;
        }

        match load_command_record(&path) {
            Ok(record) => catalog.insert(command, record),
            Err(err) => warn!(path = %path.display(), "skipping command file: {err:#}"),
        }
    }

    debug!(dir = %dir.display(), commands = catalog.len(), "loaded version catalog");
    Ok(catalog)
}

/// Read and parse a single command document.
pub fn load_command_record(path: &Path) -> Result<CommandRecord> {
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let record: CommandRecord =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(record)
}
