//! Writes a saved `listCommands` response out as a version directory.
//!
//! This is the on-disk half of the dump step: whatever fetched the response
//! from a server hands it over as JSON, and this module lays it out as one
//! `<command>.json` per command so `load_version_catalog` can read it back.

use crate::catalog::{COMMAND_FILE_SUFFIX, CommandRecord};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Default, Deserialize)]
/// The parts of a `listCommands` reply the splitter needs.
pub struct ListCommandsResponse {
    #[serde(default)]
    pub commands: BTreeMap<String, CommandRecord>,
    #[serde(default)]
    pub ok: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    /// The output directory existed beforehand and was left alone.
    AlreadyPresent,
    /// Commands written; failures are logged and not counted.
    Written { commands: usize },
}

/// Parse a `listCommands` reply from raw JSON bytes.
pub fn parse_list_commands(bytes: &[u8]) -> Result<ListCommandsResponse> {
    serde_json::from_slice(bytes).context("parsing listCommands response")
}

/// File name a command is stored under. Path separators in the command name
/// are stripped down to the final component.
pub fn command_file_name(command: &str) -> String {
    let base = Path::new(command)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(command);
    format!("{base}{COMMAND_FILE_SUFFIX}")
}

/// Write each command of `response` to `out_dir/<command>.json`.
///
/// An existing `out_dir` is never touched, so re-running a dump for a release
/// that is already on disk is a no-op.
pub fn split_catalog(response: &ListCommandsResponse, out_dir: &Path) -> Result<SplitOutcome> {
    if out_dir.exists() {
        info!(dir = %out_dir.display(), "output already exists, skipping");
        return Ok(SplitOutcome::AlreadyPresent);
    }
    if response.ok != 1.0 {
        warn!(ok = response.ok, "listCommands response did not report ok; writing it anyway");
    }
    create_private_dir(out_dir)?;

    let mut written = 0;
    for (command, record) in &response.commands {
        let path = out_dir.join(command_file_name(command));
        match write_command(&path, record) {
            Ok(()) => written += 1,
            Err(err) => error!(path = %path.display(), "failed to write command: {err:#}"),
        }
    }

    info!(dir = %out_dir.display(), "dumped {written} commands");
    Ok(SplitOutcome::Written { commands: written })
}

fn write_command(path: &Path, record: &CommandRecord) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, record)
        .with_context(|| format!("serializing {}", path.display()))?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn create_private_dir(dir: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder
        .create(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))
}
