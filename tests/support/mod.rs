use anyhow::{Context, Result, bail};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Scratch corpus root laid out the way the dump tool writes it.
pub struct CorpusFixture {
    dir: TempDir,
}

impl CorpusFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new().context("failed to allocate corpus root")?,
        })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Create `<root>/<label>/` with a `ping` command and, when `help` is
    /// given, a `setParameter` command carrying it.
    pub fn add_version(&self, label: &str, help: Option<&str>) -> Result<PathBuf> {
        let dir = self.root().join(label);
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        write_command(&dir, "ping", "a way to check that the server is alive")?;
        if let Some(help) = help {
            write_command(&dir, "setParameter", help)?;
        }
        Ok(dir)
    }

    pub fn report_path(&self) -> PathBuf {
        self.root().join("matches.json")
    }
}

pub fn write_command(dir: &Path, name: &str, help: &str) -> Result<()> {
    let path = dir.join(format!("{name}.json"));
    let document = json!({
        "help": help,
        "requiresAuth": false,
        "secondaryOk": true,
        "adminOnly": name == "setParameter",
        "apiVersions": [],
        "deprecatedApiVersions": []
    });
    fs::write(&path, serde_json::to_vec_pretty(&document)?)
        .with_context(|| format!("writing {}", path.display()))
}

pub fn crunch_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_crunch"))
}

pub fn split_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_catalog-split"))
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}
