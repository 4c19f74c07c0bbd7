//! Discovers and loads every version directory under a corpus root.
//!
//! Only immediate subdirectories named `MAJOR.MINOR.PATCH` take part; anything
//! else (the previous `matches.json`, scratch folders, `latest` symlinks to
//! files) is ignored without comment.

use crate::catalog::loader::load_version_catalog;
use crate::catalog::model::VersionCatalog;
use crate::catalog::version::{Version, VersionOrder};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// One release and the commands it reported.
#[derive(Clone, Debug)]
pub struct VersionSnapshot {
    pub version: Version,
    pub catalog: VersionCatalog,
}

/// All snapshots found under one root, already in walk order.
#[derive(Clone, Debug, Default)]
pub struct VersionCorpus {
    snapshots: Vec<VersionSnapshot>,
}

impl VersionCorpus {
    /// Build a corpus from snapshots in any order.
    pub fn from_snapshots(mut snapshots: Vec<VersionSnapshot>, order: VersionOrder) -> Self {
        snapshots.sort_by(|a, b| order.compare(&a.version, &b.version));
        Self { snapshots }
    }

    /// Snapshots in walk order.
    pub fn iter(&self) -> impl Iterator<Item = &VersionSnapshot> {
        self.snapshots.iter()
    }

    pub fn versions(&self) -> impl Iterator<Item = &Version> {
        self.snapshots.iter().map(|snapshot| &snapshot.version)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Scan `root` for version directories and load each one.
///
/// A directory that cannot be listed aborts the whole scan; the corpus is a
/// small trusted input and a partial one would produce misleading epochs.
pub fn load_corpus(root: &Path, order: VersionOrder) -> Result<VersionCorpus> {
    let entries =
        fs::read_dir(root).with_context(|| format!("reading corpus root {}", root.display()))?;

    let mut snapshots = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("listing {}", root.display()))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(version) = entry.file_name().to_str().and_then(Version::parse) else {
            continue;
        };
        let catalog = load_version_catalog(&path)
            .with_context(|| format!("loading commands for version {version}"))?;
        snapshots.push(VersionSnapshot { version, catalog });
    }

    let corpus = VersionCorpus::from_snapshots(snapshots, order);
    info!(
        root = %root.display(),
        order = order.as_str(),
        "loaded {} versions",
        corpus.len()
    );
    Ok(corpus)
}
