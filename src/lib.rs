//! Cross-version reconciliation of server command catalogs.
//!
//! A corpus root holds one directory per release (`MAJOR.MINOR.PATCH`), each
//! with one `<command>.json` document per command as dumped from the server.
//! This crate walks those releases in order, pulls the tunable parameter list
//! out of the `setParameter` help text, folds runs of identical help into
//! epochs, and writes the result to `matches.json` in the corpus root.
//!
//! The binaries are thin: `crunch` calls [`crunch_corpus`], `catalog-split`
//! calls [`split::split_catalog`].

use anyhow::Result;
use std::path::{Path, PathBuf};

pub mod catalog;
pub mod epoch;
pub mod logging;
pub mod params;
pub mod report;
pub mod split;

pub use catalog::{
    CommandRecord, Version, VersionCatalog, VersionCorpus, VersionOrder, VersionSnapshot,
    load_corpus, load_version_catalog,
};
pub use epoch::{Epoch, Reconciliation, Report, SkippedVersion, content_hash, reconcile};
pub use params::{
    ExtractError, ParameterDiff, ParameterListing, ParameterSet, diff_parameters,
    extract_parameters,
};
pub use report::{REPORT_FILE_NAME, render_report, write_report};

/// Knobs for one reconciliation run.
#[derive(Debug, Clone)]
pub struct CrunchOptions {
    pub order: VersionOrder,
    pub report_file_name: String,
}

impl Default for CrunchOptions {
    fn default() -> Self {
        Self {
            order: VersionOrder::default(),
            report_file_name: REPORT_FILE_NAME.to_string(),
        }
    }
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct CrunchSummary {
    pub versions_loaded: usize,
    pub epochs: usize,
    pub skipped: Vec<SkippedVersion>,
    pub report_path: PathBuf,
}

/// Load the corpus under `root`, reconcile it, and write the report there.
///
/// Any error returned here is fatal for the run; per-file and per-version
/// problems have already been logged and skipped by the time it returns.
pub fn crunch_corpus(root: &Path, options: &CrunchOptions) -> Result<CrunchSummary> {
    let corpus = load_corpus(root, options.order)?;
    let Reconciliation { report, skipped } = reconcile(&corpus);
    let report_path = write_report(root, &options.report_file_name, &report)?;
    Ok(CrunchSummary {
        versions_loaded: corpus.len(),
        epochs: report.len(),
        skipped,
        report_path,
    })
}
