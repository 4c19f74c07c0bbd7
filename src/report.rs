//! Rendering and persisting the epoch report.
//!
//! The report is one JSON object keyed by content hash, entries in the order
//! the epochs were opened. It is checked against `schema/matches.schema.json`
//! before anything touches disk, then written through a temporary file in the
//! corpus root so a failed run never leaves a half-written `matches.json`.

use crate::epoch::Report;
use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// File the report is written to inside the corpus root.
pub const REPORT_FILE_NAME: &str = "matches.json";

const REPORT_SCHEMA: &str = include_str!("../schema/matches.schema.json");

/// Serialize the report with two-space indentation.
///
/// The document ends at the closing brace, with no trailing newline.
pub fn render_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).context("serializing epoch report")
}

/// Check a rendered report against the bundled schema.
pub fn validate_report(document: &Value) -> Result<()> {
    let schema: Value =
        serde_json::from_str(REPORT_SCHEMA).context("parsing bundled report schema")?;
    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| anyhow!("compiling bundled report schema: {err}"))?;

    if let Err(errors) = compiled.validate(document) {
        let details = errors
            .map(|err| format!("{} at {}", err, err.instance_path))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("epoch report failed schema validation:\n{details}");
    }
    Ok(())
}

/// Render, validate, and atomically write the report as `root/<file_name>`.
pub fn write_report(root: &Path, file_name: &str, report: &Report) -> Result<PathBuf> {
    let rendered = render_report(report)?;
    let document: Value =
        serde_json::from_str(&rendered).context("re-reading rendered epoch report")?;
    validate_report(&document)?;

    let destination = root.join(file_name);
    let mut staged = NamedTempFile::new_in(root)
        .with_context(|| format!("creating temporary report in {}", root.display()))?;
    staged
        .write_all(rendered.as_bytes())
        .and_then(|()| staged.flush())
        .with_context(|| format!("writing {}", staged.path().display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .with_context(|| format!("setting permissions on {}", staged.path().display()))?;
    }

    staged
        .persist(&destination)
        .map_err(|err| err.error)
        .with_context(|| format!("writing {}", destination.display()))?;

    info!(
        path = %destination.display(),
        "wrote {} unique epochs",
        report.len()
    );
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CommandRecord, Version, VersionCatalog, VersionCorpus, VersionOrder};
    use crate::catalog::VersionSnapshot;
    use crate::epoch::{content_hash, reconcile};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn single_epoch_report() -> Report {
        let mut catalog = VersionCatalog::default();
        catalog.insert(
            "setParameter",
            CommandRecord {
                help: "supported:\nquiet\n".to_string(),
                ..CommandRecord::default()
            },
        );
        let corpus = VersionCorpus::from_snapshots(
            vec![VersionSnapshot {
                version: Version::parse("2.4.0").unwrap(),
                catalog,
            }],
            VersionOrder::Numeric,
        );
        reconcile(&corpus).report
    }

    #[test]
    fn single_epoch_renders_without_trailing_comma() {
        let rendered = render_report(&single_epoch_report()).unwrap();
        assert!(rendered.ends_with('}'));
        assert!(!rendered.contains(",\n}"));
        let value: Value = serde_json::from_str(&rendered).unwrap();
        let key = content_hash("supported:\nquiet\n");
        assert_eq!(
            value,
            json!({
                key: {
                    "version_min": "2.4.0",
                    "version_max": "2.4.0",
                    "versions": ["2.4.0"],
                    "params_added": ["quiet"],
                    "count": 1
                }
            })
        );
    }

    #[test]
    fn empty_report_renders_as_empty_object() {
        assert_eq!(render_report(&Report::default()).unwrap(), "{}");
        validate_report(&json!({})).unwrap();
    }

    #[test]
    fn schema_rejects_malformed_reports() {
        let err = validate_report(&json!({"not-a-hash": {"versions": ["1.0.0"]}})).unwrap_err();
        assert!(err.to_string().contains("failed schema validation"));

        let key = content_hash("x");
        let err = validate_report(&json!({
            key: {"version_min": "1.0.0", "version_max": "1.0.0", "versions": [], "extra": 1}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("failed schema validation"));
    }

    #[test]
    fn write_report_replaces_previous_output() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join(REPORT_FILE_NAME), "stale").unwrap();

        let path = write_report(root.path(), REPORT_FILE_NAME, &single_epoch_report()).unwrap();
        assert_eq!(path, root.path().join(REPORT_FILE_NAME));
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_report(&single_epoch_report()).unwrap());

        let leftovers: Vec<_> = fs::read_dir(root.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name())
            .collect();
        assert_eq!(leftovers.len(), 1, "temporary file left behind: {leftovers:?}");
    }

    #[test]
    fn write_report_fails_for_missing_root() {
        let root = TempDir::new().unwrap();
        let missing = root.path().join("gone");
        let err = write_report(&missing, REPORT_FILE_NAME, &Report::default()).unwrap_err();
        assert!(format!("{err:#}").contains("creating temporary report"));
        assert!(!missing.exists());
    }
}
