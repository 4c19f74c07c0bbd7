//! Groups consecutive releases with identical `setParameter` help into epochs.
//!
//! The walk is a fold over the corpus in version order. The equivalence key is
//! a SHA-256 digest of the raw help text, not of the parsed parameter list, so
//! any prose change in the help starts a new epoch even when the parameters are
//! the same. A release that yields no parameter list is skipped outright: it
//! neither opens nor extends an epoch, and the next release is diffed against
//! the last release that did parse.

use crate::catalog::{VersionCorpus, VersionSnapshot};
use crate::params::{ExtractError, ParameterSet, diff_parameters, extract_parameters};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt::Write as _;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// One maximal run of releases sharing byte-identical `setParameter` help.
///
/// Every field is omitted from JSON when it holds its zero value, so the very
/// first epoch carries no `version_prev` and an epoch that only changed prose
/// carries neither `params_added` nor `params_removed`.
pub struct Epoch {
    #[serde(rename = "version_min", default, skip_serializing_if = "String::is_empty")]
    pub min_version: String,
    #[serde(rename = "version_max", default, skip_serializing_if = "String::is_empty")]
    pub max_version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<String>,
    #[serde(rename = "version_prev", default, skip_serializing_if = "String::is_empty")]
    pub previous_version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params_added: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params_removed: Vec<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub count: usize,
}

fn is_zero(value: &usize) -> bool {
    *value == 0
}

/// Epochs keyed by content hash, iterated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    epochs: HashMap<String, Epoch>,
    order: Vec<String>,
}

impl Report {
    pub fn get(&self, key: &str) -> Option<&Epoch> {
        self.epochs.get(key)
    }

    /// Keys in the order their epochs were opened.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(key, epoch)` pairs in the order the epochs were opened.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Epoch)> {
        self.order
            .iter()
            .filter_map(|key| self.epochs.get(key).map(|epoch| (key.as_str(), epoch)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn open(&mut self, key: String, epoch: Epoch) {
        self.order.push(key.clone());
        self.epochs.insert(key, epoch);
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Epoch> {
        self.epochs.get_mut(key)
    }
}

impl Serialize for Report {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, epoch) in self.iter() {
            map.serialize_entry(key, epoch)?;
        }
        map.end()
    }
}

/// A release the walk could not use, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedVersion {
    pub version: String,
    pub reason: ExtractError,
}

/// Everything one pass over the corpus produced.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    pub report: Report,
    pub skipped: Vec<SkippedVersion>,
}

/// Lower-case hex SHA-256 of the help text's UTF-8 bytes.
pub fn content_hash(help: &str) -> String {
    let digest = Sha256::digest(help.as_bytes());
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

/// Walk the corpus in its stored order and build the epoch report.
pub fn reconcile(corpus: &VersionCorpus) -> Reconciliation {
    corpus
        .iter()
        .fold(WalkState::default(), WalkState::step)
        .finish()
}

struct OpenEpoch {
    hash: String,
    key: String,
}

#[derive(Default)]
struct WalkState {
    previous_params: ParameterSet,
    previous_version: String,
    open: Option<OpenEpoch>,
    occurrences: HashMap<String, usize>,
    report: Report,
    skipped: Vec<SkippedVersion>,
}

impl WalkState {
    fn step(mut self, snapshot: &VersionSnapshot) -> Self {
        let version = snapshot.version.as_str();
        let listing = match extract_parameters(&snapshot.catalog) {
            Ok(listing) => listing,
            Err(reason) => {
                warn!(version, "skipping version: {reason}");
                self.skipped.push(SkippedVersion {
                    version: version.to_string(),
                    reason,
                });
                return self;
            }
        };

        let hash = content_hash(listing.help);
        let extends_open = self.open.as_ref().is_some_and(|open| open.hash == hash);
        if extends_open {
            if let Some(epoch) = self
                .open
                .as_ref()
                .and_then(|open| self.report.get_mut(&open.key))
            {
                epoch.versions.push(version.to_string());
                epoch.max_version = version.to_string();
            }
        } else {
            let key = self.key_for(&hash);
            let diff = diff_parameters(&self.previous_params, &listing.params);
            debug!(
                version,
                key = key.as_str(),
                added = diff.added.len(),
                removed = diff.removed.len(),
                "opening epoch"
            );
            self.report.open(
                key.clone(),
                Epoch {
                    min_version: version.to_string(),
                    max_version: version.to_string(),
                    versions: vec![version.to_string()],
                    previous_version: self.previous_version.clone(),
                    params_added: diff.added,
                    params_removed: diff.removed,
                    count: listing.params.len(),
                },
            );
            self.open = Some(OpenEpoch { hash, key });
        }

        self.previous_params = listing.params;
        self.previous_version = version.to_string();
        self
    }

    // The first run of a hash is keyed by the bare digest; a later,
    // non-contiguous run of the same help gets `<digest>.<n>`.
    fn key_for(&mut self, hash: &str) -> String {
        let seen = self.occurrences.entry(hash.to_string()).or_insert(0);
        *seen += 1;
        if *seen == 1 {
            hash.to_string()
        } else {
            format!("{hash}.{seen}")
        }
    }

    fn finish(self) -> Reconciliation {
        Reconciliation {
            report: self.report,
            skipped: self.skipped,
        }
    }
}
