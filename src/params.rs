//! Extraction of the declared parameter list from `setParameter` help text.
//!
//! The server lists the parameters it accepts after a fixed marker line in the
//! help string. Nothing about parameter-name syntax is validated: each
//! non-blank line after the marker is taken verbatim (trimmed).

use crate::catalog::VersionCatalog;
use std::collections::BTreeSet;
use thiserror::Error;

/// Command whose help text declares the tunable parameters.
pub const SET_PARAMETER_COMMAND: &str = "setParameter";

/// Markers tried in order; the second only appears in a few 2.2.x releases.
pub const PARAMETER_MARKERS: [&str; 2] = ["supported:\n", "supported so far:\n"];

/// Ordered parameter names as declared in one release.
pub type ParameterSet = Vec<String>;

/// Why a release contributed no parameter list.
///
/// Both variants are soft: the reconciler skips the release and moves on.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum ExtractError {
    #[error("no setParameter command in catalog")]
    MissingCommand,
    #[error("setParameter help lists no supported parameters")]
    MissingMarker,
}

/// Raw help text plus the parameters parsed out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterListing<'a> {
    pub help: &'a str,
    pub params: ParameterSet,
}

/// Parameters gained and lost between two releases, each sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

/// Locate `setParameter` in a catalog and parse its declared parameters.
pub fn extract_parameters(catalog: &VersionCatalog) -> Result<ParameterListing<'_>, ExtractError> {
    let command = catalog
        .command(SET_PARAMETER_COMMAND)
        .ok_or(ExtractError::MissingCommand)?;
    let params = parse_parameter_help(&command.help)?;
    Ok(ParameterListing {
        help: &command.help,
        params,
    })
}

/// Parse the parameter list out of a raw help string.
pub fn parse_parameter_help(help: &str) -> Result<ParameterSet, ExtractError> {
    let listing = PARAMETER_MARKERS
        .iter()
        .find_map(|marker| help.split_once(marker).map(|(_, rest)| rest))
        .ok_or(ExtractError::MissingMarker)?;

    Ok(listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Set difference in both directions; duplicates collapse.
pub fn diff_parameters(previous: &[String], current: &[String]) -> ParameterDiff {
    let before: BTreeSet<&str> = previous.iter().map(String::as_str).collect();
    let after: BTreeSet<&str> = current.iter().map(String::as_str).collect();
    ParameterDiff {
        added: after.difference(&before).map(|p| p.to_string()).collect(),
        removed: before.difference(&after).map(|p| p.to_string()).collect(),
    }
}
