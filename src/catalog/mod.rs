//! Per-version command catalogs.
//!
//! This module reads the on-disk layout written by the dump tool: one
//! directory per release (`MAJOR.MINOR.PATCH`), one `<command>.json` document
//! per command. Callers use `load_corpus` to get every release in walk order
//! and `VersionCatalog` to look up individual commands.

pub mod corpus;
pub mod loader;
pub mod model;
pub mod version;

pub use corpus::{VersionCorpus, VersionSnapshot, load_corpus};
pub use loader::{COMMAND_FILE_SUFFIX, load_command_record, load_version_catalog};
pub use model::{CommandRecord, VersionCatalog};
pub use version::{Version, VersionOrder};
