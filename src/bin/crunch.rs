//! Reconciles a corpus of per-version command dumps into `matches.json`.
//!
//! Takes exactly one argument, the corpus root. Every `MAJOR.MINOR.PATCH`
//! directory under it is loaded, the `setParameter` help of each release is
//! folded into epochs, and the report is written back into the root.

use anyhow::{Result, bail};
use catalog_epochs::{CrunchOptions, crunch_corpus, logging};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{error, info};

fn main() {
    logging::init();
    if let Err(err) = run() {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse(env::args_os().skip(1))?;
    let summary = crunch_corpus(&cli.root, &CrunchOptions::default())?;
    info!(
        versions = summary.versions_loaded,
        epochs = summary.epochs,
        skipped = summary.skipped.len(),
        "wrote {}",
        summary.report_path.display()
    );
    Ok(())
}

#[derive(Debug)]
struct Cli {
    root: PathBuf,
}

impl Cli {
    fn parse(args: impl Iterator<Item = OsString>) -> Result<Self> {
        let args: Vec<OsString> = args.collect();
        if args.iter().any(|arg| arg == "--help" || arg == "-h") {
            usage(0);
        }
        let [root] = args.as_slice() else {
            usage(2);
        };
        let root = PathBuf::from(root);
        if root.as_os_str().is_empty() {
            bail!("corpus root must not be empty");
        }
        Ok(Self { root })
    }
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: crunch <corpus-root>\n\nScans <corpus-root> for MAJOR.MINOR.PATCH directories of dumped command\ndocuments and writes matches.json (setParameter help epochs) into it."
    );
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(items: &[&str]) -> impl Iterator<Item = OsString> {
        items
            .iter()
            .map(OsString::from)
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn single_positional_argument_is_the_root() {
        let cli = Cli::parse(os(&["/data/dumps"])).unwrap();
        assert_eq!(cli.root, PathBuf::from("/data/dumps"));
    }

    #[test]
    fn empty_root_is_rejected() {
        assert!(Cli::parse(os(&[""])).is_err());
    }
}
