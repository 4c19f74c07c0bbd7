//! Lays out a saved `listCommands` response as a version directory.
//!
//! Reads the response from `--input PATH` or stdin and writes one
//! `<command>.json` per command into the output directory. An existing output
//! directory is left untouched and the run still succeeds.

use anyhow::{Context, Result, anyhow, bail};
use catalog_epochs::logging;
use catalog_epochs::split::{parse_list_commands, split_catalog};
use std::env;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::error;

fn main() {
    logging::init();
    if let Err(err) = run() {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse(env::args_os().skip(1))?;
    let raw = cli.source.read()?;
    let response = parse_list_commands(&raw)?;
    split_catalog(&response, &cli.out_dir)?;
    Ok(())
}

enum InputSource {
    File(PathBuf),
    Stdin,
}

impl InputSource {
    fn read(&self) -> Result<Vec<u8>> {
        match self {
            InputSource::File(path) => {
                if !path.is_file() {
                    bail!("input file not found: {}", path.display());
                }
                fs::read(path).with_context(|| format!("reading {}", path.display()))
            }
            InputSource::Stdin => {
                let mut buf = Vec::new();
                io::stdin()
                    .read_to_end(&mut buf)
                    .context("reading stdin")?;
                Ok(buf)
            }
        }
    }
}

struct Cli {
    source: InputSource,
    out_dir: PathBuf,
}

impl Cli {
    fn parse(mut args: impl Iterator<Item = OsString>) -> Result<Self> {
        let mut source: Option<InputSource> = None;
        let mut out_dir: Option<PathBuf> = None;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--input" => {
                    let path = next_value(&mut args, "--input")?;
                    if source.is_some() {
                        bail!("--input/--stdin may only be provided once");
                    }
                    source = Some(InputSource::File(PathBuf::from(path)));
                }
                "--stdin" => {
                    if source.is_some() {
                        bail!("--input/--stdin may only be provided once");
                    }
                    source = Some(InputSource::Stdin);
                }
                "--help" | "-h" => usage(0),
                other if other.starts_with("--") => bail!("unknown flag: {other}"),
                other => {
                    if out_dir.is_some() {
                        bail!("only one output directory may be given");
                    }
                    out_dir = Some(PathBuf::from(other));
                }
            }
        }

        let Some(out_dir) = out_dir else {
            usage(2);
        };
        Ok(Self {
            source: source.unwrap_or(InputSource::Stdin),
            out_dir,
        })
    }
}

fn next_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow!("missing value for {flag}"))
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: catalog-split [--input PATH|--stdin] <out-dir>\n\nWrites each command of a listCommands response to <out-dir>/<command>.json.\nReads stdin when no --input is given; skips when <out-dir> already exists."
    );
    std::process::exit(code);
}
