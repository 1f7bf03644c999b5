use std::{
    error::Error,
    fs::File,
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use memmap2::Mmap;
use scmtools_config::Options;
use scmtools_formats::scm::{Alignment, WriteOptions};

use crate::{describe::describe, repack::repack, verify::verify};

mod describe;
mod repack;
mod verify;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Action,
}

#[derive(Debug, Subcommand)]
pub enum Action {
    /// Print the header and a summary of a mesh file.
    Describe {
        path: PathBuf,

        /// Dump the whole decoded mesh as JSON instead.
        #[arg(long)]
        json: bool,
    },
    /// Check that every file survives a decode and re-encode unchanged.
    Verify {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Section alignment the files were written with.
        #[arg(short, long, env("SCM_ALIGNMENT"))]
        alignment: Option<u32>,
    },
    /// Decode a mesh and write it back out.
    Repack {
        input: PathBuf,

        output: PathBuf,

        /// Section alignment in bytes, a power of two of at least 8.
        #[arg(short, long, env("SCM_ALIGNMENT"))]
        alignment: Option<u32>,
    },
}

impl Action {
    pub fn run(self, options: &Options) -> Result<(), Box<dyn Error>> {
        match self {
            Action::Describe { path, json } => {
                describe(&path, json)?;
            }
            Action::Verify { paths, alignment } => {
                verify(&paths, alignment.or(options.encoder.alignment))?;
            }
            Action::Repack {
                input,
                output,
                alignment,
            } => {
                repack(&input, &output, alignment.or(options.encoder.alignment))?;
            }
        }

        Ok(())
    }
}

pub fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let options = Options::load()?;
    cli.command.run(&options)?;

    Ok(())
}

/// Encoder settings for an optional alignment override.
pub(crate) fn write_options(alignment: Option<u32>) -> Result<WriteOptions, String> {
    match alignment {
        Some(alignment) => Alignment::try_from(alignment).map(WriteOptions::with_alignment),
        None => Ok(WriteOptions::default()),
    }
}

pub(crate) fn map_file(path: &Path) -> std::io::Result<Mmap> {
    let file = File::open(path)?;

    // SAFETY: no safety guarantees here. File could be modified while we read from it.
    unsafe { Mmap::map(&file) }
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repack_alignment() {
        let cli = Cli::parse_from(["scmtools", "repack", "in.scm", "out.scm", "-a", "16"]);

        assert!(matches!(
            cli.command,
            Action::Repack {
                alignment: Some(16),
                ..
            }
        ));
    }

    #[test]
    fn alignment_overrides() {
        assert_eq!(write_options(None), Ok(WriteOptions::default()));
        assert_eq!(
            write_options(Some(16)).map(|options| options.alignment.get()),
            Ok(16)
        );
        assert!(write_options(Some(12)).is_err());
    }
}
