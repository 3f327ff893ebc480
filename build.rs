//! Renders `znstor.1` from the clap definitions in `src/cli/mod.rs`.
//!
//! The page lands in `OUT_DIR`; it lists the global `--log-level` flag and
//! every inspection subcommand the binary accepts.

use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::CommandFactory;
use clap_mangen::Man;

#[path = "src/cli/mod.rs"]
mod cli;

const MAN_PAGE: &str = "znstor.1";

fn out_dir() -> io::Result<PathBuf> {
    env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "OUT_DIR was not set"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout();
    for watched in ["build.rs", "src/cli/mod.rs"] {
        writeln!(stdout, "cargo:rerun-if-changed={watched}")?;
    }

    let command = cli::Cli::command().name("znstor");
    let mut page = BufWriter::new(File::create(out_dir()?.join(MAN_PAGE))?);
    Man::new(command).render(&mut page)?;
    page.flush()?;

    Ok(())
}
