//! `ropinject`: splice a gadget pool into a named function of a host
//! executable.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "ropinject")]
#[command(about = "Splice a gadget pool into a host executable's named function")]
struct Cli {
    /// Executable file to patch.
    #[arg(short = 'f', long = "file")]
    exe: PathBuf,

    /// Executable format.
    #[arg(short = 't', long = "type", value_enum)]
    format: FormatArg,

    /// Name of the anchor function symbol.
    #[arg(short = 'n', long = "name")]
    symbol: String,

    /// Binary gadget pool to inject.
    #[arg(short = 'i', long = "input")]
    gadgets: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Elf,
    Pe,
}

impl From<FormatArg> for rop_injector::ExeFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Elf => Self::Elf,
            FormatArg::Pe => Self::Pe,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let exe = std::fs::read(&cli.exe)?;
    let gadgets = std::fs::read(&cli.gadgets)?;

    let patched = rop_injector::splice(&exe, cli.format.into(), &cli.symbol, &gadgets)?;
    eprintln!(
        "patched {} bytes into symbol '{}' ({} byte file)",
        gadgets.len(),
        cli.symbol,
        patched.len()
    );

    std::io::stdout().write_all(&patched)?;
    Ok(())
}
