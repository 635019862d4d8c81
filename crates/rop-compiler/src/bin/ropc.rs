//! `ropc`: the compiler CLI. Disassembles a gadget pool into a catalog,
//! then links a source chain file against it.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "ropc")]
#[command(about = "Link a ROP source chain against a gadget pool")]
struct Cli {
    /// Source chain file.
    #[arg(long)]
    src: Option<PathBuf>,

    /// Binary gadget pool.
    #[arg(long)]
    gadgets: PathBuf,

    /// Print the catalog (offset, canonical key) sorted by offset to
    /// stdout and exit, instead of compiling a source file.
    #[arg(long)]
    write_gadgets: bool,

    /// Target architecture of the gadget pool.
    #[arg(long, value_enum, default_value = "x86-64")]
    arch: ArchArg,

    /// Disassembly syntax shown alongside `--write-gadgets` output.
    /// Informational only: the canonical key used for `g:` lookups is
    /// always the fixed Intel-derived form regardless of this flag.
    #[arg(long, value_enum, default_value = "none")]
    syntax: SyntaxArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ArchArg {
    #[value(name = "x86-16")]
    X86_16,
    #[value(name = "x86-32")]
    X86_32,
    #[value(name = "x86-64")]
    X86_64,
    Arm,
}

impl From<ArchArg> for rop_catalog::Arch {
    fn from(value: ArchArg) -> Self {
        match value {
            ArchArg::X86_16 => Self::X86_16,
            ArchArg::X86_32 => Self::X86_32,
            ArchArg::X86_64 => Self::X86_64,
            ArchArg::Arm => Self::Arm,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SyntaxArg {
    None,
    Att,
    Intel,
    Native,
}

impl From<SyntaxArg> for rop_catalog::Syntax {
    fn from(value: SyntaxArg) -> Self {
        match value {
            SyntaxArg::None => Self::None,
            SyntaxArg::Att => Self::Att,
            SyntaxArg::Intel => Self::Intel,
            SyntaxArg::Native => Self::Native,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let pool = std::fs::read(&cli.gadgets)?;
    let catalog = rop_catalog::build(&pool, cli.arch.into())?;
    eprintln!("catalog built: {} gadgets from {} bytes", catalog.len(), pool.len());

    if cli.write_gadgets {
        print!(
            "{}",
            rop_compiler::render_catalog_dump(&catalog, cli.arch.into(), cli.syntax.into())
        );
        return Ok(());
    }

    let src_path = cli
        .src
        .ok_or("--src is required unless --write-gadgets is passed")?;
    let source = std::fs::read_to_string(&src_path)?;

    let chain = rop_compiler::compile(&source, &catalog)?;
    eprintln!("unresolved chain: {} bytes", chain.len());

    std::io::stdout().write_all(&chain)?;
    Ok(())
}
