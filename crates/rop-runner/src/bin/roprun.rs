//! `roprun`: resolve an unresolved chain against this process's own
//! gadget-pool anchor and pivot into it.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "roprun")]
#[command(about = "Resolve and pivot into a ROP chain")]
struct Cli {
    /// Unresolved chain file.
    chain: PathBuf,

    /// Fork a single-threaded child before pivoting; the parent exits
    /// cleanly.
    #[arg(long)]
    fork: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let unresolved = std::fs::read(&cli.chain)?;
    let base = rop_runner::base_address_of_gadget_pool();
    let resolved = rop_runner::resolve(&unresolved, base);
    eprintln!(
        "resolved {} bytes against gadget pool base {:#x}",
        resolved.as_bytes().len(),
        base
    );

    if cli.fork {
        rop_runner::fork_before_pivot()?;
    }

    // SAFETY: `--fork` (when passed) has already guaranteed a
    // single-threaded child; `resolved` outlives this call.
    let overwritten = unsafe { rop_runner::pivot(&resolved) };
    eprintln!("pivot: {overwritten} candidate return-address slot(s) overwritten");

    Ok(())
}
