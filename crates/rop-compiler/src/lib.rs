//! Source-chain linker: parses a `source.rop` file against a gadget
//! catalog and emits the unresolved chain consumed by `rop-runner`.

mod dump;
mod linker;

pub use dump::render as render_catalog_dump;
pub use linker::{compile, LinkError};
