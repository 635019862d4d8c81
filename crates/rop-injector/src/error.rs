//! Injector error kinds (spec §7).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InjectError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("symbol not found: {0}")]
    SymbolNotFound(String),
    #[error("gadget pool too large: expected at most {expected} bytes, got {actual}")]
    GadgetTooLarge { expected: u64, actual: u64 },
    #[error("unsupported executable format")]
    UnsupportedFormat,
    #[error("malformed {kind}: {detail}")]
    Malformed { kind: &'static str, detail: String },
}

pub type InjectResult<T> = Result<T, InjectError>;
