//! Source-chain linker (spec §4.4).
//!
//! Parses a `source.rop` file line by line and emits the unresolved
//! chain: gadget references (`g:`) are looked up in the catalog and
//! encoded as 8-byte tagged offsets; data directives (`d:`/`D:`) are
//! hex-decoded, byte-reversed, and appended verbatim.

use thiserror::Error;

use rop_catalog::Catalog;

/// Compile-time errors, each carrying the 1-indexed source line it came
/// from where applicable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("line {line}: malformed directive: {detail}")]
    Parse { line: usize, detail: String },
    #[error("line {line}: gadget not found: {key}")]
    GadgetNotFound { line: usize, key: String },
    #[error("line {line}: invalid hex data")]
    HexDecode { line: usize },
}

/// Compile a source chain against `catalog`, returning the unresolved
/// chain bytes.
///
/// Blank lines and lines beginning with `;` are comments. Unknown
/// directive letters are skipped silently (spec §4.4: "historical;
/// flagged as open question" — this implementation preserves that
/// behavior rather than rejecting them, since tightening it would be a
/// breaking change to an already-ambiguous wire contract).
pub fn compile(source: &str, catalog: &Catalog) -> Result<Vec<u8>, LinkError> {
    let mut out = Vec::new();

    for (idx, raw_line) in source.lines().enumerate() {
        let line_number = idx + 1;
        let line = raw_line.trim_matches(|c: char| c.is_ascii_whitespace());

        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        let Some((directive, value)) = line.split_once(": ") else {
            return Err(LinkError::Parse {
                line: line_number,
                detail: "expected \"<directive>: <value>\"".to_string(),
            });
        };

        let value = value.strip_prefix("0x").unwrap_or(value);

        match directive {
            "g" => out.extend_from_slice(&compile_gadget_ref(catalog, value, line_number)?),
            "d" => out.extend_from_slice(&compile_d(value, line_number)?),
            "D" => out.extend_from_slice(&compile_big_d(value, line_number)?),
            _ => continue,
        }
    }

    Ok(out)
}

fn compile_gadget_ref(catalog: &Catalog, key: &str, line: usize) -> Result<[u8; 8], LinkError> {
    let gadget = catalog.get(key).ok_or_else(|| LinkError::GadgetNotFound {
        line,
        key: key.to_string(),
    })?;
    Ok(rop_format::encode_tagged_be(gadget.offset))
}

/// `d:` directive: left-pad to exactly 16 hex digits, decode, reverse.
fn compile_d(value: &str, line: usize) -> Result<[u8; 8], LinkError> {
    if value.len() > 16 {
        return Err(LinkError::HexDecode { line });
    }
    let padded = format!("{value:0>16}");
    let mut bytes = decode_hex(&padded, line)?;
    bytes.reverse();
    bytes
        .try_into()
        .map_err(|_| LinkError::HexDecode { line })
}

/// `D:` directive: arbitrary even-length hex, decode, reverse, no
/// padding.
fn compile_big_d(value: &str, line: usize) -> Result<Vec<u8>, LinkError> {
    let mut bytes = decode_hex(value, line)?;
    bytes.reverse();
    Ok(bytes)
}

fn decode_hex(value: &str, line: usize) -> Result<Vec<u8>, LinkError> {
    if value.len() % 2 != 0 {
        return Err(LinkError::HexDecode { line });
    }
    (0..value.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&value[i..i + 2], 16).map_err(|_| LinkError::HexDecode { line }))
        .collect()
}
