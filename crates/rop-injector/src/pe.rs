//! PE (COFF) symbol lookup.
//!
//! Clean-room, scoped to exactly what the injector needs: the DOS stub's
//! `e_lfanew` pointer to the PE signature, the COFF file header's symbol
//! table location, and the COFF symbol table itself. Field semantics
//! follow the general PE/COFF layout (cross-checked against
//! `other_examples/f0f61d4b_m4b-goblin__src-pe-header.rs.rs`), kept as
//! hand-rolled parsing rather than a dependency, matching the ELF
//! module's own "clean-room, not borrowed from a loader crate" stance.

use crate::error::{InjectError, InjectResult};
use crate::symbol::SymbolRecord;

const PE_SIGNATURE: [u8; 4] = *b"PE\0\0";
const COFF_SYMBOL_SIZE: usize = 18;

struct CoffHeader {
    number_of_symbols: u32,
    pointer_to_symbol_table: u32,
}

/// Locate `name` in a PE image's COFF symbol table.
///
/// Per spec §4.7: the symbol's raw `Value` field is used directly as a
/// file offset (no section translation, unlike ELF), and its size is
/// approximated as the difference between this symbol's `Value` and the
/// *next* entry's `Value` in table order — including aux-symbol slots,
/// which is the naive, source-observed heuristic explicitly flagged as
/// "probably wrong" rather than a corrected one (spec §9 open
/// questions).
pub fn find_symbol(data: &[u8], name: &str) -> InjectResult<SymbolRecord> {
    let e_lfanew = u32_le(data, 0x3c, "DOS header")? as usize;
    require_len(data, e_lfanew + 4, "PE signature")?;
    if data[e_lfanew..e_lfanew + 4] != PE_SIGNATURE {
        return Err(InjectError::Malformed {
            kind: "PE header",
            detail: "missing PE signature".to_string(),
        });
    }

    let coff_offset = e_lfanew + 4;
    require_len(data, coff_offset + 20, "COFF header")?;
    let coff = CoffHeader {
        number_of_symbols: u32_le(data, coff_offset + 12, "COFF header")?,
        pointer_to_symbol_table: u32_le(data, coff_offset + 8, "COFF header")?,
    };

    let symtab_offset = coff.pointer_to_symbol_table as usize;
    let count = coff.number_of_symbols as usize;
    let strtab_offset = symtab_offset + count * COFF_SYMBOL_SIZE;

    let mut values = Vec::with_capacity(count);
    for i in 0..count {
        let offset = symtab_offset + i * COFF_SYMBOL_SIZE;
        require_len(data, offset + COFF_SYMBOL_SIZE, "COFF symbol table")?;
        let entry = &data[offset..offset + COFF_SYMBOL_SIZE];
        let value = u32::from_le_bytes([entry[8], entry[9], entry[10], entry[11]]);
        values.push(value);

        let entry_name = symbol_name(entry, data, strtab_offset)?;
        if entry_name == name {
            let next_value = values_get_next(data, symtab_offset, count, i)?;
            let size = next_value.saturating_sub(value) as u64;
            return Ok(SymbolRecord {
                name: name.to_string(),
                file_offset: value as u64,
                size_bytes: size,
            });
        }
    }

    Err(InjectError::SymbolNotFound(name.to_string()))
}

/// Value of the entry immediately following index `i` in table order, or
/// `0` if `i` is the last entry (no "next" symbol to diff against).
fn values_get_next(
    data: &[u8],
    symtab_offset: usize,
    count: usize,
    i: usize,
) -> InjectResult<u32> {
    if i + 1 >= count {
        return Ok(0);
    }
    let offset = symtab_offset + (i + 1) * COFF_SYMBOL_SIZE;
    require_len(data, offset + COFF_SYMBOL_SIZE, "COFF symbol table")?;
    Ok(u32::from_le_bytes([
        data[offset + 8],
        data[offset + 9],
        data[offset + 10],
        data[offset + 11],
    ]))
}

/// Decode a COFF symbol's 8-byte `Name` field: either an inline
/// null-padded short name, or (when the first 4 bytes are zero) an
/// offset into the string table that follows the symbol table.
fn symbol_name<'a>(entry: &[u8], data: &'a [u8], strtab_offset: usize) -> InjectResult<&'a str> {
    if entry[0..4] == [0, 0, 0, 0] {
        let strtab_rel = u32::from_le_bytes([entry[4], entry[5], entry[6], entry[7]]) as usize;
        let start = strtab_offset + strtab_rel;
        let slice = data.get(start..).ok_or_else(|| InjectError::Malformed {
            kind: "COFF string table",
            detail: "offset out of bounds".to_string(),
        })?;
        let end = slice
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| InjectError::Malformed {
                kind: "COFF string table",
                detail: "unterminated name".to_string(),
            })?;
        std::str::from_utf8(&slice[..end]).map_err(|_| InjectError::Malformed {
            kind: "COFF string table",
            detail: "name is not valid UTF-8".to_string(),
        })
    } else {
        let end = entry[0..8].iter().position(|&b| b == 0).unwrap_or(8);
        std::str::from_utf8(&entry[0..end]).map_err(|_| InjectError::Malformed {
            kind: "COFF symbol",
            detail: "inline name is not valid UTF-8".to_string(),
        })
    }
}

fn require_len(data: &[u8], needed: usize, kind: &'static str) -> InjectResult<()> {
    if data.len() < needed {
        Err(InjectError::Malformed {
            kind,
            detail: format!("buffer too small: need {needed}, have {}", data.len()),
        })
    } else {
        Ok(())
    }
}

fn u32_le(data: &[u8], offset: usize, kind: &'static str) -> InjectResult<u32> {
    require_len(data, offset + 4, kind)?;
    Ok(u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ]))
}
