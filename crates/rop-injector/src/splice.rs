//! Symbol surgery: splice a gadget pool into a named function's file
//! range, NOP-padding to the symbol's exact size (spec §4.7).

use crate::elf;
use crate::error::{InjectError, InjectResult};
use crate::pe;
use crate::symbol::SymbolRecord;

/// Host executable format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExeFormat {
    Elf,
    Pe,
}

/// x86 single-byte NOP.
const NOP: u8 = 0x90;

/// Locate `symbol_name` in `file` (format `format`), splice `gadgets`
/// into its file range, and return the modified file image.
///
/// `gadgets` must not exceed the symbol's size; if smaller, it is
/// right-padded with `0x90` NOPs to fill the symbol exactly. Total file
/// length and every byte outside the patched range are preserved.
pub fn splice(file: &[u8], format: ExeFormat, symbol_name: &str, gadgets: &[u8]) -> InjectResult<Vec<u8>> {
    let symbol = locate_symbol(file, format, symbol_name)?;
    splice_at(file, &symbol, gadgets)
}

fn locate_symbol(file: &[u8], format: ExeFormat, symbol_name: &str) -> InjectResult<SymbolRecord> {
    match format {
        ExeFormat::Elf => elf::find_symbol(file, symbol_name),
        ExeFormat::Pe => pe::find_symbol(file, symbol_name),
    }
}

fn splice_at(file: &[u8], symbol: &SymbolRecord, gadgets: &[u8]) -> InjectResult<Vec<u8>> {
    if gadgets.len() as u64 > symbol.size_bytes {
        return Err(InjectError::GadgetTooLarge {
            expected: symbol.size_bytes,
            actual: gadgets.len() as u64,
        });
    }

    let start = symbol.file_offset as usize;
    let size = symbol.size_bytes as usize;
    let end = start
        .checked_add(size)
        .filter(|&e| e <= file.len())
        .ok_or_else(|| InjectError::Malformed {
            kind: "symbol range",
            detail: "symbol extends past end of file".to_string(),
        })?;

    let mut out = Vec::with_capacity(file.len());
    out.extend_from_slice(&file[..start]);
    out.extend_from_slice(gadgets);
    out.extend(std::iter::repeat(NOP).take(size - gadgets.len()));
    out.extend_from_slice(&file[end..]);

    debug_assert_eq!(out.len(), file.len());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(offset: u64, size: u64) -> SymbolRecord {
        SymbolRecord {
            name: "anchor".to_string(),
            file_offset: offset,
            size_bytes: size,
        }
    }

    #[test]
    fn s6_pads_with_nops_to_symbol_size() {
        let file = vec![0xAAu8; 32];
        let gadgets = vec![0x11u8; 10];
        let sym = symbol(8, 16);
        let out = splice_at(&file, &sym, &gadgets).unwrap();

        assert_eq!(out.len(), file.len());
        assert_eq!(&out[8..18], &gadgets[..]);
        assert_eq!(&out[18..24], &[0x90; 6]);
        assert_eq!(&out[..8], &file[..8]);
        assert_eq!(&out[24..], &file[24..]);
    }

    #[test]
    fn gadgets_exactly_filling_symbol_need_no_padding() {
        let file = vec![0u8; 16];
        let gadgets = vec![0x11u8; 16];
        let sym = symbol(0, 16);
        let out = splice_at(&file, &sym, &gadgets).unwrap();
        assert_eq!(out, gadgets);
    }

    #[test]
    fn oversized_gadget_pool_is_rejected() {
        let file = vec![0u8; 16];
        let gadgets = vec![0x11u8; 17];
        let sym = symbol(0, 16);
        assert!(matches!(
            splice_at(&file, &sym, &gadgets),
            Err(InjectError::GadgetTooLarge { expected: 16, actual: 17 })
        ));
    }

    #[test]
    fn preserves_total_file_length() {
        let file = vec![0xFFu8; 64];
        let gadgets = vec![0x90u8; 4];
        let sym = symbol(20, 8);
        let out = splice_at(&file, &sym, &gadgets).unwrap();
        assert_eq!(out.len(), file.len());
    }
}
