//! Gadget catalog construction.
//!
//! Partitions a decoded instruction stream at every `RET` and enumerates
//! every tail suffix of the resulting instruction group as a usable
//! gadget, per spec §4.2.

use std::collections::BTreeMap;

use crate::arch::Arch;
use crate::decoder::{self, DecodeError};
use crate::gadget::Gadget;
use crate::instruction::Instruction;
use crate::key::canonical_key;

/// Canonical key → gadget. Built once per compilation, read-only
/// thereafter. A `BTreeMap` gives deterministic, offset-independent
/// iteration order for `--write-gadgets`-style dumps (sorted separately
/// by offset, since the map is keyed by text) and native last-write-wins
/// semantics on key collision, which is the specified tie-break.
pub type Catalog = BTreeMap<String, Gadget>;

/// Build a gadget catalog from a raw machine-code blob.
///
/// A pool with no `RET` produces an empty catalog. A trailing `RET`-less
/// remainder at the end of the pool is silently discarded (spec §4.2
/// edge cases). Any decode failure aborts the whole build; a partial
/// catalog is never returned.
pub fn build(pool: &[u8], arch: Arch) -> Result<Catalog, DecodeError> {
    let mut catalog = Catalog::new();

    let mut accumulator: Vec<Instruction> = Vec::new();
    let mut start_offset: u64 = 0;
    let mut next_offset: u64 = 0;

    decoder::decode_stream(pool, arch, |inst, _idx| {
        accumulator.push(inst.clone());
        next_offset += inst.length_bytes as u64;

        if inst.is_ret() {
            insert_suffixes(&mut catalog, &accumulator, start_offset);
            accumulator.clear();
            start_offset = next_offset;
        }
    })?;

    Ok(catalog)
}

/// Insert every tail suffix of a completed `RET`-terminated instruction
/// group, keyed by its canonical form. `group[0..]` starts at file/pool
/// offset `group_start`.
fn insert_suffixes(catalog: &mut Catalog, group: &[Instruction], group_start: u64) {
    let mut prefix_len: u64 = 0;
    for j in 0..group.len() {
        let suffix = &group[j..];
        let key = canonical_key(suffix);
        let offset = group_start + prefix_len;
        catalog.insert(
            key,
            Gadget {
                instructions: suffix.to_vec(),
                offset,
            },
        );
        prefix_len += group[j].length_bytes as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pool_yields_empty_catalog() {
        let catalog = build(&[], Arch::X86_64).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn single_ret_pool() {
        let catalog = build(&[0xc3], Arch::X86_64).unwrap();
        assert_eq!(catalog.len(), 1);
        let gadget = &catalog["ret"];
        assert_eq!(gadget.offset, 0);
        assert_eq!(gadget.instructions.len(), 1);
    }

    #[test]
    fn pop_rdi_ret_enumerates_both_suffixes() {
        let catalog = build(&[0x5f, 0xc3], Arch::X86_64).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog["pop rdi; ret"].offset, 0);
        assert_eq!(catalog["ret"].offset, 1);
    }

    #[test]
    fn trailing_ret_less_remainder_is_discarded() {
        // pop rdi; ret; pop rsi (no terminating ret for the last instruction)
        let catalog = build(&[0x5f, 0xc3, 0x5e], Arch::X86_64).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(!catalog.contains_key("pop rsi"));
    }

    #[test]
    fn duplicate_suffix_keys_use_last_write_wins() {
        // ret; ret -> both suffixes key to "ret"; the second (offset 1) wins.
        let catalog = build(&[0xc3, 0xc3], Arch::X86_64).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog["ret"].offset, 1);
    }

    #[test]
    fn decode_failure_propagates_and_yields_no_partial_catalog() {
        // 0x0f 0x0b is ud2 (valid); feed a single stray 0x0f which cannot
        // stand alone as a complete instruction at end of buffer.
        let err = build(&[0x0f], Arch::X86_64);
        assert!(err.is_err());
    }
}
