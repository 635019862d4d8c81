//! Resolves an unresolved chain against a runtime base address (spec
//! §4.5). Pure and portable: no stack introspection, no `unsafe`, fully
//! unit-testable on its own.

use rop_format::{detect_tag, RESOLVED_CHAIN_MAX};

/// A resolved chain, zero-padded to [`RESOLVED_CHAIN_MAX`] bytes.
pub struct ResolvedChain {
    buf: [u8; RESOLVED_CHAIN_MAX],
    len: usize,
}

impl ResolvedChain {
    /// The resolved bytes, excluding trailing zero padding beyond the
    /// input chain's own length.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// A pointer to the first byte of the resolved chain, the address
    /// the stack-pivot primitive redirects control flow to.
    pub fn as_ptr(&self) -> *const u8 {
        self.buf.as_ptr()
    }
}

/// Walk `chain` in 8-byte strides. Tagged words are rewritten to
/// `base + offset` as little-endian 64-bit addresses; everything else
/// (literal `d`/`D` data) is copied through verbatim. Any trailing
/// remainder shorter than 8 bytes is copied as-is.
///
/// `chain` longer than [`RESOLVED_CHAIN_MAX`] bytes is truncated; the
/// spec bounds the resolved buffer at 1024 bytes and does not specify
/// behavior beyond that bound.
pub fn resolve(chain: &[u8], base: u64) -> ResolvedChain {
    let mut buf = [0u8; RESOLVED_CHAIN_MAX];
    let truncated = &chain[..chain.len().min(RESOLVED_CHAIN_MAX)];

    let mut len = 0;
    let mut chunks = truncated.chunks_exact(8);
    for chunk in &mut chunks {
        let chunk: &[u8; 8] = chunk.try_into().expect("chunks_exact(8) yields 8-byte slices");
        let resolved = match detect_tag(chunk) {
            Some(offset) => (base + offset as u64).to_le_bytes(),
            None => *chunk,
        };
        buf[len..len + 8].copy_from_slice(&resolved);
        len += 8;
    }

    let remainder = chunks.remainder();
    buf[len..len + remainder.len()].copy_from_slice(remainder);
    len += remainder.len();

    ResolvedChain { buf, len }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s5_resolves_tagged_word_to_little_endian_address() {
        let chain = [0xBA, 0x68, 0x65, 0x77, 0x6D, 0xBE, 0x00, 0x10];
        let resolved = resolve(&chain, 0x0000_7F11_2233_0000);
        assert_eq!(
            resolved.as_bytes(),
            &[0x10, 0x00, 0x33, 0x22, 0x11, 0x7F, 0x00, 0x00]
        );
    }

    #[test]
    fn literal_data_words_pass_through_unchanged() {
        let chain = [0xCD, 0xAB, 0, 0, 0, 0, 0, 0];
        let resolved = resolve(&chain, 0x1000);
        assert_eq!(resolved.as_bytes(), &chain);
    }

    #[test]
    fn multiple_words_resolve_independently() {
        let mut chain = Vec::new();
        chain.extend_from_slice(&[0xBA, 0x68, 0x65, 0x77, 0x6D, 0xBE, 0x00, 0x00]);
        chain.extend_from_slice(&[0xEF, 0xBE, 0xAD, 0xDE, 0, 0, 0, 0]);
        chain.extend_from_slice(&[0xBA, 0x68, 0x65, 0x77, 0x6D, 0xBE, 0x00, 0x01]);

        let resolved = resolve(&chain, 0x400000);
        assert_eq!(&resolved.as_bytes()[0..8], &0x400000u64.to_le_bytes());
        assert_eq!(&resolved.as_bytes()[8..16], &[0xEF, 0xBE, 0xAD, 0xDE, 0, 0, 0, 0]);
        assert_eq!(&resolved.as_bytes()[16..24], &0x400001u64.to_le_bytes());
    }

    #[test]
    fn empty_chain_resolves_to_empty() {
        let resolved = resolve(&[], 0x1000);
        assert_eq!(resolved.as_bytes(), &[] as &[u8]);
    }

    #[test]
    fn short_trailing_remainder_passes_through() {
        let chain = [1, 2, 3];
        let resolved = resolve(&chain, 0x1000);
        assert_eq!(resolved.as_bytes(), &chain);
    }

    #[test]
    fn oversized_chain_is_truncated_to_resolved_chain_max() {
        let chain = vec![0u8; RESOLVED_CHAIN_MAX + 16];
        let resolved = resolve(&chain, 0x1000);
        assert_eq!(resolved.as_bytes().len(), RESOLVED_CHAIN_MAX);
    }
}
