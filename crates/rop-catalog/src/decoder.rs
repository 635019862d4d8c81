//! Streaming instruction decoder.
//!
//! Dispatch across architectures is a tagged [`Arch`] plus a small
//! backend trait (`ArchBackend`), never runtime reflection: each backend
//! is selected once per call and the rest of the catalog never needs to
//! know which one ran.

use thiserror::Error;

use crate::arch::Arch;
use crate::instruction::Instruction;

/// Decode failure: the byte index at which decoding stopped, and how
/// many bytes remained in the buffer at that point.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("decode failed at byte {byte_index} ({remaining} bytes remaining)")]
pub struct DecodeError {
    pub byte_index: usize,
    pub remaining: usize,
}

/// A backend capable of decoding one architecture family.
pub(crate) trait ArchBackend {
    fn decode_one(&self, bytes: &[u8]) -> Result<Instruction, DecodeError>;
}

fn backend_for(arch: Arch) -> Box<dyn ArchBackend> {
    if arch.is_x86() {
        Box::new(crate::x86::X86Backend::new(arch))
    } else {
        Box::new(crate::arm::ArmBackend)
    }
}

/// Decode a single instruction from the head of `bytes`.
pub fn decode_one(bytes: &[u8], arch: Arch) -> Result<Instruction, DecodeError> {
    backend_for(arch).decode_one(bytes)
}

/// Decode every instruction in `bytes` sequentially, invoking
/// `on_instruction` for each one along with its byte offset from the
/// start of the buffer. Offsets are monotonically non-decreasing:
/// `index[i+1] = index[i] + inst[i].length_bytes`.
///
/// Any decode failure aborts the stream immediately; no partial result is
/// returned to the caller via `on_instruction` beyond what was already
/// delivered.
pub fn decode_stream(
    bytes: &[u8],
    arch: Arch,
    mut on_instruction: impl FnMut(&Instruction, u64),
) -> Result<(), DecodeError> {
    let backend = backend_for(arch);
    let mut offset = 0usize;

    while offset < bytes.len() {
        let inst = backend.decode_one(&bytes[offset..]).map_err(|e| DecodeError {
            byte_index: offset + e.byte_index,
            remaining: e.remaining,
        })?;
        on_instruction(&inst, offset as u64);
        offset += inst.length_bytes as usize;
    }

    Ok(())
}
