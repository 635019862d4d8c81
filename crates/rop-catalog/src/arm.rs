//! Minimal AArch64 decode backend.
//!
//! This is deliberately small: the runner and stack-pivot primitive are
//! 64-bit x86 only (spec Non-goals), so ARM support here exists purely to
//! let the catalog build ARM gadget pools offline. It decodes fixed
//! 4-byte instruction words and classifies `RET`/`RETAA`/`RETAB`; every
//! other instruction gets a `word <hex>` canonical text form, which is
//! enough to key a catalog even though it is not a real disassembly.

use crate::decoder::{ArchBackend, DecodeError};
use crate::instruction::{Instruction, OpcodeKind};

/// `ret` with the default link register (x30).
const RET: u32 = 0xd65f_03c0;
/// `retaa` / `retab` (pointer-authenticated return), ARMv8.3 PAuth.
const RETAA: u32 = 0xd65f_0bff;
const RETAB: u32 = 0xd65f_0fff;

pub(crate) struct ArmBackend;

impl ArchBackend for ArmBackend {
    fn decode_one(&self, bytes: &[u8]) -> Result<Instruction, DecodeError> {
        if bytes.len() < 4 {
            return Err(DecodeError {
                byte_index: 0,
                remaining: bytes.len(),
            });
        }

        let word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let (opcode_kind, text_form) = match word {
            RET => (OpcodeKind::Ret, "ret".to_string()),
            RETAA => (OpcodeKind::Ret, "retaa".to_string()),
            RETAB => (OpcodeKind::Ret, "retab".to_string()),
            other => (OpcodeKind::Other, format!("word {other:#010x}")),
        };

        Ok(Instruction {
            length_bytes: 4,
            opcode_kind,
            text_form,
            bytes: bytes[..4].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_ret() {
        let inst = ArmBackend.decode_one(&RET.to_le_bytes()).unwrap();
        assert!(inst.is_ret());
        assert_eq!(inst.text_form, "ret");
    }

    #[test]
    fn decodes_non_ret_as_opaque_word() {
        let inst = ArmBackend.decode_one(&0x91000000u32.to_le_bytes()).unwrap();
        assert!(!inst.is_ret());
        assert_eq!(inst.text_form, "word 0x91000000");
    }

    #[test]
    fn rejects_short_buffer() {
        assert!(ArmBackend.decode_one(&[0, 0, 0]).is_err());
    }
}
