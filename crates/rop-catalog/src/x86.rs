//! x86/x86-64 decode backend, built on `iced-x86`.

use iced_x86::{Decoder as IcedDecoder, DecoderOptions, Formatter, IntelFormatter, Mnemonic};

use crate::arch::Arch;
use crate::decoder::DecodeError;
use crate::instruction::{Instruction, OpcodeKind};

pub(crate) struct X86Backend {
    bitness: u32,
}

impl X86Backend {
    pub(crate) fn new(arch: Arch) -> Self {
        let bitness = match arch {
            Arch::X86_16 => 16,
            Arch::X86_32 => 32,
            Arch::X86_64 => 64,
            Arch::Arm => unreachable!("X86Backend only ever constructed for x86 arches"),
        };
        Self { bitness }
    }
}

impl crate::decoder::ArchBackend for X86Backend {
    fn decode_one(&self, bytes: &[u8]) -> Result<Instruction, DecodeError> {
        let mut decoder = IcedDecoder::new(self.bitness, bytes, DecoderOptions::NONE);
        if !decoder.can_decode() {
            return Err(DecodeError {
                byte_index: 0,
                remaining: bytes.len(),
            });
        }

        let inst = decoder.decode();
        if inst.is_invalid() {
            return Err(DecodeError {
                byte_index: 0,
                remaining: bytes.len(),
            });
        }

        let length = inst.len();
        let opcode_kind = if matches!(inst.mnemonic(), Mnemonic::Ret | Mnemonic::Retf) {
            OpcodeKind::Ret
        } else {
            OpcodeKind::Other
        };

        let mut formatter = IntelFormatter::new();
        let mut text_form = String::new();
        formatter.format(&inst, &mut text_form);
        text_form.make_ascii_lowercase();

        Ok(Instruction {
            length_bytes: length as u8,
            opcode_kind,
            text_form,
            bytes: bytes[..length].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::ArchBackend as _;

    #[test]
    fn decodes_ret() {
        let backend = X86Backend::new(Arch::X86_64);
        let inst = backend.decode_one(&[0xc3]).unwrap();
        assert!(inst.is_ret());
        assert_eq!(inst.text_form, "ret");
    }

    #[test]
    fn decodes_pop_rdi() {
        let backend = X86Backend::new(Arch::X86_64);
        let inst = backend.decode_one(&[0x5f, 0xc3]).unwrap();
        assert!(!inst.is_ret());
        assert_eq!(inst.length_bytes, 1);
        assert_eq!(inst.text_form, "pop rdi");
    }

    #[test]
    fn rejects_empty_buffer() {
        let backend = X86Backend::new(Arch::X86_64);
        assert!(backend.decode_one(&[]).is_err());
    }
}
