//! Informational-only alternate-syntax rendering for `--write-gadgets`
//! dumps. Never consulted by [`crate::key::canonical_key`]: the
//! catalog's lookup key is always the fixed Intel-derived form produced
//! at decode time, regardless of what a caller asks to display here.

use iced_x86::{Decoder as IcedDecoder, DecoderOptions, Formatter, GasFormatter};

use crate::arch::{Arch, Syntax};
use crate::instruction::Instruction;

/// Render `instructions` in the requested display syntax, joined the
/// same way [`crate::key::canonical_key`] joins them (`"; "`).
///
/// `Syntax::None` yields an empty string (nothing to render).
/// `Syntax::Intel` and `Syntax::Native` reuse each instruction's
/// already-decoded (Intel) text form. `Syntax::Att` re-decodes each
/// instruction's raw bytes with an AT&T-syntax formatter; ARM has no
/// AT&T convention, so it falls back to the native form.
pub fn render_instructions(instructions: &[Instruction], arch: Arch, syntax: Syntax) -> String {
    match syntax {
        Syntax::None => String::new(),
        Syntax::Intel | Syntax::Native => join_native(instructions),
        Syntax::Att if arch.is_x86() => join_att(instructions, arch),
        Syntax::Att => join_native(instructions),
    }
}

fn join_native(instructions: &[Instruction]) -> String {
    instructions
        .iter()
        .map(|inst| inst.text_form.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_att(instructions: &[Instruction], arch: Arch) -> String {
    let bitness = match arch {
        Arch::X86_16 => 16,
        Arch::X86_32 => 32,
        Arch::X86_64 => 64,
        Arch::Arm => unreachable!("join_att is only called for x86 arches"),
    };

    instructions
        .iter()
        .map(|inst| {
            let mut decoder = IcedDecoder::new(bitness, &inst.bytes, DecoderOptions::NONE);
            let decoded = decoder.decode();
            let mut formatter = GasFormatter::new();
            let mut text = String::new();
            formatter.format(&decoded, &mut text);
            text.make_ascii_lowercase();
            text
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode_one;

    #[test]
    fn none_syntax_renders_nothing() {
        let inst = decode_one(&[0xc3], Arch::X86_64).unwrap();
        assert_eq!(render_instructions(&[inst], Arch::X86_64, Syntax::None), "");
    }

    #[test]
    fn intel_syntax_reuses_canonical_text() {
        let inst = decode_one(&[0x5f], Arch::X86_64).unwrap();
        assert_eq!(
            render_instructions(&[inst], Arch::X86_64, Syntax::Intel),
            "pop rdi"
        );
    }

    #[test]
    fn att_syntax_renders_operands_in_source_dest_order() {
        // `mov rax, rdi` (Intel: dest, src) -> AT&T: `mov %rdi, %rax`.
        let inst = decode_one(&[0x48, 0x89, 0xf8], Arch::X86_64).unwrap();
        let text = render_instructions(&[inst], Arch::X86_64, Syntax::Att);
        assert!(text.contains("%rdi"));
        assert!(text.contains("%rax"));
    }

    #[test]
    fn arm_falls_back_to_native_for_att() {
        let inst = decode_one(&0xd65f_03c0u32.to_le_bytes(), Arch::Arm).unwrap();
        assert_eq!(render_instructions(&[inst], Arch::Arm, Syntax::Att), "ret");
    }
}
