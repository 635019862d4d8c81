//! The decoded instruction type shared by every architecture backend.

/// The only opcode classification the core cares about: is this
/// instruction a `RET`, or something else. Everything else about an
/// instruction's semantics is opaque to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeKind {
    /// A return instruction (`ret`, `retn`, `retf`, AArch64 `ret`/`retaa`/`retab`).
    Ret,
    /// Any other instruction.
    Other,
}

/// A single decoded instruction.
///
/// Immutable once decoded. `length_bytes` is 1..15 for x86, and 2 or 4 for
/// ARM (Thumb vs. AArch64 widths; this crate only decodes AArch64, so in
/// practice it is always 4 here).
#[derive(Debug, Clone)]
pub struct Instruction {
    /// Encoded length of this instruction.
    pub length_bytes: u8,
    /// `RET` vs. everything else.
    pub opcode_kind: OpcodeKind,
    /// Canonical mnemonic + operand rendering, already lower-cased.
    ///
    /// This is the text form consumed by [`crate::key::canonical_key`]. Its
    /// format is deterministic and is part of the user-visible surface:
    /// anyone hand-authoring a `source.rop` file must see the same
    /// rendering the compiler produces.
    pub text_form: String,
    /// Raw encoded bytes of this instruction.
    pub bytes: Vec<u8>,
}

impl Instruction {
    /// Whether this instruction terminates a gadget.
    pub fn is_ret(&self) -> bool {
        self.opcode_kind == OpcodeKind::Ret
    }
}
