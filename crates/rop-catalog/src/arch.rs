//! Architecture configuration for the decoder.
//!
//! The decoder is polymorphic over a small, closed set of architectures.
//! This is modeled as a tagged enum plus a dispatch table in
//! [`crate::decoder`], not as runtime reflection over trait objects.

/// Target architecture and bitness for a decode operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    /// 16-bit x86 (real mode).
    X86_16,
    /// 32-bit x86.
    X86_32,
    /// 64-bit x86 (x86-64 / AMD64).
    X86_64,
    /// AArch64.
    Arm,
}

impl Arch {
    /// Whether this architecture is handled by the x86 backend.
    pub fn is_x86(self) -> bool {
        matches!(self, Self::X86_16 | Self::X86_32 | Self::X86_64)
    }
}

/// Disassembly syntax used for the informational text rendered next to
/// `--write-gadgets` output. Purely cosmetic: the catalog's canonical key
/// (§4.3) never depends on this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Syntax {
    /// No textual rendering requested.
    #[default]
    None,
    /// AT&T syntax (source, dest operand order).
    Att,
    /// Intel syntax (dest, source operand order).
    Intel,
    /// The decoder's own native rendering (same as Intel for x86; a
    /// mnemonic+operand dump for ARM, which has no AT&T convention).
    Native,
}
