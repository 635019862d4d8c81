//! The location and extent of a function within an executable file, in
//! file-image coordinates (spec §3).

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
    pub name: String,
    pub file_offset: u64,
    pub size_bytes: u64,
}
