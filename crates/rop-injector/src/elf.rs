//! ELF64 symbol lookup and virtual-address-to-file-offset translation.
//!
//! A deliberately narrow clean-room ELF64 reader: just enough header,
//! section-header, and symbol-table parsing to answer "where does symbol
//! X live in the file, and how big is it", adapted from the teacher's
//! ELF module style (explicit little-endian field extraction,
//! `BufferTooSmall`-style bounds checks) but scoped to what the injector
//! needs rather than a general loader.

use crate::error::{InjectError, InjectResult};
use crate::symbol::SymbolRecord;

const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];
const EI_CLASS: usize = 4;
const ELFCLASS64: u8 = 2;

const SHT_SYMTAB: u32 = 2;

struct Elf64Header {
    e_shoff: u64,
    e_shentsize: u16,
    e_shnum: u16,
    e_shstrndx: u16,
}

impl Elf64Header {
    const SIZE: usize = 64;

    fn parse(data: &[u8]) -> InjectResult<Self> {
        require_len(data, Self::SIZE, "ELF header")?;
        if data[0..4] != ELF_MAGIC {
            return Err(InjectError::Malformed {
                kind: "ELF header",
                detail: "bad magic".to_string(),
            });
        }
        if data[EI_CLASS] != ELFCLASS64 {
            return Err(InjectError::Malformed {
                kind: "ELF header",
                detail: "not ELF64".to_string(),
            });
        }
        Ok(Self {
            e_shoff: u64_le(data, 0x28),
            e_shentsize: u16_le(data, 0x3a),
            e_shnum: u16_le(data, 0x3c),
            e_shstrndx: u16_le(data, 0x3e),
        })
    }
}

struct SectionHeader {
    sh_name: u32,
    sh_type: u32,
    sh_addr: u64,
    sh_offset: u64,
    sh_size: u64,
    sh_link: u32,
}

impl SectionHeader {
    const SIZE: usize = 64;

    fn parse(data: &[u8]) -> InjectResult<Self> {
        require_len(data, Self::SIZE, "section header")?;
        Ok(Self {
            sh_name: u32_le(data, 0x00),
            sh_type: u32_le(data, 0x04),
            sh_addr: u64_le(data, 0x10),
            sh_offset: u64_le(data, 0x18),
            sh_size: u64_le(data, 0x20),
            sh_link: u32_le(data, 0x28),
        })
    }
}

struct Symbol {
    st_name: u32,
    st_value: u64,
    st_size: u64,
}

impl Symbol {
    const SIZE: usize = 24;

    fn parse(data: &[u8]) -> InjectResult<Self> {
        require_len(data, Self::SIZE, "ELF symbol")?;
        Ok(Self {
            st_name: u32_le(data, 0x00),
            st_value: u64_le(data, 0x08),
            st_size: u64_le(data, 0x10),
        })
    }
}

/// Locate `name` in `data` (a full ELF64 file image) and translate its
/// virtual address to a file offset via the `.text` section mapping
/// (spec §4.7 step 2).
pub fn find_symbol(data: &[u8], name: &str) -> InjectResult<SymbolRecord> {
    let header = Elf64Header::parse(data)?;
    let sections = parse_section_headers(data, &header)?;

    let shstrtab = section_bytes(data, &sections[header.e_shstrndx as usize])?;
    let text = sections
        .iter()
        .find(|s| section_name(shstrtab, s.sh_name) == Some(".text"))
        .ok_or_else(|| InjectError::Malformed {
            kind: "ELF sections",
            detail: "no .text section".to_string(),
        })?;

    for section in &sections {
        if section.sh_type != SHT_SYMTAB {
            continue;
        }
        let strtab = section_bytes(data, &sections[section.sh_link as usize])?;
        let symtab = section_bytes(data, section)?;

        for chunk in symtab.chunks_exact(Symbol::SIZE) {
            let sym = Symbol::parse(chunk)?;
            if section_name(strtab, sym.st_name) == Some(name) {
                let file_offset = sym.st_value - text.sh_addr + text.sh_offset;
                return Ok(SymbolRecord {
                    name: name.to_string(),
                    file_offset,
                    size_bytes: sym.st_size,
                });
            }
        }
    }

    Err(InjectError::SymbolNotFound(name.to_string()))
}

fn parse_section_headers(data: &[u8], header: &Elf64Header) -> InjectResult<Vec<SectionHeader>> {
    let shoff = header.e_shoff as usize;
    let entsize = header.e_shentsize as usize;
    let count = header.e_shnum as usize;

    let mut sections = Vec::with_capacity(count);
    for i in 0..count {
        let offset = shoff + i * entsize;
        require_len(data, offset + SectionHeader::SIZE, "section header table")?;
        sections.push(SectionHeader::parse(&data[offset..])?);
    }
    Ok(sections)
}

fn section_bytes<'a>(data: &'a [u8], section: &SectionHeader) -> InjectResult<&'a [u8]> {
    let start = section.sh_offset as usize;
    let end = start + section.sh_size as usize;
    data.get(start..end).ok_or_else(|| InjectError::Malformed {
        kind: "ELF section",
        detail: "section extends past end of file".to_string(),
    })
}

fn section_name(strtab: &[u8], index: u32) -> Option<&str> {
    let index = index as usize;
    let slice = strtab.get(index..)?;
    let end = slice.iter().position(|&b| b == 0)?;
    std::str::from_utf8(&slice[..end]).ok()
}

fn require_len(data: &[u8], needed: usize, kind: &'static str) -> InjectResult<()> {
    if data.len() < needed {
        Err(InjectError::Malformed {
            kind,
            detail: format!("buffer too small: need {needed}, have {}", data.len()),
        })
    } else {
        Ok(())
    }
}

fn u16_le(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

fn u64_le(data: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[offset..offset + 8]);
    u64::from_le_bytes(bytes)
}
