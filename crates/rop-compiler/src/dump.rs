//! `--write-gadgets`: render a catalog as `offset<TAB>canonical-key` lines
//! sorted by offset ascending, with an optional third column of
//! alternate-syntax disassembly when `--syntax` is not `none`.

use rop_catalog::{Arch, Catalog, Gadget, Syntax};

pub fn render(catalog: &Catalog, arch: Arch, syntax: Syntax) -> String {
    let mut entries: Vec<(u64, &str, &Gadget)> = catalog
        .iter()
        .map(|(key, gadget)| (gadget.offset, key.as_str(), gadget))
        .collect();
    entries.sort_by_key(|(offset, ..)| *offset);

    let mut out = String::new();
    for (offset, key, gadget) in entries {
        match syntax {
            Syntax::None => out.push_str(&format!("{offset}\t{key}\n")),
            _ => {
                let text = rop_catalog::render_instructions(&gadget.instructions, arch, syntax);
                out.push_str(&format!("{offset}\t{key}\t{text}\n"));
            }
        }
    }
    out
}
