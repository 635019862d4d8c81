//! Cross-crate round-trip: compile a source chain against a catalog,
//! then resolve it against a runtime base, and check the result matches
//! addresses computed by hand (spec §8, testable property #6).

use rop_catalog::Arch;

#[test]
fn s2_compile_then_resolve_matches_hand_computed_addresses() {
    // `pop rdi; ret` (0x5F 0xC3) followed by a bare `ret` (0xC3).
    let pool = [0x5Fu8, 0xC3, 0xC3];
    let catalog = rop_catalog::build(&pool, Arch::X86_64).unwrap();

    let source = "g: pop rdi; ret\ng: ret\n";
    let unresolved = rop_compiler::compile(source, &catalog).unwrap();
    assert_eq!(unresolved.len(), 16);

    let base = 0x0000_5555_0000_0000u64;
    let resolved = rop_runner::resolve(&unresolved, base);

    let first_gadget = catalog.get("pop rdi; ret").unwrap();
    let second_gadget = catalog.get("ret").unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(&(base + first_gadget.offset).to_le_bytes());
    expected.extend_from_slice(&(base + second_gadget.offset).to_le_bytes());

    assert_eq!(resolved.as_bytes(), expected.as_slice());
}

#[test]
fn data_directives_survive_the_round_trip_unresolved() {
    let pool = [0xC3u8];
    let catalog = rop_catalog::build(&pool, Arch::X86_64).unwrap();

    let source = "g: ret\nD: deadbeef\n";
    let unresolved = rop_compiler::compile(source, &catalog).unwrap();

    let base = 0x4000_0000u64;
    let resolved = rop_runner::resolve(&unresolved, base);

    assert_eq!(&resolved.as_bytes()[0..8], &base.to_le_bytes());
    assert_eq!(&resolved.as_bytes()[8..12], &[0xEF, 0xBE, 0xAD, 0xDE]);
}
