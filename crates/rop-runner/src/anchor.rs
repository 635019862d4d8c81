//! The runner's own anchor function and gadget-pool base-address
//! provider (spec §9 "Global process-wide state").
//!
//! `ropinject` overwrites a named function's body offline; at runtime,
//! taking that same symbol's address from inside this process yields
//! the gadget pool's base. The provider is an explicit function rather
//! than implicit global state, so the resolver takes its base address
//! as a plain parameter and stays portable and testable.

/// The function whose body is the splice target. Never actually
/// executed as written: `ropinject` overwrites it with a gadget pool
/// before this binary runs.
#[no_mangle]
pub extern "C" fn rop_anchor() {
    std::hint::black_box(());
}

/// The runtime base address of the gadget pool, i.e. the address of
/// [`rop_anchor`] in this process's own image.
pub fn base_address_of_gadget_pool() -> u64 {
    rop_anchor as usize as u64
}
