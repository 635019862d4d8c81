//! The stack-pivot primitive (spec §4.6) and its fork-before-pivot
//! precondition (spec §9 "Fork-before-pivot").
//!
//! The PC lookup and the stack scan must run in the *same* call frame:
//! the value we search for is this function's own saved return address,
//! i.e. the exact slot the scan is about to find and overwrite. Reading
//! it via a separate helper function (as the original's
//! `junk_x86`/`pointSavedRipToRopChain_x86_64` never does) would instead
//! yield the return address of *that* call, a different code address
//! entirely. So both steps live inline in [`pivot`], never split across
//! a call boundary — matching `original_source/rop-runner/main.go`'s
//! single-function design, where `runtime.Caller(1)` is called from
//! inside the pivot itself.

use std::arch::asm;
use std::ptr;

use crate::resolver::ResolvedChain;

/// Expected distance, in bytes, between a `call` site and the return
/// site immediately following it. Source-observed and
/// architecture-specific (spec §9 open questions); not derived from any
/// formal guarantee.
pub const PIVOT_WINDOW: u64 = 12;

/// Number of consecutive 8-byte words scanned from `scan_base`, i.e.
/// 2048 bytes of stack (spec §4.6 step 2).
const SCAN_WORDS: usize = 256;

/// Scan the current stack region for a word that looks like the saved
/// return address of the calling frame, and overwrite every match with
/// the address of `chain`'s first byte.
///
/// Returns the number of slots overwritten. Zero is the documented
/// failure mode: the pivot had no effect and the caller's epilogue
/// returns to its original caller unchanged (spec §4.6 "Failure mode").
///
/// # Safety
///
/// The caller must guarantee the host process is single-threaded for
/// the duration of this call (see [`fork_before_pivot`]) and that
/// `chain` remains valid for as long as control may later transfer into
/// it. This function reads and writes raw stack memory outside any
/// value it owns; it is inherently unsound in the general case and is
/// only as safe as the heuristic in spec §4.6 is accurate. It also
/// relies on the binary retaining frame pointers, and must never be
/// inlined into its caller — inlining would merge this function's frame
/// into the caller's and make the `[rbp+8]` read below refer to a
/// different, older return address.
#[inline(never)]
pub unsafe fn pivot(chain: &ResolvedChain) -> usize {
    let mut anchor: u64 = 0;
    let scan_base: *mut u64 = ptr::addr_of_mut!(anchor);

    // SAFETY: reads this function's own `rbp` and then the saved return
    // address at `[rbp+8]` (standard SysV x86-64 frame layout) — the
    // address this very call will return to once `pivot` runs its own
    // epilogue. That is exactly the slot the scan below is looking for.
    let caller_pc: u64 = unsafe {
        let rbp: u64;
        asm!("mov {}, rbp", out(reg) rbp, options(nomem, nostack, preserves_flags));
        ptr::read((rbp + 8) as *const u64)
    };

    let target = chain.as_ptr() as u64;
    // SAFETY: see function-level safety contract; `scan_base` points
    // into this function's own live stack frame.
    unsafe { scan_and_overwrite(scan_base, caller_pc, target) }
}

/// The pure scan-and-overwrite core of [`pivot`], split out so its
/// matching logic is exercisable against a synthetic buffer in tests
/// without touching real stack memory or frame pointers.
///
/// # Safety
///
/// `scan_base` must be valid for reads and writes of `SCAN_WORDS`
/// consecutive `u64`s.
unsafe fn scan_and_overwrite(scan_base: *mut u64, caller_pc: u64, target: u64) -> usize {
    let mut overwritten = 0usize;
    for i in 0..SCAN_WORDS {
        // SAFETY: `i < SCAN_WORDS`, within the caller's guarantee.
        let slot = unsafe { scan_base.add(i) };
        let word = unsafe { ptr::read_volatile(slot) };
        if word > caller_pc && word < caller_pc + PIVOT_WINDOW {
            // SAFETY: see above.
            unsafe { ptr::write_volatile(slot, target) };
            overwritten += 1;
        }
    }
    overwritten
}

/// Fork a single-threaded child via the raw `fork(2)` syscall — never a
/// higher-level process-spawning library, which may start auxiliary
/// threads and violate the pivot's single-threaded precondition (spec
/// §9 "Fork-before-pivot").
///
/// The parent exits immediately with status 0. Only the child returns
/// from this call.
pub fn fork_before_pivot() -> std::io::Result<()> {
    // SAFETY: fork(2) is safe to call with no preconditions beyond the
    // usual async-signal-safety caveats for what runs between fork and
    // exec/exit, which this crate does not do.
    let pid = unsafe { libc::fork() };
    if pid < 0 {
        return Err(std::io::Error::last_os_error());
    }
    if pid > 0 {
        std::process::exit(0);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_and_overwrite_rewrites_a_matching_slot() {
        let caller_pc = 0x55_5555_1234u64;
        let target = 0xdead_beef_0000u64;
        let mut words = vec![0u64; SCAN_WORDS];
        words[10] = caller_pc + 4; // within PIVOT_WINDOW

        let hits = unsafe { scan_and_overwrite(words.as_mut_ptr(), caller_pc, target) };

        assert_eq!(hits, 1);
        assert_eq!(words[10], target);
    }

    #[test]
    fn scan_and_overwrite_ignores_words_outside_the_window() {
        let caller_pc = 0x1000u64;
        let target = 0x2000u64;
        let mut words = vec![0u64; SCAN_WORDS];
        words[5] = caller_pc; // not strictly greater than caller_pc
        words[6] = caller_pc + PIVOT_WINDOW; // not strictly less than the bound
        words[7] = caller_pc + PIVOT_WINDOW + 1; // past the window
        let before = words.clone();

        let hits = unsafe { scan_and_overwrite(words.as_mut_ptr(), caller_pc, target) };

        assert_eq!(hits, 0);
        assert_eq!(words, before);
    }

    #[test]
    fn scan_and_overwrite_rewrites_every_matching_slot() {
        let caller_pc = 0x9000u64;
        let target = 0xabcdu64;
        let mut words = vec![0u64; SCAN_WORDS];
        words[0] = caller_pc + 1;
        words[1] = caller_pc + 2;

        let hits = unsafe { scan_and_overwrite(words.as_mut_ptr(), caller_pc, target) };

        assert_eq!(hits, 2);
        assert_eq!(words[0], target);
        assert_eq!(words[1], target);
    }
}
