//! Resolves a tagged gadget chain against a runtime base address and
//! pivots control flow into it (spec §4.5, §4.6).
//!
//! The resolver is pure and portable. The pivot is not: it is the one
//! place in this workspace that reads and writes raw stack memory, and
//! its matching logic is split into a pure inner function so it stays
//! testable without invoking the real, frame-pointer-dependent primitive.

mod anchor;
mod pivot;
mod resolver;

pub use anchor::{base_address_of_gadget_pool, rop_anchor};
pub use pivot::{fork_before_pivot, pivot, PIVOT_WINDOW};
pub use resolver::{resolve, ResolvedChain};
