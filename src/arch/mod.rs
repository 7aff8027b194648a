//! Architecture glue: interrupt masking, the SysTick-driven tick, and the
//! PendSV context switch.
//!
//! Grounded on the teacher's per-architecture split (`arch/aarch64`,
//! `arch/x86_64`, `arch/riscv64` behind `cfg(target_arch = ...)`), and in
//! particular on `crates/kernel/src/aarch64_context.rs`'s
//! save-callee-regs-and-SP-then-`ret` context switch, translated from
//! AArch64's `x19..x30`/`sp` to the Cortex-M `r4..r11`/`psp` register set
//! (spec.md §4.1/§9 — "implemented in target-specific assembly").
//!
//! Only one of the two submodules below is compiled for a given target:
//! `armv7m` on real Cortex-M hardware, `host` when building for
//! `cargo test` on the development machine. Both expose the same surface so
//! the scheduler never needs a `cfg` of its own.

#[cfg(target_arch = "arm")]
mod armv7m;
#[cfg(target_arch = "arm")]
pub use armv7m::*;

#[cfg(not(target_arch = "arm"))]
mod host;
#[cfg(not(target_arch = "arm"))]
pub use host::*;

/// Number of machine words saved/restored on a context switch (callee-saved
/// registers only; spec.md's "prepared stack frame" covers the rest).
pub const CONTEXT_WORDS: usize = 8;
