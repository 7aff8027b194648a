//! Preemptive round-robin kernel core and write-once flash file system for
//! single-core Cortex-M targets.
//!
//! Grounded throughout on `examples/amoljassal-sis-kernel-showcase`'s
//! `crates/kernel` (module layout, logging/error/config conventions) and on
//! `examples/original_source/Preemptive_and_Cooperative_Schedulers/os_v1.c`
//! (scheduler, semaphore, FIFO, and mailbox semantics). See `DESIGN.md` for
//! the full grounding ledger.
//!
//! Built with no heap allocator: every kernel data structure is a fixed-
//! size array sized by `config`, matching the explicit non-goal of dynamic
//! allocation of any kind.

#![cfg_attr(not(test), no_std)]

pub mod arch;
pub mod block;
pub mod config;
pub mod error;
pub mod flash;
pub mod fs;
pub mod log;
pub mod panic;
pub mod ringbuf;
pub mod sched;
pub mod sync;

pub use error::{KernelError, Result};
pub use sched::{add_threads, launch, os_init, sleep, suspend};
pub use sync::{BinarySemaphore, Fifo, Mailbox, Semaphore};
