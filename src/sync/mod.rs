//! Inter-thread and interrupt-to-thread communication primitives.
//!
//! Counting/binary semaphores, the bounded FIFO, and the single-slot
//! mailbox are the only legal channels between threads (spec.md §2); all
//! three are built on `crate::arch::enter_critical`/`leave_critical` and
//! `crate::sched`'s blocked/wait-list accessors rather than per-object
//! locks, matching spec.md §4.2 ("the only shared-memory discipline in the
//! kernel").

pub mod fifo;
pub mod mailbox;
pub mod semaphore;

pub use fifo::Fifo;
pub use mailbox::Mailbox;
pub use semaphore::{BinarySemaphore, Semaphore};
