//! Thread control block.
//!
//! Grounded on spec.md §3's TCB data model and §9's "Design Notes" guidance
//! to model the intrusive linked lists of the original C `struct tcb`
//! (`next`, `blocked`, `blockPt` in
//! `examples/original_source/Preemptive_and_Cooperative_Schedulers/os_v1.c`)
//! as small integer indices into a fixed array rather than raw pointers,
//! avoiding the aliasing the original relies on. The teacher takes the same
//! approach one level up the stack in `process/task.rs`'s `Pid`-indexed
//! process table, though that table is heap-backed; this one is not.

use crate::config::STACK_WORDS;

/// Index into the fixed thread table. `usize` rather than a newtype to keep
/// arithmetic (ring advance, wait-list walk) unencumbered.
pub type ThreadId = usize;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Tcb {
    /// Saved stack pointer. Meaningless while this TCB is the running
    /// thread (spec.md §3: "ignored for the running thread").
    pub sp: *mut u32,
    /// Ring successor: every TCB participates in exactly one circular list.
    pub next: ThreadId,
    /// Ticks remaining before this thread becomes runnable again.
    pub sleep: u32,
    /// Semaphore id this thread is blocked on, if any.
    pub blocked_on: Option<usize>,
    /// Next thread in a semaphore's wait list (unrelated to `next`/the ring).
    pub wait_next: Option<ThreadId>,
    /// Whether `add_threads` has configured this slot.
    pub live: bool,
    stack: [u32; STACK_WORDS],
}

// SAFETY: the raw `sp` pointer only ever points into this TCB's own
// `stack` array, which is part of the same `Tcb` value; it is never
// aliased across threads, and the table is always accessed under the
// kernel's critical section.
unsafe impl Send for Tcb {}

impl Tcb {
    pub const fn new() -> Self {
        Self {
            sp: core::ptr::null_mut(),
            next: 0,
            sleep: 0,
            blocked_on: None,
            wait_next: None,
            live: false,
            stack: [0; STACK_WORDS],
        }
    }

    /// A thread is runnable iff it is neither sleeping nor blocked
    /// (spec.md §3 invariant).
    #[inline]
    pub fn is_runnable(&self) -> bool {
        self.live && self.sleep == 0 && self.blocked_on.is_none()
    }

    pub fn stack_mut(&mut self) -> &mut [u32] {
        &mut self.stack
    }
}
