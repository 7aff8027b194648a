//! Preemptive round-robin scheduler.
//!
//! Grounded on spec.md §4.1 and the original
//! `examples/original_source/Preemptive_and_Cooperative_Schedulers/os_v1.c`
//! (`OS_Init`/`OS_AddThreads`/`OS_Launch`/`Scheduler`/`OS_Suspend`), with the
//! teacher's module-private-singleton convention
//! (`crates/kernel/src/process/scheduler.rs` exposes free functions over a
//! single implicit kernel instance rather than letting callers construct
//! their own): there is exactly one `Kernel`, held in a crate-private
//! `static`, and the public functions below are the only way to reach it —
//! matching spec.md §9's Design Notes ("expose no means to construct a
//! second instance").
//!
//! Unlike the original, `pick_next` explicitly skips both sleeping and
//! blocked threads (spec.md §4.1 step 2), where the C `Scheduler()` only
//! ever checked `blockPt`; sleep accounting in the original is left
//! ambiguous between the scheduler and the tick handler (spec.md §9, "Open
//! question — duplicate `OS_Sleep` tick accounting"), so this
//! implementation decrements every live thread's sleep counter exactly
//! once per tick, inside `tick`, and nowhere else.

pub mod tcb;

use crate::arch;
use crate::config::NUM_THREADS;
use crate::error::{KernelError, Result};
use spin::Mutex;
use tcb::{Tcb, ThreadId};

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

struct Kernel {
    threads: Mutex<[Tcb; NUM_THREADS]>,
    current: AtomicUsize,
    initialized: AtomicBool,
    threads_added: AtomicBool,
    launched: AtomicBool,
}

impl Kernel {
    const fn new() -> Self {
        Self {
            threads: Mutex::new([Tcb::new(); NUM_THREADS]),
            current: AtomicUsize::new(0),
            initialized: AtomicBool::new(false),
            threads_added: AtomicBool::new(false),
            launched: AtomicBool::new(false),
        }
    }

    fn tick(&self, old_sp: *mut u32) -> *mut u32 {
        let mut threads = self.threads.lock();
        let cur = self.current.load(Ordering::SeqCst);
        threads[cur].sp = old_sp;

        for t in threads.iter_mut() {
            if t.live && t.sleep > 0 {
                t.sleep -= 1;
            }
        }

        let chosen = pick_next(&threads, cur);
        self.current.store(chosen, Ordering::SeqCst);
        threads[chosen].sp
    }
}

/// Walk the ring starting at `cur`'s successor until a runnable TCB is
/// found; if the walk returns all the way to `cur` without finding one,
/// keep `cur` (spec.md §4.1 step 2's idle case — "implementations must
/// guarantee progress only if at least one thread is runnable").
fn pick_next(threads: &[Tcb; NUM_THREADS], cur: ThreadId) -> ThreadId {
    let mut candidate = threads[cur].next;
    loop {
        if threads[candidate].is_runnable() {
            return candidate;
        }
        if candidate == cur {
            return cur;
        }
        candidate = threads[candidate].next;
    }
}

static KERNEL: Kernel = Kernel::new();

/// Called from the tick exception's assembly prologue with the preempted
/// thread's just-saved stack pointer; returns the stack pointer to resume.
#[no_mangle]
pub extern "C" fn rtkernel_scheduler_tick(old_sp: *mut u32) -> *mut u32 {
    KERNEL.tick(old_sp)
}

/// Prepare internal state and configure (but do not start) the periodic
/// tick. Fails only if called twice (spec.md §4.1).
pub fn os_init() -> Result<()> {
    if KERNEL.initialized.swap(true, Ordering::SeqCst) {
        return Err(KernelError::AlreadyInitialized);
    }
    Ok(())
}

/// Configure each thread's stack so it resumes at the given entry point,
/// wire the thread table into a ring, and nominate thread 0 as current.
/// Must be called once, after `os_init` and before `launch`.
pub fn add_threads(entries: [extern "C" fn() -> !; NUM_THREADS]) -> Result<()> {
    if KERNEL.threads_added.swap(true, Ordering::SeqCst) {
        return Err(KernelError::ThreadTableFull);
    }
    let saved = arch::enter_critical();
    {
        let mut threads = KERNEL.threads.lock();
        for i in 0..NUM_THREADS {
            let sp = arch::init_stack(threads[i].stack_mut(), entries[i]);
            threads[i].sp = sp;
            threads[i].next = (i + 1) % NUM_THREADS;
            threads[i].sleep = 0;
            threads[i].blocked_on = None;
            threads[i].wait_next = None;
            threads[i].live = true;
        }
        KERNEL.current.store(0, Ordering::SeqCst);
        arch::set_current_sp_slot(&mut threads[0].sp as *mut *mut u32);
    }
    arch::leave_critical(saved);
    Ok(())
}

/// Arm the tick at `timeslice_cycles` and jump into the first thread. Never
/// returns (spec.md §4.1).
pub fn launch(timeslice_cycles: u32) -> ! {
    KERNEL.launched.store(true, Ordering::SeqCst);
    arch::start_tick_and_launch(timeslice_cycles)
}

/// Set the current thread's sleep counter and request a scheduling
/// decision (spec.md §4.1).
pub fn sleep(ticks: u32) {
    let saved = arch::enter_critical();
    {
        let mut threads = KERNEL.threads.lock();
        let cur = KERNEL.current.load(Ordering::SeqCst);
        threads[cur].sleep = ticks;
    }
    arch::leave_critical(saved);
    suspend();
}

/// Request an immediate scheduling decision (cooperative yield).
pub fn suspend() {
    arch::pend_tick();
}

/// Id of the thread currently selected to run.
pub(crate) fn current_id() -> ThreadId {
    KERNEL.current.load(Ordering::SeqCst)
}

/// Mark `id` as blocked on semaphore `sema_id` and thread it onto the
/// semaphore's intrusive wait list via `wait_next` (spec.md §9's
/// index-based wait-list design). Must be called under the caller's
/// critical section.
pub(crate) fn mark_blocked(id: ThreadId, sema_id: usize) {
    let mut threads = KERNEL.threads.lock();
    threads[id].blocked_on = Some(sema_id);
}

/// Clear a thread's blocked state, making it eligible for the next
/// scheduling decision. Must be called under the caller's critical section.
pub(crate) fn mark_runnable(id: ThreadId) {
    let mut threads = KERNEL.threads.lock();
    threads[id].blocked_on = None;
    threads[id].wait_next = None;
}

pub(crate) fn wait_next(id: ThreadId) -> Option<ThreadId> {
    KERNEL.threads.lock()[id].wait_next
}

pub(crate) fn set_wait_next(id: ThreadId, next: Option<ThreadId>) {
    KERNEL.threads.lock()[id].wait_next = next;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_ring(states: &[(bool, u32, Option<usize>)]) -> [Tcb; NUM_THREADS] {
        assert_eq!(states.len(), NUM_THREADS);
        let mut threads = [Tcb::new(); NUM_THREADS];
        for (i, (live, sleep, blocked_on)) in states.iter().enumerate() {
            threads[i].next = (i + 1) % NUM_THREADS;
            threads[i].live = *live;
            threads[i].sleep = *sleep;
            threads[i].blocked_on = *blocked_on;
        }
        threads
    }

    #[test]
    fn round_robin_skips_nothing_when_all_runnable() {
        let threads = fresh_ring(&[(true, 0, None), (true, 0, None), (true, 0, None)]);
        assert_eq!(pick_next(&threads, 0), 1);
        assert_eq!(pick_next(&threads, 1), 2);
        assert_eq!(pick_next(&threads, 2), 0);
    }

    #[test]
    fn skips_sleeping_and_blocked_threads() {
        // thread 1 sleeping, thread 2 blocked: from 0, next runnable is 0 itself (wrap).
        let threads = fresh_ring(&[(true, 0, None), (true, 5, None), (true, 0, Some(7))]);
        assert_eq!(pick_next(&threads, 0), 0);
    }

    #[test]
    fn idle_case_keeps_current_when_nothing_else_runnable() {
        let threads = fresh_ring(&[(true, 0, None), (true, 1, None), (true, 1, None)]);
        assert_eq!(pick_next(&threads, 0), 0);
    }

    #[test]
    fn wakes_into_the_thread_that_just_became_runnable() {
        let mut threads = fresh_ring(&[(true, 0, None), (true, 3, None), (true, 0, None)]);
        // thread 1 wakes up this tick
        threads[1].sleep = 0;
        assert_eq!(pick_next(&threads, 0), 1);
    }
}
