//! Host fallback used only when building for `cargo test` on the
//! development machine. There is no real interrupt controller or exception
//! model to drive, so this module provides just enough of the architecture
//! surface for the scheduler's tick/round-robin logic to be unit tested
//! directly (spec.md §8's testable properties do not require a real
//! context switch, only correct TCB selection and sleep accounting).

use core::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTS_ENABLED: AtomicBool = AtomicBool::new(true);

#[inline(always)]
pub fn enter_critical() -> u32 {
    INTERRUPTS_ENABLED.swap(false, Ordering::SeqCst) as u32
}

#[inline(always)]
pub fn leave_critical(saved: u32) {
    INTERRUPTS_ENABLED.store(saved != 0, Ordering::SeqCst);
}

pub fn set_current_sp_slot(_addr: *mut *mut u32) {}

/// Lays out a recognizable (but inert) frame; the host build never actually
/// dispatches into `entry` via a context switch.
pub fn init_stack(stack: &mut [u32], entry: extern "C" fn() -> !) -> *mut u32 {
    let n = stack.len();
    if n > 0 {
        stack[n - 1] = entry as usize as u32;
    }
    stack.as_mut_ptr()
}

pub fn start_tick_and_launch(_reload: u32) -> ! {
    panic!("start_tick_and_launch requires target_arch = \"arm\" hardware");
}

pub fn pend_tick() {}
