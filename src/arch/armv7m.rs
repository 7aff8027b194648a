//! Cortex-M (ARMv7-M) critical sections, SysTick tick, and the PendSV-free
//! SysTick-handler context switch.
//!
//! The original C source (`examples/original_source/Preemptive_and_Cooperative_Schedulers/os_v1.c`)
//! drives the context switch directly from `SysTick_Handler` rather than a
//! separate PendSV exception, and `OS_Suspend` simply pends the SysTick
//! exception early. This crate keeps that design: there is exactly one
//! preemption source (spec.md §4.1, "the tick is the only preemption
//! source"), so a second exception priority level buys nothing.
//!
//! Each thread's stack holds two halves, low to high address: the eight
//! callee-ish registers `r4..r11` saved by the handler's own prologue, then
//! the eight registers `r0..r3, r12, lr, pc, xpsr` that the CPU itself
//! pushes/pops on exception entry/exit. `init_stack` prepares both halves so
//! that the very first dispatch into a thread looks, to the CPU, like an
//! exception return into code that has never run.

use core::sync::atomic::{AtomicU32, Ordering};

/// Address of thread 0's saved stack pointer field. Consulted exactly once,
/// by `launch_first_thread`, to find the very first context to dispatch
/// into; every subsequent switch passes the stack pointer through a
/// register argument/return value instead (see `SysTick` below), so this
/// never needs to be kept in sync afterwards.
static CURRENT_SP_SLOT: AtomicU32 = AtomicU32::new(0);

/// Register the address of the first thread's `Tcb::sp` field. Called once
/// by `add_threads` after it nominates thread 0 as current.
pub fn set_current_sp_slot(addr: *mut *mut u32) {
    CURRENT_SP_SLOT.store(addr as usize as u32, Ordering::SeqCst);
}

/// Disable interrupts, returning whatever the prior PRIMASK state was so it
/// can be restored verbatim by `leave_critical` (spec.md §4.2: reentrant,
/// returns prior mask state).
#[inline(always)]
pub fn enter_critical() -> u32 {
    let was_active = cortex_m::register::primask::read().is_active();
    cortex_m::interrupt::disable();
    was_active as u32
}

/// Restore the interrupt-mask state returned by a matching `enter_critical`.
#[inline(always)]
pub fn leave_critical(saved: u32) {
    if saved != 0 {
        unsafe { cortex_m::interrupt::enable() };
    }
}

/// Lay out a thread's stack so that dispatching into it for the first time
/// resumes at `entry` with interrupts enabled (spec.md §4.1, "prepared
/// stack frame"). Register marker values are arbitrary and exist only to
/// make a stack dump recognizable in a debugger.
///
/// Returns the initial stack pointer to store in the thread's TCB.
pub fn init_stack(stack: &mut [u32], entry: extern "C" fn() -> !) -> *mut u32 {
    let n = stack.len();
    debug_assert!(n >= 16, "thread stack must hold at least one full frame");

    // Hardware-restored half (popped by exception return): xPSR, PC, LR,
    // R12, R3, R2, R1, R0, high to low address.
    stack[n - 1] = 0x0100_0000; // xPSR: Thumb bit set
    stack[n - 2] = entry as usize as u32; // PC
    stack[n - 3] = 0x1414_1414; // LR (R14) - debug marker
    stack[n - 4] = 0x1212_1212; // R12
    stack[n - 5] = 0x0303_0303; // R3
    stack[n - 6] = 0x0202_0202; // R2
    stack[n - 7] = 0x0101_0101; // R1
    stack[n - 8] = 0x0000_0000; // R0

    // Software-restored half (popped by our own prologue/epilogue): R11..R4.
    stack[n - 9] = 0x1111_1111; // R11
    stack[n - 10] = 0x1010_1010; // R10
    stack[n - 11] = 0x0909_0909; // R9
    stack[n - 12] = 0x0808_0808; // R8
    stack[n - 13] = 0x0707_0707; // R7
    stack[n - 14] = 0x0606_0606; // R6
    stack[n - 15] = 0x0505_0505; // R5
    stack[n - 16] = 0x0404_0404; // R4

    unsafe { stack.as_mut_ptr().add(n - 16) }
}

/// Arm the tick at `reload - 1` and enable the SysTick interrupt (spec.md
/// §4.1, `launch`). Does not return: control passes to the first thread via
/// an `SVC` that the `SVCall` handler turns into an exception return.
pub fn start_tick_and_launch(reload: u32) -> ! {
    let syst = unsafe { &*cortex_m::peripheral::SYST::PTR };
    unsafe {
        syst.rvr.write(reload.saturating_sub(1));
        syst.cvr.write(0);
        syst.csr.write(0b111); // ENABLE | TICKINT | CLKSOURCE
    }
    unsafe { launch_first_thread() }
}

/// Pend the tick exception immediately, requesting a scheduling decision at
/// the next instruction boundary (spec.md §4.1, `suspend`; used as a
/// cooperative yield).
#[inline(always)]
pub fn pend_tick() {
    cortex_m::peripheral::SCB::set_pendst();
}

extern "C" {
    fn launch_first_thread() -> !;
}

// `launch_first_thread` sets PSP to point at thread 0's prepared hardware
// frame, then executes `svc #0` to reach Handler mode (only there can
// `bx lr` with an EXC_RETURN value trigger a real exception return). The
// `svc` instruction itself auto-stacks a fresh 8-word frame *below* that
// PSP value, so `SVCall` must pop and discard all 8 of those garbage words
// before `msr psp` — discarding only 4 leaves PSP pointing into the middle
// of thread 0's prepared frame, and the final `bx lr` would then splice 4
// garbage words with 4 real ones and fault on the corrupted PC/xPSR.
core::arch::global_asm!(
    r#"
    .thumb_func
    .global launch_first_thread
launch_first_thread:
    cpsid i
    ldr r0, ={current_sp_slot}
    ldr r1, [r0]
    ldr r2, [r1]
    ldmia r2!, {{r4-r11}}
    msr psp, r2
    movs r0, #2
    msr control, r0
    isb
    cpsie i
    svc #0

    .thumb_func
    .global SVCall
SVCall:
    mrs r0, psp
    ldmia r0!, {{r1-r8}}
    msr psp, r0
    mov lr, #0xfffffffd
    bx lr
    "#,
    current_sp_slot = sym CURRENT_SP_SLOT,
);

// `bl rtkernel_scheduler_tick` clobbers `lr` per AAPCS, but `lr` holds the
// EXC_RETURN value this handler needs for its own `bx lr`. r4 is free to
// use as scratch here: the thread's real r4 is already saved to its stack
// by the `stmdb` above, and the callee (compiled Rust) will not touch it
// since r4 is callee-saved.
core::arch::global_asm!(
    r#"
    .thumb_func
    .global SysTick
SysTick:
    cpsid i
    mrs r0, psp
    stmdb r0!, {{r4-r11}}
    mov r4, lr
    bl rtkernel_scheduler_tick
    mov lr, r4
    ldmia r0!, {{r4-r11}}
    msr psp, r0
    cpsie i
    bx lr
    "#
);
