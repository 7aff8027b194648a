//! Panic handler.
//!
//! The teacher's `lib/panic.rs` is a heavyweight diagnostic: recursive-
//! panic guard, per-architecture register dump, heap stats, and a
//! structured JSON crash record. None of that applies here — there is no
//! heap, and a single-core microcontroller with no debug UART configured
//! has nowhere to put a crash record — so this keeps only what still makes
//! sense: a recursive-panic guard (so a panic inside the log sink cannot
//! recurse forever) and a best-effort log line before halting.
//!
//! Gated behind `default-panic-handler`: as a library this crate should
//! not force a panic strategy on whatever binary links it (see `Cargo.toml`).

#![cfg(all(not(test), feature = "default-panic-handler"))]

use core::panic::PanicInfo;
use core::sync::atomic::{AtomicBool, Ordering};

static PANICKING: AtomicBool = AtomicBool::new(false);

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    if !PANICKING.swap(true, Ordering::SeqCst) {
        crate::log::log(crate::log::LogLevel::Error, format_args!("panic: {}", info));
    }
    loop {
        #[cfg(target_arch = "arm")]
        cortex_m::asm::bkpt();
        #[cfg(not(target_arch = "arm"))]
        core::hint::spin_loop();
    }
}
