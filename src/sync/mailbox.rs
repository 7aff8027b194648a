//! Single-slot overwrite mailbox.
//!
//! Grounded on `SendMail`/`RecvMail` in
//! `examples/original_source/Preemptive_and_Cooperative_Schedulers/os_v1.c`
//! (`Basic_RTOS_with_Mailbox/UserCommunicate.c` shows the calling
//! convention). The arrival semaphore's value doubles as "is the slot
//! currently announced", matching the original's reuse of its semaphore's
//! sign for the same purpose.

use crate::sync::semaphore::Semaphore;

pub struct Mailbox {
    slot: u32,
    arrival: Semaphore,
    /// Messages overwritten before being received (spec.md §3, §8
    /// "Mailbox loss").
    pub lost: u32,
}

impl Mailbox {
    /// `sema_id` must be unique among all live semaphores/FIFOs/mailboxes.
    pub const fn new(sema_id: usize) -> Self {
        Self {
            slot: 0,
            arrival: Semaphore::new(sema_id, 0),
            lost: 0,
        }
    }

    /// `mail_send(x)` (spec.md §4.5): overwrite the slot; if it was already
    /// announced and unread, count it lost instead of signalling again.
    pub fn send(&mut self, x: u32) {
        self.slot = x;
        if self.arrival.value() > 0 {
            self.lost += 1;
        } else {
            self.arrival.signal();
        }
    }

    /// `mail_recv()` (spec.md §4.5): block until a message has arrived,
    /// then return the slot's current value.
    pub fn receive(&mut self) -> u32 {
        self.arrival.wait();
        self.slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unread_overwrites_are_lost() {
        // Scenario 2 from spec.md §8: A sends 7, 8, 9 back to back with no
        // consumer, then recv() once; expect 9 and lost == 2.
        let mut m = Mailbox::new(200);
        m.send(7);
        m.send(8);
        m.send(9);
        assert_eq!(m.receive(), 9);
        assert_eq!(m.lost, 2);
    }

    #[test]
    fn send_then_receive_round_trips_with_no_loss() {
        let mut m = Mailbox::new(201);
        m.send(42);
        assert_eq!(m.receive(), 42);
        assert_eq!(m.lost, 0);
    }
}
