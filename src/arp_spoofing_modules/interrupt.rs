//! Ctrl-C handling.
//!
//! A Ctrl-C is delivered to the reply listener only while the wait is armed.
//! At any other point it ends the process the way an unhandled SIGINT would.

use crossbeam::channel::{self, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::error::Result;

/// Exit status of a process killed by SIGINT.
pub const SIGINT_EXIT_CODE: i32 = 130;

pub struct Interrupt {
    receiver: Receiver<()>,
    armed: Arc<AtomicBool>,
}

impl Interrupt {
    /// Installs the process-wide Ctrl-C handler.
    pub fn install() -> Result<Self> {
        let (sender, receiver) = channel::unbounded();
        let armed = Arc::new(AtomicBool::new(false));
        let handler_armed = Arc::clone(&armed);
        ctrlc::set_handler(move || {
            if !deliver(&handler_armed, &sender) {
                std::process::exit(SIGINT_EXIT_CODE);
            }
        })?;
        Ok(Interrupt { receiver, armed })
    }

    /// An interrupt source that never fires.
    pub fn never() -> Self {
        Interrupt::from_receiver(channel::never())
    }

    pub fn from_receiver(receiver: Receiver<()>) -> Self {
        Interrupt {
            receiver,
            armed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Routes Ctrl-C to the returned receiver until the guard is dropped.
    pub fn arm(&self) -> ArmedInterrupt<'_> {
        debug_assert!(!self.is_armed(), "reply wait armed twice");
        // Drop anything queued before the wait began.
        while self.receiver.try_recv().is_ok() {}
        self.armed.store(true, Ordering::SeqCst);
        ArmedInterrupt { interrupt: self }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }
}

pub struct ArmedInterrupt<'a> {
    interrupt: &'a Interrupt,
}

impl ArmedInterrupt<'_> {
    pub fn receiver(&self) -> &Receiver<()> {
        &self.interrupt.receiver
    }
}

impl Drop for ArmedInterrupt<'_> {
    fn drop(&mut self) {
        self.interrupt.armed.store(false, Ordering::SeqCst);
    }
}

/// Hands one Ctrl-C to the listener. `false` means nobody is waiting.
fn deliver(armed: &AtomicBool, sender: &Sender<()>) -> bool {
    armed.load(Ordering::SeqCst) && sender.send(()).is_ok()
}
