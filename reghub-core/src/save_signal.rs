//! Level-triggered dirty signal coalescing snapshot writes.
//!
//! Any number of concurrent [`SaveSignal::signal`] calls collapse so that
//! one [`SaveSignal::wait`] return observes "something changed since the
//! last wait returned". One waiter (the saver), many senders (every
//! mutation path).

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use tokio::sync::Notify;

use crate::SignalError;

#[derive(Debug, Default)]
pub struct SaveSignal {
    notify: Notify,
    dirty: AtomicBool,
    closed: AtomicBool,
}

impl SaveSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the state dirty. Non-blocking; safe from any task.
    pub fn signal(&self) {
        self.dirty.store(true, Ordering::Release);
        self.notify.notify_one();
    }

    /// Blocks until the state has been marked dirty, consuming the level.
    ///
    /// Fails with [`SignalError::Closed`] once [`close`](Self::close) has
    /// been called, including for signals raised before the close.
    pub async fn wait(&self) -> Result<(), SignalError> {
        loop {
            // The future must exist before the flags are checked, or a
            // signal arriving between check and await would be lost.
            let notified = self.notify.notified();

            if self.closed.load(Ordering::Acquire) {
                return Err(SignalError::Closed);
            }

            if self.dirty.swap(false, Ordering::AcqRel) {
                return Ok(());
            }

            notified.await;
        }
    }

    /// Terminal: every current and future `wait` fails.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        // notify_one stores a permit even with no registered waiter, so a
        // waiter racing between its flag check and the await still wakes.
        self.notify.notify_one();
    }
}
