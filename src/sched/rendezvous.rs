//! One-slot handoff point between two threads.

use std::sync::{Condvar, Mutex, MutexGuard};

use crate::foundation::error::{GophersError, GophersResult};

/// A single-slot exchange between a sender and a receiver.
///
/// Whichever side arrives first blocks until the other arrives; the second arrival completes the
/// exchange and returns immediately. A sender cannot deposit a new value until the previous one
/// has been taken, so the two sides strictly alternate: every value is observed exactly once and
/// the sender is never more than one value ahead.
#[derive(Debug)]
pub struct Rendezvous<T> {
    inner: Mutex<Slot<T>>,
    changed: Condvar,
}

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    receivers_waiting: usize,
    taken: u64,
    closed: bool,
}

impl<T> Default for Rendezvous<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Rendezvous<T> {
    /// An open rendezvous with an empty slot.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Slot {
                value: None,
                receivers_waiting: 0,
                taken: 0,
                closed: false,
            }),
            changed: Condvar::new(),
        }
    }

    /// Hand `value` to the receiver.
    ///
    /// Returns as soon as a waiting receiver can take it; otherwise blocks until one does.
    /// Fails if the rendezvous is closed before the value is taken.
    pub fn send(&self, value: T) -> GophersResult<()> {
        let mut guard = self.lock()?;
        // Wait releases the lock and re-acquires it before returning.
        while guard.value.is_some() && !guard.closed {
            guard = self.wait(guard)?;
        }
        if guard.closed {
            return Err(GophersError::closed("rendezvous closed before send"));
        }

        guard.value = Some(value);
        self.changed.notify_all();
        if guard.receivers_waiting > 0 {
            return Ok(());
        }

        let ticket = guard.taken;
        while guard.taken == ticket && !guard.closed {
            guard = self.wait(guard)?;
        }
        if guard.taken == ticket {
            guard.value = None;
            return Err(GophersError::closed("rendezvous closed before the value was taken"));
        }
        Ok(())
    }

    /// Take the next value, blocking until a sender provides one.
    pub fn recv(&self) -> GophersResult<T> {
        let mut guard = self.lock()?;
        guard.receivers_waiting += 1;
        while guard.value.is_none() && !guard.closed {
            guard = self.wait(guard)?;
        }
        guard.receivers_waiting -= 1;

        match guard.value.take() {
            Some(value) if !guard.closed => {
                guard.taken += 1;
                self.changed.notify_all();
                Ok(value)
            }
            _ => Err(GophersError::closed("rendezvous closed")),
        }
    }

    /// Close the rendezvous and wake every blocked party.
    pub fn close(&self) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.closed = true;
        }
        self.changed.notify_all();
    }

    /// Whether [`Rendezvous::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.lock().map(|g| g.closed).unwrap_or(true)
    }

    fn lock(&self) -> GophersResult<MutexGuard<'_, Slot<T>>> {
        self.inner
            .lock()
            .map_err(|_| GophersError::schedule("rendezvous mutex poisoned"))
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, Slot<T>>) -> GophersResult<MutexGuard<'a, Slot<T>>> {
        self.changed
            .wait(guard)
            .map_err(|_| GophersError::schedule("rendezvous condvar wait failed"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sched/rendezvous.rs"]
mod tests;
