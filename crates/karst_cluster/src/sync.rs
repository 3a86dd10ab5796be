//! Poisonable run barrier.
//!
//! `std::sync::Barrier` has no failure mode: a worker that errors out stops
//! arriving and every surviving worker parks forever at `wait()`. This
//! barrier carries a poison flag, so the first failure releases every
//! parked waiter and a poisoned wait tells the caller to abort instead of
//! computing another iteration against a dead neighbor.

use parking_lot::{Condvar, Mutex};

pub(crate) struct RunBarrier {
    state: Mutex<BarrierState>,
    cvar: Condvar,
    total: usize,
}

struct BarrierState {
    waiting: usize,
    generation: u64,
    poisoned: bool,
}

impl RunBarrier {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            state: Mutex::new(BarrierState { waiting: 0, generation: 0, poisoned: false }),
            cvar: Condvar::new(),
            total,
        }
    }

    /// Blocks until all `total` workers arrive, or until the barrier is
    /// poisoned. Returns `false` when the run is poisoned; the caller must
    /// abort rather than continue the protocol.
    pub(crate) fn wait(&self) -> bool {
        let mut state = self.state.lock();
        if state.poisoned {
            return false;
        }
        state.waiting += 1;
        if state.waiting == self.total {
            state.waiting = 0;
            state.generation += 1;
            self.cvar.notify_all();
            return true;
        }
        let generation = state.generation;
        while state.generation == generation && !state.poisoned {
            self.cvar.wait(&mut state);
        }
        !state.poisoned
    }

    /// Marks the run as failed and releases every parked waiter.
    pub(crate) fn poison(&self) {
        let mut state = self.state.lock();
        state.poisoned = true;
        self.cvar.notify_all();
    }
}

/// Poisons the barrier on drop unless disarmed.
///
/// Covers both an early `Err` return and a panic unwinding through the
/// worker body; either way the surviving workers are released.
pub(crate) struct AbortGuard<'a> {
    barrier: &'a RunBarrier,
    armed: bool,
}

impl<'a> AbortGuard<'a> {
    pub(crate) fn new(barrier: &'a RunBarrier) -> Self {
        Self { barrier, armed: true }
    }

    /// Call on clean completion; the barrier stays usable for the others.
    pub(crate) fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for AbortGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.barrier.poison();
        }
    }
}
