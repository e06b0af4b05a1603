//! Cancellable scheduled-callback contracts and adapters.
//!
//! Callbacks run on the single UI thread. A cancelled or never-due callback is dropped without
//! running, which is how torn-down views make sure a pending reset never touches freed state.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

/// Callback type accepted by [`TimerService::schedule`].
pub type TimerCallback = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Opaque handle identifying one scheduled callback.
pub struct TimerHandle(pub u64);

/// Host service for one-shot delayed callbacks.
pub trait TimerService {
    /// Schedules `callback` to run once after `delay_ms` milliseconds.
    fn schedule(&self, delay_ms: u64, callback: TimerCallback) -> TimerHandle;

    /// Cancels a pending callback. Returns `true` when the callback was still pending.
    fn cancel(&self, handle: TimerHandle) -> bool;
}

#[derive(Debug, Default)]
/// Timer adapter that never fires, for hosts without a scheduler.
pub struct NoopTimerService {
    next_id: std::cell::Cell<u64>,
}

impl TimerService for NoopTimerService {
    fn schedule(&self, _delay_ms: u64, _callback: TimerCallback) -> TimerHandle {
        let id = self.next_id.get().saturating_add(1);
        self.next_id.set(id);
        TimerHandle(id)
    }

    fn cancel(&self, _handle: TimerHandle) -> bool {
        false
    }
}

struct PendingTimer {
    due_ms: u64,
    callback: TimerCallback,
}

#[derive(Default)]
struct ManualTimerInner {
    now_ms: u64,
    next_id: u64,
    pending: BTreeMap<TimerHandle, PendingTimer>,
}

#[derive(Clone, Default)]
/// Deterministic timer adapter driven by [`ManualTimerService::advance`].
///
/// Clones share the same clock and queue.
pub struct ManualTimerService {
    inner: Rc<RefCell<ManualTimerInner>>,
}

impl ManualTimerService {
    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.inner.borrow().now_ms
    }

    /// Number of callbacks still waiting to fire.
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Moves the clock forward by `delta_ms`, running every callback that becomes due in
    /// due-time order. Callbacks scheduled while advancing run too if they fall inside the window.
    ///
    /// Returns the number of callbacks run.
    pub fn advance(&self, delta_ms: u64) -> usize {
        let target = self.inner.borrow().now_ms.saturating_add(delta_ms);
        let mut fired = 0;
        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                let due = inner
                    .pending
                    .iter()
                    .filter(|(_, timer)| timer.due_ms <= target)
                    .min_by_key(|(handle, timer)| (timer.due_ms, **handle))
                    .map(|(handle, _)| *handle);
                match due.and_then(|handle| inner.pending.remove(&handle)) {
                    Some(timer) => {
                        inner.now_ms = inner.now_ms.max(timer.due_ms);
                        Some(timer.callback)
                    }
                    None => None,
                }
            };
            // The borrow is released before running so callbacks may schedule or cancel.
            let Some(callback) = next else {
                break;
            };
            callback();
            fired += 1;
        }
        self.inner.borrow_mut().now_ms = target;
        fired
    }
}

impl std::fmt::Debug for ManualTimerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ManualTimerService")
            .field("now_ms", &inner.now_ms)
            .field("pending", &inner.pending.len())
            .finish()
    }
}

impl TimerService for ManualTimerService {
    fn schedule(&self, delay_ms: u64, callback: TimerCallback) -> TimerHandle {
        let mut inner = self.inner.borrow_mut();
        inner.next_id = inner.next_id.saturating_add(1);
        let handle = TimerHandle(inner.next_id);
        let due_ms = inner.now_ms.saturating_add(delay_ms);
        inner
            .pending
            .insert(handle, PendingTimer { due_ms, callback });
        handle
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        self.inner.borrow_mut().pending.remove(&handle).is_some()
    }
}
