//! `setTimeout`-backed timer service.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use platform_host::{TimerCallback, TimerHandle, TimerService};

#[derive(Debug, Clone, Default)]
/// Timer service that schedules callbacks on the browser event loop.
///
/// Clones share the same pending table. On non-wasm targets callbacks are dropped unrun, as with
/// [`platform_host::NoopTimerService`].
pub struct WebTimerService {
    next_id: Rc<Cell<u64>>,
    /// Our handle id to the browser timeout id.
    pending: Rc<RefCell<HashMap<u64, i32>>>,
}

impl WebTimerService {
    /// Number of callbacks scheduled but not yet run or cancelled.
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    fn next_handle(&self) -> TimerHandle {
        let id = self.next_id.get().saturating_add(1);
        self.next_id.set(id);
        TimerHandle(id)
    }
}

fn browser_delay(delay_ms: u64) -> i32 {
    i32::try_from(delay_ms).unwrap_or(i32::MAX)
}

impl TimerService for WebTimerService {
    fn schedule(&self, delay_ms: u64, callback: TimerCallback) -> TimerHandle {
        let handle = self.next_handle();

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::{closure::Closure, JsCast};

            let Some(window) = web_sys::window() else {
                return handle;
            };
            let pending = Rc::clone(&self.pending);
            let id = handle.0;
            let js_callback = Closure::once_into_js(move || {
                let still_pending = pending.borrow_mut().remove(&id).is_some();
                if still_pending {
                    callback();
                }
            });
            if let Ok(timeout_id) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                js_callback.unchecked_ref(),
                browser_delay(delay_ms),
            ) {
                self.pending.borrow_mut().insert(id, timeout_id);
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (browser_delay(delay_ms), callback);
        }

        handle
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        let Some(timeout_id) = self.pending.borrow_mut().remove(&handle.0) else {
            return false;
        };

        #[cfg(target_arch = "wasm32")]
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(timeout_id);
        }

        #[cfg(not(target_arch = "wasm32"))]
        let _ = timeout_id;

        true
    }
}
