//! Hidden-gesture trigger: a sequence matcher driving a timed pulse, OR-ed with a manual latch.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use platform_host::{TimerHandle, TimerService};

use crate::sequence::{InputToken, SequenceMatcher};

#[derive(Debug, Default)]
struct SignalSources {
    pulse_active: bool,
    latched: bool,
    pending_reset: Option<TimerHandle>,
    trigger_count: u64,
}

/// Owns the matcher buffer and both signal sources for one hidden gesture.
///
/// Dropping the gesture cancels a pending pulse reset.
pub struct HiddenGesture {
    matcher: SequenceMatcher<InputToken>,
    sources: Rc<RefCell<SignalSources>>,
    timers: Rc<dyn TimerService>,
    pulse_ms: u64,
}

impl HiddenGesture {
    pub fn new(sequence: Vec<InputToken>, pulse_ms: u64, timers: Rc<dyn TimerService>) -> Self {
        Self {
            matcher: SequenceMatcher::new(sequence),
            sources: Rc::new(RefCell::new(SignalSources::default())),
            timers,
            pulse_ms,
        }
    }

    /// Feeds one input token. Returns `true` when it completed the sequence and started a pulse.
    pub fn handle_input(&mut self, token: InputToken) -> bool {
        if !self.matcher.push(token) {
            return false;
        }
        self.start_pulse();
        true
    }

    /// Starts (or restarts) the auto pulse. A pulse already running has its reset rescheduled.
    fn start_pulse(&mut self) {
        let previous = {
            let mut sources = self.sources.borrow_mut();
            sources.pulse_active = true;
            sources.trigger_count = sources.trigger_count.saturating_add(1);
            sources.pending_reset.take()
        };
        if let Some(handle) = previous {
            self.timers.cancel(handle);
        }

        let weak: Weak<RefCell<SignalSources>> = Rc::downgrade(&self.sources);
        let handle = self.timers.schedule(
            self.pulse_ms,
            Box::new(move || {
                if let Some(sources) = weak.upgrade() {
                    let mut sources = sources.borrow_mut();
                    sources.pulse_active = false;
                    sources.pending_reset = None;
                }
            }),
        );
        self.sources.borrow_mut().pending_reset = Some(handle);
    }

    pub fn set_latched(&self, latched: bool) {
        self.sources.borrow_mut().latched = latched;
    }

    pub fn toggle_latch(&self) -> bool {
        let mut sources = self.sources.borrow_mut();
        sources.latched = !sources.latched;
        sources.latched
    }

    /// Whether the gesture's visual is shown: auto pulse OR manual latch.
    pub fn is_visible(&self) -> bool {
        let sources = self.sources.borrow();
        sources.pulse_active || sources.latched
    }

    pub fn is_pulse_active(&self) -> bool {
        self.sources.borrow().pulse_active
    }

    pub fn is_latched(&self) -> bool {
        self.sources.borrow().latched
    }

    /// Number of completed sequences since creation.
    pub fn trigger_count(&self) -> u64 {
        self.sources.borrow().trigger_count
    }
}

impl Drop for HiddenGesture {
    fn drop(&mut self) {
        if let Some(handle) = self.sources.borrow_mut().pending_reset.take() {
            self.timers.cancel(handle);
        }
    }
}

impl std::fmt::Debug for HiddenGesture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HiddenGesture")
            .field("matcher", &self.matcher)
            .field("sources", &self.sources.borrow())
            .field("pulse_ms", &self.pulse_ms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use platform_host::ManualTimerService;

    use super::*;
    use crate::sequence::konami_sequence;

    const PULSE_MS: u64 = 3_000;

    fn gesture(timers: &ManualTimerService) -> HiddenGesture {
        HiddenGesture::new(konami_sequence(), PULSE_MS, Rc::new(timers.clone()))
    }

    fn enter_sequence(gesture: &mut HiddenGesture) -> bool {
        let mut fired = false;
        for token in konami_sequence() {
            fired |= gesture.handle_input(token);
        }
        fired
    }

    #[test]
    fn match_starts_a_pulse_that_resets_itself() {
        let timers = ManualTimerService::default();
        let mut gesture = gesture(&timers);

        assert!(enter_sequence(&mut gesture));
        assert!(gesture.is_visible());
        assert_eq!(gesture.trigger_count(), 1);

        timers.advance(PULSE_MS - 1);
        assert!(gesture.is_visible());
        timers.advance(1);
        assert!(!gesture.is_visible());
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn retrigger_reschedules_instead_of_stacking_resets() {
        let timers = ManualTimerService::default();
        let mut gesture = gesture(&timers);

        enter_sequence(&mut gesture);
        timers.advance(2_000);
        enter_sequence(&mut gesture);
        assert_eq!(timers.pending_count(), 1);

        // The first pulse's reset would have fired here.
        timers.advance(1_500);
        assert!(gesture.is_pulse_active());
        timers.advance(1_500);
        assert!(!gesture.is_pulse_active());
        assert_eq!(gesture.trigger_count(), 2);
    }

    #[test]
    fn unlatching_during_pulse_keeps_signal_visible() {
        let timers = ManualTimerService::default();
        let mut gesture = gesture(&timers);

        gesture.set_latched(true);
        enter_sequence(&mut gesture);
        gesture.set_latched(false);
        assert!(gesture.is_visible());

        timers.advance(PULSE_MS);
        assert!(!gesture.is_visible());
    }

    #[test]
    fn pulse_expiry_does_not_clear_latch() {
        let timers = ManualTimerService::default();
        let mut gesture = gesture(&timers);

        enter_sequence(&mut gesture);
        assert!(gesture.toggle_latch());
        timers.advance(PULSE_MS);
        assert!(!gesture.is_pulse_active());
        assert!(gesture.is_visible());
        assert!(!gesture.toggle_latch());
        assert!(!gesture.is_visible());
    }

    #[test]
    fn dropping_the_gesture_cancels_pending_reset() {
        let timers = ManualTimerService::default();
        let mut gesture = gesture(&timers);
        enter_sequence(&mut gesture);
        assert_eq!(timers.pending_count(), 1);

        drop(gesture);
        assert_eq!(timers.pending_count(), 0);
        assert_eq!(timers.advance(PULSE_MS), 0);
    }

    #[test]
    fn wrong_tokens_do_not_pulse() {
        let timers = ManualTimerService::default();
        let mut gesture = gesture(&timers);
        for key in ["ArrowUp", "ArrowDown", "q", "Escape"] {
            assert!(!gesture.handle_input(InputToken::from_key(key)));
        }
        assert!(!gesture.is_visible());
        assert_eq!(timers.pending_count(), 0);
    }
}
