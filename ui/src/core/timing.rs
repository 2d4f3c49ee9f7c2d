//! Trailing-edge debounce and timer helpers.
//!
//! A [`Debouncer`] hands out a ticket per trigger; only the most recent ticket
//! is allowed to fire once its timer elapses. Bursts of resize, orientation or
//! wheel events therefore collapse into a single trailing action.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Default)]
pub struct Debouncer {
    generation: Rc<Cell<u64>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersede any pending trigger.
    pub fn trigger(&self) -> Ticket {
        let next = self.generation.get().wrapping_add(1);
        self.generation.set(next);
        Ticket(next)
    }

    /// True when `ticket` is still the latest trigger. A ticket fires once.
    pub fn fire(&self, ticket: Ticket) -> bool {
        if self.generation.get() != ticket.0 {
            return false;
        }
        // Bump so a duplicate timer for the same ticket can't fire again.
        self.generation.set(ticket.0.wrapping_add(1));
        true
    }

    /// Drop whatever is pending.
    pub fn cancel(&self) {
        self.trigger();
    }

    /// Trigger, then run `action` after `delay_ms` unless superseded.
    pub fn schedule(&self, delay_ms: u32, action: impl FnOnce() + 'static) {
        let ticket = self.trigger();
        let this = self.clone();
        set_timeout(delay_ms, move || {
            if this.fire(ticket) {
                action();
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
pub fn set_timeout(delay_ms: u32, action: impl FnOnce() + 'static) {
    gloo_timers::callback::Timeout::new(delay_ms, action).forget();
}

/// Native builds have no event loop driving timers; run immediately.
#[cfg(not(target_arch = "wasm32"))]
pub fn set_timeout(_delay_ms: u32, action: impl FnOnce() + 'static) {
    action();
}

/// Await `delay_ms` inside a spawned task.
#[cfg(target_arch = "wasm32")]
pub async fn sleep_ms(delay_ms: u32) {
    gloo_timers::future::TimeoutFuture::new(delay_ms).await;
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep_ms(_delay_ms: u32) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_last_trigger_fires() {
        let debouncer = Debouncer::new();
        let first = debouncer.trigger();
        let second = debouncer.trigger();
        let third = debouncer.trigger();

        assert!(!debouncer.fire(first));
        assert!(!debouncer.fire(second));
        assert!(debouncer.fire(third));
    }

    #[test]
    fn a_ticket_fires_once() {
        let debouncer = Debouncer::new();
        let ticket = debouncer.trigger();
        assert!(debouncer.fire(ticket));
        assert!(!debouncer.fire(ticket));
    }

    #[test]
    fn cancel_drops_pending() {
        let debouncer = Debouncer::new();
        let ticket = debouncer.trigger();
        debouncer.cancel();
        assert!(!debouncer.fire(ticket));
    }

    #[test]
    fn clones_share_generation() {
        let debouncer = Debouncer::new();
        let handle = debouncer.clone();
        let ticket = debouncer.trigger();
        handle.trigger();
        assert!(!debouncer.fire(ticket));
    }

    #[test]
    fn schedule_runs_action_natively() {
        let debouncer = Debouncer::new();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        debouncer.schedule(250, move || counter.set(counter.get() + 1));
        assert_eq!(hits.get(), 1);
    }
}
