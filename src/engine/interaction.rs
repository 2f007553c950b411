// Explore / Modal state machine.
//
// Explore -> Modal on confirm while a zone is near.
// Modal -> Explore on cancel or an external close signal, after a short
// deferred delay matching the panel's closing animation. The movement
// pipeline only runs in Explore, so it stays suspended until the delay ends.

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Walking around. `near` is the active zone index, if any.
    Explore { near: Option<usize> },
    /// A content panel is open for `zone`.
    Modal { zone: usize },
}

impl EngineState {
    pub fn is_modal(&self) -> bool {
        matches!(self, EngineState::Modal { .. })
    }
}

/// Deferred Modal -> Explore resume. Cancelled on teardown.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingClose {
    zone: usize,
    remaining: f32,
}

#[derive(Debug)]
pub struct InteractionMachine {
    state: EngineState,
    pending_close: Option<PendingClose>,
    close_delay: f32,
}

impl InteractionMachine {
    pub fn new(close_delay: f32) -> Self {
        Self {
            state: EngineState::Explore { near: None },
            pending_close: None,
            close_delay,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// True while the movement/collision/camera pipeline may run.
    pub fn is_exploring(&self) -> bool {
        matches!(self.state, EngineState::Explore { .. })
    }

    pub fn is_closing(&self) -> bool {
        self.pending_close.is_some()
    }

    /// Record the active zone. Ignored outside Explore.
    pub fn set_near(&mut self, zone: Option<usize>) {
        if let EngineState::Explore { near } = &mut self.state {
            *near = zone;
        }
    }

    /// Confirm: open the near zone's panel. Returns the opened zone.
    pub fn open(&mut self) -> Option<usize> {
        let EngineState::Explore { near: Some(zone) } = self.state else {
            return None;
        };
        self.state = EngineState::Modal { zone };
        Some(zone)
    }

    /// Cancel / close signal. Schedules the resume and returns the closing
    /// zone. Closing when already closed, or already closing, does nothing.
    pub fn request_close(&mut self) -> Option<usize> {
        let EngineState::Modal { zone } = self.state else {
            return None;
        };
        if self.pending_close.is_some() {
            return None;
        }
        self.pending_close = Some(PendingClose {
            zone,
            remaining: self.close_delay,
        });
        Some(zone)
    }

    /// Count down a pending close. Returns the zone once Explore resumes.
    pub fn advance(&mut self, dt: f32) -> Option<usize> {
        let pending = self.pending_close.as_mut()?;
        pending.remaining -= dt;
        if pending.remaining > 0.0 {
            return None;
        }
        let zone = pending.zone;
        self.pending_close = None;
        self.state = EngineState::Explore { near: Some(zone) };
        Some(zone)
    }

    /// Drop a pending close without resuming. Returns true if one was pending.
    pub fn cancel_pending(&mut self) -> bool {
        let cancelled = self.pending_close.take().is_some();
        if cancelled {
            debug!("pending panel close cancelled");
        }
        cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_without_a_near_zone_does_nothing() {
        let mut m = InteractionMachine::new(0.3);
        assert_eq!(m.open(), None);
        assert!(m.is_exploring());
    }

    #[test]
    fn open_then_close_resumes_after_delay() {
        let mut m = InteractionMachine::new(0.3);
        m.set_near(Some(2));
        assert_eq!(m.open(), Some(2));
        assert_eq!(m.state(), EngineState::Modal { zone: 2 });

        assert_eq!(m.request_close(), Some(2));
        assert!(m.is_closing());
        assert_eq!(m.advance(0.1), None);
        assert!(!m.is_exploring());
        assert_eq!(m.advance(0.25), Some(2));
        assert_eq!(m.state(), EngineState::Explore { near: Some(2) });
    }

    #[test]
    fn close_is_idempotent() {
        let mut m = InteractionMachine::new(0.3);
        assert_eq!(m.request_close(), None);
        assert_eq!(m.state(), EngineState::Explore { near: None });

        m.set_near(Some(0));
        m.open();
        assert_eq!(m.request_close(), Some(0));
        assert_eq!(m.request_close(), None);
    }

    #[test]
    fn set_near_is_ignored_while_modal() {
        let mut m = InteractionMachine::new(0.3);
        m.set_near(Some(1));
        m.open();
        m.set_near(None);
        assert_eq!(m.state(), EngineState::Modal { zone: 1 });
    }

    #[test]
    fn cancelled_close_never_resumes() {
        let mut m = InteractionMachine::new(0.3);
        m.set_near(Some(0));
        m.open();
        m.request_close();
        assert!(m.cancel_pending());
        assert_eq!(m.advance(1.0), None);
        assert!(m.state().is_modal());
        assert!(!m.cancel_pending());
    }
}
