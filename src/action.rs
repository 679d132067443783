//! Presentation hand-off and the action barrier.
//!
//! The engine never waits on a presenter directly. Each effect it starts may
//! hand back a ticket; the barrier holds the next state transition until
//! every ticket is reported complete and the presenter says it is idle, or
//! until a tick budget runs out.

use std::collections::HashSet;

use serde::Serialize;
use tracing::warn;

use crate::board::{Coord, Piece};
use crate::resolve::CaptureEvent;

/// Opaque handle to an in-flight presentation effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActionTicket(pub u64);

/// The collaborator that animates what the engine decides.
///
/// Returning `None` from an effect means it finished immediately.
pub trait Presenter {
    fn begin_move(&mut self, piece: &Piece, path: &[Coord]) -> Option<ActionTicket>;

    fn render_capture_effect(&mut self, _capture: &CaptureEvent) -> Option<ActionTicket> {
        None
    }

    /// Polled while the barrier is held, for presenters that do not track tickets.
    fn has_action_in_progress(&self) -> bool {
        false
    }
}

/// A presenter that completes everything instantly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn begin_move(&mut self, _piece: &Piece, _path: &[Coord]) -> Option<ActionTicket> {
        None
    }
}

/// Result of polling the barrier once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierStatus {
    Released,
    Waiting,
    /// The timeout elapsed with work still outstanding; the barrier has been
    /// force-released.
    TimedOut,
}

/// Outstanding tickets plus a bounded wait.
#[derive(Debug, Clone)]
pub struct ActionBarrier {
    outstanding: HashSet<ActionTicket>,
    waited: u32,
    timeout: u32,
}

impl ActionBarrier {
    pub fn new(timeout: u32) -> Self {
        ActionBarrier {
            outstanding: HashSet::new(),
            waited: 0,
            timeout,
        }
    }

    pub fn register(&mut self, ticket: ActionTicket) {
        self.outstanding.insert(ticket);
    }

    /// Marks a ticket complete. Returns false for unknown tickets.
    pub fn complete(&mut self, ticket: ActionTicket) -> bool {
        self.outstanding.remove(&ticket)
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    /// Drops every outstanding ticket and the wait counter.
    pub fn clear(&mut self) {
        self.outstanding.clear();
        self.waited = 0;
    }

    pub fn set_timeout(&mut self, timeout: u32) {
        self.timeout = timeout;
    }

    /// Spends one tick at the barrier.
    pub fn poll(&mut self, presenter_busy: bool) -> BarrierStatus {
        if self.outstanding.is_empty() && !presenter_busy {
            self.waited = 0;
            return BarrierStatus::Released;
        }
        self.waited += 1;
        if self.waited >= self.timeout {
            warn!(
                outstanding = self.outstanding.len(),
                presenter_busy,
                ticks = self.waited,
                "action barrier timed out, force-advancing"
            );
            self.clear();
            return BarrierStatus::TimedOut;
        }
        BarrierStatus::Waiting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_barrier_releases_immediately() {
        let mut barrier = ActionBarrier::new(5);
        assert_eq!(barrier.poll(false), BarrierStatus::Released);
    }

    #[test]
    fn waits_for_every_ticket() {
        let mut barrier = ActionBarrier::new(50);
        barrier.register(ActionTicket(1));
        barrier.register(ActionTicket(2));
        assert_eq!(barrier.poll(false), BarrierStatus::Waiting);
        assert!(barrier.complete(ActionTicket(1)));
        assert_eq!(barrier.poll(false), BarrierStatus::Waiting);
        assert!(!barrier.complete(ActionTicket(7)));
        assert!(barrier.complete(ActionTicket(2)));
        assert_eq!(barrier.poll(false), BarrierStatus::Released);
    }

    #[test]
    fn busy_presenter_holds_barrier() {
        let mut barrier = ActionBarrier::new(50);
        assert_eq!(barrier.poll(true), BarrierStatus::Waiting);
        assert_eq!(barrier.poll(false), BarrierStatus::Released);
    }

    #[test]
    fn lost_ticket_times_out() {
        let mut barrier = ActionBarrier::new(3);
        barrier.register(ActionTicket(9));
        assert_eq!(barrier.poll(false), BarrierStatus::Waiting);
        assert_eq!(barrier.poll(false), BarrierStatus::Waiting);
        assert_eq!(barrier.poll(false), BarrierStatus::TimedOut);
        assert_eq!(barrier.outstanding(), 0);
        assert_eq!(barrier.poll(false), BarrierStatus::Released);
    }
}
