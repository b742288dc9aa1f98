//! Request generations for simulated assistant work.
//!
//! Each request gets a ticket from one monotonically increasing counter.
//! Only the latest ticket of a kind may deliver; anything older is stale.

use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Chat,
    Rerun,
    Generation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub kind: RequestKind,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct RequestTracker {
    counter: u64,
    latest: HashMap<RequestKind, u64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, superseding any pending request of the same kind
    pub fn issue(&mut self, kind: RequestKind) -> RequestTicket {
        self.counter += 1;
        if let Some(previous) = self.latest.insert(kind, self.counter) {
            debug!(?kind, previous, generation = self.counter, "Superseding pending request");
        }
        RequestTicket {
            kind,
            generation: self.counter,
        }
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.get(&ticket.kind) == Some(&ticket.generation)
    }

    /// Accept a delivery. Returns false, changing nothing, for a stale ticket.
    pub fn settle(&mut self, ticket: RequestTicket) -> bool {
        if !self.is_current(ticket) {
            debug!(kind = ?ticket.kind, generation = ticket.generation, "Dropping stale completion");
            return false;
        }
        self.latest.remove(&ticket.kind);
        true
    }

    /// Forget the pending request of `kind` so its delivery will be dropped
    pub fn cancel(&mut self, kind: RequestKind) -> Option<RequestTicket> {
        self.latest
            .remove(&kind)
            .map(|generation| RequestTicket { kind, generation })
    }

    pub fn is_pending(&self, kind: RequestKind) -> bool {
        self.latest.contains_key(&kind)
    }

    pub fn any_pending(&self) -> bool {
        !self.latest.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generations_increase_across_kinds() {
        let mut tracker = RequestTracker::new();
        let a = tracker.issue(RequestKind::Chat);
        let b = tracker.issue(RequestKind::Generation);
        let c = tracker.issue(RequestKind::Chat);
        assert!(a.generation < b.generation && b.generation < c.generation);
    }

    #[test]
    fn test_stale_ticket_is_rejected() {
        let mut tracker = RequestTracker::new();
        let first = tracker.issue(RequestKind::Chat);
        let second = tracker.issue(RequestKind::Chat);

        assert!(!tracker.is_current(first));
        assert!(!tracker.settle(first));
        assert!(tracker.is_pending(RequestKind::Chat));

        assert!(tracker.settle(second));
        assert!(!tracker.is_pending(RequestKind::Chat));
        // A ticket settles once
        assert!(!tracker.settle(second));
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut tracker = RequestTracker::new();
        let chat = tracker.issue(RequestKind::Chat);
        let rerun = tracker.issue(RequestKind::Rerun);

        assert!(tracker.settle(chat));
        assert!(tracker.is_pending(RequestKind::Rerun));
        assert!(tracker.settle(rerun));
        assert!(!tracker.any_pending());
    }

    #[test]
    fn test_cancel() {
        let mut tracker = RequestTracker::new();
        let ticket = tracker.issue(RequestKind::Generation);
        assert_eq!(tracker.cancel(RequestKind::Generation), Some(ticket));
        assert!(!tracker.settle(ticket));
        assert_eq!(tracker.cancel(RequestKind::Generation), None);
    }
}
