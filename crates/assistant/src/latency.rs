//! Cancellable simulated latency.
//!
//! Each scheduled payload sleeps on its own thread with a small tokio runtime,
//! wrapped in `Abortable`, and is handed back through a channel the UI polls
//! once per frame.

use crate::requests::{RequestKind, RequestTicket};
use futures::future::{AbortHandle, Abortable};
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug)]
pub struct Delivery<T> {
    pub ticket: RequestTicket,
    pub payload: T,
}

pub struct LatencyDispatcher<T> {
    tx: Sender<Delivery<T>>,
    rx: Receiver<Delivery<T>>,
    timers: HashMap<RequestKind, (u64, AbortHandle)>,
}

impl<T: Send + 'static> Default for LatencyDispatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> LatencyDispatcher<T> {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            tx,
            rx,
            timers: HashMap::new(),
        }
    }

    /// Deliver `payload` after `delay`, aborting the timer of any earlier
    /// request of the same kind.
    pub fn schedule(&mut self, ticket: RequestTicket, delay: Duration, payload: T) {
        self.cancel(ticket.kind);

        let (abort_handle, abort_reg) = AbortHandle::new_pair();
        self.timers
            .insert(ticket.kind, (ticket.generation, abort_handle));

        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    warn!(error = %e, "Failed to start timer runtime; delivering immediately");
                    let _ = tx.send(Delivery { ticket, payload });
                    return;
                }
            };

            match rt.block_on(Abortable::new(tokio::time::sleep(delay), abort_reg)) {
                Ok(()) => {
                    // The receiver is gone once the session has shut down
                    let _ = tx.send(Delivery { ticket, payload });
                }
                Err(_aborted) => {
                    debug!(kind = ?ticket.kind, generation = ticket.generation, "Timer aborted");
                }
            }
        });
    }

    /// Abort the pending timer of `kind`. Returns false if there was none.
    pub fn cancel(&mut self, kind: RequestKind) -> bool {
        match self.timers.remove(&kind) {
            Some((_, handle)) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Non-blocking check for a finished timer
    pub fn try_recv(&mut self) -> Option<Delivery<T>> {
        let delivery = self.rx.try_recv().ok()?;
        self.forget(delivery.ticket);
        Some(delivery)
    }

    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<Delivery<T>> {
        match self.rx.recv_timeout(timeout) {
            Ok(delivery) => {
                self.forget(delivery.ticket);
                Some(delivery)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.timers.is_empty()
    }

    fn forget(&mut self, ticket: RequestTicket) {
        if let Some((generation, _)) = self.timers.get(&ticket.kind) {
            if *generation == ticket.generation {
                self.timers.remove(&ticket.kind);
            }
        }
    }
}

impl<T> Drop for LatencyDispatcher<T> {
    fn drop(&mut self) {
        for (_, (_, handle)) in self.timers.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::RequestTracker;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn test_delivers_after_delay() {
        let mut tracker = RequestTracker::new();
        let mut dispatcher = LatencyDispatcher::new();
        let ticket = tracker.issue(RequestKind::Chat);

        dispatcher.schedule(ticket, Duration::from_millis(10), "reply");
        assert!(dispatcher.has_pending());

        let delivery = dispatcher.recv_timeout(WAIT).unwrap();
        assert_eq!(delivery.ticket, ticket);
        assert_eq!(delivery.payload, "reply");
        assert!(!dispatcher.has_pending());
    }

    #[test]
    fn test_new_request_aborts_previous_timer() {
        let mut tracker = RequestTracker::new();
        let mut dispatcher = LatencyDispatcher::new();

        let slow = tracker.issue(RequestKind::Chat);
        dispatcher.schedule(slow, Duration::from_millis(300), "first");
        let fast = tracker.issue(RequestKind::Chat);
        dispatcher.schedule(fast, Duration::ZERO, "second");

        let delivery = dispatcher.recv_timeout(WAIT).unwrap();
        assert_eq!(delivery.payload, "second");
        assert!(tracker.settle(delivery.ticket));

        assert!(dispatcher.recv_timeout(Duration::from_millis(600)).is_none());
    }

    #[test]
    fn test_cancel() {
        let mut tracker = RequestTracker::new();
        let mut dispatcher = LatencyDispatcher::new();
        let ticket = tracker.issue(RequestKind::Generation);

        dispatcher.schedule(ticket, Duration::from_millis(200), ());
        assert!(dispatcher.cancel(RequestKind::Generation));
        assert!(!dispatcher.cancel(RequestKind::Generation));
        assert!(dispatcher.recv_timeout(Duration::from_millis(500)).is_none());
    }

    #[test]
    fn test_kinds_do_not_abort_each_other() {
        let mut tracker = RequestTracker::new();
        let mut dispatcher = LatencyDispatcher::new();

        dispatcher.schedule(tracker.issue(RequestKind::Chat), Duration::ZERO, 1);
        dispatcher.schedule(tracker.issue(RequestKind::Generation), Duration::ZERO, 2);

        let mut payloads = vec![
            dispatcher.recv_timeout(WAIT).unwrap().payload,
            dispatcher.recv_timeout(WAIT).unwrap().payload,
        ];
        payloads.sort();
        assert_eq!(payloads, vec![1, 2]);
    }
}
