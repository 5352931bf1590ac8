//! Queued confirmation dialogs.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use tokio::sync::{Notify, oneshot};
use tracing::debug;

use crate::domain::entities::{ConfirmOptions, ConfirmRequest};

struct Pending {
    request: ConfirmRequest,
    resolver: oneshot::Sender<bool>,
}

#[derive(Default)]
struct ConfirmQueue {
    next_id: u64,
    pending: VecDeque<Pending>,
}

/// Answer to a queued confirmation.
///
/// Resolves to `false` if the request is dropped without an answer.
#[derive(Debug)]
#[must_use = "the answer is only observed by awaiting it"]
pub struct PendingAnswer {
    id: u64,
    receiver: oneshot::Receiver<bool>,
}

impl PendingAnswer {
    /// Id of the request this answer belongs to.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }
}

impl Future for PendingAnswer {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|answer| answer.unwrap_or(false))
    }
}

/// FIFO of confirmation requests, each with its own resolver.
///
/// The head request is the one on screen; answering it advances the queue.
#[derive(Clone, Default)]
pub struct ConfirmStore {
    queue: Arc<Mutex<ConfirmQueue>>,
    changed: Arc<Notify>,
}

impl ConfirmStore {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues a question.
    pub fn confirm(&self, options: ConfirmOptions) -> PendingAnswer {
        let (resolver, receiver) = oneshot::channel();
        let id = {
            let mut queue = self.queue.lock();
            queue.next_id += 1;
            let id = queue.next_id;
            queue.pending.push_back(Pending {
                request: ConfirmRequest { id, options },
                resolver,
            });
            debug!(id, queued = queue.pending.len(), "Confirmation requested");
            id
        };
        self.changed.notify_waiters();

        PendingAnswer { id, receiver }
    }

    /// Request currently awaiting an answer.
    #[must_use]
    pub fn current(&self) -> Option<ConfirmRequest> {
        self.queue
            .lock()
            .pending
            .front()
            .map(|pending| pending.request.clone())
    }

    /// Number of unanswered requests, head included.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.lock().pending.len()
    }

    /// Answers the head request. Returns `false` when nothing is queued.
    pub fn respond(&self, answer: bool) -> bool {
        let Some(head) = self.queue.lock().pending.pop_front() else {
            return false;
        };

        debug!(id = head.request.id, answer, "Confirmation answered");
        // Receiver may already be gone.
        let _ = head.resolver.send(answer);
        self.changed.notify_waiters();
        true
    }

    /// Drops every queued request; their answers resolve to `false`.
    pub fn cancel_all(&self) {
        let dropped: Vec<Pending> = self.queue.lock().pending.drain(..).collect();
        if !dropped.is_empty() {
            debug!(count = dropped.len(), "Confirmations cancelled");
        }
        drop(dropped);
        self.changed.notify_waiters();
    }

    /// Waits until a request is at the head of the queue.
    pub async fn next_request(&self) -> ConfirmRequest {
        loop {
            let notified = self.changed.notified();
            if let Some(request) = self.current() {
                return request;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::task;
    use tokio_test::{assert_pending, assert_ready, assert_ready_eq};

    #[test]
    fn test_answer_resolves_future() {
        let store = ConfirmStore::new();
        let mut answer = task::spawn(store.confirm(ConfirmOptions::new("Delete", "Delete case?")));

        assert_pending!(answer.poll());
        assert_eq!(store.current().unwrap().options.title, "Delete");

        assert!(store.respond(true));

        assert!(answer.is_woken());
        assert_ready_eq!(answer.poll(), true);
        assert!(store.current().is_none());
    }

    #[test]
    fn test_queued_requests_are_not_orphaned() {
        let store = ConfirmStore::new();
        let mut first = task::spawn(store.confirm(ConfirmOptions::new("First", "?")));
        let mut second = task::spawn(store.confirm(ConfirmOptions::new("Second", "?")));

        assert_eq!(store.pending(), 2);
        assert_eq!(store.current().unwrap().options.title, "First");

        store.respond(false);
        assert_ready_eq!(first.poll(), false);
        assert_pending!(second.poll());
        assert_eq!(store.current().unwrap().options.title, "Second");

        store.respond(true);
        assert_ready_eq!(second.poll(), true);
    }

    #[test]
    fn test_ids_increase() {
        let store = ConfirmStore::new();
        let a = store.confirm(ConfirmOptions::new("a", "?"));
        let b = store.confirm(ConfirmOptions::new("b", "?"));

        assert!(b.id() > a.id());
        assert_eq!(store.current().unwrap().id, a.id());
    }

    #[test]
    fn test_cancel_all_resolves_false() {
        let store = ConfirmStore::new();
        let mut first = task::spawn(store.confirm(ConfirmOptions::new("a", "?")));
        let mut second = task::spawn(store.confirm(ConfirmOptions::new("b", "?").destructive()));

        store.cancel_all();

        assert_ready_eq!(first.poll(), false);
        assert_ready_eq!(second.poll(), false);
        assert_eq!(store.pending(), 0);
    }

    #[test]
    fn test_dropped_store_resolves_false() {
        let store = ConfirmStore::new();
        let mut answer = task::spawn(store.confirm(ConfirmOptions::new("a", "?")));

        drop(store);

        assert_ready_eq!(answer.poll(), false);
    }

    #[test]
    fn test_respond_on_empty_queue() {
        let store = ConfirmStore::new();
        assert!(!store.respond(true));
    }

    #[test]
    fn test_next_request_waits_for_enqueue() {
        let store = ConfirmStore::new();
        let mut next = task::spawn(store.next_request());

        assert_pending!(next.poll());

        let _answer = store.confirm(ConfirmOptions::new("Archive", "Archive document?"));

        assert!(next.is_woken());
        let request = assert_ready!(next.poll());
        assert_eq!(request.options.message, "Archive document?");
    }
}
