//! Fire-and-forget request dispatch for the UI thread.
//!
//! The TUI runs its draw loop synchronously, so it cannot await a request.
//! [`Dispatcher::dispatch`] builds the request, spawns it on a tokio runtime,
//! and returns immediately with a [`RequestId`]. When the request finishes,
//! a [`Landed`] value is pushed onto an unbounded channel that the UI drains
//! once per frame.
//!
//! There is no cancellation. Two overlapping requests may land in either
//! order; ids only let the receiver tell which one was issued later.

use crate::{request_for, ClientError, SearchBackend};
use reel_core::config::QueryConfig;
use reel_core::{Endpoint, SearchResponse};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// Issue order of a dispatched request. Later requests compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

/// A completed request, delivered in completion order.
#[derive(Debug)]
pub struct Landed {
    pub id: RequestId,
    pub endpoint: Endpoint,
    /// The search text the request was built from.
    pub text: String,
    pub outcome: Result<SearchResponse, ClientError>,
}

pub struct Dispatcher<B> {
    backend: Arc<B>,
    query: QueryConfig,
    handle: Handle,
    tx: mpsc::UnboundedSender<Landed>,
    next_id: u64,
}

impl<B: SearchBackend> Dispatcher<B> {
    pub fn new(
        backend: Arc<B>,
        query: QueryConfig,
        handle: Handle,
    ) -> (Self, mpsc::UnboundedReceiver<Landed>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Self {
            backend,
            query,
            handle,
            tx,
            next_id: 0,
        };
        (dispatcher, rx)
    }

    /// Parse `text`, send it to `endpoint` in the background, and return the
    /// id the eventual [`Landed`] will carry.
    pub fn dispatch(&mut self, endpoint: Endpoint, text: &str) -> RequestId {
        let id = RequestId(self.next_id);
        self.next_id += 1;

        let request = request_for(&self.query, endpoint, text);
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        let text = text.to_string();

        tracing::debug!(id = id.0, %endpoint, text = %text, "dispatching");
        self.handle.spawn(async move {
            let outcome = backend.execute(endpoint, request).await;
            if let Err(e) = &outcome {
                tracing::warn!(id = id.0, %endpoint, error = %e, "request failed");
            }
            // The receiver is gone when the UI has shut down; nothing to do.
            let _ = tx.send(Landed {
                id,
                endpoint,
                text,
                outcome,
            });
        });

        id
    }

    /// Id of the most recently dispatched request, if any.
    pub fn last_issued(&self) -> Option<RequestId> {
        self.next_id.checked_sub(1).map(RequestId)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
