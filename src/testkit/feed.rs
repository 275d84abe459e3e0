//! Mock [`OrderFeed`] implementations for testing.
//!
//! - [`ScriptedFeed`]: Pre-loaded connect results and events.
//!   Best for: reconnection and backoff behavior.
//!
//! - [`ChannelFeed`]: Channel-backed feed with an external control handle.
//!   Best for: listener tests needing on-demand event delivery.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::port::{FeedEvent, OrderFeed};

// ---------------------------------------------------------------------------
// ScriptedFeed
// ---------------------------------------------------------------------------

/// A mock feed with scripted connect results and a fixed event queue.
///
/// `connect()` pops the next result (defaults to `Ok(())` when exhausted).
/// Once the event queue is drained, `next_event()` never resolves, so a
/// consumer parks instead of spinning.
pub struct ScriptedFeed {
    connect_results: VecDeque<Result<()>>,
    events: VecDeque<Option<FeedEvent>>,
    connect_count: Arc<AtomicU32>,
}

impl ScriptedFeed {
    pub fn new() -> Self {
        Self {
            connect_results: VecDeque::new(),
            events: VecDeque::new(),
            connect_count: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn with_connect_results(mut self, results: Vec<Result<()>>) -> Self {
        self.connect_results = results.into();
        self
    }

    pub fn with_events(mut self, events: Vec<Option<FeedEvent>>) -> Self {
        self.events = events.into();
        self
    }

    /// Shared counter for asserting connect calls after the feed is moved.
    pub fn connect_counter(&self) -> Arc<AtomicU32> {
        self.connect_count.clone()
    }

    pub fn connect_count(&self) -> u32 {
        self.connect_count.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderFeed for ScriptedFeed {
    async fn connect(&mut self) -> Result<()> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        self.connect_results.pop_front().unwrap_or(Ok(()))
    }

    async fn next_event(&mut self) -> Option<FeedEvent> {
        match self.events.pop_front() {
            Some(event) => event,
            None => std::future::pending().await,
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

// ---------------------------------------------------------------------------
// ChannelFeed
// ---------------------------------------------------------------------------

/// A mock feed controlled externally via a [`ChannelFeedHandle`].
pub struct ChannelFeed {
    event_rx: mpsc::Receiver<Option<FeedEvent>>,
    connect_count: Arc<AtomicU32>,
}

/// Control handle for a [`ChannelFeed`].
#[derive(Clone)]
pub struct ChannelFeedHandle {
    event_tx: mpsc::Sender<Option<FeedEvent>>,
    connect_count: Arc<AtomicU32>,
}

impl ChannelFeedHandle {
    /// Announce a new order.
    pub async fn new_order(&self, payload: serde_json::Value) {
        let _ = self.event_tx.send(Some(FeedEvent::NewOrder { payload })).await;
    }

    /// Send an arbitrary event.
    pub async fn send(&self, event: FeedEvent) {
        let _ = self.event_tx.send(Some(event)).await;
    }

    /// Signal end-of-feed (causes `next_event` to return `None`).
    pub async fn close(&self) {
        let _ = self.event_tx.send(None).await;
    }

    pub fn connect_count(&self) -> u32 {
        self.connect_count.load(Ordering::SeqCst)
    }
}

/// Create a [`ChannelFeed`] and its control [`ChannelFeedHandle`].
pub fn channel_feed(buffer: usize) -> (ChannelFeed, ChannelFeedHandle) {
    let (tx, rx) = mpsc::channel(buffer);
    let count = Arc::new(AtomicU32::new(0));
    (
        ChannelFeed {
            event_rx: rx,
            connect_count: count.clone(),
        },
        ChannelFeedHandle {
            event_tx: tx,
            connect_count: count,
        },
    )
}

#[async_trait]
impl OrderFeed for ChannelFeed {
    async fn connect(&mut self) -> Result<()> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn next_event(&mut self) -> Option<FeedEvent> {
        match self.event_rx.recv().await {
            Some(Some(event)) => Some(event),
            Some(None) | None => None,
        }
    }

    fn name(&self) -> &'static str {
        "channel"
    }
}
