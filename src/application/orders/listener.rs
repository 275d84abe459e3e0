//! Drives the realtime feed into the listing cache.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::query_cache::PageOutcome;
use super::session::OrderSession;
use crate::port::{FeedEvent, OrderFeed};

/// Counters reported when the listener stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerStats {
    /// New-order announcements received.
    pub announcements: u64,
    /// Page-1 refreshes that failed.
    pub failed_refreshes: u64,
}

/// Turns new-order announcements into page-1 refreshes.
///
/// Runs until the shutdown flag flips to `true`, its sender is dropped, or
/// the feed ends for good.
pub struct RealtimeListener<F: OrderFeed> {
    feed: F,
    session: Arc<OrderSession>,
}

impl<F: OrderFeed + 'static> RealtimeListener<F> {
    pub fn new(feed: F, session: Arc<OrderSession>) -> Self {
        Self { feed, session }
    }

    /// Run on a background task.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<ListenerStats> {
        tokio::spawn(self.run(shutdown))
    }

    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> ListenerStats {
        let mut stats = ListenerStats::default();

        if let Err(err) = self.feed.connect().await {
            warn!(feed = self.feed.name(), error = %err, "Initial feed connect failed");
        }
        info!(feed = self.feed.name(), "Listening for new orders");

        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    match result {
                        Ok(()) => {
                            if *shutdown.borrow() {
                                info!("Shutdown signal received");
                                break;
                            }
                        }
                        Err(_) => {
                            info!("Shutdown channel closed");
                            break;
                        }
                    }
                }
                event = self.feed.next_event() => {
                    match event {
                        Some(FeedEvent::NewOrder { payload }) => {
                            stats.announcements += 1;
                            debug!(payload = %payload, "New order event");
                            let outcome = self.session.orders().on_realtime_order_arrived().await;
                            if let PageOutcome::Failed(error) = outcome {
                                stats.failed_refreshes += 1;
                                warn!(error = %error, "Realtime refresh failed");
                            }
                        }
                        Some(FeedEvent::Disconnected { reason }) => {
                            warn!(reason = %reason, "Order feed disconnected");
                        }
                        None => {
                            warn!("Order feed ended");
                            break;
                        }
                    }
                }
            }
        }

        info!(
            announcements = stats.announcements,
            failed_refreshes = stats.failed_refreshes,
            "Realtime listener stopped"
        );
        stats
    }
}
