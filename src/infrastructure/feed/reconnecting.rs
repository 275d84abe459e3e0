//! Reconnecting wrapper for OrderFeed.
//!
//! Provides automatic reconnection with exponential backoff and circuit
//! breaker protection for any [`OrderFeed`] implementation. Disconnections
//! are absorbed; the caller only ever sees new-order events.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::infrastructure::config::realtime::ReconnectionConfig;
use crate::port::{FeedEvent, OrderFeed};

/// Circuit breaker state for connection attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CircuitState {
    /// Normal operation; connections are allowed.
    Closed,
    /// Too many consecutive failures; connections blocked until cooldown expires.
    Open {
        /// Instant when the circuit breaker will transition back to Closed.
        until: Instant,
    },
}

/// Wrapper that adds automatic reconnection to any [`OrderFeed`].
///
/// A circuit breaker trips after too many consecutive failures and holds
/// further attempts for the configured cooldown.
pub struct ReconnectingOrderFeed<F: OrderFeed> {
    inner: F,
    config: ReconnectionConfig,
    consecutive_failures: u32,
    /// Current backoff delay in milliseconds.
    current_delay_ms: u64,
    circuit_state: CircuitState,
    connected: bool,
    /// Successful reconnects since construction.
    reconnects: u64,
}

impl<F: OrderFeed> ReconnectingOrderFeed<F> {
    /// The wrapper starts disconnected; call [`connect`](OrderFeed::connect)
    /// or let the first [`next_event`](OrderFeed::next_event) connect lazily.
    pub fn new(inner: F, config: ReconnectionConfig) -> Self {
        let initial_delay = config.initial_delay_ms;
        Self {
            inner,
            config,
            consecutive_failures: 0,
            current_delay_ms: initial_delay,
            circuit_state: CircuitState::Closed,
            connected: false,
            reconnects: 0,
        }
    }

    /// Number of successful reconnects (initial connect excluded).
    #[must_use]
    pub fn reconnects(&self) -> u64 {
        self.reconnects
    }

    fn reset_backoff(&mut self) {
        self.consecutive_failures = 0;
        self.current_delay_ms = self.config.initial_delay_ms;
        self.circuit_state = CircuitState::Closed;
    }

    /// Current delay plus up to 20% jitter; advances the delay for next time.
    fn next_delay(&mut self) -> Duration {
        let base_delay = Duration::from_millis(self.current_delay_ms);
        let delay = base_delay + Duration::from_millis(jitter_ms(base_delay));

        let next_delay = (self.current_delay_ms as f64 * self.config.backoff_multiplier) as u64;
        self.current_delay_ms = next_delay.min(self.config.max_delay_ms);

        delay
    }

    fn record_failure(&mut self) {
        self.consecutive_failures += 1;
        self.connected = false;

        if self.consecutive_failures >= self.config.max_consecutive_failures {
            let cooldown = Duration::from_millis(self.config.circuit_breaker_cooldown_ms);
            self.circuit_state = CircuitState::Open {
                until: Instant::now() + cooldown,
            };
            error!(
                failures = self.consecutive_failures,
                cooldown_secs = cooldown.as_secs(),
                "Circuit breaker tripped, pausing reconnection attempts"
            );
        }
    }

    async fn reconnect(&mut self) -> Result<(), Error> {
        if let CircuitState::Open { until } = self.circuit_state {
            let remaining = until.saturating_duration_since(Instant::now());
            if !remaining.is_zero() {
                warn!(
                    remaining_secs = remaining.as_secs(),
                    "Circuit breaker open, waiting for cooldown"
                );
                sleep(remaining).await;
            }
            info!("Circuit breaker cooldown expired, allowing reconnection");
            self.reset_backoff();
        }

        let delay = self.next_delay();
        info!(
            delay_ms = delay.as_millis(),
            attempt = self.consecutive_failures + 1,
            feed = self.inner.name(),
            "Reconnecting after delay"
        );
        sleep(delay).await;

        match self.inner.connect().await {
            Ok(()) => {
                info!("Reconnected successfully");
                self.connected = true;
                self.reconnects += 1;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Reconnection failed");
                self.record_failure();
                Err(e)
            }
        }
    }
}

fn jitter_ms(base_delay: Duration) -> u64 {
    let jitter_range_ms = (base_delay.as_millis() as u64) / 5;
    if jitter_range_ms == 0 {
        return 0;
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    u64::from(nanos) % (jitter_range_ms + 1)
}

#[async_trait]
impl<F: OrderFeed> OrderFeed for ReconnectingOrderFeed<F> {
    async fn connect(&mut self) -> Result<(), Error> {
        let result = self.inner.connect().await;
        match &result {
            Ok(()) => {
                self.connected = true;
                self.reset_backoff();
            }
            Err(_) => self.record_failure(),
        }
        result
    }

    async fn next_event(&mut self) -> Option<FeedEvent> {
        loop {
            if !self.connected {
                if let Err(e) = self.reconnect().await {
                    warn!(error = %e, "Reconnection attempt failed, will retry");
                    continue;
                }
            }

            match self.inner.next_event().await {
                Some(FeedEvent::Disconnected { reason }) => {
                    warn!(reason = %reason, "Order feed lost, will reconnect");
                    self.record_failure();
                }
                Some(event) => {
                    if self.consecutive_failures > 0 {
                        debug!("Received event after reconnection, resetting failure count");
                        self.reset_backoff();
                    }
                    return Some(event);
                }
                None => {
                    warn!("Order feed ended unexpectedly, will reconnect");
                    self.record_failure();
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::testkit::feed::ScriptedFeed;

    fn fast_config() -> ReconnectionConfig {
        ReconnectionConfig {
            initial_delay_ms: 1,
            max_delay_ms: 10,
            backoff_multiplier: 2.0,
            max_consecutive_failures: 3,
            circuit_breaker_cooldown_ms: 10,
        }
    }

    fn new_order() -> FeedEvent {
        FeedEvent::NewOrder {
            payload: json!({"_id": "1"}),
        }
    }

    fn disconnected() -> FeedEvent {
        FeedEvent::Disconnected {
            reason: "test".into(),
        }
    }

    #[tokio::test]
    async fn passes_events_through() {
        let feed = ScriptedFeed::new().with_events(vec![Some(new_order())]);
        let mut feed = ReconnectingOrderFeed::new(feed, fast_config());
        feed.connect().await.unwrap();

        assert_eq!(feed.next_event().await, Some(new_order()));
        assert_eq!(feed.reconnects(), 0);
    }

    #[tokio::test]
    async fn reconnects_after_disconnect() {
        let inner = ScriptedFeed::new().with_events(vec![Some(disconnected()), Some(new_order())]);
        let connects = inner.connect_counter();
        let mut feed = ReconnectingOrderFeed::new(inner, fast_config());
        feed.connect().await.unwrap();

        assert_eq!(feed.next_event().await, Some(new_order()));
        assert_eq!(connects.load(std::sync::atomic::Ordering::SeqCst), 2);
        assert_eq!(feed.reconnects(), 1);
    }

    #[tokio::test]
    async fn retries_failed_reconnects() {
        let inner = ScriptedFeed::new()
            .with_connect_results(vec![
                Ok(()),
                Err(Error::Connection("refused".into())),
                Err(Error::Connection("refused".into())),
            ])
            .with_events(vec![None, Some(new_order())]);
        let connects = inner.connect_counter();
        let mut feed = ReconnectingOrderFeed::new(inner, fast_config());
        feed.connect().await.unwrap();

        assert_eq!(feed.next_event().await, Some(new_order()));
        assert_eq!(connects.load(std::sync::atomic::Ordering::SeqCst), 4);
    }

    #[test]
    fn backoff_grows_until_capped() {
        let mut feed = ReconnectingOrderFeed::new(
            ScriptedFeed::new(),
            ReconnectionConfig {
                initial_delay_ms: 100,
                max_delay_ms: 300,
                ..fast_config()
            },
        );
        let first = feed.next_delay();
        assert!(first >= Duration::from_millis(100) && first <= Duration::from_millis(120));
        feed.next_delay();
        assert_eq!(feed.current_delay_ms, 300);
        feed.next_delay();
        assert_eq!(feed.current_delay_ms, 300);
    }

    #[test]
    fn circuit_trips_after_max_failures() {
        let mut feed = ReconnectingOrderFeed::new(ScriptedFeed::new(), fast_config());
        for _ in 0..3 {
            feed.record_failure();
        }
        assert!(matches!(feed.circuit_state, CircuitState::Open { .. }));
        feed.reset_backoff();
        assert_eq!(feed.circuit_state, CircuitState::Closed);
    }
}
