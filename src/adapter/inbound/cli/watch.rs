//! Handler for `watch`: a live order list fed by the realtime feed.

use std::sync::Arc;

use chrono::Local;
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use crate::adapter::inbound::cli::command::FilterArgs;
use crate::adapter::inbound::cli::orders::{filters_from_args, print_view};
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;

/// Execute `watch` until Ctrl+C.
pub async fn execute(config: &Config, args: &FilterArgs) -> Result<()> {
    let filters = filters_from_args(args)?;
    let (session, mut updates) = bootstrap::build_watched_session(config);
    let session = Arc::new(session);

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("API", session.endpoint());

    session.orders().set_filters(filters);
    session.orders().go_to_page(1).await;
    print_view(&session.orders().current());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let listener = bootstrap::spawn_listener(config, Arc::clone(&session), shutdown_rx);
    if listener.is_none() {
        output::warning("Realtime feed disabled; the list will not refresh");
    } else {
        output::hint("press Ctrl+C to stop");
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
            update = updates.recv() => {
                match update {
                    Ok(update) if update.realtime => {
                        let view = session.orders().current();
                        let timestamp = Local::now().format("%H:%M:%S").to_string();
                        output::arrived(
                            &timestamp,
                            &format!("page 1 refreshed, {} orders in total", view.total_count),
                        );
                        print_view(&view);
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "View updates lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    // Receivers may already be gone; the listener also stops on drop.
    let _ = shutdown_tx.send(true);
    if let Some(handle) = listener {
        match handle.await {
            Ok(stats) => {
                output::section("Session");
                output::field("New orders", stats.announcements);
                output::field("Failed refreshes", stats.failed_refreshes);
            }
            Err(e) => warn!(error = %e, "Listener task failed"),
        }
    }

    Ok(())
}
