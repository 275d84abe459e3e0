use crate::adapter::inbound::cli::diagnostic::ConnectionDiagnostic;
use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::realtime::WebSocketOrderFeed;
use crate::domain::{FilterState, DateFilter, TypeFilter, PAGE_SIZE};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;
use crate::port::{ListQuery, OrderFeed};

/// Probe the order API and, when enabled, the realtime feed.
pub async fn execute_connection(config: &Config) -> Result<()> {
    output::section("Connection Check");
    output::field("API", &config.api.base_url);

    let api = bootstrap::build_order_api(config);
    let query = ListQuery::new(&FilterState::new(DateFilter::All, TypeFilter::All), 1, PAGE_SIZE);

    let pb = output::spinner("Checking order API...");
    match api.list_orders(&query).await {
        Ok(listing) => {
            output::spinner_success(
                &pb,
                &format!("Order API answered ({} orders on page 1)", listing.orders.len()),
            );
        }
        Err(e) => {
            output::spinner_fail(&pb, "Order API unreachable");
            report(&e.to_string());
            return Err(e);
        }
    }

    if !config.realtime.enabled {
        output::field("Realtime", "disabled");
        output::success("Connection checks passed");
        return Ok(());
    }

    output::field("Realtime", &config.realtime.ws_url);
    let mut feed = WebSocketOrderFeed::from_config(&config.realtime);
    let pb = output::spinner("Checking realtime feed...");
    match feed.connect().await {
        Ok(()) => output::spinner_success(&pb, "Realtime feed connected"),
        Err(e) => {
            output::spinner_fail(&pb, "Realtime feed connection failed");
            report(&e.to_string());
            return Err(e);
        }
    }

    output::success("Connection checks passed");
    Ok(())
}

fn report(message: &str) {
    if !output::is_json() {
        eprintln!("{:?}", miette::Report::new(ConnectionDiagnostic::new(message)));
    }
}
