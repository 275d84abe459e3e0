use clap::Parser;
use orderdesk::adapter::inbound::cli::command::{Cli, ColorChoice};
use orderdesk::adapter::inbound::cli::output::{self, OutputConfig};
use orderdesk::adapter::inbound::cli::run;
use tracing::error;

#[tokio::main]
async fn main() {
    // Both reqwest and tokio-tungstenite pull in rustls; pick one provider.
    let _ = rustls::crypto::ring::default_provider().install_default();
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    if let Err(e) = run(cli).await {
        error!(error = %e, "Command failed");
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
