//! Command-line interface definitions.
//!
//! Defines the CLI structure for the orderdesk dashboard using `clap`.
//! Subcommands page through the order list, inspect and mutate single
//! orders, print slips, follow the realtime feed and validate configuration.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::paths;
use crate::domain::{DateFilter, TypeFilter};

/// Restaurant order dashboard
#[derive(Parser, Debug)]
#[command(name = "orderdesk")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the orderdesk CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List one page of orders
    List(ListArgs),

    /// Show a single order
    Show(OrderArg),

    /// Flip an order's completion flag
    Toggle(OrderArg),

    /// Delete an order
    Delete(DeleteArgs),

    /// Print the bill or kitchen ticket for an order
    Bill(BillArgs),

    /// Follow new orders as they arrive
    Watch(WatchArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `orderdesk check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration file syntax and semantics.
    Config,
    /// Probe the order API and the realtime feed.
    Connection,
}

/// Listing filters shared by `list` and `watch`.
#[derive(Parser, Debug, Clone)]
pub struct FilterArgs {
    /// Date range [today, yesterday, all, custom]
    #[arg(long, default_value = "today", value_parser = parse_date_filter)]
    pub date: DateFilter,

    /// Day for `--date custom` (YYYY-MM-DD)
    #[arg(long)]
    pub custom_date: Option<String>,

    /// Order type [all, pickup, delivery]
    #[arg(long = "type", default_value = "all", value_parser = parse_type_filter)]
    pub order_type: TypeFilter,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Page number (1-based)
    #[arg(short, long, default_value = "1")]
    pub page: u32,
}

#[derive(Parser, Debug)]
pub struct OrderArg {
    /// Order id
    pub id: String,
}

#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Order id
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct BillArgs {
    /// Order id
    pub id: String,

    /// Print the kitchen ticket instead of the bill
    #[arg(long)]
    pub kitchen: bool,
}

#[derive(Parser, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub filters: FilterArgs,
}

fn parse_date_filter(value: &str) -> Result<DateFilter, String> {
    value.parse().map_err(|e: crate::domain::DomainError| e.to_string())
}

fn parse_type_filter(value: &str) -> Result<TypeFilter, String> {
    value.parse().map_err(|e: crate::domain::DomainError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_command_factory_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "orderdesk");
        assert!(cmd.get_version().is_some());
    }

    #[test]
    fn test_color_choice_default_is_auto() {
        assert!(matches!(ColorChoice::default(), ColorChoice::Auto));
    }

    #[test]
    fn test_parse_list_defaults() {
        let cli = Cli::try_parse_from(["orderdesk", "list"]).unwrap();
        let Commands::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.page, 1);
        assert_eq!(args.filters.date, DateFilter::Today);
        assert_eq!(args.filters.order_type, TypeFilter::All);
        assert!(args.filters.custom_date.is_none());
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_list_with_filters() {
        let cli = Cli::try_parse_from([
            "orderdesk",
            "list",
            "--date",
            "custom",
            "--custom-date",
            "2024-03-05",
            "--type",
            "pickup",
            "-p",
            "3",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        let Commands::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.page, 3);
        assert_eq!(args.filters.date, DateFilter::Custom);
        assert_eq!(args.filters.order_type, TypeFilter::Pickup);
        assert_eq!(args.filters.custom_date.as_deref(), Some("2024-03-05"));
    }

    #[test]
    fn test_parse_rejects_unknown_filter() {
        assert!(Cli::try_parse_from(["orderdesk", "list", "--date", "tomorrow"]).is_err());
        assert!(Cli::try_parse_from(["orderdesk", "list", "--type", "dine-in"]).is_err());
    }

    #[test]
    fn test_parse_delete_and_bill() {
        let cli = Cli::try_parse_from(["orderdesk", "delete", "abc", "--yes"]).unwrap();
        assert!(matches!(cli.command, Commands::Delete(DeleteArgs { yes: true, .. })));

        let cli = Cli::try_parse_from(["orderdesk", "bill", "abc", "--kitchen"]).unwrap();
        assert!(matches!(cli.command, Commands::Bill(BillArgs { kitchen: true, .. })));
    }

    #[test]
    fn test_parse_check_config_with_path() {
        let cli = Cli::try_parse_from(["orderdesk", "check", "config", "-c", "/tmp/x.toml"]).unwrap();
        assert!(matches!(cli.command, Commands::Check(CheckCommand::Config)));
        assert_eq!(cli.config, PathBuf::from("/tmp/x.toml"));
    }
}
