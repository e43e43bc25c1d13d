//! fincopilot CLI - Personal finance analytics and forecasting
//!
//! Usage:
//!   fincopilot --file tx.csv insights         Spending insights for the window
//!   fincopilot --demo forecast --method linear  Next month's spending
//!   fincopilot --demo budget --income 4000    50/30/20 budget and savings
//!   fincopilot --file tx.csv ask "How much did I spend?"

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use commands::Session;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let session = Session::from_cli(&cli)?;

    match cli.command {
        Commands::Summary => commands::cmd_summary(&session),
        Commands::Insights => commands::cmd_insights(&session),
        Commands::Forecast {
            method,
            category,
            all_categories,
        } => commands::cmd_forecast(&session, method, category, all_categories),
        Commands::Budget => commands::cmd_budget(&session),
        Commands::Alerts => commands::cmd_alerts(&session),
        Commands::Recurring => commands::cmd_recurring(&session),
        Commands::Ask { question } => commands::cmd_ask(&session, &question.join(" ")).await,
    }
}
