//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use fincopilot_core::{Category, ForecastMethod};

/// fincopilot - Spending analytics, forecasts and budget advice
#[derive(Parser, Debug)]
#[command(name = "fincopilot")]
#[command(about = "Personal finance analytics and forecasting", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Transactions CSV (id,date,description,amount,type,category,merchant,status,notes)
    #[arg(short, long, global = true, conflicts_with = "demo")]
    pub file: Option<PathBuf>,

    /// Use generated demo transactions instead of a file
    #[arg(long, global = true)]
    pub demo: bool,

    /// Lookback window in days (defaults to the configured window)
    #[arg(short, long, global = true)]
    pub days: Option<i64>,

    /// Monthly income for budgeting (estimated from credits if omitted)
    #[arg(long, global = true)]
    pub income: Option<f64>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    pub reference: Option<NaiveDate>,

    /// Thresholds config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plain-text financial summary
    Summary,

    /// Spending insights for the lookback window
    Insights,

    /// Forecast next month's spending
    Forecast {
        /// Forecast method: rolling, linear
        #[arg(short, long, default_value = "rolling")]
        method: ForecastMethod,

        /// Forecast a single category (e.g. "Groceries")
        #[arg(short, long, conflicts_with = "all_categories")]
        category: Option<Category>,

        /// Forecast every category with spending history
        #[arg(long)]
        all_categories: bool,
    },

    /// 50/30/20 budget, category budgets and savings
    Budget,

    /// Budget and spending-pattern alerts
    Alerts,

    /// Recurring expenses and the next expected paycheck
    Recurring,

    /// Ask a question about your finances
    Ask {
        /// The question (quotes optional)
        #[arg(required = true)]
        question: Vec<String>,
    },
}
