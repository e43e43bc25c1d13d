//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analysis` - Summary and windowed insights
//! - `forecast` - Spending forecasts and recurring expenses
//! - `budget` - Budget allocation and alerts
//! - `ask` - Question routing with the optional responder
//! - `demo` - Generated demo transactions
//!
//! Every command works on a [`Session`]: the loaded transactions plus the
//! resolved config, reference instant and income.

pub mod analysis;
pub mod ask;
pub mod budget;
pub mod demo;
pub mod forecast;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use fincopilot_core::{
    load_csv, Analyzer, BudgetAdvisor, CopilotConfig, Forecaster, MonthlyAggregation, QueryRouter,
    Transaction,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::Cli;

// Re-export command functions for main.rs
pub use analysis::*;
pub use ask::*;
pub use budget::*;
pub use forecast::*;

/// Days of history generated for --demo
pub const DEMO_DAYS: i64 = 90;

/// Everything a command needs, resolved once from the CLI flags
pub struct Session {
    pub transactions: Vec<Transaction>,
    pub config: CopilotConfig,
    pub as_of: NaiveDateTime,
    pub income: Option<f64>,
    pub json: bool,
    aggregation: Arc<MonthlyAggregation>,
}

impl Session {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config =
            CopilotConfig::load(cli.config.as_deref()).context("Failed to load config")?;
        if let Some(days) = cli.days {
            config.analysis.default_window_days = days;
        }
        config.validate().context("Invalid configuration")?;

        let as_of = match cli.reference {
            Some(date) => date
                .and_hms_opt(23, 59, 59)
                .context("Invalid --reference date")?,
            None => Local::now().naive_local(),
        };

        let transactions = load_transactions(cli.file.as_deref(), cli.demo, as_of)?;
        info!(count = transactions.len(), "Loaded transactions");

        Ok(Self::new(transactions, config, as_of, cli.income, cli.json))
    }

    pub fn new(
        transactions: Vec<Transaction>,
        config: CopilotConfig,
        as_of: NaiveDateTime,
        income: Option<f64>,
        json: bool,
    ) -> Self {
        let aggregation = Arc::new(MonthlyAggregation::prepare(&transactions));
        Self {
            transactions,
            config,
            as_of,
            income,
            json,
            aggregation,
        }
    }

    pub fn window_days(&self) -> i64 {
        self.config.analysis.default_window_days
    }

    pub fn analyzer(&self) -> Analyzer<'_> {
        Analyzer::new(&self.transactions)
            .with_reference(self.as_of)
            .with_config(self.config)
    }

    /// Forecaster over the session's shared monthly aggregation
    pub fn forecaster(&self) -> Forecaster<'_> {
        Forecaster::new(&self.transactions)
            .with_aggregation(Arc::clone(&self.aggregation))
            .with_reference(self.as_of)
            .with_config(self.config)
    }

    pub fn advisor(&self) -> BudgetAdvisor<'_> {
        BudgetAdvisor::with_forecaster(self.forecaster(), self.income)
    }

    /// Router without a responder; `ask` attaches one
    pub fn router(&self) -> QueryRouter<'_> {
        QueryRouter::with_forecaster(self.forecaster()).with_income(self.income)
    }
}

/// Load transactions from a CSV file or generate the demo set
pub fn load_transactions(
    file: Option<&Path>,
    demo: bool,
    as_of: NaiveDateTime,
) -> Result<Vec<Transaction>> {
    match (file, demo) {
        (Some(path), _) => {
            debug!(path = %path.display(), "Reading transactions");
            load_csv(path).with_context(|| format!("Failed to load {}", path.display()))
        }
        (None, true) => demo::demo_transactions(as_of, DEMO_DAYS, demo::DEMO_SEED)
            .context("Failed to generate demo data"),
        (None, false) => anyhow::bail!("No transactions: pass --file <CSV> or --demo"),
    }
}

/// Pretty-print a serializable value as JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Format an amount as dollars with thousands separators
pub fn money(amount: f64) -> String {
    let cents = format!("{:.2}", amount.abs());
    let sign = if amount < 0.0 && cents != "0.00" { "-" } else { "" };
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}${}.{}", sign, grouped, frac)
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
