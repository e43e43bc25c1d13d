//! Spending forecaster
//!
//! Two stages: transactions are bucketed by calendar month
//! ([`MonthlyAggregation`]), then a [`ForecastMethod`] projects the next
//! bucket. Recurring expense detection, spending velocity and paycheck
//! prediction live here too since they share the same history.

mod monthly;
mod recurring;

pub use monthly::{bucket_by_month, MonthlyAggregation, MonthlyBucket, YearMonth};
pub use recurring::{detect_recurring, normalize_description, RecurringExpense};

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analyzer::Analyzer;
use crate::config::{CopilotConfig, ForecastConfig};
use crate::error::{Error, Result};
use crate::models::{Category, Transaction, TrendDirection};

/// Projection method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastMethod {
    /// Recent mean plus a damped trend adjustment
    #[default]
    Rolling,
    /// Least-squares line over all buckets
    Linear,
}

impl ForecastMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rolling => "rolling",
            Self::Linear => "linear",
        }
    }
}

impl std::str::FromStr for ForecastMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rolling" => Ok(Self::Rolling),
            "linear" => Ok(Self::Linear),
            _ => Err(format!(
                "Unknown forecast method: {} (valid: rolling, linear)",
                s
            )),
        }
    }
}

impl std::fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How much history backs a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// High for 6+ months, medium for 3-5, low otherwise
    pub fn from_bucket_count(count: usize) -> Self {
        match count {
            0..=2 => Self::Low,
            3..=5 => Self::Medium,
            _ => Self::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Next-month projection with the history it was computed from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRecord {
    /// Never negative
    pub forecast_amount: f64,
    pub method: ForecastMethod,
    pub confidence: Confidence,
    /// "YYYY-MM", ascending
    pub historical_months: Vec<String>,
    pub historical_amounts: Vec<f64>,
}

/// Recent-window spend compared with the equal window before it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingVelocity {
    pub window_days: i64,
    pub recent_spending: f64,
    pub previous_spending: f64,
    /// recent / previous; `None` when the previous window had no spend
    pub velocity: Option<f64>,
    pub change_pct: Option<f64>,
    pub trend: TrendDirection,
}

/// Expected date of the next income deposit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaycheckPrediction {
    pub description: String,
    pub average_amount: f64,
    pub interval_days: i64,
    pub last_date: NaiveDate,
    pub next_date: NaiveDate,
}

/// Project the bucket after `amounts`
///
/// `amounts` must not be empty.
fn project(amounts: &[f64], method: ForecastMethod, config: &ForecastConfig) -> f64 {
    let n = amounts.len();
    let last = amounts[n - 1];
    if n == 1 {
        return last;
    }

    match method {
        ForecastMethod::Rolling => {
            let k = config.rolling_window.min(n);
            let window = &amounts[n - k..];
            let base = window.iter().sum::<f64>() / k as f64;
            if k < 2 {
                return base;
            }
            let before = &window[..k - 1];
            let before_mean = before.iter().sum::<f64>() / before.len() as f64;
            base + (last - before_mean) * config.trend_damping
        }
        ForecastMethod::Linear => {
            let n_f = n as f64;
            let x_mean = (n_f - 1.0) / 2.0;
            let y_mean = amounts.iter().sum::<f64>() / n_f;

            let mut num = 0.0;
            let mut den = 0.0;
            for (i, y) in amounts.iter().enumerate() {
                let dx = i as f64 - x_mean;
                num += dx * (y - y_mean);
                den += dx * dx;
            }
            let slope = num / den;
            let intercept = y_mean - slope * x_mean;
            intercept + slope * n_f
        }
    }
}

/// Forecasting view over a transaction slice
#[derive(Debug, Clone)]
pub struct Forecaster<'a> {
    transactions: &'a [Transaction],
    aggregation: Arc<MonthlyAggregation>,
    as_of: NaiveDateTime,
    config: CopilotConfig,
}

impl<'a> Forecaster<'a> {
    /// Create a forecaster, bucketing the transactions once
    pub fn new(transactions: &'a [Transaction]) -> Self {
        Self {
            transactions,
            aggregation: Arc::new(MonthlyAggregation::prepare(transactions)),
            as_of: Local::now().naive_local(),
            config: CopilotConfig::default(),
        }
    }

    /// Reuse an aggregation built elsewhere from the same transactions
    pub fn with_aggregation(mut self, aggregation: Arc<MonthlyAggregation>) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Anchor velocity windows at a fixed instant
    pub fn with_reference(mut self, as_of: NaiveDateTime) -> Self {
        self.as_of = as_of;
        self
    }

    pub fn with_config(mut self, config: CopilotConfig) -> Self {
        self.config = config;
        self
    }

    pub fn transactions(&self) -> &'a [Transaction] {
        self.transactions
    }

    pub fn aggregation(&self) -> &Arc<MonthlyAggregation> {
        &self.aggregation
    }

    pub fn as_of(&self) -> NaiveDateTime {
        self.as_of
    }

    pub fn config(&self) -> &CopilotConfig {
        &self.config
    }

    fn analyzer(&self) -> Analyzer<'a> {
        Analyzer::new(self.transactions)
            .with_reference(self.as_of)
            .with_config(self.config)
    }

    /// Debit totals per calendar month, ascending
    pub fn prepare_monthly_data(&self) -> Vec<MonthlyBucket> {
        self.aggregation.spending.clone()
    }

    fn forecast_buckets(
        &self,
        buckets: &[MonthlyBucket],
        method: ForecastMethod,
        what: &str,
    ) -> Result<ForecastRecord> {
        if buckets.is_empty() {
            return Err(Error::InsufficientData(format!(
                "no debit transactions to forecast {}",
                what
            )));
        }

        let historical_amounts: Vec<f64> = buckets.iter().map(|b| b.total_amount).collect();
        let forecast_amount = project(&historical_amounts, method, &self.config.forecast).max(0.0);
        let confidence = Confidence::from_bucket_count(buckets.len());

        debug!(
            what,
            method = method.as_str(),
            buckets = buckets.len(),
            forecast_amount,
            "Forecast computed"
        );

        Ok(ForecastRecord {
            forecast_amount,
            method,
            confidence,
            historical_months: buckets.iter().map(|b| b.month.to_string()).collect(),
            historical_amounts,
        })
    }

    /// Project next month's total spending
    pub fn forecast_monthly_spending(&self, method: ForecastMethod) -> Result<ForecastRecord> {
        self.forecast_buckets(&self.aggregation.spending, method, "spending")
    }

    /// Project next month's spending in one category
    pub fn forecast_category_spending(
        &self,
        category: Category,
        method: ForecastMethod,
    ) -> Result<ForecastRecord> {
        let buckets = bucket_by_month(
            self.transactions
                .iter()
                .filter(|t| t.is_debit() && t.category == category),
        );
        self.forecast_buckets(&buckets, method, category.as_str())
    }

    /// Category forecasts for every category with spending history
    pub fn forecast_all_categories(
        &self,
        method: ForecastMethod,
    ) -> BTreeMap<Category, ForecastRecord> {
        Category::ALL
            .iter()
            .filter_map(|&category| {
                self.forecast_category_spending(category, method)
                    .ok()
                    .map(|record| (category, record))
            })
            .collect()
    }

    /// Debits that repeat on a regular cadence
    pub fn identify_recurring_expenses(&self) -> Vec<RecurringExpense> {
        detect_recurring(
            self.transactions.iter().filter(|t| t.is_debit()),
            &self.config.recurring,
        )
    }

    /// Compare spend in the last `window_days` with the window before it
    ///
    /// The recent window is `[as_of - n, as_of]`; the previous one is
    /// `[as_of - 2n, as_of - n)` so no instant counts twice.
    pub fn spending_velocity(&self, window_days: i64) -> Result<SpendingVelocity> {
        let analyzer = self.analyzer();
        let recent_spending = analyzer.total_spent(window_days)?;

        let (recent_start, _) = analyzer.window_bounds(window_days)?;
        let previous_start = recent_start
            .checked_sub_signed(Duration::days(window_days))
            .ok_or(Error::InvalidWindow(window_days))?;
        let previous_spending: f64 = self
            .transactions
            .iter()
            .filter(|t| t.is_debit() && t.timestamp >= previous_start && t.timestamp < recent_start)
            .map(|t| t.amount)
            .sum();

        let (velocity, change_pct, trend) = if previous_spending > 0.0 {
            let velocity = recent_spending / previous_spending;
            (
                Some(velocity),
                Some((velocity - 1.0) * 100.0),
                TrendDirection::classify(
                    previous_spending,
                    recent_spending,
                    self.config.analysis.trend_tolerance,
                ),
            )
        } else {
            (None, None, TrendDirection::Flat)
        };

        Ok(SpendingVelocity {
            window_days,
            recent_spending,
            previous_spending,
            velocity,
            change_pct,
            trend,
        })
    }

    /// Predict the next income deposit from regular Income credits
    ///
    /// When several income streams repeat, the largest one wins.
    pub fn predict_next_paycheck(&self) -> Option<PaycheckPrediction> {
        let streams = detect_recurring(
            self.transactions
                .iter()
                .filter(|t| t.is_credit() && t.category == Category::Income),
            &self.config.recurring,
        );

        let best = streams.into_iter().fold(None::<RecurringExpense>, |best, s| match best {
            Some(b) if b.average_amount >= s.average_amount => Some(b),
            _ => Some(s),
        })?;

        let last_date = best.occurrences.last()?.date();
        Some(PaycheckPrediction {
            description: best.description,
            average_amount: best.average_amount,
            interval_days: best.interval_days,
            last_date,
            next_date: best.next_expected,
        })
    }
}
