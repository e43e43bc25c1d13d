//! Transaction analyzer
//!
//! Aggregate statistics over a trailing lookback window. Windows are
//! `[as_of - window_days, as_of]`, inclusive at both ends; `as_of` defaults
//! to the local clock and can be pinned for reproducible results.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use crate::config::CopilotConfig;
use crate::error::{Error, Result};
use crate::models::{Category, Granularity, Transaction, TrendDirection};

/// Longest accepted lookback window, 100 years
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// Spending total for one merchant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MerchantTotal {
    pub merchant: String,
    pub total_amount: f64,
}

/// Spending total for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Spending total for a day, week (Monday start) or month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodTotal {
    pub period_start: NaiveDate,
    pub amount: f64,
}

/// Summary of a lookback window
#[derive(Debug, Clone, Serialize)]
pub struct Insights {
    /// All transactions supplied, regardless of window
    pub total_transactions: usize,
    pub window_days: i64,
    pub total_spent: f64,
    pub total_income: f64,
    pub net_cashflow: f64,
    pub spending_by_category: BTreeMap<Category, f64>,
    pub top_merchants: Vec<MerchantTotal>,
    pub average_transaction_amount: f64,
    pub largest_expense: Option<Transaction>,
    pub most_frequent_category: Option<Category>,
    pub trend: TrendDirection,
}

/// Read-only statistics view over a transaction slice
#[derive(Debug, Clone)]
pub struct Analyzer<'a> {
    transactions: &'a [Transaction],
    as_of: NaiveDateTime,
    config: CopilotConfig,
}

impl<'a> Analyzer<'a> {
    /// Create an analyzer anchored at the current local time
    pub fn new(transactions: &'a [Transaction]) -> Self {
        Self {
            transactions,
            as_of: Local::now().naive_local(),
            config: CopilotConfig::default(),
        }
    }

    /// Anchor lookback windows at a fixed instant
    pub fn with_reference(mut self, as_of: NaiveDateTime) -> Self {
        self.as_of = as_of;
        self
    }

    /// Use custom thresholds
    pub fn with_config(mut self, config: CopilotConfig) -> Self {
        self.config = config;
        self
    }

    pub fn transactions(&self) -> &'a [Transaction] {
        self.transactions
    }

    pub fn as_of(&self) -> NaiveDateTime {
        self.as_of
    }

    pub fn config(&self) -> &CopilotConfig {
        &self.config
    }

    /// Inclusive bounds of a lookback window
    ///
    /// Windows must be within `1..=MAX_WINDOW_DAYS`.
    pub fn window_bounds(&self, window_days: i64) -> Result<(NaiveDateTime, NaiveDateTime)> {
        if !(1..=MAX_WINDOW_DAYS).contains(&window_days) {
            return Err(Error::InvalidWindow(window_days));
        }
        let start = self
            .as_of
            .checked_sub_signed(Duration::days(window_days))
            .ok_or(Error::InvalidWindow(window_days))?;
        Ok((start, self.as_of))
    }

    fn in_window(&self, window_days: i64) -> Result<impl Iterator<Item = &'a Transaction>> {
        let (start, end) = self.window_bounds(window_days)?;
        Ok(self
            .transactions
            .iter()
            .filter(move |t| t.timestamp >= start && t.timestamp <= end))
    }

    fn debits_in_window(&self, window_days: i64) -> Result<impl Iterator<Item = &'a Transaction>> {
        Ok(self.in_window(window_days)?.filter(|t| t.is_debit()))
    }

    /// Sum of debits in the window
    pub fn total_spent(&self, window_days: i64) -> Result<f64> {
        Ok(self.debits_in_window(window_days)?.map(|t| t.amount).sum())
    }

    /// Sum of credits in the window
    pub fn total_income(&self, window_days: i64) -> Result<f64> {
        Ok(self
            .in_window(window_days)?
            .filter(|t| t.is_credit())
            .map(|t| t.amount)
            .sum())
    }

    /// Income minus spending
    pub fn net_cashflow(&self, window_days: i64) -> Result<f64> {
        Ok(self.total_income(window_days)? - self.total_spent(window_days)?)
    }

    /// Debit totals per category; categories without spend are absent
    pub fn spending_by_category(&self, window_days: i64) -> Result<BTreeMap<Category, f64>> {
        let mut totals = BTreeMap::new();
        for tx in self.debits_in_window(window_days)? {
            *totals.entry(tx.category).or_insert(0.0) += tx.amount;
        }
        Ok(totals)
    }

    /// Merchants by spend, highest first; ties by name
    pub fn top_merchants(&self, window_days: i64, limit: usize) -> Result<Vec<MerchantTotal>> {
        let mut totals: HashMap<&str, f64> = HashMap::new();
        for tx in self.debits_in_window(window_days)? {
            if let Some(ref merchant) = tx.merchant {
                *totals.entry(merchant.as_str()).or_insert(0.0) += tx.amount;
            }
        }

        let mut merchants: Vec<MerchantTotal> = totals
            .into_iter()
            .map(|(merchant, total_amount)| MerchantTotal {
                merchant: merchant.to_string(),
                total_amount,
            })
            .collect();

        merchants.sort_by(|a, b| {
            b.total_amount
                .partial_cmp(&a.total_amount)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.merchant.cmp(&b.merchant))
        });
        merchants.truncate(limit);

        Ok(merchants)
    }

    /// Mean debit amount; 0 when there are no debits
    pub fn average_transaction_amount(&self, window_days: i64) -> Result<f64> {
        let (count, total) = self
            .debits_in_window(window_days)?
            .fold((0usize, 0.0), |(n, sum), t| (n + 1, sum + t.amount));
        Ok(if count == 0 { 0.0 } else { total / count as f64 })
    }

    /// Mean credit amount; 0 when there are no credits
    pub fn average_income_amount(&self, window_days: i64) -> Result<f64> {
        let (count, total) = self
            .in_window(window_days)?
            .filter(|t| t.is_credit())
            .fold((0usize, 0.0), |(n, sum), t| (n + 1, sum + t.amount));
        Ok(if count == 0 { 0.0 } else { total / count as f64 })
    }

    /// Category with the most debits; ties go to the category declared first
    pub fn most_frequent_category(&self, window_days: i64) -> Result<Option<Category>> {
        let mut counts: BTreeMap<Category, usize> = BTreeMap::new();
        for tx in self.debits_in_window(window_days)? {
            *counts.entry(tx.category).or_insert(0) += 1;
        }

        let mut best: Option<(Category, usize)> = None;
        for (category, count) in counts {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((category, count));
            }
        }
        Ok(best.map(|(category, _)| category))
    }

    /// Largest single debit; ties go to the earliest
    pub fn largest_expense(&self, window_days: i64) -> Result<Option<&'a Transaction>> {
        let mut largest: Option<&'a Transaction> = None;
        for tx in self.debits_in_window(window_days)? {
            let replace = match largest {
                None => true,
                Some(current) => {
                    tx.amount > current.amount
                        || (tx.amount == current.amount && tx.timestamp < current.timestamp)
                }
            };
            if replace {
                largest = Some(tx);
            }
        }
        Ok(largest)
    }

    /// Debit totals for every calendar day of the window, zero-filled
    pub fn daily_spending(&self, window_days: i64) -> Result<Vec<DailyTotal>> {
        let (start, end) = self.window_bounds(window_days)?;

        let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for tx in self.debits_in_window(window_days)? {
            *by_day.entry(tx.date()).or_insert(0.0) += tx.amount;
        }

        let mut days = Vec::new();
        let mut day = start.date();
        while day <= end.date() {
            days.push(DailyTotal {
                date: day,
                amount: by_day.get(&day).copied().unwrap_or(0.0),
            });
            day += Duration::days(1);
        }
        Ok(days)
    }

    /// Compare the first half of the window's daily spend with the second half
    ///
    /// For an odd number of days the middle day belongs to neither half.
    pub fn spending_trend(&self, window_days: i64) -> Result<TrendDirection> {
        let days = self.daily_spending(window_days)?;
        let half = days.len() / 2;
        if half == 0 {
            return Ok(TrendDirection::Flat);
        }

        let first: f64 = days[..half].iter().map(|d| d.amount).sum();
        let second: f64 = days[days.len() - half..].iter().map(|d| d.amount).sum();

        Ok(TrendDirection::classify(
            first,
            second,
            self.config.analysis.trend_tolerance,
        ))
    }

    /// All-history debit totals bucketed by day, week or month
    ///
    /// Periods without spending are omitted.
    pub fn spending_over_time(&self, granularity: Granularity) -> Vec<PeriodTotal> {
        let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();

        for tx in self.transactions.iter().filter(|t| t.is_debit()) {
            let date = tx.date();
            let period_start = match granularity {
                Granularity::Daily => date,
                Granularity::Weekly => {
                    date - Duration::days(date.weekday().num_days_from_monday() as i64)
                }
                Granularity::Monthly => date.with_day(1).unwrap_or(date),
            };
            *totals.entry(period_start).or_insert(0.0) += tx.amount;
        }

        totals
            .into_iter()
            .map(|(period_start, amount)| PeriodTotal {
                period_start,
                amount,
            })
            .collect()
    }

    /// Bundle the window's statistics
    pub fn get_insights(&self, window_days: i64) -> Result<Insights> {
        let total_spent = self.total_spent(window_days)?;
        let total_income = self.total_income(window_days)?;

        let insights = Insights {
            total_transactions: self.transactions.len(),
            window_days,
            total_spent,
            total_income,
            net_cashflow: total_income - total_spent,
            spending_by_category: self.spending_by_category(window_days)?,
            top_merchants: self
                .top_merchants(window_days, self.config.analysis.top_merchants_limit)?,
            average_transaction_amount: self.average_transaction_amount(window_days)?,
            largest_expense: self.largest_expense(window_days)?.cloned(),
            most_frequent_category: self.most_frequent_category(window_days)?,
            trend: self.spending_trend(window_days)?,
        };

        debug!(
            window_days,
            total_spent = insights.total_spent,
            total_income = insights.total_income,
            categories = insights.spending_by_category.len(),
            "Insights computed"
        );

        Ok(insights)
    }

    /// Insights over the configured default window
    pub fn default_insights(&self) -> Result<Insights> {
        self.get_insights(self.config.analysis.default_window_days)
    }
}
