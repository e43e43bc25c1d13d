//! Calendar-month bucketing
//!
//! Months without transactions are not synthesized; a gap in activity is a
//! missing bucket, not a zero bucket. The income average is the exception:
//! it spans calendar months, so a month without credits counts as zero.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use crate::models::Transaction;

/// A calendar month, ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(tx: &Transaction) -> Self {
        let date = tx.date();
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Months since year 0, so consecutive months differ by one
    pub fn index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Total for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    pub month: YearMonth,
    pub total_amount: f64,
    pub transaction_count: usize,
}

/// Group transactions by calendar month, ascending
pub fn bucket_by_month<'t>(transactions: impl IntoIterator<Item = &'t Transaction>) -> Vec<MonthlyBucket> {
    let mut months: BTreeMap<YearMonth, (f64, usize)> = BTreeMap::new();
    for tx in transactions {
        let entry = months.entry(YearMonth::of(tx)).or_insert((0.0, 0));
        entry.0 += tx.amount;
        entry.1 += 1;
    }

    months
        .into_iter()
        .map(|(month, (total_amount, transaction_count))| MonthlyBucket {
            month,
            total_amount,
            transaction_count,
        })
        .collect()
}

/// Spending and income month buckets computed in one pass
///
/// Built once and shared (behind an `Arc`) between the forecaster and the
/// budget advisor so both read the same numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyAggregation {
    /// Debit totals
    pub spending: Vec<MonthlyBucket>,
    /// Credit totals
    pub income: Vec<MonthlyBucket>,
}

impl MonthlyAggregation {
    pub fn prepare(transactions: &[Transaction]) -> Self {
        let (debits, credits): (Vec<&Transaction>, Vec<&Transaction>) =
            transactions.iter().partition(|t| t.is_debit());

        Self {
            spending: bucket_by_month(debits),
            income: bucket_by_month(credits),
        }
    }

    /// Mean monthly income over the last `months` calendar months
    ///
    /// The span ends at the latest income month and never reaches back past
    /// the first one. Months inside it without credits count as zero. 0
    /// without income history.
    pub fn recent_income_average(&self, months: usize) -> f64 {
        let (Some(first), Some(last)) = (self.income.first(), self.income.last()) else {
            return 0.0;
        };
        if months == 0 {
            return 0.0;
        }

        let history = last.month.index() - first.month.index() + 1;
        let span = i64::try_from(months).unwrap_or(i64::MAX).min(history);
        let start = last.month.index() - span + 1;

        let total: f64 = self
            .income
            .iter()
            .filter(|b| b.month.index() >= start)
            .map(|b| b.total_amount)
            .sum();
        total / span as f64
    }
}
