//! Recurring expense detection
//!
//! Groups transactions by normalized description and keeps groups whose
//! inter-occurrence gaps are regular. Precision over recall: a group with
//! irregular timing is dropped rather than reported with low confidence.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::config::RecurringConfig;
use crate::models::{Category, Transaction};

/// A detected repeating charge (or credit, for paycheck prediction)
#[derive(Debug, Clone, Serialize)]
pub struct RecurringExpense {
    /// Normalized description used for grouping
    pub description_key: String,
    /// Description as written on the most recent occurrence
    pub description: String,
    pub category: Category,
    pub average_amount: f64,
    /// Mean gap between occurrences, rounded to whole days
    pub interval_days: i64,
    /// Chronological
    pub occurrences: Vec<Transaction>,
    pub next_expected: NaiveDate,
}

/// Case-insensitive, trimmed, whitespace-collapsed description
pub fn normalize_description(description: &str) -> String {
    description
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Mean and population standard deviation
fn mean_and_stddev(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Check one group of same-description transactions for a regular cadence
fn detect_pattern(
    key: &str,
    mut group: Vec<&Transaction>,
    config: &RecurringConfig,
) -> Option<RecurringExpense> {
    if group.len() < config.min_occurrences {
        return None;
    }

    group.sort_by_key(|t| t.timestamp);

    let gaps: Vec<f64> = group
        .windows(2)
        .map(|w| (w[1].date() - w[0].date()).num_days() as f64)
        .collect();

    let (mean_gap, stddev) = mean_and_stddev(&gaps);
    if mean_gap <= 0.0 {
        // Same-day repeats have no cadence
        return None;
    }

    let cv = stddev / mean_gap;
    if cv > config.max_gap_cv {
        debug!(key, cv, "Irregular gaps, not recurring");
        return None;
    }
    if mean_gap < config.min_interval_days || mean_gap > config.max_interval_days {
        debug!(key, mean_gap, "Interval outside plausible range");
        return None;
    }

    let interval_days = mean_gap.round() as i64;
    let average_amount = group.iter().map(|t| t.amount).sum::<f64>() / group.len() as f64;
    let latest = group[group.len() - 1];

    Some(RecurringExpense {
        description_key: key.to_string(),
        description: latest.description.clone(),
        category: latest.category,
        average_amount,
        interval_days,
        next_expected: latest.date() + Duration::days(interval_days),
        occurrences: group.into_iter().cloned().collect(),
    })
}

/// Run detection over the given transactions, sorted by description key
pub fn detect_recurring<'t>(
    transactions: impl IntoIterator<Item = &'t Transaction>,
    config: &RecurringConfig,
) -> Vec<RecurringExpense> {
    let mut groups: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for tx in transactions {
        groups
            .entry(normalize_description(&tx.description))
            .or_default()
            .push(tx);
    }

    let evaluated = groups.len();
    let recurring: Vec<RecurringExpense> = groups
        .into_iter()
        .filter_map(|(key, group)| detect_pattern(&key, group, config))
        .collect();

    debug!(
        groups = evaluated,
        recurring = recurring.len(),
        "Recurring detection complete"
    );

    recurring
}
