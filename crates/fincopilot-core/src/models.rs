//! Domain models for fincopilot

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Direction of money movement; amounts themselves are always non-negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Money out
    Debit,
    /// Money in
    Credit,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "debit" | "dr" | "out" => Ok(Self::Debit),
            "credit" | "cr" | "in" => Ok(Self::Credit),
            _ => Err(Error::InvalidData(format!(
                "Unknown transaction type: {} (valid: debit, credit)",
                s
            ))),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed spending classification
///
/// Declaration order doubles as the ordering used for sorted maps and
/// tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Food & Dining")]
    FoodDining,
    #[serde(rename = "Groceries")]
    Groceries,
    #[serde(rename = "Shopping")]
    Shopping,
    #[serde(rename = "Entertainment")]
    Entertainment,
    #[serde(rename = "Transportation")]
    Transportation,
    #[serde(rename = "Bills & Utilities")]
    BillsUtilities,
    #[serde(rename = "Healthcare")]
    Healthcare,
    #[serde(rename = "Personal")]
    Personal,
    #[serde(rename = "Transfer")]
    Transfer,
    #[serde(rename = "Income")]
    Income,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    /// Every category, in declaration order
    pub const ALL: [Category; 11] = [
        Self::FoodDining,
        Self::Groceries,
        Self::Shopping,
        Self::Entertainment,
        Self::Transportation,
        Self::BillsUtilities,
        Self::Healthcare,
        Self::Personal,
        Self::Transfer,
        Self::Income,
        Self::Other,
    ];

    /// Human-readable name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FoodDining => "Food & Dining",
            Self::Groceries => "Groceries",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::Transportation => "Transportation",
            Self::BillsUtilities => "Bills & Utilities",
            Self::Healthcare => "Healthcare",
            Self::Personal => "Personal",
            Self::Transfer => "Transfer",
            Self::Income => "Income",
            Self::Other => "Other",
        }
    }

    /// Machine-friendly key (used in CSV files and CLI flags)
    pub fn key(&self) -> &'static str {
        match self {
            Self::FoodDining => "food_dining",
            Self::Groceries => "groceries",
            Self::Shopping => "shopping",
            Self::Entertainment => "entertainment",
            Self::Transportation => "transportation",
            Self::BillsUtilities => "bills_utilities",
            Self::Healthcare => "healthcare",
            Self::Personal => "personal",
            Self::Transfer => "transfer",
            Self::Income => "income",
            Self::Other => "other",
        }
    }

    /// 50/30/20 bucket this category counts toward
    pub fn bucket(&self) -> BudgetBucket {
        match self {
            Self::Groceries | Self::BillsUtilities | Self::Healthcare | Self::Transportation => {
                BudgetBucket::Needs
            }
            Self::FoodDining | Self::Shopping | Self::Entertainment | Self::Personal => {
                BudgetBucket::Wants
            }
            Self::Transfer | Self::Income | Self::Other => BudgetBucket::Excluded,
        }
    }
}

impl std::str::FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted) || c.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Budget buckets of the 50/30/20 rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetBucket {
    Needs,
    Wants,
    /// Transfers, income and uncategorized spend: not part of needs/wants
    Excluded,
}

impl BudgetBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Needs => "needs",
            Self::Wants => "wants",
            Self::Excluded => "excluded",
        }
    }

    /// Categories that map to this bucket
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .iter()
            .copied()
            .filter(|c| c.bucket() == *self)
            .collect()
    }
}

impl std::fmt::Display for BudgetBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single financial event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique within a transaction set
    pub id: String,
    pub timestamp: NaiveDateTime,
    pub description: String,
    /// Non-negative magnitude; `direction` carries the sign
    pub amount: f64,
    pub direction: Direction,
    pub category: Category,
    pub merchant: Option<String>,
    /// completed, pending, failed, ...
    pub status: String,
    pub notes: Option<String>,
}

impl Transaction {
    /// Create a transaction, rejecting negative or non-finite amounts
    pub fn new(
        id: impl Into<String>,
        timestamp: NaiveDateTime,
        description: impl Into<String>,
        amount: f64,
        direction: Direction,
        category: Category,
    ) -> Result<Self> {
        let id = id.into();
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidData(format!(
                "Transaction {} has invalid amount {} (must be a non-negative number)",
                id, amount
            )));
        }

        Ok(Self {
            id,
            timestamp,
            description: description.into(),
            amount,
            direction,
            category,
            merchant: None,
            status: "completed".to_string(),
            notes: None,
        })
    }

    /// Set the merchant
    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    /// Set the status (defaults to "completed")
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Attach free-form notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn is_debit(&self) -> bool {
        self.direction == Direction::Debit
    }

    pub fn is_credit(&self) -> bool {
        self.direction == Direction::Credit
    }

    /// Calendar date of the transaction
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = match self.direction {
            Direction::Credit => "+",
            Direction::Debit => "-",
        };
        write!(
            f,
            "{} | {}${:.2} | {} | {}",
            self.timestamp.format("%Y-%m-%d"),
            sign,
            self.amount,
            self.description,
            self.category
        )
    }
}

/// Time granularity for spending series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!(
                "Unknown granularity: {} (valid: daily, weekly, monthly)",
                s
            )),
        }
    }
}

/// Direction of a spending trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Flat,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Flat => "flat",
        }
    }

    /// Classify `current` against `baseline` with a symmetric tolerance band
    pub fn classify(baseline: f64, current: f64, tolerance: f64) -> Self {
        if current > baseline * (1.0 + tolerance) {
            Self::Increasing
        } else if current < baseline * (1.0 - tolerance) {
            Self::Decreasing
        } else {
            Self::Flat
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Food & Dining".parse::<Category>().unwrap(), Category::FoodDining);
        assert_eq!("bills & utilities".parse::<Category>().unwrap(), Category::BillsUtilities);
        assert_eq!("bills_utilities".parse::<Category>().unwrap(), Category::BillsUtilities);
        assert_eq!(" Other ".parse::<Category>().unwrap(), Category::Other);

        let err = "Crypto".parse::<Category>().unwrap_err();
        assert!(matches!(err, Error::UnknownCategory(ref c) if c == "Crypto"));
    }

    #[test]
    fn test_bucket_mapping_is_a_partition() {
        let needs = BudgetBucket::Needs.categories();
        let wants = BudgetBucket::Wants.categories();
        let excluded = BudgetBucket::Excluded.categories();

        assert_eq!(needs.len(), 4);
        assert_eq!(wants.len(), 4);
        assert_eq!(excluded.len(), 3);
        assert!(needs.contains(&Category::Groceries));
        assert!(wants.contains(&Category::FoodDining));
        assert!(excluded.contains(&Category::Income));
    }

    #[test]
    fn test_transaction_rejects_negative_amount() {
        let result = Transaction::new(
            "t1",
            ts(),
            "Refund",
            -5.0,
            Direction::Debit,
            Category::Other,
        );
        assert!(matches!(result, Err(Error::InvalidData(_))));

        let nan = Transaction::new("t2", ts(), "Bad", f64::NAN, Direction::Debit, Category::Other);
        assert!(nan.is_err());
    }

    #[test]
    fn test_transaction_display() {
        let tx = Transaction::new("t1", ts(), "Coffee", 4.5, Direction::Debit, Category::FoodDining)
            .unwrap()
            .with_merchant("Starbucks");
        assert_eq!(tx.to_string(), "2026-03-01 | -$4.50 | Coffee | Food & Dining");
        assert_eq!(tx.status, "completed");
    }

    #[test]
    fn test_category_serializes_as_display_name() {
        let json = serde_json::to_string(&Category::BillsUtilities).unwrap();
        assert_eq!(json, "\"Bills & Utilities\"");
    }

    #[test]
    fn test_trend_classify() {
        assert_eq!(TrendDirection::classify(100.0, 120.0, 0.1), TrendDirection::Increasing);
        assert_eq!(TrendDirection::classify(100.0, 80.0, 0.1), TrendDirection::Decreasing);
        assert_eq!(TrendDirection::classify(100.0, 105.0, 0.1), TrendDirection::Flat);
        assert_eq!(TrendDirection::classify(0.0, 0.0, 0.1), TrendDirection::Flat);
    }
}
