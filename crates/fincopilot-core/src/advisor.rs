//! Budget advisor
//!
//! Applies the 50/30/20 rule to a monthly income figure and compares the
//! allocation with actual spending over the default analysis window.
//!
//! Income is either supplied by the caller or estimated from the shared
//! [`MonthlyAggregation`] the forecaster already built, so the advisor and
//! the forecaster never disagree about history.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analyzer::Analyzer;
use crate::config::CopilotConfig;
use crate::error::Result;
use crate::forecast::{Forecaster, MonthlyAggregation};
use crate::models::{BudgetBucket, Category, Transaction};

/// Budget versus actual for one bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketBudget {
    pub budget: f64,
    pub actual: f64,
}

/// 50/30/20 split of monthly income
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetAllocation {
    pub monthly_income: f64,
    pub needs: BucketBudget,
    pub wants: BucketBudget,
    /// `actual` is `monthly_income - (needs.actual + wants.actual)`, floored
    /// at 0. It is not a count of money moved to savings: Transfer, Income
    /// and Other debits fall in neither bucket, so they never reduce it, and
    /// a month that overspends reports 0 rather than a negative figure.
    pub savings: BucketBudget,
}

/// Per-category slice of a bucket budget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBudget {
    pub category: Category,
    pub bucket: BudgetBucket,
    pub budget: f64,
    pub actual: f64,
    /// budget - actual; negative when over
    pub difference: f64,
    pub over_budget: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsPotential {
    pub monthly_income: f64,
    /// Window income minus window spending
    pub current_savings: f64,
    pub recommended_savings: f64,
    /// Shortfall against the recommendation; 0 when on track
    pub savings_gap: f64,
    /// Percent of monthly income; 0 without income
    pub savings_rate: f64,
    pub on_track: bool,
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Informational - no action needed
    Info,
    /// Spending past the tolerance band
    Warning,
    /// Spending far past budget
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    /// Bucket name ("needs", "wants"), a category name, "savings",
    /// "income" or "spending"
    pub category: String,
    pub message: String,
    pub overage_amount: f64,
    pub overage_pct: f64,
}

/// Percentage thresholds for the recommendation rules
const LOW_SAVINGS_RATE_PCT: f64 = 10.0;
const DOMINANT_CATEGORY_PCT: f64 = 40.0;
const DINING_PCT: f64 = 15.0;
const ENTERTAINMENT_PCT: f64 = 10.0;
/// Week-over-week spending increase that raises a pattern alert
const VELOCITY_ALERT_PCT: f64 = 25.0;
const VELOCITY_WINDOW_DAYS: i64 = 7;
/// Multiple of the average debit that marks an expense as unusual
const LARGE_EXPENSE_MULTIPLE: f64 = 5.0;
/// Percent over its category budget before a category raises a warning
const CATEGORY_OVERAGE_PCT: f64 = 20.0;

/// 50/30/20 budget advice over a transaction slice
#[derive(Debug, Clone)]
pub struct BudgetAdvisor<'a> {
    forecaster: Forecaster<'a>,
    explicit_income: Option<f64>,
}

impl<'a> BudgetAdvisor<'a> {
    /// Create an advisor with its own forecaster
    ///
    /// `monthly_income` overrides the estimate when positive.
    pub fn new(transactions: &'a [Transaction], monthly_income: Option<f64>) -> Self {
        Self::with_forecaster(Forecaster::new(transactions), monthly_income)
    }

    /// Create an advisor that reads the forecaster's monthly aggregation
    pub fn with_forecaster(forecaster: Forecaster<'a>, monthly_income: Option<f64>) -> Self {
        Self {
            forecaster,
            explicit_income: monthly_income.filter(|i| i.is_finite() && *i > 0.0),
        }
    }

    pub fn with_reference(mut self, as_of: NaiveDateTime) -> Self {
        self.forecaster = self.forecaster.with_reference(as_of);
        self
    }

    pub fn with_config(mut self, config: CopilotConfig) -> Self {
        self.forecaster = self.forecaster.with_config(config);
        self
    }

    pub fn forecaster(&self) -> &Forecaster<'a> {
        &self.forecaster
    }

    pub fn aggregation(&self) -> &MonthlyAggregation {
        self.forecaster.aggregation()
    }

    fn config(&self) -> &CopilotConfig {
        self.forecaster.config()
    }

    fn window_days(&self) -> i64 {
        self.config().analysis.default_window_days
    }

    fn analyzer(&self) -> Analyzer<'a> {
        Analyzer::new(self.forecaster.transactions())
            .with_reference(self.forecaster.as_of())
            .with_config(*self.config())
    }

    /// Caller-supplied income, or the mean of recent income months
    pub fn monthly_income(&self) -> f64 {
        self.explicit_income.unwrap_or_else(|| {
            self.aggregation()
                .recent_income_average(self.config().budget.income_lookback_months)
        })
    }

    /// Window spending summed per bucket
    fn bucket_actuals(&self) -> Result<(f64, f64)> {
        let mut needs = 0.0;
        let mut wants = 0.0;
        for (category, amount) in self.analyzer().spending_by_category(self.window_days())? {
            match category.bucket() {
                BudgetBucket::Needs => needs += amount,
                BudgetBucket::Wants => wants += amount,
                BudgetBucket::Excluded => {}
            }
        }
        Ok((needs, wants))
    }

    /// Split income 50/30/20 and attach actual spending
    pub fn get_recommended_budget(&self) -> Result<BudgetAllocation> {
        let income = self.monthly_income();
        let shares = &self.config().budget;

        let needs_budget = income * shares.needs_share;
        let wants_budget = income * shares.wants_share;
        // Remainder keeps the partition exact
        let savings_budget = income - needs_budget - wants_budget;

        let (needs_actual, wants_actual) = self.bucket_actuals()?;
        let savings_actual = (income - (needs_actual + wants_actual)).max(0.0);

        debug!(
            income,
            needs_actual, wants_actual, savings_actual, "Budget allocation computed"
        );

        Ok(BudgetAllocation {
            monthly_income: income,
            needs: BucketBudget {
                budget: needs_budget,
                actual: needs_actual,
            },
            wants: BucketBudget {
                budget: wants_budget,
                actual: wants_actual,
            },
            savings: BucketBudget {
                budget: savings_budget,
                actual: savings_actual,
            },
        })
    }

    /// Divide each bucket budget across its categories
    ///
    /// Shares follow each category's all-history spending; a bucket without
    /// history is split evenly.
    pub fn get_category_budgets(&self) -> Result<Vec<CategoryBudget>> {
        let allocation = self.get_recommended_budget()?;
        let window_spend = self.analyzer().spending_by_category(self.window_days())?;

        let mut history: BTreeMap<Category, f64> = BTreeMap::new();
        for tx in self.forecaster.transactions().iter().filter(|t| t.is_debit()) {
            *history.entry(tx.category).or_insert(0.0) += tx.amount;
        }

        let mut budgets = Vec::new();
        for (bucket, bucket_budget) in [
            (BudgetBucket::Needs, allocation.needs.budget),
            (BudgetBucket::Wants, allocation.wants.budget),
        ] {
            let categories = bucket.categories();
            let bucket_history: f64 = categories
                .iter()
                .map(|c| history.get(c).copied().unwrap_or(0.0))
                .sum();

            for category in categories.iter().copied() {
                let share = if bucket_history > 0.0 {
                    history.get(&category).copied().unwrap_or(0.0) / bucket_history
                } else {
                    1.0 / categories.len() as f64
                };
                let budget = bucket_budget * share;
                let actual = window_spend.get(&category).copied().unwrap_or(0.0);

                budgets.push(CategoryBudget {
                    category,
                    bucket,
                    budget,
                    actual,
                    difference: budget - actual,
                    over_budget: actual > budget,
                });
            }
        }

        Ok(budgets)
    }

    /// Window savings against the recommended share of income
    pub fn get_savings_potential(&self) -> Result<SavingsPotential> {
        let income = self.monthly_income();
        let analyzer = self.analyzer();
        let window = self.window_days();

        let current_savings = analyzer.total_income(window)? - analyzer.total_spent(window)?;
        let recommended_savings = income * self.config().budget.savings_share();
        let savings_gap = (recommended_savings - current_savings).max(0.0);
        let savings_rate = if income > 0.0 {
            current_savings / income * 100.0
        } else {
            0.0
        };

        Ok(SavingsPotential {
            monthly_income: income,
            current_savings,
            recommended_savings,
            savings_gap,
            savings_rate,
            on_track: current_savings >= recommended_savings,
        })
    }

    /// Budget alerts followed by spending pattern alerts
    ///
    /// With income, alerts come in this order: bucket overspending, categories
    /// more than 20% over their budget, a savings shortfall, then velocity and
    /// large expense patterns. Without income the result is a single "income"
    /// Info alert; pattern checks are skipped too.
    pub fn get_alerts(&self) -> Result<Vec<Alert>> {
        let mut alerts = Vec::new();
        let allocation = self.get_recommended_budget()?;
        let thresholds = &self.config().budget;

        if allocation.monthly_income <= 0.0 {
            alerts.push(Alert {
                severity: AlertSeverity::Info,
                category: "income".to_string(),
                message: "Insufficient income data to evaluate the budget. Provide a monthly income to enable budget alerts.".to_string(),
                overage_amount: 0.0,
                overage_pct: 0.0,
            });
        } else {
            for (name, bucket) in [("needs", allocation.needs), ("wants", allocation.wants)] {
                let severity = if bucket.actual > bucket.budget * thresholds.critical_ratio {
                    AlertSeverity::Critical
                } else if bucket.actual > bucket.budget * thresholds.warning_ratio {
                    AlertSeverity::Warning
                } else {
                    continue;
                };

                let overage_amount = bucket.actual - bucket.budget;
                let overage_pct = if bucket.budget > 0.0 {
                    overage_amount / bucket.budget * 100.0
                } else {
                    0.0
                };

                alerts.push(Alert {
                    severity,
                    category: name.to_string(),
                    message: format!(
                        "You're ${:.2} over your {} budget ({:.1}% over).",
                        overage_amount, name, overage_pct
                    ),
                    overage_amount,
                    overage_pct,
                });
            }

            alerts.extend(self.category_alerts()?);
            alerts.extend(self.savings_alert()?);
            alerts.extend(self.pattern_alerts()?);
        }

        debug!(count = alerts.len(), "Alerts evaluated");
        Ok(alerts)
    }

    /// Categories spending more than 20% past their share of the bucket
    fn category_alerts(&self) -> Result<Vec<Alert>> {
        let alerts = self
            .get_category_budgets()?
            .into_iter()
            .filter(|b| b.over_budget && b.budget > 0.0)
            .filter_map(|b| {
                let overage_amount = b.actual - b.budget;
                let overage_pct = overage_amount / b.budget * 100.0;
                (overage_pct > CATEGORY_OVERAGE_PCT).then(|| Alert {
                    severity: AlertSeverity::Warning,
                    category: b.category.as_str().to_string(),
                    message: format!(
                        "You're ${:.2} over budget in {} ({:.1}% over).",
                        overage_amount, b.category, overage_pct
                    ),
                    overage_amount,
                    overage_pct,
                })
            })
            .collect();
        Ok(alerts)
    }

    fn savings_alert(&self) -> Result<Option<Alert>> {
        let savings = self.get_savings_potential()?;
        if savings.on_track {
            return Ok(None);
        }

        let target_pct = self.config().budget.savings_share() * 100.0;
        Ok(Some(Alert {
            severity: AlertSeverity::Info,
            category: "savings".to_string(),
            message: format!(
                "Savings Below Target: you're saving ${:.2} less than the recommended {:.0}% of income.",
                savings.savings_gap, target_pct
            ),
            overage_amount: savings.savings_gap,
            overage_pct: if savings.recommended_savings > 0.0 {
                savings.savings_gap / savings.recommended_savings * 100.0
            } else {
                0.0
            },
        }))
    }

    /// Velocity spikes and unusually large single expenses
    fn pattern_alerts(&self) -> Result<Vec<Alert>> {
        let mut alerts = Vec::new();

        let velocity = self.forecaster.spending_velocity(VELOCITY_WINDOW_DAYS)?;
        if let Some(change_pct) = velocity.change_pct.filter(|pct| *pct > VELOCITY_ALERT_PCT) {
            alerts.push(Alert {
                severity: AlertSeverity::Warning,
                category: "spending".to_string(),
                message: format!(
                    "Your spending has increased by {:.1}% over the last {} days.",
                    change_pct, VELOCITY_WINDOW_DAYS
                ),
                overage_amount: velocity.recent_spending - velocity.previous_spending,
                overage_pct: change_pct,
            });
        }

        let analyzer = self.analyzer();
        let window = self.window_days();
        let average = analyzer.average_transaction_amount(window)?;
        if let Some(largest) = analyzer.largest_expense(window)? {
            if average > 0.0 && largest.amount > average * LARGE_EXPENSE_MULTIPLE {
                alerts.push(Alert {
                    severity: AlertSeverity::Info,
                    category: "spending".to_string(),
                    message: format!(
                        "Unusually large expense of ${:.2} for {}.",
                        largest.amount, largest.description
                    ),
                    overage_amount: largest.amount - average,
                    overage_pct: (largest.amount / average - 1.0) * 100.0,
                });
            }
        }

        Ok(alerts)
    }

    /// Plain-language suggestions, most important first
    pub fn get_recommendations(&self) -> Result<Vec<String>> {
        let mut recommendations = Vec::new();
        let savings = self.get_savings_potential()?;
        let has_income = savings.monthly_income > 0.0;

        if has_income && savings.savings_rate < LOW_SAVINGS_RATE_PCT {
            recommendations.push(format!(
                "Your savings rate is {:.1}%. Set up an automatic transfer to savings on payday, starting with at least {:.0}% of income.",
                savings.savings_rate, LOW_SAVINGS_RATE_PCT
            ));
        }

        let by_category = self.analyzer().spending_by_category(self.window_days())?;
        let total_spent: f64 = by_category.values().sum();
        if total_spent > 0.0 {
            let pct_of = |category: Category| {
                by_category.get(&category).copied().unwrap_or(0.0) / total_spent * 100.0
            };

            for (category, amount) in &by_category {
                let pct = amount / total_spent * 100.0;
                if pct > DOMINANT_CATEGORY_PCT {
                    recommendations.push(format!(
                        "{} makes up {:.1}% of your spending. Consider setting a monthly cap for it.",
                        category, pct
                    ));
                }
            }

            let dining_pct = pct_of(Category::FoodDining);
            if dining_pct > DINING_PCT {
                let dining = by_category
                    .get(&Category::FoodDining)
                    .copied()
                    .unwrap_or(0.0);
                recommendations.push(format!(
                    "Dining out is {:.1}% of your spending. Cooking at home more often could save about ${:.2} a month.",
                    dining_pct,
                    dining * 0.3
                ));
            }

            let entertainment_pct = pct_of(Category::Entertainment);
            if entertainment_pct > ENTERTAINMENT_PCT {
                recommendations.push(format!(
                    "Entertainment is {:.1}% of your spending. Look for free or lower-cost alternatives.",
                    entertainment_pct
                ));
            }
        }

        if has_income && savings.savings_gap > 0.0 {
            recommendations.push(format!(
                "Increase your savings by ${:.2} per month to reach the recommended {:.0}% savings rate.",
                savings.savings_gap,
                self.config().budget.savings_share() * 100.0
            ));
        }

        let recurring = self.forecaster.identify_recurring_expenses();
        if !recurring.is_empty() {
            recommendations.push(format!(
                "You have {} recurring expenses. Review your subscriptions and cancel the ones you no longer use.",
                recurring.len()
            ));
        }

        if recommendations.is_empty() {
            recommendations.push(
                "Your spending looks well balanced. Keep monitoring your budget regularly."
                    .to_string(),
            );
        }

        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{as_of, credit, days_ago, debit};
    use std::sync::Arc;

    fn advisor(txs: &[Transaction], income: Option<f64>) -> BudgetAdvisor<'_> {
        BudgetAdvisor::new(txs, income).with_reference(as_of())
    }

    #[test]
    fn test_allocation_partitions_income() {
        let txs: Vec<Transaction> = vec![];
        for income in [3000.0, 1234.57, 0.1, 98765.4321] {
            let budget = advisor(&txs, Some(income)).get_recommended_budget().unwrap();
            let sum = budget.needs.budget + budget.wants.budget + budget.savings.budget;
            assert!((sum - income).abs() < 1e-6);
            assert!((budget.needs.budget - income * 0.5).abs() < 1e-9);
            assert!((budget.wants.budget - income * 0.3).abs() < 1e-9);
        }
    }

    #[test]
    fn test_actuals_follow_bucket_mapping() {
        let txs = vec![
            debit("1", days_ago(3), "Market", 300.0, Category::Groceries),
            debit("2", days_ago(4), "Power", 100.0, Category::BillsUtilities),
            debit("3", days_ago(5), "Dinner", 80.0, Category::FoodDining),
            debit("4", days_ago(6), "Transfer out", 500.0, Category::Transfer),
            debit("5", days_ago(60), "Old", 900.0, Category::Groceries),
        ];
        let budget = advisor(&txs, Some(2000.0)).get_recommended_budget().unwrap();

        assert!((budget.needs.actual - 400.0).abs() < 1e-9);
        assert!((budget.wants.actual - 80.0).abs() < 1e-9);
        assert!((budget.savings.actual - 1520.0).abs() < 1e-9);
    }

    #[test]
    fn test_savings_actual_floored_at_zero() {
        let txs = vec![debit("1", days_ago(1), "Car repair", 5000.0, Category::Transportation)];
        let budget = advisor(&txs, Some(1000.0)).get_recommended_budget().unwrap();
        assert_eq!(budget.savings.actual, 0.0);
    }

    #[test]
    fn test_income_estimated_from_shared_aggregation() {
        let txs = vec![
            credit("1", days_ago(100), "Salary", 1000.0, Category::Income),
            credit("2", days_ago(70), "Salary", 2000.0, Category::Income),
            credit("3", days_ago(40), "Salary", 3000.0, Category::Income),
            credit("4", days_ago(10), "Salary", 4000.0, Category::Income),
        ];
        let forecaster = Forecaster::new(&txs).with_reference(as_of());
        let shared = Arc::clone(forecaster.aggregation());
        let advisor = BudgetAdvisor::with_forecaster(forecaster, None);

        // Last three income months: 2000, 3000, 4000
        assert!((advisor.monthly_income() - 3000.0).abs() < 1e-9);
        assert_eq!(advisor.aggregation(), shared.as_ref());

        // Non-positive overrides fall back to the estimate
        let advisor = BudgetAdvisor::new(&txs, Some(0.0));
        assert!((advisor.monthly_income() - 3000.0).abs() < 1e-9);
    }

    #[test]
    fn test_critical_alert_at_135_percent() {
        // Income 2000 -> needs budget 1000
        let txs = vec![debit("1", days_ago(2), "Rent", 1350.0, Category::BillsUtilities)];
        let alerts = advisor(&txs, Some(2000.0)).get_alerts().unwrap();

        let needs: Vec<&Alert> = alerts.iter().filter(|a| a.category == "needs").collect();
        assert_eq!(needs.len(), 1);
        assert_eq!(needs[0].severity, AlertSeverity::Critical);
        assert!((needs[0].overage_amount - 350.0).abs() < 1e-9);
        assert!((needs[0].overage_pct - 35.0).abs() < 1e-9);
        assert!(alerts.iter().all(|a| a.category != "wants"));
    }

    #[test]
    fn test_warning_band() {
        // Wants budget 600; 690 is 115%
        let txs = vec![debit("1", days_ago(2), "Shoes", 690.0, Category::Shopping)];
        let alerts = advisor(&txs, Some(2000.0)).get_alerts().unwrap();
        let wants: Vec<&Alert> = alerts.iter().filter(|a| a.category == "wants").collect();
        assert_eq!(wants.len(), 1);
        assert_eq!(wants[0].severity, AlertSeverity::Warning);

        // 650 is within the 10% band; only the savings shortfall remains
        let txs = vec![debit("1", days_ago(2), "Shoes", 650.0, Category::Shopping)];
        let alerts = advisor(&txs, Some(2000.0)).get_alerts().unwrap();
        assert!(alerts.iter().all(|a| a.category != "wants"));
        assert!(alerts.iter().all(|a| a.severity == AlertSeverity::Info));
    }

    #[test]
    fn test_bucket_alert_band_edges() {
        // Needs budget 1000; exactly 130% is a warning, not critical
        let txs = vec![debit("1", days_ago(2), "Rent", 1300.0, Category::BillsUtilities)];
        let alerts = advisor(&txs, Some(2000.0)).get_alerts().unwrap();
        let needs: Vec<&Alert> = alerts.iter().filter(|a| a.category == "needs").collect();
        assert_eq!(needs.len(), 1);
        assert_eq!(needs[0].severity, AlertSeverity::Warning);
        assert!((needs[0].overage_pct - 30.0).abs() < 1e-9);

        // Exactly 110% raises nothing for the bucket
        let txs = vec![debit("1", days_ago(2), "Rent", 1100.0, Category::BillsUtilities)];
        let alerts = advisor(&txs, Some(2000.0)).get_alerts().unwrap();
        assert!(alerts.iter().all(|a| a.category != "needs"));
    }

    #[test]
    fn test_category_over_budget_alert() {
        // Shopping's share of the wants budget: 600 * 300 / 1200 = 150
        let txs = vec![
            debit("1", days_ago(200), "Concerts", 900.0, Category::Entertainment),
            debit("2", days_ago(2), "Shoes", 300.0, Category::Shopping),
        ];
        let alerts = advisor(&txs, Some(2000.0)).get_alerts().unwrap();

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].severity, AlertSeverity::Warning);
        assert_eq!(alerts[0].category, "Shopping");
        assert!((alerts[0].overage_amount - 150.0).abs() < 1e-9);
        assert!((alerts[0].overage_pct - 100.0).abs() < 1e-9);
        assert!(alerts[0].message.contains("over budget in Shopping"));
        // Savings shortfall follows the category alerts
        assert_eq!(alerts[1].category, "savings");

        // 600 * 300 / 660 leaves Shopping 10% over: flagged, but not alerted
        let txs = vec![
            debit("1", days_ago(200), "Concerts", 360.0, Category::Entertainment),
            debit("2", days_ago(2), "Shoes", 300.0, Category::Shopping),
        ];
        let advisor = advisor(&txs, Some(2000.0));
        let shopping = advisor
            .get_category_budgets()
            .unwrap()
            .into_iter()
            .find(|b| b.category == Category::Shopping)
            .unwrap();
        assert!(shopping.over_budget);
        let alerts = advisor.get_alerts().unwrap();
        assert!(alerts.iter().all(|a| a.category != "Shopping"));
    }

    #[test]
    fn test_savings_below_target_alert() {
        let txs = vec![
            credit("1", days_ago(5), "Salary", 3000.0, Category::Income),
            debit("2", days_ago(4), "Rent", 2800.0, Category::BillsUtilities),
        ];
        let alerts = advisor(&txs, Some(3000.0)).get_alerts().unwrap();
        let savings: Vec<&Alert> = alerts.iter().filter(|a| a.category == "savings").collect();
        assert_eq!(savings.len(), 1);
        assert_eq!(savings[0].severity, AlertSeverity::Info);
        assert!(savings[0].message.starts_with("Savings Below Target"));
        assert!((savings[0].overage_amount - 400.0).abs() < 1e-9);

        // On track: 2900 saved against a 600 target
        let txs = vec![
            credit("1", days_ago(5), "Salary", 3000.0, Category::Income),
            debit("2", days_ago(4), "Power", 100.0, Category::BillsUtilities),
        ];
        let alerts = advisor(&txs, Some(3000.0)).get_alerts().unwrap();
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_no_income_yields_single_info_alert() {
        let txs = vec![debit("1", days_ago(2), "Rent", 1350.0, Category::BillsUtilities)];
        let alerts = advisor(&txs, None).get_alerts().unwrap();

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, AlertSeverity::Info);
        assert_eq!(alerts[0].category, "income");

        // Pattern checks are skipped too, even when they would fire
        let txs = vec![
            debit("1", days_ago(10), "Lunch", 20.0, Category::FoodDining),
            debit("2", days_ago(3), "Lunch", 20.0, Category::FoodDining),
            debit("3", days_ago(2), "Lunch", 20.0, Category::FoodDining),
            debit("4", days_ago(1), "Laptop", 800.0, Category::Shopping),
        ];
        let alerts = advisor(&txs, None).get_alerts().unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category, "income");
    }

    #[test]
    fn test_pattern_alerts() {
        let txs = vec![
            debit("1", days_ago(10), "Lunch", 20.0, Category::FoodDining),
            debit("2", days_ago(9), "Lunch", 20.0, Category::FoodDining),
            debit("3", days_ago(3), "Lunch", 20.0, Category::FoodDining),
            debit("4", days_ago(2), "Lunch", 20.0, Category::FoodDining),
            debit("5", days_ago(1), "Lunch", 20.0, Category::FoodDining),
            debit("6", days_ago(1), "Laptop", 800.0, Category::Shopping),
        ];
        let alerts = advisor(&txs, Some(10_000.0)).get_alerts().unwrap();

        let spending: Vec<&Alert> = alerts.iter().filter(|a| a.category == "spending").collect();
        assert_eq!(spending.len(), 2);
        assert_eq!(spending[0].severity, AlertSeverity::Warning);
        assert_eq!(spending[1].severity, AlertSeverity::Info);
        assert!(spending[1].message.contains("Laptop"));
    }

    #[test]
    fn test_category_budgets() {
        let txs = vec![
            debit("1", days_ago(2), "Market", 300.0, Category::Groceries),
            debit("2", days_ago(3), "Power", 100.0, Category::BillsUtilities),
        ];
        let budgets = advisor(&txs, Some(2000.0)).get_category_budgets().unwrap();

        let groceries = budgets
            .iter()
            .find(|b| b.category == Category::Groceries)
            .unwrap();
        assert!((groceries.budget - 750.0).abs() < 1e-9);
        assert!(!groceries.over_budget);

        let healthcare = budgets
            .iter()
            .find(|b| b.category == Category::Healthcare)
            .unwrap();
        assert_eq!(healthcare.budget, 0.0);

        // Wants has no history: even split of 600 over 4 categories
        let shopping = budgets
            .iter()
            .find(|b| b.category == Category::Shopping)
            .unwrap();
        assert!((shopping.budget - 150.0).abs() < 1e-9);

        let total: f64 = budgets.iter().map(|b| b.budget).sum();
        assert!((total - 1600.0).abs() < 1e-9);
    }

    #[test]
    fn test_savings_potential() {
        let txs = vec![
            credit("1", days_ago(5), "Salary", 3000.0, Category::Income),
            debit("2", days_ago(4), "Rent", 2800.0, Category::BillsUtilities),
        ];
        let savings = advisor(&txs, Some(3000.0)).get_savings_potential().unwrap();

        assert!((savings.current_savings - 200.0).abs() < 1e-9);
        assert!((savings.recommended_savings - 600.0).abs() < 1e-9);
        assert!((savings.savings_gap - 400.0).abs() < 1e-9);
        assert!(!savings.on_track);
    }

    #[test]
    fn test_recommendation_order() {
        let txs = vec![
            credit("1", days_ago(5), "Salary", 1000.0, Category::Income),
            debit("2", days_ago(4), "Restaurant", 500.0, Category::FoodDining),
            debit("3", days_ago(3), "Concert", 300.0, Category::Entertainment),
            debit("4", days_ago(2), "Market", 150.0, Category::Groceries),
        ];
        let recs = advisor(&txs, Some(1000.0)).get_recommendations().unwrap();

        assert_eq!(recs.len(), 5);
        assert!(recs[0].contains("savings rate"));
        assert!(recs[1].starts_with("Food & Dining"));
        assert!(recs[2].starts_with("Dining out"));
        assert!(recs[3].starts_with("Entertainment"));
        assert!(recs[4].starts_with("Increase your savings"));
    }

    #[test]
    fn test_balanced_recommendation() {
        let txs = vec![
            credit("1", days_ago(5), "Salary", 5000.0, Category::Income),
            debit("2", days_ago(4), "Market", 300.0, Category::Groceries),
            debit("3", days_ago(3), "Power", 250.0, Category::BillsUtilities),
            debit("4", days_ago(2), "Bus", 200.0, Category::Transportation),
            debit("5", days_ago(2), "Pharmacy", 250.0, Category::Healthcare),
        ];
        let recs = advisor(&txs, Some(5000.0)).get_recommendations().unwrap();
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("well balanced"));
    }
}
