//! Question routing
//!
//! Common questions map to a fixed, ordered list of intents answered from
//! the analyzer, forecaster and advisor. The first matching intent wins, so
//! "spending by category" is a category breakdown rather than a total.
//! Unrecognized questions go to the optional [`Responder`].

use std::fmt::Write as _;
use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::advisor::{BudgetAdvisor, BudgetAllocation, SavingsPotential};
use crate::analyzer::{Analyzer, Insights};
use crate::config::CopilotConfig;
use crate::error::{Error, Result};
use crate::forecast::{ForecastMethod, ForecastRecord, Forecaster, RecurringExpense};
use crate::models::Transaction;
use crate::privacy::sanitize_text;
use crate::responder::{Responder, ResponderClient};

/// What a question is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Forecast,
    RecurringExpenses,
    SpendingByCategory,
    TotalSpent,
    BudgetStatus,
    SavingsRate,
    Income,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forecast => "forecast",
            Self::RecurringExpenses => "recurring_expenses",
            Self::SpendingByCategory => "spending_by_category",
            Self::TotalSpent => "total_spent",
            Self::BudgetStatus => "budget_status",
            Self::SavingsRate => "savings_rate",
            Self::Income => "income",
        }
    }

    /// First intent whose pattern matches, in priority order
    pub fn classify(question: &str) -> Option<Self> {
        rules()
            .iter()
            .find(|(_, re)| re.is_match(question))
            .map(|(intent, _)| *intent)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Intent patterns; order is priority
fn rules() -> &'static [(Intent, Regex)] {
    static RULES: OnceLock<Vec<(Intent, Regex)>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (
                Intent::Forecast,
                r"(?i)\b(forecast\w*|predict\w*|projections?|next month|future)\b",
            ),
            (
                Intent::RecurringExpenses,
                r"(?i)\b(recurring|subscriptions?|repeating)\b",
            ),
            (Intent::SpendingByCategory, r"(?i)\b(categor(y|ies)|breakdown)\b"),
            (Intent::TotalSpent, r"(?i)\b(spend|spent|spending|expenses?)\b"),
            (Intent::BudgetStatus, r"(?i)\bbudget"),
            (Intent::SavingsRate, r"(?i)\b(save|saving|savings)\b"),
            (Intent::Income, r"(?i)\b(income|earn\w*|paychecks?|salary)\b"),
        ]
        .into_iter()
        .map(|(intent, pattern)| (intent, Regex::new(pattern).expect("valid regex")))
        .collect()
    })
}

const HELP_TEXT: &str = "I can answer questions about:
- your spending forecast for next month
- recurring expenses and subscriptions
- spending by category
- how much you have spent
- your budget status
- your savings rate
- your income and next paycheck";

/// Financial snapshot handed to a responder
#[derive(Debug, Clone, Serialize)]
pub struct RouterContext {
    pub insights: Insights,
    /// Absent when there is no spending history
    pub forecast: Option<ForecastRecord>,
    pub budget: BudgetAllocation,
    pub savings: SavingsPotential,
    pub recurring: Vec<RecurringExpense>,
}

impl RouterContext {
    /// Plain-text rendering for LLM prompts
    ///
    /// Descriptions and merchant names pass through [`sanitize_text`].
    pub fn render(&self) -> String {
        let i = &self.insights;
        let mut out = String::new();

        let _ = writeln!(out, "Last {} days:", i.window_days);
        let _ = writeln!(out, "- Income: ${:.2}", i.total_income);
        let _ = writeln!(out, "- Spending: ${:.2}", i.total_spent);
        let _ = writeln!(out, "- Net cashflow: ${:.2}", i.net_cashflow);
        let _ = writeln!(out, "- Trend: {}", i.trend);

        if !i.spending_by_category.is_empty() {
            let _ = writeln!(out, "Spending by category:");
            for (category, amount) in &i.spending_by_category {
                let _ = writeln!(out, "- {}: ${:.2}", category, amount);
            }
        }

        if !i.top_merchants.is_empty() {
            let _ = writeln!(out, "Top merchants:");
            for m in &i.top_merchants {
                let _ = writeln!(
                    out,
                    "- {}: ${:.2}",
                    sanitize_text(&m.merchant),
                    m.total_amount
                );
            }
        }

        if let Some(ref largest) = i.largest_expense {
            let _ = writeln!(
                out,
                "Largest expense: ${:.2} for {}",
                largest.amount,
                sanitize_text(&largest.description)
            );
        }

        if let Some(ref f) = self.forecast {
            let _ = writeln!(
                out,
                "Forecast next month: ${:.2} ({} confidence)",
                f.forecast_amount, f.confidence
            );
        }

        let b = &self.budget;
        let _ = writeln!(out, "Monthly income: ${:.2}", b.monthly_income);
        let _ = writeln!(
            out,
            "Budget needs/wants/savings: ${:.2}/${:.2}/${:.2}",
            b.needs.budget, b.wants.budget, b.savings.budget
        );
        let _ = writeln!(out, "Savings rate: {:.1}%", self.savings.savings_rate);

        if !self.recurring.is_empty() {
            let _ = writeln!(out, "Recurring expenses:");
            for r in &self.recurring {
                let _ = writeln!(
                    out,
                    "- {}: ${:.2} every {} days",
                    sanitize_text(&r.description),
                    r.average_amount,
                    r.interval_days
                );
            }
        }

        out
    }
}

/// Answers finance questions over a transaction slice
#[derive(Clone)]
pub struct QueryRouter<'a> {
    forecaster: Forecaster<'a>,
    monthly_income: Option<f64>,
    responder: Option<ResponderClient>,
}

impl<'a> QueryRouter<'a> {
    pub fn new(transactions: &'a [Transaction]) -> Self {
        Self::with_forecaster(Forecaster::new(transactions))
    }

    /// Create a router over an existing forecaster and its aggregation
    pub fn with_forecaster(forecaster: Forecaster<'a>) -> Self {
        Self {
            forecaster,
            monthly_income: None,
            responder: None,
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

    /// Income passed through to the budget advisor
    pub fn with_income(mut self, monthly_income: Option<f64>) -> Self {
        self.monthly_income = monthly_income;
        self
    }

    /// Enable free-form answers for unrecognized questions
    pub fn with_responder(mut self, responder: ResponderClient) -> Self {
        self.responder = Some(responder);
        self
    }

    pub fn responder(&self) -> Option<&ResponderClient> {
        self.responder.as_ref()
    }

    fn window_days(&self) -> i64 {
        self.forecaster.config().analysis.default_window_days
    }

    fn analyzer(&self) -> Analyzer<'a> {
        Analyzer::new(self.forecaster.transactions())
            .with_reference(self.forecaster.as_of())
            .with_config(*self.forecaster.config())
    }

    /// Advisor sharing this router's monthly aggregation
    fn advisor(&self) -> BudgetAdvisor<'a> {
        BudgetAdvisor::with_forecaster(self.forecaster.clone(), self.monthly_income)
    }

    /// Forecast, or None when there is nothing to forecast from
    fn try_forecast(&self) -> Result<Option<ForecastRecord>> {
        match self.forecaster.forecast_monthly_spending(ForecastMethod::Rolling) {
            Ok(record) => Ok(Some(record)),
            Err(Error::InsufficientData(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Snapshot of the current figures for a responder
    pub fn context(&self) -> Result<RouterContext> {
        let advisor = self.advisor();
        Ok(RouterContext {
            insights: self.analyzer().get_insights(self.window_days())?,
            forecast: self.try_forecast()?,
            budget: advisor.get_recommended_budget()?,
            savings: advisor.get_savings_potential()?,
            recurring: self.forecaster.identify_recurring_expenses(),
        })
    }

    /// Answer a question
    ///
    /// Recognized intents are answered from local figures; anything else is
    /// passed to the responder verbatim, or answered with a help message when
    /// there is none. Responder errors are returned unchanged.
    pub async fn ask(&self, question: &str) -> Result<String> {
        if let Some(intent) = Intent::classify(question) {
            debug!(intent = intent.as_str(), "Question routed");
            return self.answer(intent);
        }

        match self.responder {
            Some(ref responder) => {
                debug!(responder = responder.name(), "No intent matched, delegating");
                let context = self.context()?;
                responder.respond(question, &context).await
            }
            None => {
                debug!("No intent matched and no responder configured");
                Ok(HELP_TEXT.to_string())
            }
        }
    }

    /// Rule-based answer for an intent
    pub fn answer(&self, intent: Intent) -> Result<String> {
        let window = self.window_days();
        match intent {
            Intent::Forecast => Ok(match self.try_forecast()? {
                Some(f) => format!(
                    "Based on {} month(s) of history, next month's spending is forecast at ${:.2} ({} confidence).",
                    f.historical_months.len(),
                    f.forecast_amount,
                    f.confidence
                ),
                None => "There is no spending history to forecast from yet.".to_string(),
            }),
            Intent::RecurringExpenses => {
                let recurring = self.forecaster.identify_recurring_expenses();
                if recurring.is_empty() {
                    return Ok("No recurring expenses detected.".to_string());
                }
                let mut out = format!("Found {} recurring expense(s):", recurring.len());
                for r in &recurring {
                    let _ = write!(
                        out,
                        "\n  - {}: ${:.2} every {} days (next around {})",
                        r.description, r.average_amount, r.interval_days, r.next_expected
                    );
                }
                Ok(out)
            }
            Intent::SpendingByCategory => {
                let by_category = self.analyzer().spending_by_category(window)?;
                let total: f64 = by_category.values().sum();
                if by_category.is_empty() {
                    return Ok(format!("No spending recorded in the last {} days.", window));
                }

                let mut rows: Vec<_> = by_category.into_iter().collect();
                rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

                let mut out = format!("Spending by category (last {} days):", window);
                for (category, amount) in rows {
                    let _ = write!(
                        out,
                        "\n  - {}: ${:.2} ({:.1}%)",
                        category,
                        amount,
                        amount / total * 100.0
                    );
                }
                Ok(out)
            }
            Intent::TotalSpent => {
                let analyzer = self.analyzer();
                Ok(format!(
                    "You spent ${:.2} in the last {} days (average transaction ${:.2}).",
                    analyzer.total_spent(window)?,
                    window,
                    analyzer.average_transaction_amount(window)?
                ))
            }
            Intent::BudgetStatus => {
                let budget = self.advisor().get_recommended_budget()?;
                if budget.monthly_income <= 0.0 {
                    return Ok(
                        "I need income data to evaluate your budget. Provide your monthly income."
                            .to_string(),
                    );
                }
                let mut out = format!(
                    "Budget for a monthly income of ${:.2}:",
                    budget.monthly_income
                );
                for (name, bucket) in [
                    ("Needs", budget.needs),
                    ("Wants", budget.wants),
                    ("Savings", budget.savings),
                ] {
                    let _ = write!(
                        out,
                        "\n  - {}: ${:.2} of ${:.2}",
                        name, bucket.actual, bucket.budget
                    );
                }
                Ok(out)
            }
            Intent::SavingsRate => {
                let savings = self.advisor().get_savings_potential()?;
                if savings.monthly_income <= 0.0 {
                    return Ok("No income recorded, so there is no savings rate to report.".to_string());
                }
                let mut out = format!(
                    "Your savings rate is {:.1}% (${:.2} saved against ${:.2} income). The recommended target is ${:.2}.",
                    savings.savings_rate,
                    savings.current_savings,
                    savings.monthly_income,
                    savings.recommended_savings
                );
                if savings.savings_gap > 0.0 {
                    let _ = write!(out, " You are ${:.2} short.", savings.savings_gap);
                }
                Ok(out)
            }
            Intent::Income => {
                let mut out = format!(
                    "You received ${:.2} in income over the last {} days.",
                    self.analyzer().total_income(window)?,
                    window
                );
                if let Some(p) = self.forecaster.predict_next_paycheck() {
                    let _ = write!(
                        out,
                        " Your next paycheck of about ${:.2} is expected on {}.",
                        p.average_amount, p.next_date
                    );
                }
                Ok(out)
            }
        }
    }

    /// Plain-text report of the default window
    pub fn summary(&self) -> Result<String> {
        let insights = self.analyzer().get_insights(self.window_days())?;
        let advisor = self.advisor();
        let alerts = advisor.get_alerts()?;
        let recommendations = advisor.get_recommendations()?;

        let mut out = String::new();
        let title = format!("Financial Summary (last {} days)", insights.window_days);
        let _ = writeln!(out, "{}", title);
        let _ = writeln!(out, "{}", "=".repeat(title.len()));
        let _ = writeln!(out, "Income:        ${:.2}", insights.total_income);
        let _ = writeln!(out, "Spending:      ${:.2}", insights.total_spent);
        let _ = writeln!(out, "Net cashflow:  ${:.2}", insights.net_cashflow);
        let _ = writeln!(out, "Trend:         {}", insights.trend);

        if !insights.spending_by_category.is_empty() {
            let _ = writeln!(out, "\nSpending by Category:");
            for (category, amount) in &insights.spending_by_category {
                let _ = writeln!(out, "  {:<20} ${:>10.2}", category.as_str(), amount);
            }
        }

        if !insights.top_merchants.is_empty() {
            let _ = writeln!(out, "\nTop Merchants:");
            for m in &insights.top_merchants {
                let _ = writeln!(out, "  {:<20} ${:>10.2}", m.merchant, m.total_amount);
            }
        }

        if !alerts.is_empty() {
            let _ = writeln!(out, "\nAlerts:");
            for a in &alerts {
                let _ = writeln!(
                    out,
                    "  [{}] {}",
                    a.severity.as_str().to_uppercase(),
                    a.message
                );
            }
        }

        let _ = writeln!(out, "\nRecommendations:");
        for r in &recommendations {
            let _ = writeln!(out, "  - {}", r);
        }

        Ok(out)
    }
}
