//! Fincopilot Core Library
//!
//! Analytics and forecasting engine for personal transactions:
//! - Windowed spending statistics (analyzer)
//! - Monthly spending forecasts and recurring expense detection (forecast)
//! - 50/30/20 budget allocation, alerts and recommendations (advisor)
//! - Question routing with an optional LLM responder (router, responder)
//! - CSV import and tunable thresholds (import, config)
//! - Masking of free text sent to a responder (privacy)

pub mod advisor;
pub mod analyzer;
pub mod config;
pub mod error;
pub mod forecast;
pub mod import;
pub mod models;
pub mod privacy;
pub mod responder;
pub mod router;

/// Test utilities including mock Ollama server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::{
    Alert, AlertSeverity, BucketBudget, BudgetAdvisor, BudgetAllocation, CategoryBudget,
    SavingsPotential,
};
pub use analyzer::{Analyzer, DailyTotal, Insights, MerchantTotal, PeriodTotal, MAX_WINDOW_DAYS};
pub use config::CopilotConfig;
pub use error::{Error, Result};
pub use forecast::{
    Confidence, ForecastMethod, ForecastRecord, Forecaster, MonthlyAggregation, MonthlyBucket,
    PaycheckPrediction, RecurringExpense, SpendingVelocity, YearMonth,
};
pub use import::{load_csv, parse_csv};
pub use models::{BudgetBucket, Category, Direction, Granularity, Transaction, TrendDirection};
pub use privacy::sanitize_text;
pub use responder::{MockResponder, OllamaResponder, Responder, ResponderClient};
pub use router::{Intent, QueryRouter, RouterContext};
