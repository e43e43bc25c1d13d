//! Tunable thresholds for analysis, forecasting and budgeting
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Explicit path, or the override in the config dir
//!    (~/.config/fincopilot/config.toml on Linux) when it exists
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their default value.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analyzer::MAX_WINDOW_DAYS;
use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Lookback and presentation settings for the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub default_window_days: i64,
    pub top_merchants_limit: usize,
    pub trend_tolerance: f64,
}

/// Projection settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub rolling_window: usize,
    pub trend_damping: f64,
}

/// Recurring expense detector settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecurringConfig {
    pub min_occurrences: usize,
    pub max_gap_cv: f64,
    pub min_interval_days: f64,
    pub max_interval_days: f64,
}

/// 50/30/20 allocation and alert settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetConfig {
    pub needs_share: f64,
    pub wants_share: f64,
    pub warning_ratio: f64,
    pub critical_ratio: f64,
    pub income_lookback_months: usize,
}

impl BudgetConfig {
    /// Savings take whatever needs and wants leave
    pub fn savings_share(&self) -> f64 {
        1.0 - self.needs_share - self.wants_share
    }
}

/// All engine thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CopilotConfig {
    pub analysis: AnalysisConfig,
    pub forecast: ForecastConfig,
    pub recurring: RecurringConfig,
    pub budget: BudgetConfig,
}

impl Default for CopilotConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig {
                default_window_days: 30,
                top_merchants_limit: 5,
                trend_tolerance: 0.10,
            },
            forecast: ForecastConfig {
                rolling_window: 3,
                trend_damping: 0.5,
            },
            recurring: RecurringConfig {
                min_occurrences: 3,
                max_gap_cv: 0.25,
                min_interval_days: 5.0,
                max_interval_days: 95.0,
            },
            budget: BudgetConfig {
                needs_share: 0.50,
                wants_share: 0.30,
                warning_ratio: 1.10,
                critical_ratio: 1.30,
                income_lookback_months: 3,
            },
        }
    }
}

impl CopilotConfig {
    /// Load configuration (explicit path or default override, then embedded defaults)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?,
            None => match default_config_path() {
                Some(default_path) if default_path.exists() => {
                    debug!(path = %default_path.display(), "Using config override");
                    fs::read_to_string(&default_path).map_err(|e| {
                        Error::Config(format!("Failed to read {}: {}", default_path.display(), e))
                    })?
                }
                _ => DEFAULT_CONFIG.to_string(),
            },
        };

        parse_config(&content)
    }

    /// Embedded defaults only
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }

    /// Reject combinations the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        let a = &self.analysis;
        if !(1..=MAX_WINDOW_DAYS).contains(&a.default_window_days) {
            return Err(Error::Config(format!(
                "analysis.default_window_days must be between 1 and {}, got {}",
                MAX_WINDOW_DAYS, a.default_window_days
            )));
        }
        if !(0.0..1.0).contains(&a.trend_tolerance) {
            return Err(Error::Config(format!(
                "analysis.trend_tolerance must be in [0, 1), got {}",
                a.trend_tolerance
            )));
        }

        let f = &self.forecast;
        if f.rolling_window == 0 {
            return Err(Error::Config("forecast.rolling_window must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&f.trend_damping) {
            return Err(Error::Config(format!(
                "forecast.trend_damping must be in [0, 1], got {}",
                f.trend_damping
            )));
        }

        let r = &self.recurring;
        if r.min_occurrences < 3 {
            return Err(Error::Config(format!(
                "recurring.min_occurrences must be at least 3, got {}",
                r.min_occurrences
            )));
        }
        if r.max_gap_cv < 0.0 {
            return Err(Error::Config("recurring.max_gap_cv must not be negative".into()));
        }
        if r.min_interval_days <= 0.0 || r.min_interval_days > r.max_interval_days {
            return Err(Error::Config(format!(
                "recurring interval range [{}, {}] is invalid",
                r.min_interval_days, r.max_interval_days
            )));
        }

        let b = &self.budget;
        if b.needs_share < 0.0 || b.wants_share < 0.0 || b.savings_share() < 0.0 {
            return Err(Error::Config(format!(
                "budget shares must be non-negative and sum to at most 1 (needs {}, wants {})",
                b.needs_share, b.wants_share
            )));
        }
        if b.warning_ratio < 1.0 || b.critical_ratio <= b.warning_ratio {
            return Err(Error::Config(format!(
                "budget ratios must satisfy 1 <= warning < critical (warning {}, critical {})",
                b.warning_ratio, b.critical_ratio
            )));
        }
        if b.income_lookback_months == 0 {
            return Err(Error::Config(
                "budget.income_lookback_months must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fincopilot").join("config.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    analysis: Option<RawAnalysis>,
    forecast: Option<RawForecast>,
    recurring: Option<RawRecurring>,
    budget: Option<RawBudget>,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    default_window_days: Option<i64>,
    top_merchants_limit: Option<usize>,
    trend_tolerance: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    rolling_window: Option<usize>,
    trend_damping: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawRecurring {
    min_occurrences: Option<usize>,
    max_gap_cv: Option<f64>,
    min_interval_days: Option<f64>,
    max_interval_days: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawBudget {
    needs_share: Option<f64>,
    wants_share: Option<f64>,
    warning_ratio: Option<f64>,
    critical_ratio: Option<f64>,
    income_lookback_months: Option<usize>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<CopilotConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = CopilotConfig::default();

    if let Some(analysis) = raw.analysis {
        let a = &mut config.analysis;
        a.default_window_days = analysis.default_window_days.unwrap_or(a.default_window_days);
        a.top_merchants_limit = analysis.top_merchants_limit.unwrap_or(a.top_merchants_limit);
        a.trend_tolerance = analysis.trend_tolerance.unwrap_or(a.trend_tolerance);
    }

    if let Some(forecast) = raw.forecast {
        let f = &mut config.forecast;
        f.rolling_window = forecast.rolling_window.unwrap_or(f.rolling_window);
        f.trend_damping = forecast.trend_damping.unwrap_or(f.trend_damping);
    }

    if let Some(recurring) = raw.recurring {
        let r = &mut config.recurring;
        r.min_occurrences = recurring.min_occurrences.unwrap_or(r.min_occurrences);
        r.max_gap_cv = recurring.max_gap_cv.unwrap_or(r.max_gap_cv);
        r.min_interval_days = recurring.min_interval_days.unwrap_or(r.min_interval_days);
        r.max_interval_days = recurring.max_interval_days.unwrap_or(r.max_interval_days);
    }

    if let Some(budget) = raw.budget {
        let b = &mut config.budget;
        b.needs_share = budget.needs_share.unwrap_or(b.needs_share);
        b.wants_share = budget.wants_share.unwrap_or(b.wants_share);
        b.warning_ratio = budget.warning_ratio.unwrap_or(b.warning_ratio);
        b.critical_ratio = budget.critical_ratio.unwrap_or(b.critical_ratio);
        b.income_lookback_months = budget
            .income_lookback_months
            .unwrap_or(b.income_lookback_months);
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_matches_default() {
        let embedded = CopilotConfig::embedded().unwrap();
        assert_eq!(embedded, CopilotConfig::default());
    }

    #[test]
    fn test_documented_constants() {
        let config = CopilotConfig::default();
        assert_eq!(config.forecast.trend_damping, 0.5);
        assert_eq!(config.recurring.max_gap_cv, 0.25);
        assert_eq!(config.recurring.min_interval_days, 5.0);
        assert_eq!(config.recurring.max_interval_days, 95.0);
        assert!((config.budget.savings_share() - 0.20).abs() < 1e-12);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = parse_config(
            r#"
            [forecast]
            trend_damping = 0.25
            "#,
        )
        .unwrap();

        assert_eq!(config.forecast.trend_damping, 0.25);
        assert_eq!(config.forecast.rolling_window, 3);
        assert_eq!(config.budget, CopilotConfig::default().budget);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = parse_config("[budget]\nneeds_share = 0.8\nwants_share = 0.4\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = parse_config("[budget]\ncritical_ratio = 1.05\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = parse_config("[analysis]\ndefault_window_days = 0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = parse_config("[analysis]\ndefault_window_days = 200000000\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(parse_config("[analysis]\ndefault_window_days = 36500\n").is_ok());
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let err = parse_config("[forecast\nrolling_window = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[recurring]\nmax_gap_cv = 0.1").unwrap();

        let config = CopilotConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.recurring.max_gap_cv, 0.1);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let err = CopilotConfig::load(Some(Path::new("/nonexistent/fincopilot.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
