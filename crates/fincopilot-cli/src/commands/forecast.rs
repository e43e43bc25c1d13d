//! Forecast and recurring expense commands

use anyhow::{Context, Result};
use fincopilot_core::{
    Category, ForecastMethod, ForecastRecord, PaycheckPrediction, RecurringExpense,
    SpendingVelocity,
};
use serde::Serialize;

use super::{money, print_json, truncate, Session};

/// Days compared by the velocity line of `forecast`
const VELOCITY_WINDOW_DAYS: i64 = 7;

pub fn cmd_forecast(
    session: &Session,
    method: ForecastMethod,
    category: Option<Category>,
    all_categories: bool,
) -> Result<()> {
    let forecaster = session.forecaster();

    if all_categories {
        let forecasts = forecaster.forecast_all_categories(method);
        if session.json {
            return print_json(&forecasts);
        }

        println!();
        println!("🔮 Next month by category ({})", method);
        println!("   ─────────────────────────────────────────────────────────────");
        if forecasts.is_empty() {
            println!("   No spending history to forecast from.");
        }
        for (category, record) in &forecasts {
            println!(
                "   {:<20} {:>12}  ({} confidence, {} months)",
                category.as_str(),
                money(record.forecast_amount),
                record.confidence,
                record.historical_months.len()
            );
        }
        return Ok(());
    }

    let (label, record) = match category {
        Some(category) => (
            category.as_str().to_string(),
            forecaster
                .forecast_category_spending(category, method)
                .with_context(|| format!("Cannot forecast {}", category))?,
        ),
        None => (
            "All spending".to_string(),
            forecaster
                .forecast_monthly_spending(method)
                .context("Cannot forecast spending")?,
        ),
    };
    let velocity = forecaster
        .spending_velocity(VELOCITY_WINDOW_DAYS)
        .context("Failed to compute spending velocity")?;

    if session.json {
        #[derive(Serialize)]
        struct Report<'r> {
            label: &'r str,
            forecast: &'r ForecastRecord,
            velocity: &'r SpendingVelocity,
        }
        return print_json(&Report {
            label: &label,
            forecast: &record,
            velocity: &velocity,
        });
    }

    println!();
    println!("🔮 Forecast: {} ({})", label, method);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Next month: {}", money(record.forecast_amount));
    println!("   Confidence: {}", record.confidence);
    println!();
    println!("   History:");
    for (month, amount) in record.historical_months.iter().zip(&record.historical_amounts) {
        println!("      {}  {:>12}", month, money(*amount));
    }

    println!();
    match velocity.change_pct {
        Some(change) => println!(
            "   Last {} days: {} ({:+.1}% vs the {} days before, {})",
            velocity.window_days,
            money(velocity.recent_spending),
            change,
            velocity.window_days,
            velocity.trend
        ),
        None => println!(
            "   Last {} days: {} (no spending in the {} days before)",
            velocity.window_days,
            money(velocity.recent_spending),
            velocity.window_days
        ),
    }
    Ok(())
}

pub fn cmd_recurring(session: &Session) -> Result<()> {
    let forecaster = session.forecaster();
    let recurring = forecaster.identify_recurring_expenses();
    let paycheck = forecaster.predict_next_paycheck();

    if session.json {
        #[derive(Serialize)]
        struct Report<'r> {
            recurring: &'r [RecurringExpense],
            next_paycheck: &'r Option<PaycheckPrediction>,
        }
        return print_json(&Report {
            recurring: &recurring,
            next_paycheck: &paycheck,
        });
    }

    println!();
    println!("🔁 Recurring expenses");
    println!("   ─────────────────────────────────────────────────────────────");
    if recurring.is_empty() {
        println!("   None detected.");
    }
    let mut monthly_total = 0.0;
    for expense in &recurring {
        monthly_total += expense.average_amount * 30.0 / expense.interval_days.max(1) as f64;
        println!(
            "   {:<28} {:>10}  every {:>3} days  next {}",
            truncate(&expense.description, 28),
            money(expense.average_amount),
            expense.interval_days,
            expense.next_expected
        );
    }
    if !recurring.is_empty() {
        println!();
        println!("   ≈ {} per month", money(monthly_total));
    }

    if let Some(paycheck) = paycheck {
        println!();
        println!(
            "💵 Next paycheck: {} around {} (every {} days, last {})",
            money(paycheck.average_amount),
            paycheck.next_date,
            paycheck.interval_days,
            paycheck.last_date
        );
    }
    Ok(())
}
