//! Budget and alert commands

use anyhow::{Context, Result};
use fincopilot_core::{
    AlertSeverity, BucketBudget, BudgetAllocation, CategoryBudget, SavingsPotential,
};
use serde::Serialize;

use super::{money, print_json, Session};

pub fn cmd_budget(session: &Session) -> Result<()> {
    let advisor = session.advisor();
    let allocation = advisor
        .get_recommended_budget()
        .context("Failed to build budget")?;
    let categories = advisor
        .get_category_budgets()
        .context("Failed to build category budgets")?;
    let savings = advisor
        .get_savings_potential()
        .context("Failed to compute savings potential")?;
    let recommendations = advisor
        .get_recommendations()
        .context("Failed to build recommendations")?;

    if session.json {
        #[derive(Serialize)]
        struct Report<'r> {
            allocation: &'r BudgetAllocation,
            categories: &'r [CategoryBudget],
            savings: &'r SavingsPotential,
            recommendations: &'r [String],
        }
        return print_json(&Report {
            allocation: &allocation,
            categories: &categories,
            savings: &savings,
            recommendations: &recommendations,
        });
    }

    println!();
    println!(
        "💰 Budget for {} monthly income (last {} days of spending)",
        money(allocation.monthly_income),
        session.window_days()
    );
    println!("   ─────────────────────────────────────────────────────────────");
    print_bucket("Needs", &allocation.needs);
    print_bucket("Wants", &allocation.wants);
    print_bucket("Savings", &allocation.savings);

    if !categories.is_empty() {
        println!();
        println!("   By category:");
        for budget in &categories {
            let mark = if budget.over_budget { "  ⚠️ over" } else { "" };
            println!(
                "      {:<20} {:>12} of {:>12}{}",
                budget.category.as_str(),
                money(budget.actual),
                money(budget.budget),
                mark
            );
        }
    }

    println!();
    println!(
        "   Saving {} of a recommended {} ({:.1}% of income){}",
        money(savings.current_savings),
        money(savings.recommended_savings),
        savings.savings_rate,
        if savings.on_track { " ✅" } else { "" }
    );

    if !recommendations.is_empty() {
        println!();
        println!("💡 Recommendations");
        for recommendation in &recommendations {
            println!("   • {}", recommendation);
        }
    }
    Ok(())
}

fn print_bucket(name: &str, bucket: &BucketBudget) {
    println!(
        "   {:<8} budget {:>12}   actual {:>12}",
        name,
        money(bucket.budget),
        money(bucket.actual)
    );
}

pub fn cmd_alerts(session: &Session) -> Result<()> {
    let alerts = session
        .advisor()
        .get_alerts()
        .context("Failed to compute alerts")?;

    if session.json {
        return print_json(&alerts);
    }

    if alerts.is_empty() {
        println!("✅ No alerts. Your spending looks good!");
        return Ok(());
    }

    println!();
    println!("⚠️  Alerts");
    println!("   ─────────────────────────────────────────────────────────────");
    for alert in &alerts {
        let icon = match alert.severity {
            AlertSeverity::Critical => "🔴",
            AlertSeverity::Warning => "🟡",
            AlertSeverity::Info => "🔵",
        };
        println!("   {} [{}] {}", icon, alert.category, alert.message);
        if alert.overage_amount > 0.0 {
            println!(
                "      Over by {} ({:.1}%)",
                money(alert.overage_amount),
                alert.overage_pct
            );
        }
    }
    Ok(())
}
