//! Summary and insights commands

use anyhow::{Context, Result};
use serde_json::json;

use super::{money, print_json, truncate, Session};

pub fn cmd_summary(session: &Session) -> Result<()> {
    let summary = session
        .router()
        .summary()
        .context("Failed to build summary")?;

    if session.json {
        return print_json(&json!({ "summary": summary }));
    }

    println!();
    println!("{}", summary);
    Ok(())
}

pub fn cmd_insights(session: &Session) -> Result<()> {
    let analyzer = session.analyzer();
    let insights = analyzer
        .get_insights(session.window_days())
        .context("Failed to compute insights")?;

    if session.json {
        return print_json(&insights);
    }

    println!();
    println!("📊 Insights (last {} days)", insights.window_days);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Spent:     {:>12}", money(insights.total_spent));
    println!("   Income:    {:>12}", money(insights.total_income));
    println!("   Net:       {:>12}", money(insights.net_cashflow));
    println!(
        "   Average:   {:>12}  per purchase",
        money(insights.average_transaction_amount)
    );
    println!("   Trend:     {}", insights.trend);
    if let Some(category) = insights.most_frequent_category {
        println!("   Most frequent category: {}", category);
    }
    if let Some(largest) = &insights.largest_expense {
        println!(
            "   Largest expense: {} on {} ({})",
            money(largest.amount),
            largest.date(),
            truncate(&largest.description, 40)
        );
    }

    if !insights.spending_by_category.is_empty() {
        let mut categories: Vec<_> = insights.spending_by_category.iter().collect();
        categories.sort_by(|a, b| b.1.total_cmp(a.1));

        println!();
        println!("   By category:");
        for (category, amount) in categories {
            let pct = if insights.total_spent > 0.0 {
                amount / insights.total_spent * 100.0
            } else {
                0.0
            };
            println!(
                "      {:<20} {:>12}  {:>5.1}%",
                category.as_str(),
                money(*amount),
                pct
            );
        }
    }

    if !insights.top_merchants.is_empty() {
        println!();
        println!("   Top merchants:");
        for merchant in &insights.top_merchants {
            println!(
                "      {:<30} {:>12}",
                truncate(&merchant.merchant, 30),
                money(merchant.total_amount)
            );
        }
    }

    println!();
    println!(
        "   {} transactions loaded, window ends {}",
        insights.total_transactions,
        analyzer.as_of().date()
    );
    Ok(())
}
