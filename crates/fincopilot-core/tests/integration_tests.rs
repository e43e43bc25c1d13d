//! Integration tests for fincopilot-core
//!
//! These tests exercise the full import → analyze → forecast → advise workflow.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use fincopilot_core::{
    import::parse_csv, AlertSeverity, Analyzer, BudgetAdvisor, Category, Confidence, Direction,
    Error, ForecastMethod, Forecaster, Granularity, Intent, MonthlyAggregation, QueryRouter,
    ResponderClient, Transaction,
};

/// Day `n` of the scenario; day 1 is 2026-01-01
fn day(n: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        + Duration::days(n - 1)
}

fn tx(
    id: String,
    n: i64,
    description: &str,
    amount: f64,
    direction: Direction,
    category: Category,
) -> Transaction {
    Transaction::new(id, day(n), description, amount, direction, category).unwrap()
}

/// 90 days: $1000 salary on days 1/31/61, $200 rent on days 5/35/65, and
/// $50 of groceries every week from day 3
fn ninety_day_scenario() -> Vec<Transaction> {
    let mut txs = Vec::new();
    for (i, n) in [1, 31, 61].into_iter().enumerate() {
        txs.push(tx(
            format!("salary-{}", i),
            n,
            "Salary",
            1000.0,
            Direction::Credit,
            Category::Income,
        ));
    }
    for (i, n) in [5, 35, 65].into_iter().enumerate() {
        txs.push(tx(
            format!("rent-{}", i),
            n,
            "Rent",
            200.0,
            Direction::Debit,
            Category::BillsUtilities,
        ));
    }
    let mut n = 3;
    let mut i = 0;
    while n <= 90 {
        txs.push(
            tx(
                format!("grocery-{}", i),
                n,
                "Grocery Store",
                50.0,
                Direction::Debit,
                Category::Groceries,
            )
            .with_merchant("Fresh Market"),
        );
        n += 7;
        i += 1;
    }
    txs
}

// =============================================================================
// End-to-end scenario
// =============================================================================

#[test]
fn test_scenario_recurring_rent() {
    let txs = ninety_day_scenario();
    let recurring = Forecaster::new(&txs).identify_recurring_expenses();

    let rent = recurring
        .iter()
        .find(|r| r.description_key == "rent")
        .expect("rent should be recurring");
    assert_eq!(rent.interval_days, 30);
    assert!((rent.average_amount - 200.0).abs() < 1e-9);
    assert_eq!(rent.occurrences.len(), 3);
    assert_eq!(rent.category, Category::BillsUtilities);

    // Weekly groceries repeat too
    let groceries = recurring
        .iter()
        .find(|r| r.description_key == "grocery store")
        .expect("groceries should be recurring");
    assert_eq!(groceries.interval_days, 7);
}

#[test]
fn test_scenario_rolling_forecast() {
    let txs = ninety_day_scenario();
    let forecaster = Forecaster::new(&txs);

    let monthly = forecaster.prepare_monthly_data();
    assert_eq!(monthly.len(), 3);
    let months: Vec<String> = monthly.iter().map(|b| b.month.to_string()).collect();
    assert_eq!(months, vec!["2026-01", "2026-02", "2026-03"]);

    // Rent plus the average month of other spending
    let expected = monthly.iter().map(|b| b.total_amount).sum::<f64>() / monthly.len() as f64;

    let record = forecaster
        .forecast_monthly_spending(ForecastMethod::Rolling)
        .unwrap();
    assert_eq!(record.confidence, Confidence::Medium);
    assert!((record.forecast_amount - expected).abs() / expected < 0.20);
    assert_eq!(record.historical_amounts.len(), 3);
}

#[test]
fn test_scenario_budget_with_monthly_income() {
    let txs = ninety_day_scenario();
    let advisor = BudgetAdvisor::new(&txs, Some(3000.0)).with_reference(day(90));

    let budget = advisor.get_recommended_budget().unwrap();
    assert!((budget.needs.budget - 1500.0).abs() < 1e-9);
    assert!((budget.wants.budget - 900.0).abs() < 1e-9);
    assert!((budget.savings.budget - 600.0).abs() < 1e-9);
    assert_eq!(budget.wants.actual, 0.0);

    // Needs stay well under budget, so nothing is critical
    let alerts = advisor.get_alerts().unwrap();
    assert!(alerts.iter().all(|a| a.severity != AlertSeverity::Critical));
}

#[test]
fn test_scenario_paycheck_prediction() {
    let txs = ninety_day_scenario();
    let prediction = Forecaster::new(&txs).predict_next_paycheck().unwrap();

    assert_eq!(prediction.interval_days, 30);
    assert_eq!(prediction.last_date, day(61).date());
    assert_eq!(prediction.next_date, day(91).date());
}

#[test]
fn test_forecaster_and_advisor_share_aggregation() {
    let txs = ninety_day_scenario();
    let shared = Arc::new(MonthlyAggregation::prepare(&txs));

    let forecaster = Forecaster::new(&txs).with_aggregation(Arc::clone(&shared));
    let advisor = BudgetAdvisor::with_forecaster(forecaster, None);

    // Income months: January (two salaries) and March. February has none
    // and counts as zero: (2000 + 0 + 1000) / 3
    assert_eq!(shared.income.len(), 2);
    assert!((advisor.monthly_income() - 1000.0).abs() < 1e-9);
    assert_eq!(advisor.aggregation(), shared.as_ref());
}

// =============================================================================
// CSV → Router
// =============================================================================

fn scenario_csv() -> &'static str {
    "id,date,description,amount,type,category,merchant,status,notes
1,2026-03-01,Salary,2500.00,credit,Income,,completed,
2,2026-03-02,Whole Foods,82.10,debit,Groceries,Whole Foods,completed,
3,2026-03-05,Netflix,15.49,debit,Entertainment,Netflix,completed,
4,2026-03-08,Dinner Out,64.00,debit,Food & Dining,Bistro,completed,
5,2026-03-12 18:30:00,Electric Bill,95.00,debit,Bills & Utilities,City Power,completed,
6,2026-03-20,Uber,23.40,debit,Transportation,Uber,pending,late night"
}

#[tokio::test]
async fn test_csv_to_router() {
    let txs = parse_csv(scenario_csv().as_bytes()).unwrap();
    assert_eq!(txs.len(), 6);

    // 2026-03-26, so the 30-day window covers all of March's rows
    let as_of = day(85);
    let analyzer = Analyzer::new(&txs).with_reference(as_of);
    let insights = analyzer.get_insights(30).unwrap();
    assert!((insights.total_spent - 279.99).abs() < 1e-9);
    assert!((insights.total_income - 2500.0).abs() < 1e-9);
    assert_eq!(insights.top_merchants[0].merchant, "City Power");
    assert_eq!(insights.most_frequent_category, Some(Category::FoodDining));

    let router = QueryRouter::new(&txs)
        .with_reference(as_of)
        .with_responder(ResponderClient::mock());

    let total = router.ask("How much did I spend this month?").await.unwrap();
    assert!(total.contains("$279.99"));

    let free_form = router.ask("Can I afford a new bike?").await.unwrap();
    assert!(free_form.starts_with("You asked: \"Can I afford a new bike?\""));

    assert_eq!(
        Intent::classify("What's my budget looking like?"),
        Some(Intent::BudgetStatus)
    );
}

// =============================================================================
// Empty transaction set
// =============================================================================

#[tokio::test]
async fn test_empty_set_round_trip() {
    let txs: Vec<Transaction> = vec![];
    let as_of = day(90);

    let analyzer = Analyzer::new(&txs).with_reference(as_of);
    let insights = analyzer.get_insights(30).unwrap();
    assert_eq!(insights.total_spent, 0.0);
    assert_eq!(insights.average_transaction_amount, 0.0);
    assert!(analyzer.daily_spending(7).unwrap().iter().all(|d| d.amount == 0.0));
    assert!(analyzer.spending_over_time(Granularity::Monthly).is_empty());

    let forecaster = Forecaster::new(&txs).with_reference(as_of);
    assert!(matches!(
        forecaster.forecast_monthly_spending(ForecastMethod::Linear),
        Err(Error::InsufficientData(_))
    ));
    assert!(matches!(
        forecaster.forecast_category_spending(Category::Groceries, ForecastMethod::Rolling),
        Err(Error::InsufficientData(_))
    ));
    assert!(forecaster
        .forecast_all_categories(ForecastMethod::Rolling)
        .is_empty());
    assert!(forecaster.identify_recurring_expenses().is_empty());
    assert!(forecaster.predict_next_paycheck().is_none());
    assert!(forecaster.spending_velocity(7).unwrap().velocity.is_none());

    let advisor = BudgetAdvisor::new(&txs, None).with_reference(as_of);
    let budget = advisor.get_recommended_budget().unwrap();
    assert_eq!(budget.monthly_income, 0.0);
    assert_eq!(budget.needs.budget, 0.0);
    assert!(!advisor.get_category_budgets().unwrap().is_empty());
    assert_eq!(advisor.get_alerts().unwrap().len(), 1);
    assert_eq!(advisor.get_recommendations().unwrap().len(), 1);
    assert_eq!(advisor.get_savings_potential().unwrap().savings_rate, 0.0);

    let router = QueryRouter::new(&txs).with_reference(as_of);
    assert!(router.summary().is_ok());
    assert!(router.ask("How much did I spend?").await.is_ok());
    assert!(router.ask("anything else").await.is_ok());
}
