//! Generated demo transactions
//!
//! Monthly bills on fixed days, a bi-weekly paycheck and seeded random
//! purchases, so every view has something to show. The same seed and
//! reference instant always produce the same set.

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime};
use fincopilot_core::{Category, Direction, Result, Transaction};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEMO_SEED: u64 = 42;

const PAYCHECK_AMOUNT: f64 = 2500.0;
const PAYCHECK_INTERVAL_DAYS: i64 = 14;
const PURCHASE_COUNT: usize = 150;

/// (description, amount, category, merchant, day of month)
const MONTHLY_BILLS: [(&str, f64, Category, &str, u32); 5] = [
    ("Rent Payment", 1200.0, Category::BillsUtilities, "Landlord", 1),
    ("Internet Service", 60.0, Category::BillsUtilities, "ISP Provider", 5),
    ("Streaming Services", 25.0, Category::Entertainment, "Netflix", 8),
    ("Phone Bill", 80.0, Category::BillsUtilities, "Phone Company", 10),
    ("Gym Membership", 45.0, Category::Personal, "Fitness Center", 15),
];

/// Merchants and amount range per discretionary category
const PURCHASES: [(Category, &[&str], (f64, f64)); 8] = [
    (
        Category::FoodDining,
        &["Starbucks", "Chipotle", "Subway", "Local Cafe", "Thai Restaurant"],
        (5.0, 75.0),
    ),
    (
        Category::Groceries,
        &["Whole Foods", "Trader Joe's", "Safeway", "Costco"],
        (30.0, 200.0),
    ),
    (
        Category::Shopping,
        &["Amazon", "Target", "Best Buy", "IKEA"],
        (15.0, 300.0),
    ),
    (
        Category::Entertainment,
        &["Movie Theater", "Concert Venue", "Bowling Alley"],
        (10.0, 150.0),
    ),
    (
        Category::Transportation,
        &["Uber", "Lyft", "Gas Station", "Public Transit"],
        (8.0, 60.0),
    ),
    (
        Category::BillsUtilities,
        &["Electric Company", "Water Utility"],
        (50.0, 300.0),
    ),
    (
        Category::Healthcare,
        &["CVS Pharmacy", "Dental Clinic"],
        (20.0, 200.0),
    ),
    (Category::Personal, &["Hair Salon", "Spa"], (25.0, 150.0)),
];

/// Generate `days_back` days of transactions ending at `as_of`, oldest first
pub fn demo_transactions(
    as_of: NaiveDateTime,
    days_back: i64,
    seed: u64,
) -> Result<Vec<Transaction>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = (as_of - Duration::days(days_back)).date();
    let mut transactions = Vec::new();
    let mut next_id = 1;
    let mut id = || {
        let id = format!("TXN{:04}", next_id);
        next_id += 1;
        id
    };

    for date in start.iter_days().take_while(|d| *d <= as_of.date()) {
        let timestamp = date.and_time(NaiveTime::MIN);

        for (description, amount, category, merchant, day) in MONTHLY_BILLS {
            if date.day() == day {
                let bill =
                    Transaction::new(id(), timestamp, description, amount, Direction::Debit, category)?;
                transactions.push(bill.with_merchant(merchant));
            }
        }

        if (date - start).num_days() % PAYCHECK_INTERVAL_DAYS == 7 {
            transactions.push(
                Transaction::new(
                    id(),
                    timestamp,
                    "Paycheck Deposit",
                    PAYCHECK_AMOUNT,
                    Direction::Credit,
                    Category::Income,
                )?
                .with_merchant("Employer Inc"),
            );
        }
    }

    for _ in 0..PURCHASE_COUNT {
        let (category, merchants, (low, high)) = PURCHASES[rng.gen_range(0..PURCHASES.len())];
        let merchant = merchants[rng.gen_range(0..merchants.len())];
        let amount = (rng.gen_range(low..high) * 100.0).round() / 100.0;
        let timestamp = as_of
            - Duration::days(rng.gen_range(0..days_back.max(1)))
            - Duration::minutes(rng.gen_range(0..720));

        transactions.push(
            Transaction::new(
                id(),
                timestamp,
                format!("Purchase at {}", merchant),
                amount,
                Direction::Debit,
                category,
            )?
            .with_merchant(merchant),
        );
    }

    transactions.sort_by_key(|t| t.timestamp);
    Ok(transactions)
}
