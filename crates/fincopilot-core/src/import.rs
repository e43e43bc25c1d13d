//! CSV transaction import
//!
//! Format: `id,date,description,amount,type,category,merchant,status,notes`
//!
//! Columns are matched by header name (case-insensitive), so their order
//! does not matter. `id`, `merchant`, `status` and `notes` are optional;
//! rows without an id get a stable content hash instead.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Category, Direction, Transaction};

const REQUIRED_COLUMNS: [&str; 5] = ["date", "description", "amount", "type", "category"];

/// Header name to column index
struct Columns(HashMap<String, usize>);

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let map: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();

        for column in REQUIRED_COLUMNS {
            if !map.contains_key(column) {
                return Err(Error::InvalidData(format!(
                    "Missing required column: {}",
                    column
                )));
            }
        }
        Ok(Self(map))
    }

    /// Trimmed value, None when the column is absent or the cell is empty
    fn get<'r>(&self, record: &'r StringRecord, column: &str) -> Option<&'r str> {
        self.0
            .get(column)
            .and_then(|&i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn require<'r>(&self, record: &'r StringRecord, column: &str, row: usize) -> Result<&'r str> {
        self.get(record, column)
            .ok_or_else(|| Error::InvalidData(format!("Row {}: missing {}", row, column)))
    }
}

/// Parse transactions from CSV
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut transactions = Vec::new();

    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        // 1-based, counting the header line
        let row = index + 2;

        let timestamp = parse_timestamp(columns.require(&record, "date", row)?)?;
        let description = columns.require(&record, "description", row)?.to_string();
        let amount = parse_amount(columns.require(&record, "amount", row)?)?;
        let direction: Direction = columns.require(&record, "type", row)?.parse()?;
        let category: Category = columns.require(&record, "category", row)?.parse()?;

        let id = match columns.get(&record, "id") {
            Some(id) => id.to_string(),
            None => generate_id(&timestamp, &description, amount, direction, row),
        };

        let mut tx = Transaction::new(id, timestamp, description, amount, direction, category)?;
        if let Some(merchant) = columns.get(&record, "merchant") {
            tx = tx.with_merchant(merchant);
        }
        if let Some(status) = columns.get(&record, "status") {
            tx = tx.with_status(status.to_lowercase());
        }
        if let Some(notes) = columns.get(&record, "notes") {
            tx = tx.with_notes(notes);
        }

        transactions.push(tx);
    }

    debug!("Parsed {} transactions", transactions.len());
    Ok(transactions)
}

/// Parse transactions from a CSV file
pub fn load_csv(path: &Path) -> Result<Vec<Transaction>> {
    let file = File::open(path)?;
    parse_csv(file)
}

/// Stable id for rows without one
fn generate_id(
    timestamp: &NaiveDateTime,
    description: &str,
    amount: f64,
    direction: Direction,
    row: usize,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(timestamp.to_string().as_bytes());
    hasher.update(description.as_bytes());
    hasher.update(amount.to_be_bytes());
    hasher.update(direction.as_str().as_bytes());
    // Row number keeps identical rows distinct
    hasher.update(row.to_be_bytes());
    hex::encode(hasher.finalize())
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Error::InvalidData(format!("Unable to parse date: {}", s)))
}

/// Parse a non-negative amount, allowing a currency symbol and thousands separators
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned = s.replace(['$', ',', ' '], "");
    let amount = cleaned
        .parse::<f64>()
        .map_err(|_| Error::InvalidData(format!("Unable to parse amount: {}", s)))?;

    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidData(format!(
            "Amount must be a non-negative number, got {} (use the type column for direction)",
            s
        )));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "id,date,description,amount,type,category,merchant,status,notes";

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 1, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2026-01-15 09:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2026-01-15T09:30:00").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2026-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        assert!(parse_timestamp("01/15/2026").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,234.56").unwrap(), 1234.56);
        assert_eq!(parse_amount("0").unwrap(), 0.0);
        assert!(matches!(parse_amount("-5.00"), Err(Error::InvalidData(_))));
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_parse_full_rows() {
        let csv = format!(
            "{}\n\
             t1,2026-01-15,Coffee,4.50,debit,Food & Dining,Cafe,completed,\n\
             t2,2026-01-16 08:00:00,Salary,3000,credit,income,,PENDING,January pay",
            HEADER
        );
        let txs = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].id, "t1");
        assert_eq!(txs[0].category, Category::FoodDining);
        assert_eq!(txs[0].merchant.as_deref(), Some("Cafe"));
        assert!(txs[0].notes.is_none());

        assert_eq!(txs[1].direction, Direction::Credit);
        assert_eq!(txs[1].category, Category::Income);
        assert!(txs[1].merchant.is_none());
        assert_eq!(txs[1].status, "pending");
        assert_eq!(txs[1].notes.as_deref(), Some("January pay"));
    }

    #[test]
    fn test_minimal_columns_generate_ids() {
        let csv = "date,description,amount,type,category\n\
                   2026-02-01,Rent,1200,debit,Bills & Utilities\n\
                   2026-02-01,Rent,1200,debit,Bills & Utilities";
        let txs = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].id.len(), 64);
        assert_ne!(txs[0].id, txs[1].id);
        assert_eq!(txs[0].status, "completed");

        // Same input, same ids
        let again = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(again[0].id, txs[0].id);
    }

    #[test]
    fn test_rejects_bad_rows() {
        let negative = format!("{}\nt1,2026-01-15,Refund,-5,debit,Other,,,", HEADER);
        assert!(matches!(
            parse_csv(negative.as_bytes()),
            Err(Error::InvalidData(_))
        ));

        let unknown = format!("{}\nt1,2026-01-15,Coin,5,debit,Crypto,,,", HEADER);
        assert!(matches!(
            parse_csv(unknown.as_bytes()),
            Err(Error::UnknownCategory(ref c)) if c == "Crypto"
        ));

        let bad_type = format!("{}\nt1,2026-01-15,Coin,5,sideways,Other,,,", HEADER);
        assert!(matches!(
            parse_csv(bad_type.as_bytes()),
            Err(Error::InvalidData(_))
        ));

        let missing_column = "date,description,amount,type\n2026-01-15,A,1,debit";
        assert!(matches!(
            parse_csv(missing_column.as_bytes()),
            Err(Error::InvalidData(ref m)) if m.contains("category")
        ));
    }

    #[test]
    fn test_invalid_utf8_is_csv_error() {
        let mut bytes = format!("{}\nt1,2026-01-15,", HEADER).into_bytes();
        bytes.extend_from_slice(b"Caf\xff,5,debit,Other,,,");
        assert!(matches!(parse_csv(bytes.as_slice()), Err(Error::Csv(_))));
    }

    #[test]
    fn test_load_csv_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        writeln!(file, "t1,2026-03-01,Bus,2.75,debit,transportation,Metro,,").unwrap();

        let txs = load_csv(file.path()).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].category, Category::Transportation);

        assert!(matches!(
            load_csv(Path::new("/nonexistent/transactions.csv")),
            Err(Error::Io(_))
        ));
    }
}
