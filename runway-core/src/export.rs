//! CSV export of the full transaction set, lifecycle flags included.

use std::io::Write;

use anyhow::{Context, Result};

use crate::transaction::Transaction;

/// Stable column order; every field round-trips.
const HEADER: [&str; 9] = [
    "id",
    "date",
    "description",
    "amount",
    "category",
    "confidence",
    "excluded",
    "approved",
    "isSplit",
];

/// Write every transaction as CSV, one row per record.
pub fn write_csv<W: Write>(writer: W, transactions: &[Transaction]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER).context("writing export header")?;
    for t in transactions {
        wtr.write_record([
            t.id.to_string(),
            t.date.clone(),
            t.description.clone(),
            format!("{:.2}", t.amount),
            t.category.clone(),
            t.confidence.as_str().to_string(),
            t.excluded.to_string(),
            t.approved.to_string(),
            t.is_split.to_string(),
        ])
        .with_context(|| format!("writing transaction {}", t.id))?;
    }
    wtr.flush().context("flushing export")?;
    Ok(())
}

pub fn to_csv_string(transactions: &[Transaction]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, transactions)?;
    String::from_utf8(buf).context("export is not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Confidence;

    fn txn() -> Transaction {
        Transaction {
            id: 7,
            date: "2024-01-15".to_string(),
            description: "Stripe Payment".to_string(),
            amount: -29.99,
            category: "Payment Processing Fees".to_string(),
            confidence: Confidence::High,
            approved: true,
            excluded: false,
            is_split: false,
        }
    }

    #[test]
    fn test_header_and_row() {
        let csv = to_csv_string(&[txn()]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,date,description,amount,category,confidence,excluded,approved,isSplit"
        );
        assert_eq!(
            lines.next().unwrap(),
            "7,2024-01-15,Stripe Payment,-29.99,Payment Processing Fees,high,false,true,false"
        );
    }

    #[test]
    fn test_fields_round_trip() {
        let original = txn();
        let csv = to_csv_string(std::slice::from_ref(&original)).unwrap();
        let mut rdr = csv::Reader::from_reader(csv.as_bytes());
        let row = rdr.records().next().unwrap().unwrap();
        assert_eq!(row.get(0).unwrap().parse::<u64>().unwrap(), original.id);
        assert_eq!(row.get(1).unwrap(), original.date);
        assert_eq!(row.get(2).unwrap(), original.description);
        assert_eq!(row.get(3).unwrap().parse::<f64>().unwrap(), original.amount);
        assert_eq!(row.get(4).unwrap(), original.category);
        assert_eq!(row.get(5).unwrap(), original.confidence.as_str());
        assert_eq!(row.get(6).unwrap().parse::<bool>().unwrap(), original.excluded);
        assert_eq!(row.get(7).unwrap().parse::<bool>().unwrap(), original.approved);
        assert_eq!(row.get(8).unwrap().parse::<bool>().unwrap(), original.is_split);
    }
}
