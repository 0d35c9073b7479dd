//! CSV export of month reports.
//!
//! Writes one row per day of a month with its eaten/burned figures, for
//! spreadsheet use. The export is regenerated in full on every call.

use crate::calendar::month_day_keys;
use crate::engine::compute_day_balance;
use crate::{EngineContext, Result};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    date: String,
    eaten: i64,
    burned: i64,
    balance: i64,
}

/// Export a month's day balances to a CSV file
///
/// One row per calendar day (`date,eaten,burned,balance`), headers first,
/// synced to disk before returning. Returns the number of rows written;
/// an invalid month index produces a header-only file and 0 rows.
pub fn month_to_csv(
    ctx: &EngineContext,
    year: i32,
    month0: u32,
    csv_path: &Path,
) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(csv_path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    // Header written explicitly so an empty month still yields a valid file
    writer.write_record(["date", "eaten", "burned", "balance"])?;

    let keys = month_day_keys(year, month0);
    for key in &keys {
        let day = compute_day_balance(ctx, key);
        writer.serialize(CsvRow {
            date: day.day_key.clone(),
            eaten: day.eaten,
            burned: day.burned,
            balance: day.burned - day.eaten,
        })?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} day rows to {:?}", keys.len(), csv_path);
    Ok(keys.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActivityMode, UserProfile};

    fn test_context() -> EngineContext {
        let mut ctx = EngineContext {
            profile: UserProfile {
                height_cm: Some(180.0),
                weight_kg: Some(75.0),
                age_years: Some(30),
            },
            ..EngineContext::default()
        };
        ctx.settings.set_mode(ActivityMode::Fixed);
        ctx.settings.set_fixed_pal(1.2).unwrap();
        ctx
    }

    #[test]
    fn test_export_writes_one_row_per_day() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("february.csv");

        let count = month_to_csv(&test_context(), 2024, 1, &csv_path).unwrap();
        assert_eq!(count, 29);

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers, &["date", "eaten", "burned", "balance"]);
        assert_eq!(reader.into_records().count(), 29);
    }

    #[test]
    fn test_export_overwrites_previous_report() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("report.csv");

        month_to_csv(&test_context(), 2024, 0, &csv_path).unwrap(); // 31 rows
        let count = month_to_csv(&test_context(), 2024, 1, &csv_path).unwrap();
        assert_eq!(count, 29);

        let reader = csv::Reader::from_path(&csv_path).unwrap();
        assert_eq!(reader.into_records().count(), 29);
    }

    #[test]
    fn test_export_invalid_month_is_header_only() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("empty.csv");

        let count = month_to_csv(&test_context(), 2024, 12, &csv_path).unwrap();
        assert_eq!(count, 0);

        let reader = csv::Reader::from_path(&csv_path).unwrap();
        assert_eq!(reader.into_records().count(), 0);
    }

    #[test]
    fn test_export_rows_carry_balance() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("balance.csv");

        month_to_csv(&test_context(), 2024, 1, &csv_path).unwrap();

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let first = reader.records().next().unwrap().unwrap();
        assert_eq!(&first[0], "2024-02-01");
        // round(1730 * 1.2) = 2076 burned, nothing eaten
        assert_eq!(&first[2], "2076");
        assert_eq!(&first[3], "2076");
    }
}
