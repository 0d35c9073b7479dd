//! Calendar arithmetic over canonical day keys.
//!
//! A day key is the `YYYY-MM-DD` form of a calendar day. All engine inputs
//! carry timestamps or keys in this form; anything longer (an ISO timestamp)
//! is truncated to its first 10 characters. Weeks start on Monday.

use chrono::{Datelike, NaiveDate};

/// Truncate a timestamp or day key to the canonical `YYYY-MM-DD` form
pub fn truncate_day_key(raw: &str) -> &str {
    raw.get(..10).unwrap_or(raw)
}

/// Parse a day key into a calendar date
///
/// Accepts full ISO timestamps too, since the key is truncated first.
pub fn parse_day_key(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(truncate_day_key(raw), "%Y-%m-%d").ok()
}

/// Format a calendar date as a day key
pub fn format_day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Day key of the immediately preceding calendar day
///
/// Crosses month and year boundaries; None when the key does not parse.
pub fn previous_day_key(day_key: &str) -> Option<String> {
    parse_day_key(day_key)?.pred_opt().map(format_day_key)
}

/// Day key of the Monday starting the week that contains the given day
pub fn week_start_key(day_key: &str) -> Option<String> {
    let date = parse_day_key(day_key)?;
    let monday = date - chrono::Days::new(u64::from(date.weekday().num_days_from_monday()));
    Some(format_day_key(monday))
}

/// The seven Monday-first day keys of the week starting at `week_start`
///
/// Empty when the key does not parse.
pub fn day_keys_of_week(week_start: &str) -> Vec<String> {
    let Some(start) = parse_day_key(week_start) else {
        return Vec::new();
    };
    (0..7)
        .map(|i| format_day_key(start + chrono::Days::new(i)))
        .collect()
}

/// Number of days in a month, by year and zero-based month index
///
/// Returns 0 for an invalid month index.
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month0 + 1, 1) else {
        return 0;
    };
    let next_first = if month0 >= 11 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month0 + 2, 1)
    };
    match next_first {
        Some(next) => (next - first).num_days() as u32,
        None => 0,
    }
}

/// Every day key of a month, in order
pub fn month_day_keys(year: i32, month0: u32) -> Vec<String> {
    (1..=days_in_month(year, month0))
        .map(|day| format!("{year:04}-{:02}-{day:02}", month0 + 1))
        .collect()
}

/// Build the calendar grid for a month: rows of 7 columns, Monday first
///
/// The first row is left-padded and the last right-padded with `None`.
/// Deterministic; an invalid month index yields an empty grid.
pub fn build_month_grid(year: i32, month0: u32) -> Vec<Vec<Option<u32>>> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month0 + 1, 1) else {
        return Vec::new();
    };
    let offset = first.weekday().num_days_from_monday();
    let days = days_in_month(year, month0);
    let rows = (offset + days + 6) / 7;

    let mut grid = Vec::with_capacity(rows as usize);
    let mut day = 1u32;
    for row_idx in 0..rows {
        let mut row = Vec::with_capacity(7);
        for col in 0..7 {
            let cell_idx = row_idx * 7 + col;
            if cell_idx < offset || day > days {
                row.push(None);
            } else {
                row.push(Some(day));
                day += 1;
            }
        }
        grid.push(row);
    }
    grid
}
