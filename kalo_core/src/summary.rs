//! Period aggregator: weekly and monthly rollups of day balances.
//!
//! Totals apply the proxy substitution rule: a day with nothing eaten
//! logged contributes its burned figure to `total_eaten` instead of zero,
//! so un-logged days do not drag multi-week trends down as zero-calorie
//! days. The rule lives only in this module; per-day computation never
//! applies it. Every period re-derives its days from scratch, so there is
//! no cache to invalidate.

use crate::calendar::{build_month_grid, day_keys_of_week, week_start_key};
use crate::engine::compute_day_balance;
use crate::types::{EngineContext, MonthSummary, WeekSummary};

/// Add one day to running period totals under the proxy rule
fn accumulate(total_eaten: &mut i64, total_burned: &mut i64, eaten: i64, burned: i64) {
    *total_eaten += if eaten > 0 { eaten } else { burned };
    *total_burned += burned;
}

/// Aggregate the Monday-starting week containing the given day
///
/// The key is snapped to its week's Monday, so any day of the week
/// identifies the same summary. An unparsable key yields zero totals.
pub fn compute_week_summary(ctx: &EngineContext, day_key: &str) -> WeekSummary {
    let week_start = week_start_key(day_key).unwrap_or_else(|| day_key.to_string());

    let mut total_eaten = 0;
    let mut total_burned = 0;
    for key in day_keys_of_week(&week_start) {
        let day = compute_day_balance(ctx, &key);
        accumulate(&mut total_eaten, &mut total_burned, day.eaten, day.burned);
    }

    WeekSummary {
        week_start,
        total_eaten,
        total_burned,
    }
}

/// Aggregate one calendar month, day by day
///
/// Applies the proxy rule across the month's own date range only,
/// independent of which weeks spill into adjoining months. The day list
/// is derived from the calendar grid.
pub fn compute_month_summary(ctx: &EngineContext, year: i32, month0: u32) -> MonthSummary {
    let mut total_eaten = 0;
    let mut total_burned = 0;
    for key in grid_day_keys(year, month0) {
        let day = compute_day_balance(ctx, &key);
        accumulate(&mut total_eaten, &mut total_burned, day.eaten, day.burned);
    }

    MonthSummary {
        period_start: format!("{year:04}-{:02}-01", month0 + 1),
        total_eaten,
        total_burned,
    }
}

/// One week summary per calendar-grid row, for month views
///
/// Each row is summarized as the full Monday-to-Sunday week containing its
/// first day, so edge rows include days of adjoining months.
pub fn month_week_summaries(ctx: &EngineContext, year: i32, month0: u32) -> Vec<WeekSummary> {
    build_month_grid(year, month0)
        .iter()
        .filter_map(|row| {
            let first_day = row.iter().flatten().next()?;
            let key = format!("{year:04}-{:02}-{first_day:02}", month0 + 1);
            Some(compute_week_summary(ctx, &key))
        })
        .collect()
}

/// Day keys of a month as laid out by the calendar grid
fn grid_day_keys(year: i32, month0: u32) -> Vec<String> {
    build_month_grid(year, month0)
        .iter()
        .flatten()
        .flatten()
        .map(|day| format!("{year:04}-{:02}-{day:02}", month0 + 1))
        .collect()
}
