//! Expenditure resolver: picks the accounting strategy for one day.
//!
//! The active [`ActivityMode`] decides how a day's burned calories are
//! derived:
//! - `fixed`: one stored PAL factor times BMR
//! - `daily`: a per-day factor log with a one-day carry-forward fallback
//! - `steps_workouts`: BMR plus step and workout-session energy
//!
//! Before any mode is chosen there is no burn data at all. The mode-to-date
//! binding is not versioned: resolving a historical day always uses the
//! settings as they are now, so switching modes recolors all past days.

use crate::calendar::{previous_day_key, truncate_day_key};
use crate::energy::{round_kcal, session_calories, KCAL_PER_STEP};
use crate::types::{ActivityMode, ActivitySettings, EngineContext, StepsEntry, WorkoutSession};

/// Resolve the PAL factor applicable to a day, if the active mode has one
///
/// - `fixed`: the stored factor
/// - `daily`: the day's logged factor, else the immediately preceding
///   day's factor, else none (one-day fallback only)
/// - `steps_workouts` or unset: none
pub fn resolve_pal(settings: &ActivitySettings, day_key: &str) -> Option<f64> {
    match settings.mode()? {
        ActivityMode::Fixed => settings.fixed_pal(),
        ActivityMode::Daily => settings.daily_pal(day_key).or_else(|| {
            let yesterday = previous_day_key(day_key)?;
            settings.daily_pal(&yesterday)
        }),
        ActivityMode::StepsWorkouts => None,
    }
}

/// Step count logged for a day; the entry appended last wins
pub fn steps_for_day(steps_log: &[StepsEntry], day_key: &str) -> u32 {
    steps_log
        .iter()
        .filter(|entry| truncate_day_key(&entry.date) == day_key)
        .next_back()
        .map(|entry| entry.steps)
        .unwrap_or(0)
}

/// Total workout-session calories for a day
pub fn workout_calories_for_day(
    sessions: &[WorkoutSession],
    weight_kg: Option<f64>,
    day_key: &str,
) -> i64 {
    sessions
        .iter()
        .filter(|session| truncate_day_key(&session.date) == day_key)
        .map(|session| session_calories(weight_kg, session.duration_seconds, &session.workout_type))
        .sum()
}

/// Calories expended on a day under the active accounting mode
///
/// PAL modes with no resolvable factor fall through to 0, never to BMR
/// alone; an unset mode yields 0 for every day.
pub fn burned_for_day(ctx: &EngineContext, bmr: f64, day_key: &str) -> i64 {
    let Some(mode) = ctx.settings.mode() else {
        tracing::debug!("No activity mode set, no burn data for {day_key}");
        return 0;
    };

    match mode {
        ActivityMode::Fixed | ActivityMode::Daily => match resolve_pal(&ctx.settings, day_key) {
            Some(pal) => round_kcal(bmr * pal),
            None => {
                tracing::debug!("No PAL factor resolvable for {day_key} in {mode:?} mode");
                0
            }
        },
        ActivityMode::StepsWorkouts => {
            let steps = steps_for_day(&ctx.steps_log, day_key);
            let workouts = workout_calories_for_day(&ctx.sessions, ctx.profile.weight_kg, day_key);
            round_kcal(bmr + f64::from(steps) * KCAL_PER_STEP + workouts as f64)
        }
    }
}
