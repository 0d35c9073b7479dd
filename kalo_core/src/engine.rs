//! Day aggregator: one day's eaten/burned figures from the raw logs.
//!
//! Combines the food diary, step log, workout sessions and the expenditure
//! resolver into a [`DayBalance`]. Two gates force a day's burn to zero:
//! days before the account's registration date (no retroactive credit for
//! days the account did not exist) and days after the caller's `as_of_day`
//! snapshot, when one is supplied.

use crate::calendar::truncate_day_key;
use crate::energy::{calculate_bmr, round_kcal, session_calories, KCAL_PER_STEP};
use crate::expenditure::{burned_for_day, resolve_pal, steps_for_day, workout_calories_for_day};
use crate::types::{DayBalance, DayBreakdown, EngineContext, FoodLogEntry, SessionEnergy};

/// Sum of calories eaten on a day, rounded to whole kcal
fn eaten_for_day(food_log: &[FoodLogEntry], day_key: &str) -> i64 {
    let total: f64 = food_log
        .iter()
        .filter(|entry| truncate_day_key(&entry.date) == day_key)
        .map(|entry| entry.calories)
        .sum();
    round_kcal(total)
}

/// True when the registration/as-of gates force the day's burn to zero
fn burn_gated_off(ctx: &EngineContext, day_key: &str) -> bool {
    if let Some(registration) = ctx.registration_day.as_deref() {
        if day_key < registration {
            tracing::debug!("{day_key} precedes registration {registration}, zero burn");
            return true;
        }
    }
    if let Some(as_of) = ctx.as_of_day.as_deref() {
        if day_key > as_of {
            tracing::debug!("{day_key} is after the as-of day {as_of}, zero burn");
            return true;
        }
    }
    false
}

/// Compute the eaten/burned balance for one calendar day
///
/// Pure function of the context snapshot; any timestamp in the input key
/// is truncated to its day-key form first.
pub fn compute_day_balance(ctx: &EngineContext, day_key: &str) -> DayBalance {
    let day_key = truncate_day_key(day_key);
    let eaten = eaten_for_day(&ctx.food_log, day_key);

    let burned = if burn_gated_off(ctx, day_key) {
        0
    } else {
        burned_for_day(ctx, calculate_bmr(&ctx.profile), day_key)
    };

    DayBalance {
        day_key: day_key.to_string(),
        eaten,
        burned,
    }
}

/// Compute the per-component expenditure view of one day
///
/// The component rows (BMR, steps, each session) are reported as the
/// additive model sees them even when a PAL mode is active, so callers can
/// show what the day consisted of; `burned` is the authoritative figure
/// from [`compute_day_balance`].
pub fn compute_day_breakdown(ctx: &EngineContext, day_key: &str) -> DayBreakdown {
    let day_key = truncate_day_key(day_key);
    let balance = compute_day_balance(ctx, day_key);

    let bmr = calculate_bmr(&ctx.profile);
    let steps = steps_for_day(&ctx.steps_log, day_key);
    let sessions = ctx
        .sessions
        .iter()
        .filter(|session| truncate_day_key(&session.date) == day_key)
        .map(|session| SessionEnergy {
            workout_name: session.workout_name.clone(),
            workout_type: session.workout_type.clone(),
            duration_seconds: session.duration_seconds,
            calories: session_calories(
                ctx.profile.weight_kg,
                session.duration_seconds,
                &session.workout_type,
            ),
        })
        .collect();

    DayBreakdown {
        day_key: day_key.to_string(),
        bmr: round_kcal(bmr),
        steps,
        steps_calories: round_kcal(f64::from(steps) * KCAL_PER_STEP),
        sessions,
        pal: resolve_pal(&ctx.settings, day_key),
        eaten: balance.eaten,
        burned: balance.burned,
    }
}
