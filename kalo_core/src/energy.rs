//! Energy models: basal metabolic rate, steps and workout expenditure.
//!
//! All formulas are fixed approximations rather than personalized models;
//! unknown inputs resolve to zero-calorie sentinels instead of errors so
//! callers can render "no data" states without special-casing.

use crate::types::{UserProfile, WorkoutType};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Energy contributed by one step, in kcal (average body mass)
pub const KCAL_PER_STEP: f64 = 0.04;

/// Approximate energy equivalent of one kilogram of body mass, in kcal
pub const KCAL_PER_KG: f64 = 8000.0;

/// MET assigned to workout types with no table entry
const DEFAULT_MET: f64 = 3.5;

/// MET (metabolic equivalent) by workout type - built once and reused
static MET_BY_WORKOUT_TYPE: Lazy<HashMap<WorkoutType, f64>> = Lazy::new(|| {
    let mut table = HashMap::new();
    table.insert(WorkoutType::Strength, 3.5);
    table.insert(WorkoutType::Basketball, 6.5);
    table.insert(WorkoutType::Hockey, 8.0);
    table
});

/// MET value for a workout type, defaulting for unknown kinds
pub fn met_for_workout(workout_type: &WorkoutType) -> f64 {
    MET_BY_WORKOUT_TYPE
        .get(workout_type)
        .copied()
        .unwrap_or(DEFAULT_MET)
}

/// Basal metabolic rate via the Mifflin-St Jeor formula (neutral form)
///
/// `BMR = 10·weight + 6.25·height − 5·age + 5`, in kcal per day.
/// Returns `0.0` when any profile field is missing; callers must treat
/// zero as "unknown", not as a physiological value.
pub fn calculate_bmr(profile: &UserProfile) -> f64 {
    match (profile.weight_kg, profile.height_cm, profile.age_years) {
        (Some(weight), Some(height), Some(age)) => {
            10.0 * weight + 6.25 * height - 5.0 * f64::from(age) + 5.0
        }
        _ => 0.0,
    }
}

/// Calories for one workout session: `MET × weight (kg) × duration (h)`
///
/// A missing or non-positive weight contributes zero for every session.
pub fn session_calories(
    weight_kg: Option<f64>,
    duration_seconds: u32,
    workout_type: &WorkoutType,
) -> i64 {
    let Some(weight) = weight_kg.filter(|w| *w > 0.0) else {
        return 0;
    };
    let hours = f64::from(duration_seconds) / 3600.0;
    round_kcal(met_for_workout(workout_type) * weight * hours)
}

/// Round a calorie figure to the nearest whole kcal, clamped at zero
///
/// Half-up for the non-negative values this engine produces.
pub fn round_kcal(value: f64) -> i64 {
    value.max(0.0).round() as i64
}
