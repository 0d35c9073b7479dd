//! Core domain types for the Kalo energy-balance system.
//!
//! This module defines the fundamental types used throughout the system:
//! - User profile and logged data (food, steps, workout sessions)
//! - Activity accounting settings (mode and PAL factors)
//! - Derived balances and period summaries
//! - The engine context bundling all read-only inputs

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Profile and Log Types
// ============================================================================

/// User body measurements used for energy calculations
///
/// Every field is optional; BMR is only defined when all three are present.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct UserProfile {
    #[serde(alias = "heightCm")]
    pub height_cm: Option<f64>,
    #[serde(alias = "weightKg")]
    pub weight_kg: Option<f64>,
    #[serde(alias = "ageYears")]
    pub age_years: Option<u32>,
}

impl UserProfile {
    /// True when height, weight and age are all known
    pub fn is_complete(&self) -> bool {
        self.height_cm.is_some() && self.weight_kg.is_some() && self.age_years.is_some()
    }
}

/// One logged dish, appended to the food diary
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FoodLogEntry {
    pub id: Uuid,
    #[serde(default, alias = "dishId")]
    pub dish_id: Option<Uuid>,
    #[serde(alias = "dishName")]
    pub dish_name: String,
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fats: f64,
    #[serde(default)]
    pub carbs: f64,
    /// ISO timestamp or plain day key; truncated to `YYYY-MM-DD` on use
    pub date: String,
}

/// Step count for one calendar day
///
/// At most one logical entry per day key: when several entries carry the
/// same key, the one appended last wins at aggregation time.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepsEntry {
    pub date: String,
    pub steps: u32,
}

/// Kind of workout, mapped to a MET intensity value
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    Strength,
    Basketball,
    Hockey,
    /// Unrecognized wire values land here and get the default MET
    #[serde(other)]
    Other,
}

impl FromStr for WorkoutType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "strength" => Ok(WorkoutType::Strength),
            "basketball" => Ok(WorkoutType::Basketball),
            "hockey" => Ok(WorkoutType::Hockey),
            other => Err(Error::Other(format!("unknown workout type: {other}"))),
        }
    }
}

/// A recorded workout session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: Uuid,
    #[serde(default, alias = "workoutName")]
    pub workout_name: Option<String>,
    #[serde(alias = "workoutType")]
    pub workout_type: WorkoutType,
    pub date: String,
    #[serde(alias = "durationSeconds")]
    pub duration_seconds: u32,
}

// ============================================================================
// Activity Settings
// ============================================================================

/// How daily expenditure is accounted
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityMode {
    /// One stored PAL factor applied to every day
    Fixed,
    /// A per-day PAL factor log with previous-day carry-forward
    Daily,
    /// Additive model: BMR + steps + workout sessions
    StepsWorkouts,
}

impl FromStr for ActivityMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fixed" => Ok(ActivityMode::Fixed),
            "daily" => Ok(ActivityMode::Daily),
            "steps_workouts" | "steps-workouts" => Ok(ActivityMode::StepsWorkouts),
            other => Err(Error::Other(format!("unknown activity mode: {other}"))),
        }
    }
}

/// Lowest accepted PAL factor
pub const PAL_MIN: f64 = 1.0;
/// Highest accepted PAL factor
pub const PAL_MAX: f64 = 2.5;

/// Activity accounting settings: the chosen mode plus its factor state
///
/// Fields are private so every stored factor has passed the `[PAL_MIN,
/// PAL_MAX]` boundary check; out-of-range input is rejected, not clamped.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct ActivitySettings {
    mode: Option<ActivityMode>,
    fixed_pal: Option<f64>,
    #[serde(default)]
    daily_pal: BTreeMap<String, f64>,
}

impl ActivitySettings {
    /// Currently selected mode, if any was ever chosen
    pub fn mode(&self) -> Option<ActivityMode> {
        self.mode
    }

    /// Select the accounting mode
    ///
    /// There is no versioned history: switching modes recolors the computed
    /// burn of all past days.
    pub fn set_mode(&mut self, mode: ActivityMode) {
        self.mode = Some(mode);
    }

    /// Stored fixed-mode factor, if set
    pub fn fixed_pal(&self) -> Option<f64> {
        self.fixed_pal
    }

    /// Store the fixed-mode factor, rejecting out-of-range values
    pub fn set_fixed_pal(&mut self, pal: f64) -> Result<()> {
        validate_pal(pal)?;
        self.fixed_pal = Some(pal);
        Ok(())
    }

    /// Factor explicitly logged for the given day key, if any
    pub fn daily_pal(&self, day_key: &str) -> Option<f64> {
        self.daily_pal.get(day_key).copied()
    }

    /// Store the daily-mode factor for a day key, rejecting out-of-range values
    pub fn set_daily_pal(&mut self, day_key: &str, pal: f64) -> Result<()> {
        validate_pal(pal)?;
        self.daily_pal.insert(day_key.to_string(), pal);
        Ok(())
    }
}

fn validate_pal(pal: f64) -> Result<()> {
    if !(PAL_MIN..=PAL_MAX).contains(&pal) {
        return Err(Error::Settings(format!(
            "PAL factor {pal} outside accepted range {PAL_MIN}-{PAL_MAX}"
        )));
    }
    Ok(())
}

// ============================================================================
// Derived Balance Types
// ============================================================================

/// Eaten/burned figures for one calendar day
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct DayBalance {
    pub day_key: String,
    pub eaten: i64,
    pub burned: i64,
}

impl DayBalance {
    /// More burned than eaten
    pub fn is_deficit(&self) -> bool {
        self.burned > self.eaten
    }

    /// More eaten than burned
    pub fn is_surplus(&self) -> bool {
        self.eaten > self.burned
    }
}

/// Calories attributed to one workout session
#[derive(Clone, Debug, Serialize)]
pub struct SessionEnergy {
    pub workout_name: Option<String>,
    pub workout_type: WorkoutType,
    pub duration_seconds: u32,
    pub calories: i64,
}

/// Per-component expenditure view of a single day, for presentation
#[derive(Clone, Debug, Serialize)]
pub struct DayBreakdown {
    pub day_key: String,
    pub bmr: i64,
    pub steps: u32,
    pub steps_calories: i64,
    pub sessions: Vec<SessionEnergy>,
    /// Resolved PAL factor, when the active mode provides one
    pub pal: Option<f64>,
    pub eaten: i64,
    pub burned: i64,
}

/// Aggregated figures for a Monday-starting week
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct WeekSummary {
    pub week_start: String,
    /// Proxy rule applied: a day with nothing eaten contributes its burn
    pub total_eaten: i64,
    pub total_burned: i64,
}

/// Aggregated figures for one calendar month
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct MonthSummary {
    pub period_start: String,
    pub total_eaten: i64,
    pub total_burned: i64,
}

impl WeekSummary {
    /// Burned minus eaten; positive is a deficit, negative a surplus
    pub fn balance(&self) -> i64 {
        self.total_burned - self.total_eaten
    }

    /// Approximate body-mass equivalent of the balance, in kilograms
    pub fn kg_equivalent(&self) -> f64 {
        self.balance().unsigned_abs() as f64 / crate::energy::KCAL_PER_KG
    }
}

impl MonthSummary {
    /// Burned minus eaten; positive is a deficit, negative a surplus
    pub fn balance(&self) -> i64 {
        self.total_burned - self.total_eaten
    }

    /// Approximate body-mass equivalent of the balance, in kilograms
    pub fn kg_equivalent(&self) -> f64 {
        self.balance().unsigned_abs() as f64 / crate::energy::KCAL_PER_KG
    }
}

// ============================================================================
// Engine Context
// ============================================================================

/// Read-only inputs for the balance engine
///
/// Everything the engine computes is a pure function of this snapshot; the
/// engine never reads the clock or touches storage itself.
#[derive(Clone, Debug, Default)]
pub struct EngineContext {
    pub profile: UserProfile,
    pub food_log: Vec<FoodLogEntry>,
    pub steps_log: Vec<StepsEntry>,
    pub sessions: Vec<WorkoutSession>,
    pub settings: ActivitySettings,
    /// Days strictly before this key contribute zero burn
    pub registration_day: Option<String>,
    /// Days strictly after this key contribute zero burn (caller's "today")
    pub as_of_day: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_completeness() {
        let mut profile = UserProfile::default();
        assert!(!profile.is_complete());

        profile.height_cm = Some(180.0);
        profile.weight_kg = Some(75.0);
        assert!(!profile.is_complete());

        profile.age_years = Some(30);
        assert!(profile.is_complete());
    }

    #[test]
    fn test_set_fixed_pal_rejects_out_of_range() {
        let mut settings = ActivitySettings::default();

        assert!(settings.set_fixed_pal(0.9).is_err());
        assert!(settings.set_fixed_pal(2.6).is_err());
        assert_eq!(settings.fixed_pal(), None);

        settings.set_fixed_pal(1.0).unwrap();
        assert_eq!(settings.fixed_pal(), Some(1.0));
        settings.set_fixed_pal(2.5).unwrap();
        assert_eq!(settings.fixed_pal(), Some(2.5));
    }

    #[test]
    fn test_set_daily_pal_rejects_out_of_range() {
        let mut settings = ActivitySettings::default();

        assert!(settings.set_daily_pal("2024-03-01", 3.0).is_err());
        assert_eq!(settings.daily_pal("2024-03-01"), None);

        settings.set_daily_pal("2024-03-01", 1.4).unwrap();
        assert_eq!(settings.daily_pal("2024-03-01"), Some(1.4));
    }

    #[test]
    fn test_workout_type_unknown_on_wire() {
        let parsed: WorkoutType = serde_json::from_str("\"crossfit\"").unwrap();
        assert_eq!(parsed, WorkoutType::Other);

        let parsed: WorkoutType = serde_json::from_str("\"hockey\"").unwrap();
        assert_eq!(parsed, WorkoutType::Hockey);
    }

    #[test]
    fn test_activity_mode_from_str() {
        assert_eq!(
            "steps_workouts".parse::<ActivityMode>().unwrap(),
            ActivityMode::StepsWorkouts
        );
        assert!("sedentary".parse::<ActivityMode>().is_err());
    }

    #[test]
    fn test_day_balance_deficit_and_surplus() {
        let day = DayBalance {
            day_key: "2024-03-01".into(),
            eaten: 1800,
            burned: 2200,
        };
        assert!(day.is_deficit());
        assert!(!day.is_surplus());

        let day = DayBalance {
            day_key: "2024-03-02".into(),
            eaten: 2500,
            burned: 2200,
        };
        assert!(day.is_surplus());
    }
}
