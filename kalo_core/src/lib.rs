#![forbid(unsafe_code)]

//! Core domain model and business logic for the Kalo energy-balance system.
//!
//! This crate provides:
//! - Domain types (profile, food/steps/workout logs, balances, summaries)
//! - Energy models (BMR, step and workout expenditure)
//! - The expenditure resolver (activity modes with PAL carry-forward)
//! - Day, week and month aggregation with calendar-grid construction
//! - Persistence (JSONL logs, activity settings, CSV export)

pub mod types;
pub mod error;
pub mod calendar;
pub mod energy;
pub mod expenditure;
pub mod engine;
pub mod summary;
pub mod settings;
pub mod store;
pub mod export;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use calendar::{build_month_grid, truncate_day_key, week_start_key};
pub use energy::calculate_bmr;
pub use engine::{compute_day_balance, compute_day_breakdown};
pub use expenditure::resolve_pal;
pub use summary::{compute_month_summary, compute_week_summary, month_week_summaries};
pub use store::LogStore;
pub use export::month_to_csv;
pub use config::Config;
