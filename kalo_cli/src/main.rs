use chrono::Datelike;
use clap::{Parser, Subcommand};
use kalo_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "kalo")]
#[command(about = "Calorie balance accounting with calendar reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one day's balance and expenditure breakdown (default)
    Day {
        /// Day key (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Show the summary of the week containing a date
    Week {
        /// Any day of the week (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Show the month calendar with weekly and monthly totals
    Month {
        #[arg(long)]
        year: Option<i32>,

        /// Month number 1-12
        #[arg(long)]
        month: Option<u32>,
    },

    /// Log a dish to the food diary
    Food {
        name: String,
        calories: f64,

        #[arg(long, default_value_t = 0.0)]
        protein: f64,

        #[arg(long, default_value_t = 0.0)]
        fats: f64,

        #[arg(long, default_value_t = 0.0)]
        carbs: f64,

        /// Day key, defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Record the step count for a day (replaces any earlier count)
    Steps {
        steps: u32,

        /// Day key, defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Record a workout session
    Workout {
        /// Workout type (strength, basketball, hockey)
        workout_type: String,
        duration_minutes: u32,

        #[arg(long)]
        name: Option<String>,

        /// Day key, defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Choose the activity accounting mode
    Mode {
        /// fixed, daily or steps_workouts
        mode: String,
    },

    /// Store a PAL factor: fixed-mode without --date, per-day with it
    Pal {
        factor: f64,

        /// Day key for a daily-mode factor
        #[arg(long)]
        date: Option<String>,
    },

    /// Show or update the body profile
    Profile {
        #[arg(long)]
        height_cm: Option<f64>,

        #[arg(long)]
        weight_kg: Option<f64>,

        #[arg(long)]
        age_years: Option<u32>,
    },

    /// Export a month's day balances to CSV
    Export {
        #[arg(long)]
        year: Option<i32>,

        /// Month number 1-12
        #[arg(long)]
        month: Option<u32>,

        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    kalo_core::logging::init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(Config::default_config_path);
    let config = if config_path.exists() {
        Config::load_from(&config_path)?
    } else {
        Config::default()
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Some(Commands::Day { date }) => cmd_day(&data_dir, &config, date),
        Some(Commands::Week { date }) => cmd_week(&data_dir, &config, date),
        Some(Commands::Month { year, month }) => cmd_month(&data_dir, &config, year, month),
        Some(Commands::Food {
            name,
            calories,
            protein,
            fats,
            carbs,
            date,
        }) => cmd_food(&data_dir, &config, name, calories, protein, fats, carbs, date),
        Some(Commands::Steps { steps, date }) => cmd_steps(&data_dir, &config, steps, date),
        Some(Commands::Workout {
            workout_type,
            duration_minutes,
            name,
            date,
        }) => cmd_workout(&data_dir, &config, workout_type, duration_minutes, name, date),
        Some(Commands::Mode { mode }) => cmd_mode(&data_dir, mode),
        Some(Commands::Pal { factor, date }) => cmd_pal(&data_dir, factor, date),
        Some(Commands::Profile {
            height_cm,
            weight_kg,
            age_years,
        }) => cmd_profile(&config_path, config, height_cm, weight_kg, age_years),
        Some(Commands::Export {
            year,
            month,
            output,
        }) => cmd_export(&data_dir, &config, year, month, output),
        None => {
            // Default to today's day view
            cmd_day(&data_dir, &config, None)
        }
    }
}

/// Today's canonical day key in local time
fn today_key() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join("activity_settings.json")
}

/// Load a full engine input snapshot from disk
///
/// The clock is read here, once, and threaded in as the as-of day; the
/// engine itself stays a pure function of the snapshot.
fn load_context(data_dir: &Path, config: &Config) -> Result<EngineContext> {
    let store = LogStore::new(data_dir);
    let settings = ActivitySettings::load(&settings_path(data_dir))?;

    Ok(EngineContext {
        profile: config.profile.clone(),
        food_log: store.read_food_log()?,
        steps_log: store.read_steps_log()?,
        sessions: store.read_sessions()?,
        settings,
        registration_day: config.registration_day.clone(),
        as_of_day: Some(today_key()),
    })
}

fn print_balance_line(eaten: i64, burned: i64) {
    if burned > eaten {
        println!("Deficit: {} kcal", burned - eaten);
    } else if eaten > burned {
        println!("Surplus: {} kcal", eaten - burned);
    } else {
        println!("Balanced");
    }
}

fn cmd_day(data_dir: &Path, config: &Config, date: Option<String>) -> Result<()> {
    let ctx = load_context(data_dir, config)?;
    let day_key = date.unwrap_or_else(today_key);
    let breakdown = compute_day_breakdown(&ctx, &day_key);

    println!("{}", breakdown.day_key);
    println!("Eaten:  {} kcal", breakdown.eaten);
    println!("Burned: {} kcal", breakdown.burned);
    println!("  BMR: {} kcal", breakdown.bmr);
    println!(
        "  Steps ({}): {} kcal",
        breakdown.steps, breakdown.steps_calories
    );
    for session in &breakdown.sessions {
        println!(
            "  {} ({} min): {} kcal",
            session.workout_name.as_deref().unwrap_or("Workout"),
            session.duration_seconds / 60,
            session.calories
        );
    }
    if let Some(pal) = breakdown.pal {
        println!("  PAL factor: {pal}");
    }
    print_balance_line(breakdown.eaten, breakdown.burned);

    if !config.profile.is_complete() {
        println!("(profile incomplete: set height, weight and age to compute expenditure)");
    }
    Ok(())
}

fn cmd_week(data_dir: &Path, config: &Config, date: Option<String>) -> Result<()> {
    let ctx = load_context(data_dir, config)?;
    let day_key = date.unwrap_or_else(today_key);
    let week = compute_week_summary(&ctx, &day_key);

    println!("Week of {}", week.week_start);
    println!("Eaten:  {} kcal", week.total_eaten);
    println!("Burned: {} kcal", week.total_burned);
    print_balance_line(week.total_eaten, week.total_burned);
    Ok(())
}

fn cmd_month(
    data_dir: &Path,
    config: &Config,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<()> {
    let ctx = load_context(data_dir, config)?;
    let (year, month0) = resolve_month(year, month)?;

    println!("{:04}-{:02}", year, month0 + 1);
    println!(" Mon  Tue  Wed  Thu  Fri  Sat  Sun");
    for row in build_month_grid(year, month0) {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| match cell {
                Some(day) => format!("{day:>4}"),
                None => "    ".to_string(),
            })
            .collect();
        println!("{}", cells.join(" "));
    }

    println!();
    for week in month_week_summaries(&ctx, year, month0) {
        println!(
            "Week of {}: {} kcal eaten, {} kcal burned",
            week.week_start, week.total_eaten, week.total_burned
        );
    }

    let month_summary = compute_month_summary(&ctx, year, month0);
    println!();
    println!(
        "Month total: {} kcal eaten, {} kcal burned",
        month_summary.total_eaten, month_summary.total_burned
    );
    let balance = month_summary.balance();
    if balance > 0 {
        println!(
            "Deficit: {} kcal ({:.2} kg)",
            balance,
            month_summary.kg_equivalent()
        );
    } else if balance < 0 {
        println!(
            "Surplus: {} kcal ({:.2} kg)",
            -balance,
            month_summary.kg_equivalent()
        );
    } else {
        println!("Balanced");
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_food(
    data_dir: &Path,
    config: &Config,
    name: String,
    calories: f64,
    protein: f64,
    fats: f64,
    carbs: f64,
    date: Option<String>,
) -> Result<()> {
    let day_key = date.unwrap_or_else(today_key);
    let entry = FoodLogEntry {
        id: uuid::Uuid::new_v4(),
        dish_id: None,
        dish_name: name,
        calories,
        protein,
        fats,
        carbs,
        date: day_key.clone(),
    };

    let store = LogStore::new(data_dir);
    store.append_food(&entry)?;
    println!(
        "Logged {} ({} kcal) for {}",
        entry.dish_name, entry.calories, day_key
    );

    let ctx = load_context(data_dir, config)?;
    let day = compute_day_balance(&ctx, &day_key);
    println!("Day total: {} kcal eaten, {} kcal burned", day.eaten, day.burned);
    Ok(())
}

fn cmd_steps(data_dir: &Path, config: &Config, steps: u32, date: Option<String>) -> Result<()> {
    let day_key = date.unwrap_or_else(today_key);
    let store = LogStore::new(data_dir);
    store.append_steps(&StepsEntry {
        date: day_key.clone(),
        steps,
    })?;
    println!("Recorded {steps} steps for {day_key}");

    let ctx = load_context(data_dir, config)?;
    let day = compute_day_balance(&ctx, &day_key);
    println!("Day total: {} kcal eaten, {} kcal burned", day.eaten, day.burned);
    Ok(())
}

fn cmd_workout(
    data_dir: &Path,
    config: &Config,
    workout_type: String,
    duration_minutes: u32,
    name: Option<String>,
    date: Option<String>,
) -> Result<()> {
    let workout_type: WorkoutType = workout_type.parse()?;
    let day_key = date.unwrap_or_else(today_key);
    let session = WorkoutSession {
        id: uuid::Uuid::new_v4(),
        workout_name: name,
        workout_type,
        date: day_key.clone(),
        duration_seconds: duration_minutes * 60,
    };

    let store = LogStore::new(data_dir);
    store.append_session(&session)?;
    println!(
        "Recorded {} min {:?} session for {}",
        duration_minutes, session.workout_type, day_key
    );

    let ctx = load_context(data_dir, config)?;
    let day = compute_day_balance(&ctx, &day_key);
    println!("Day total: {} kcal eaten, {} kcal burned", day.eaten, day.burned);
    Ok(())
}

fn cmd_mode(data_dir: &Path, mode: String) -> Result<()> {
    let mode: ActivityMode = mode.parse()?;
    ActivitySettings::update(&settings_path(data_dir), |settings| {
        settings.set_mode(mode);
        Ok(())
    })?;
    println!("Activity mode set to {mode:?}");
    Ok(())
}

fn cmd_pal(data_dir: &Path, factor: f64, date: Option<String>) -> Result<()> {
    ActivitySettings::update(&settings_path(data_dir), |settings| match &date {
        Some(day_key) => settings.set_daily_pal(day_key, factor),
        None => settings.set_fixed_pal(factor),
    })?;
    match date {
        Some(day_key) => println!("PAL factor {factor} stored for {day_key}"),
        None => println!("Fixed PAL factor set to {factor}"),
    }
    Ok(())
}

fn cmd_profile(
    config_path: &Path,
    mut config: Config,
    height_cm: Option<f64>,
    weight_kg: Option<f64>,
    age_years: Option<u32>,
) -> Result<()> {
    if height_cm.is_none() && weight_kg.is_none() && age_years.is_none() {
        // Show-only mode
        let profile = &config.profile;
        println!("Height: {}", format_opt(profile.height_cm, "cm"));
        println!("Weight: {}", format_opt(profile.weight_kg, "kg"));
        println!(
            "Age:    {}",
            profile
                .age_years
                .map(|a| format!("{a} years"))
                .unwrap_or_else(|| "not set".into())
        );
        let bmr = calculate_bmr(profile);
        if bmr > 0.0 {
            println!("BMR:    {} kcal/day", bmr.round() as i64);
        } else {
            println!("BMR:    unknown (profile incomplete)");
        }
        return Ok(());
    }

    let mut profile = config.profile.clone();
    if height_cm.is_some() {
        profile.height_cm = height_cm;
    }
    if weight_kg.is_some() {
        profile.weight_kg = weight_kg;
    }
    if age_years.is_some() {
        profile.age_years = age_years;
    }

    config.set_profile(profile)?;
    if config.registration_day.is_none() {
        // First profile save marks the account's registration day
        config.registration_day = Some(today_key());
    }
    config.save_to(config_path)?;
    println!("Profile updated");
    Ok(())
}

fn cmd_export(
    data_dir: &Path,
    config: &Config,
    year: Option<i32>,
    month: Option<u32>,
    output: Option<PathBuf>,
) -> Result<()> {
    let ctx = load_context(data_dir, config)?;
    let (year, month0) = resolve_month(year, month)?;
    let output = output
        .unwrap_or_else(|| data_dir.join(format!("kalo_{:04}_{:02}.csv", year, month0 + 1)));

    let rows = month_to_csv(&ctx, year, month0, &output)?;
    println!("Wrote {rows} day rows to {}", output.display());
    Ok(())
}

/// Resolve CLI year/month (1-based) defaults to the engine's zero-based index
fn resolve_month(year: Option<i32>, month: Option<u32>) -> Result<(i32, u32)> {
    let now = chrono::Local::now();
    let year = year.unwrap_or_else(|| now.year());
    let month = month.unwrap_or_else(|| now.month());
    if !(1..=12).contains(&month) {
        return Err(Error::Other(format!("month {month} outside 1-12")));
    }
    Ok((year, month - 1))
}

fn format_opt(value: Option<f64>, unit: &str) -> String {
    value
        .map(|v| format!("{v} {unit}"))
        .unwrap_or_else(|| "not set".into())
}
