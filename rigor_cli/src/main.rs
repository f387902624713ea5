use clap::{Parser, Subcommand};
use rigor_core::achievements::badge_board;
use rigor_core::snapshot::{self, HabitHistory, ProgressSnapshot, SessionInput};
use rigor_core::streak::{longest_streak, perfect_days};
use rigor_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rigor")]
#[command(about = "Workout, habit and body-metric scoring engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate a one-rep max from a single set
    E1rm {
        /// Weight lifted (kg)
        #[arg(long)]
        weight: f64,

        /// Reps performed
        #[arg(long)]
        reps: u32,

        /// Exercise name, for strength classification
        #[arg(long, requires = "bodyweight")]
        exercise: Option<String>,

        /// Bodyweight (kg), for strength classification
        #[arg(long, requires = "exercise")]
        bodyweight: Option<f64>,
    },

    /// Score a logged session against its plan
    Score {
        /// Session JSON with `planned` and `sets`
        #[arg(long)]
        input: PathBuf,
    },

    /// Compute the current perfect-day streak
    Streak {
        /// Habit history JSON with `active_habits` and `completions`
        #[arg(long)]
        input: PathBuf,

        /// Day to count back from (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<CalendarDay>,
    },

    /// Show XP, level, rank, badges and milestones
    Progress {
        /// Snapshot JSON with `raw_stats` and `extra`
        #[arg(long)]
        input: PathBuf,
    },

    /// Smooth a body-metric series
    Trend {
        /// CSV with `date,value` rows
        #[arg(long)]
        input: PathBuf,

        /// Smoothing window in days (overrides config)
        #[arg(long)]
        window: Option<u32>,
    },
}

fn main() -> Result<()> {
    // Keep stdout clean for results; diagnostics go to stderr
    rigor_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let engine = Engine::with_config(config)?;
    tracing::debug!("Engine ready with {} badges", engine.catalogs().badges.len());

    match cli.command {
        Commands::E1rm {
            weight,
            reps,
            exercise,
            bodyweight,
        } => cmd_e1rm(&engine, weight, reps, exercise.as_deref(), bodyweight, cli.json),
        Commands::Score { input } => cmd_score(&engine, &input, cli.json),
        Commands::Streak { input, today } => cmd_streak(&engine, &input, today, cli.json),
        Commands::Progress { input } => cmd_progress(&engine, &input, cli.json),
        Commands::Trend { input, window } => cmd_trend(&engine, &input, window, cli.json),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_header(title: &str) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", title);
    println!("╰─────────────────────────────────────────╯");
    println!();
}

fn cmd_e1rm(
    engine: &Engine,
    weight: f64,
    reps: u32,
    exercise: Option<&str>,
    bodyweight: Option<f64>,
    json: bool,
) -> Result<()> {
    let report = engine.strength(weight, reps, exercise, bodyweight);
    if json {
        return print_json(&report);
    }

    print_header("ONE-REP MAX");
    println!("  {} kg x {} reps", weight, reps);
    println!("  → Estimated 1RM: {:.1} kg", report.estimate);

    match (exercise, &report.classification) {
        (Some(name), Some(c)) => {
            println!("  → {:.2}x bodyweight", c.ratio);
            match c.level {
                Some(level) => println!("  → {} level: {:?}", name, level),
                None => println!("  → {} level: below beginner", name),
            }
            if let Some(target) = report.next_target_kg {
                println!("  → Next level at {:.1} kg", target);
            }
        }
        (Some(name), None) => {
            println!("  ℹ No strength standard for '{}'", name);
        }
        _ => {}
    }
    println!();
    Ok(())
}

fn cmd_score(engine: &Engine, input: &Path, json: bool) -> Result<()> {
    let session: SessionInput = snapshot::load_json(input)?;
    let report = engine.score_session(&session.sets, &session.planned);

    for problem in &report.rejected {
        eprintln!("warning: {}", problem);
    }

    if json {
        return print_json(&report);
    }

    let result = &report.result;
    print_header("SESSION RIGOR");
    println!(
        "  Score: {}{}",
        result.score,
        if result.is_perfect() { "  ★ perfect" } else { "" }
    );
    println!();
    println!("  Exercises  {:>5.1} / 30", result.exercise_completion);
    println!("  Sets       {:>5.1} / 40", result.set_completion);
    println!("  Weight     {:>5.1} / 30", result.weight_adherence);
    println!("  Bonus      {:>5.1}", result.extra_bonus);
    println!();

    for detail in &result.details {
        println!(
            "  {:<24} {:>2}/{:<2} sets  {:?}",
            detail.name, detail.sets_done, detail.sets_target, detail.status
        );
    }
    println!();
    Ok(())
}

fn cmd_streak(
    engine: &Engine,
    input: &Path,
    today: Option<CalendarDay>,
    json: bool,
) -> Result<()> {
    let history: HabitHistory = snapshot::load_json(input)?;
    let today = today.unwrap_or_else(|| CalendarDay::today(engine.day_offset()));

    let current = engine.streak(&history.completions, history.active_habits, today);
    let longest = longest_streak(&history.completions, history.active_habits);
    let perfect = perfect_days(&history.completions, history.active_habits);

    if json {
        return print_json(&serde_json::json!({
            "today": today,
            "current_streak": current,
            "longest_streak": longest,
            "perfect_days": perfect,
        }));
    }

    print_header("HABIT STREAK");
    println!("  As of {}", today);
    println!("  → Current streak: {} days", current);
    println!("  → Longest streak: {} days", longest);
    println!("  → Perfect days:   {}", perfect);
    println!();
    Ok(())
}

fn cmd_progress(engine: &Engine, input: &Path, json: bool) -> Result<()> {
    let snapshot: ProgressSnapshot = snapshot::load_json(input)?;
    let report = engine.progress_report(&snapshot.raw_stats, &snapshot.extra)?;

    if json {
        return print_json(&report);
    }

    let state = &report.progression;
    print_header("PROGRESS");
    println!("  Level {} · {}", state.level, state.rank.name);
    println!(
        "  {} XP ({:.0}% to next level, {} XP to go)",
        state.total_xp, state.progress_pct, state.xp_to_next_level
    );
    println!();

    for entry in &state.breakdown {
        println!("  {:<22} {:>7} XP  (x{})", entry.source, entry.xp, entry.count);
    }

    let board = badge_board(
        &snapshot.raw_stats,
        &snapshot.extra,
        &engine.catalogs().badges,
    );
    let unlocked: Vec<_> = board.iter().filter(|status| status.unlocked).collect();
    println!();
    println!("  Badges: {} / {}", unlocked.len(), board.len());
    for status in unlocked {
        println!("  ✓ {} ({:?})", status.badge.name, status.badge.tier);
    }

    if !report.milestones.is_empty() {
        println!();
        println!("  Milestones: {}", report.milestones.join(", "));
    }
    println!();
    Ok(())
}

fn cmd_trend(engine: &Engine, input: &Path, window: Option<u32>, json: bool) -> Result<()> {
    let points = snapshot::load_metric_series(input)?;
    let window = window.unwrap_or(engine.config().trend.window);
    let smoother = TrendSmoother::from_window(window);

    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    let smoothed = smoother.smooth(&values);

    if json {
        let rows: Vec<_> = points
            .iter()
            .zip(&smoothed)
            .map(|(point, trend)| {
                serde_json::json!({
                    "date": point.date,
                    "value": point.value,
                    "trend": trend,
                })
            })
            .collect();
        return print_json(&rows);
    }

    print_header("TREND");
    if points.is_empty() {
        println!("  No data points found.");
    }
    for (point, trend) in points.iter().zip(&smoothed) {
        println!("  {}  {:>7.1}  → {:>7.2}", point.date, point.value, trend);
    }
    println!();
    Ok(())
}
