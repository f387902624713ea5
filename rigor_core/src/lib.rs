#![forbid(unsafe_code)]

//! Core scoring engine for the Rigor training tracker.
//!
//! This crate provides:
//! - Domain types (logged sets, plans, stats snapshots, catalogs)
//! - Session adherence scoring
//! - One-rep-max estimation and strength classification
//! - Habit streaks and body-metric trend smoothing
//! - XP, levels, ranks, badges and milestones
//!
//! Every scoring function is a pure function of its inputs and the injected
//! catalogs/configuration.

pub mod types;
pub mod error;
pub mod calendar;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod strength;
pub mod trend;
pub mod adherence;
pub mod streak;
pub mod achievements;
pub mod progression;
pub mod snapshot;
pub mod engine;

// Re-export commonly used types
pub use error::{Error, Result, ValidationError};
pub use types::*;
pub use calendar::CalendarDay;
pub use catalog::{build_default_catalogs, get_default_catalogs};
pub use config::Config;
pub use strength::{classify_strength, estimate_one_rep_max};
pub use trend::TrendSmoother;
pub use adherence::{score, ScoreReport};
pub use streak::current_streak;
pub use progression::{level_from_xp, xp_for_level};
pub use achievements::{completed_milestones, unlocked_badges};
pub use engine::{Engine, ProgressReport};
