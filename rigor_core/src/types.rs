//! Core domain types for the Rigor scoring engine.
//!
//! This module defines the plain data that flows in and out of the engine:
//! - Logged sets, planned exercises and session scoring results
//! - Aggregate statistics snapshots supplied by the caller
//! - Static catalog entries (badges, milestones, ranks, strength standards)
//! - XP breakdown entries

use serde::{Deserialize, Serialize};

// ============================================================================
// Session Types
// ============================================================================

/// A single set recorded during a session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LoggedSet {
    #[serde(default)]
    pub exercise_id: String,
    #[serde(default)]
    pub reps: i32,
    /// Load in kilograms
    #[serde(default)]
    pub weight: f64,
}

impl LoggedSet {
    pub fn new(exercise_id: impl Into<String>, reps: i32, weight: f64) -> Self {
        Self {
            exercise_id: exercise_id.into(),
            reps,
            weight,
        }
    }

    /// Reps clamped to zero
    pub fn clamped_reps(&self) -> u32 {
        u32::try_from(self.reps).unwrap_or(0)
    }

    /// Weight clamped to a finite, non-negative value
    pub fn clamped_weight(&self) -> f64 {
        clamp_non_negative(self.weight)
    }

    /// Whether the set names the exercise it belongs to
    pub fn has_exercise_id(&self) -> bool {
        !self.exercise_id.trim().is_empty()
    }
}

/// One exercise of a planned routine
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlannedExercise {
    pub exercise_id: String,
    pub name: String,
    #[serde(default)]
    pub muscle_group: String,
    pub sets_target: u32,
    pub reps_target: u32,
    #[serde(default)]
    pub weight_target: Option<f64>,
    #[serde(default)]
    pub rest_seconds: u32,
}

/// How a logged exercise compares to its plan
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseStatus {
    /// Every target met exactly
    Complete,
    /// Targets met with extra sets, load or reps
    Exceeded,
    /// Some work logged but below target
    Incomplete,
    /// Planned but nothing logged
    Skipped,
    /// Logged but not part of the plan
    Extra,
}

impl ExerciseStatus {
    /// Complete and exceeded both count toward exercise completion
    pub fn is_done(&self) -> bool {
        matches!(self, ExerciseStatus::Complete | ExerciseStatus::Exceeded)
    }
}

/// Per-exercise breakdown produced by the adherence scorer
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseDetail {
    pub exercise_id: String,
    pub name: String,
    pub muscle_group: String,
    pub sets_target: u32,
    pub reps_target: u32,
    pub weight_target: Option<f64>,
    pub sets: Vec<LoggedSet>,
    pub sets_done: u32,
    pub status: ExerciseStatus,
}

/// Adherence ("rigor") score for one session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RigorResult {
    pub score: u32,
    /// 0..=30
    pub exercise_completion: f64,
    /// 0..=40
    pub set_completion: f64,
    /// 0..=30
    pub weight_adherence: f64,
    /// Uncapped bonus for work beyond the plan
    pub extra_bonus: f64,
    pub details: Vec<ExerciseDetail>,
}

impl RigorResult {
    /// Sum of the component terms before rounding
    pub fn component_total(&self) -> f64 {
        self.exercise_completion + self.set_completion + self.weight_adherence + self.extra_bonus
    }

    /// A score of 100 or more
    pub fn is_perfect(&self) -> bool {
        self.score >= 100
    }
}

// ============================================================================
// Aggregate Snapshots
// ============================================================================

/// Lifetime statistics for one user, aggregated by the caller
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawStats {
    pub workout_count: u64,
    pub habit_completions: u64,
    pub all_habits_days: u64,
    pub pr_count: u64,
    pub unique_exercises: u64,
    pub body_metric_entries: u64,
    pub streak: u64,
    pub weight_increases: u64,
    pub tonnage_tons: f64,
}

/// A numeric field of [`RawStats`]
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StatField {
    WorkoutCount,
    HabitCompletions,
    AllHabitsDays,
    PrCount,
    UniqueExercises,
    BodyMetricEntries,
    Streak,
    WeightIncreases,
    TonnageTons,
}

impl RawStats {
    pub fn get(&self, field: StatField) -> f64 {
        match field {
            StatField::WorkoutCount => self.workout_count as f64,
            StatField::HabitCompletions => self.habit_completions as f64,
            StatField::AllHabitsDays => self.all_habits_days as f64,
            StatField::PrCount => self.pr_count as f64,
            StatField::UniqueExercises => self.unique_exercises as f64,
            StatField::BodyMetricEntries => self.body_metric_entries as f64,
            StatField::Streak => self.streak as f64,
            StatField::WeightIncreases => self.weight_increases as f64,
            StatField::TonnageTons => clamp_non_negative(self.tonnage_tons),
        }
    }
}

/// Auxiliary extremes used only by badge evaluation
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtraData {
    pub max_bench_weight: f64,
    pub max_squat_weight: f64,
    pub max_deadlift_weight: f64,
    pub body_weight: f64,
    pub fat_loss_pct: f64,
    pub muscle_gain_kg: f64,
    pub is_recomp: bool,
    pub has_early_bird: bool,
    pub has_night_owl: bool,
    pub has_weekend_warrior: bool,
    /// Total volume (kg) per training week, oldest first
    pub weekly_volumes: Vec<f64>,
}

/// A numeric field of [`ExtraData`]
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExtraMetric {
    MaxBenchWeight,
    MaxSquatWeight,
    MaxDeadliftWeight,
    FatLossPct,
    MuscleGainKg,
}

/// A boolean field of [`ExtraData`]
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExtraFlag {
    Recomp,
    EarlyBird,
    NightOwl,
    WeekendWarrior,
}

/// The three competition lifts tracked in [`ExtraData`]
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Lift {
    Bench,
    Squat,
    Deadlift,
}

impl ExtraData {
    pub fn metric(&self, metric: ExtraMetric) -> f64 {
        let value = match metric {
            ExtraMetric::MaxBenchWeight => self.max_bench_weight,
            ExtraMetric::MaxSquatWeight => self.max_squat_weight,
            ExtraMetric::MaxDeadliftWeight => self.max_deadlift_weight,
            ExtraMetric::FatLossPct => self.fat_loss_pct,
            ExtraMetric::MuscleGainKg => self.muscle_gain_kg,
        };
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }

    pub fn flag(&self, flag: ExtraFlag) -> bool {
        match flag {
            ExtraFlag::Recomp => self.is_recomp,
            ExtraFlag::EarlyBird => self.has_early_bird,
            ExtraFlag::NightOwl => self.has_night_owl,
            ExtraFlag::WeekendWarrior => self.has_weekend_warrior,
        }
    }

    pub fn max_lift(&self, lift: Lift) -> f64 {
        match lift {
            Lift::Bench => clamp_non_negative(self.max_bench_weight),
            Lift::Squat => clamp_non_negative(self.max_squat_weight),
            Lift::Deadlift => clamp_non_negative(self.max_deadlift_weight),
        }
    }

    /// Largest weekly volume on record, 0 when there is none
    pub fn peak_weekly_volume(&self) -> f64 {
        self.weekly_volumes
            .iter()
            .copied()
            .map(clamp_non_negative)
            .fold(0.0, f64::max)
    }
}

// ============================================================================
// Catalog Types
// ============================================================================

/// Badge rarity tier
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTier {
    Bronze,
    Silver,
    Gold,
}

/// Grouping used when presenting badges
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCategory {
    Consistency,
    Strength,
    Volume,
    Habits,
    BodyComposition,
    Explorer,
}

/// `stats[stat] >= at_least`
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct StatThreshold {
    pub stat: StatField,
    pub at_least: f64,
}

impl StatThreshold {
    pub fn new(stat: StatField, at_least: f64) -> Self {
        Self { stat, at_least }
    }

    pub fn is_met(&self, stats: &RawStats) -> bool {
        stats.get(self.stat) >= self.at_least
    }
}

/// The predicate that unlocks a badge
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BadgeRule {
    /// A lifetime statistic reaches a threshold
    Stat { stat: StatField, at_least: f64 },
    /// An auxiliary extreme reaches a threshold
    Extra { metric: ExtraMetric, at_least: f64 },
    /// Best lift relative to bodyweight; never met without a bodyweight
    LiftToBodyweight { lift: Lift, ratio: f64 },
    /// Any single week's volume (kg) reaches a threshold
    PeakWeeklyVolume { at_least: f64 },
    /// A time-of-day or body-composition flag is set
    Flag { flag: ExtraFlag },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tier: BadgeTier,
    pub category: BadgeCategory,
    pub rule: BadgeRule,
}

/// A one-time XP award gated by a statistic threshold
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Milestone {
    pub id: String,
    pub label: String,
    pub xp_reward: u64,
    pub check: StatThreshold,
}

/// A named band of levels
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Rank {
    pub id: String,
    pub name: String,
    pub min_level: u32,
    /// None for the open-ended top rank
    pub max_level: Option<u32>,
    pub color: String,
}

impl Rank {
    pub fn contains(&self, level: u32) -> bool {
        level >= self.min_level && self.max_level.map_or(true, |max| level <= max)
    }
}

/// Strength classification levels, weakest first
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLevel {
    Beginner,
    Novice,
    Intermediate,
    Advanced,
    Elite,
}

impl StrengthLevel {
    pub const ALL: [StrengthLevel; 5] = [
        StrengthLevel::Beginner,
        StrengthLevel::Novice,
        StrengthLevel::Intermediate,
        StrengthLevel::Advanced,
        StrengthLevel::Elite,
    ];

    /// The level above this one, None at elite
    pub fn next(&self) -> Option<StrengthLevel> {
        match self {
            StrengthLevel::Beginner => Some(StrengthLevel::Novice),
            StrengthLevel::Novice => Some(StrengthLevel::Intermediate),
            StrengthLevel::Intermediate => Some(StrengthLevel::Advanced),
            StrengthLevel::Advanced => Some(StrengthLevel::Elite),
            StrengthLevel::Elite => None,
        }
    }
}

/// Bodyweight ratios required for each strength level
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StrengthThresholds {
    pub beginner: f64,
    pub novice: f64,
    pub intermediate: f64,
    pub advanced: f64,
    pub elite: f64,
}

impl StrengthThresholds {
    pub fn ratio_for(&self, level: StrengthLevel) -> f64 {
        match level {
            StrengthLevel::Beginner => self.beginner,
            StrengthLevel::Novice => self.novice,
            StrengthLevel::Intermediate => self.intermediate,
            StrengthLevel::Advanced => self.advanced,
            StrengthLevel::Elite => self.elite,
        }
    }
}

/// Strength standard for one exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StrengthStandard {
    pub exercise: String,
    /// Alternative names matched case-insensitively
    #[serde(default)]
    pub aliases: Vec<String>,
    pub thresholds: StrengthThresholds,
}

impl StrengthStandard {
    pub fn matches(&self, exercise_name: &str) -> bool {
        let wanted = exercise_name.trim();
        std::iter::once(&self.exercise)
            .chain(self.aliases.iter())
            .any(|name| name.trim().eq_ignore_ascii_case(wanted))
    }
}

/// The complete set of static lookup tables the engine depends on
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Catalogs {
    pub badges: Vec<Badge>,
    pub milestones: Vec<Milestone>,
    pub ranks: Vec<Rank>,
    pub strength_standards: Vec<StrengthStandard>,
}

// ============================================================================
// XP Types
// ============================================================================

/// XP contributed by one source
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct XpBreakdownEntry {
    pub source: String,
    pub xp: u64,
    pub count: u64,
}

/// Replace negative and non-finite values with zero
pub(crate) fn clamp_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
