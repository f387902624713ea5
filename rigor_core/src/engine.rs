//! Scoring engine facade.
//!
//! An [`Engine`] owns the immutable catalogs and configuration and exposes
//! each scoring component with those tables already injected:
//!
//! 1. **Session scoring**: adherence of a logged session to its plan
//! 2. **Strength**: one-rep-max estimate and bodyweight classification
//! 3. **Streaks**: perfect-day streak as of a given day
//! 4. **Progress report**: XP, level, rank, badges and milestones

use crate::adherence::{self, ScoreReport};
use crate::progression::{self, ProgressionState};
use crate::strength::{self, StrengthClassification};
use crate::{
    achievements, calendar, streak, CalendarDay, Catalogs, Config, Error, ExtraData, LoggedSet,
    PlannedExercise, RawStats, Result,
};
use chrono::FixedOffset;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Progression and achievement state presented to a user
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ProgressReport {
    pub progression: ProgressionState,
    pub badges: BTreeSet<String>,
    pub milestones: Vec<String>,
}

/// Strength estimate for one set, classified when a standard applies
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct StrengthReport {
    pub estimate: f64,
    pub classification: Option<StrengthClassification>,
    pub next_target_kg: Option<f64>,
}

/// The scoring engine with its configuration tables
#[derive(Clone, Debug)]
pub struct Engine {
    catalogs: Catalogs,
    config: Config,
}

impl Engine {
    /// Build an engine, rejecting inconsistent catalogs or configuration
    pub fn new(catalogs: Catalogs, config: Config) -> Result<Self> {
        let errors = catalogs.validate();
        if !errors.is_empty() {
            for error in &errors {
                tracing::warn!("Catalog problem: {}", error);
            }
            return Err(Error::CatalogValidation(errors.join("; ")));
        }
        config.validate()?;

        Ok(Self { catalogs, config })
    }

    /// Engine with the default catalogs and the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Self::new(crate::catalog::get_default_catalogs().clone(), config)
    }

    /// Engine with the default catalogs and configuration
    pub fn with_defaults() -> Result<Self> {
        Self::with_config(Config::default())
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The fixed offset used to place timestamps on calendar days
    pub fn day_offset(&self) -> FixedOffset {
        calendar::offset_from_minutes(self.config.streak.utc_offset_minutes)
    }

    pub fn score_session(&self, sets: &[LoggedSet], planned: &[PlannedExercise]) -> ScoreReport {
        adherence::score(sets, planned)
    }

    pub fn strength(
        &self,
        weight: f64,
        reps: u32,
        exercise_name: Option<&str>,
        bodyweight: Option<f64>,
    ) -> StrengthReport {
        let estimate = strength::estimate_one_rep_max(weight, reps);
        let standards = &self.catalogs.strength_standards;

        let (classification, next_target_kg) = match (exercise_name, bodyweight) {
            (Some(name), Some(bw)) => {
                let classification = strength::classify_strength(standards, name, estimate, bw);
                let next = classification.as_ref().and_then(|c| {
                    strength::find_standard(standards, name)
                        .and_then(|standard| c.next_target_kg(standard, bw))
                });
                (classification, next)
            }
            _ => (None, None),
        };

        StrengthReport {
            estimate,
            classification,
            next_target_kg,
        }
    }

    /// Current streak as of `today`, bounded by the configured lookback
    pub fn streak(
        &self,
        counts: &BTreeMap<CalendarDay, u32>,
        total_active_habits: u32,
        today: CalendarDay,
    ) -> u32 {
        streak::current_streak(
            counts,
            total_active_habits,
            today,
            self.config.streak.max_lookback_days,
        )
    }

    pub fn progression(&self, stats: &RawStats) -> Result<ProgressionState> {
        progression::evaluate(
            stats,
            &self.config.xp,
            self.config.progression.level_base,
            &self.catalogs.milestones,
            &self.catalogs.ranks,
        )
        .ok_or_else(|| Error::CatalogValidation("Catalog has no ranks".into()))
    }

    pub fn unlocked_badges(&self, stats: &RawStats, extra: &ExtraData) -> BTreeSet<String> {
        achievements::unlocked_badges(stats, extra, &self.catalogs.badges)
    }

    /// Everything a progress screen shows, recomputed from the snapshots
    pub fn progress_report(&self, stats: &RawStats, extra: &ExtraData) -> Result<ProgressReport> {
        let progression = self.progression(stats)?;
        let badges = self.unlocked_badges(stats, extra);
        let milestones = achievements::completed_milestones(stats, &self.catalogs.milestones)
            .into_iter()
            .map(|m| m.id.clone())
            .collect();

        tracing::info!(
            "Progress report: level {} ({}), {} badges",
            progression.level,
            progression.rank.name,
            badges.len()
        );

        Ok(ProgressReport {
            progression,
            badges,
            milestones,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_default_catalogs, StrengthLevel};

    fn engine() -> Engine {
        Engine::with_defaults().unwrap()
    }

    #[test]
    fn test_invalid_catalogs_rejected() {
        let mut catalogs = build_default_catalogs();
        catalogs.ranks.clear();
        let result = Engine::new(catalogs, Config::default());
        assert!(matches!(result, Err(Error::CatalogValidation(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.progression.level_base = 0;
        assert!(matches!(Engine::with_config(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_progress_report() {
        let stats = RawStats {
            workout_count: 12,
            habit_completions: 5,
            streak: 8,
            ..Default::default()
        };
        let extra = ExtraData {
            fat_loss_pct: 6.0,
            ..Default::default()
        };

        let report = engine().progress_report(&stats, &extra).unwrap();
        assert_eq!(report.progression.total_xp, 1550);
        assert_eq!(report.progression.level, 3);
        assert_eq!(report.progression.rank.id, "rookie");
        assert!(report.badges.contains("streak-7"));
        assert!(report.badges.contains("fat-loss-5"));
        assert_eq!(report.milestones, vec!["workouts-10".to_string()]);
    }

    #[test]
    fn test_substitute_configuration() {
        let mut config = Config::default();
        config.xp.workout = 1_000;
        config.progression.level_base = 1_000;
        let engine = Engine::with_config(config).unwrap();

        let stats = RawStats {
            workout_count: 4,
            ..Default::default()
        };
        let state = engine.progression(&stats).unwrap();
        assert_eq!(state.total_xp, 4_000);
        assert_eq!(state.level, 2);
    }

    #[test]
    fn test_strength_report() {
        let report = engine().strength(100.0, 5, Some("Bench Press"), Some(90.0));
        assert_eq!(report.estimate, 116.7);
        let classification = report.classification.unwrap();
        assert_eq!(classification.level, Some(StrengthLevel::Intermediate));
        // Advanced bench is 1.5x bodyweight
        assert_eq!(report.next_target_kg, Some(135.0));

        let bare = engine().strength(100.0, 5, None, None);
        assert!(bare.classification.is_none());
        assert!(bare.next_target_kg.is_none());
    }

    #[test]
    fn test_streak_uses_configured_lookback() {
        let mut config = Config::default();
        config.streak.max_lookback_days = 5;
        let engine = Engine::with_config(config).unwrap();

        let today: CalendarDay = "2024-01-31".parse().unwrap();
        let counts: BTreeMap<_, _> = (0..20).map(|ago| (today.minus_days(ago), 1)).collect();
        assert_eq!(engine.streak(&counts, 1, today), 5);
    }

    #[test]
    fn test_score_session_delegates() {
        let planned = vec![PlannedExercise {
            exercise_id: "squat".into(),
            name: "Squat".into(),
            muscle_group: "legs".into(),
            sets_target: 1,
            reps_target: 5,
            weight_target: Some(100.0),
            rest_seconds: 120,
        }];
        let sets = vec![LoggedSet::new("squat", 5, 100.0)];
        assert_eq!(engine().score_session(&sets, &planned).result.score, 100);
    }
}
