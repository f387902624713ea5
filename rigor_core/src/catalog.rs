//! Default catalogs of badges, milestones, ranks and strength standards.
//!
//! The engine never reaches for these directly; callers pass a [`Catalogs`]
//! value in, which is normally the cached default.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Cached default catalogs - built once and reused across all operations
static DEFAULT_CATALOGS: Lazy<Catalogs> = Lazy::new(build_default_catalogs);

/// Get a reference to the cached default catalogs
pub fn get_default_catalogs() -> &'static Catalogs {
    &DEFAULT_CATALOGS
}

fn badge(
    id: &str,
    name: &str,
    description: &str,
    tier: BadgeTier,
    category: BadgeCategory,
    rule: BadgeRule,
) -> Badge {
    Badge {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        tier,
        category,
        rule,
    }
}

fn stat(stat: StatField, at_least: f64) -> BadgeRule {
    BadgeRule::Stat { stat, at_least }
}

fn extra(metric: ExtraMetric, at_least: f64) -> BadgeRule {
    BadgeRule::Extra { metric, at_least }
}

fn milestone(id: &str, label: &str, xp_reward: u64, field: StatField, at_least: f64) -> Milestone {
    Milestone {
        id: id.into(),
        label: label.into(),
        xp_reward,
        check: StatThreshold::new(field, at_least),
    }
}

fn rank(id: &str, name: &str, min_level: u32, max_level: Option<u32>, color: &str) -> Rank {
    Rank {
        id: id.into(),
        name: name.into(),
        min_level,
        max_level,
        color: color.into(),
    }
}

fn standard(exercise: &str, aliases: &[&str], ratios: [f64; 5]) -> StrengthStandard {
    let [beginner, novice, intermediate, advanced, elite] = ratios;
    StrengthStandard {
        exercise: exercise.into(),
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
        thresholds: StrengthThresholds {
            beginner,
            novice,
            intermediate,
            advanced,
            elite,
        },
    }
}

/// Builds the default catalogs
///
/// **Note**: For production use, prefer `get_default_catalogs()` which returns a
/// cached reference. This function is retained for tests and custom catalogs.
pub fn build_default_catalogs() -> Catalogs {
    use BadgeCategory::*;
    use BadgeTier::*;

    let badges = vec![
        // ====================================================================
        // Consistency
        // ====================================================================
        badge(
            "first-workout",
            "First Rep",
            "Log your first workout.",
            Bronze,
            Consistency,
            stat(StatField::WorkoutCount, 1.0),
        ),
        badge(
            "workouts-10",
            "Regular",
            "Log 10 workouts.",
            Bronze,
            Consistency,
            stat(StatField::WorkoutCount, 10.0),
        ),
        badge(
            "workouts-50",
            "Committed",
            "Log 50 workouts.",
            Silver,
            Consistency,
            stat(StatField::WorkoutCount, 50.0),
        ),
        badge(
            "workouts-100",
            "Centurion",
            "Log 100 workouts.",
            Gold,
            Consistency,
            stat(StatField::WorkoutCount, 100.0),
        ),
        badge(
            "streak-7",
            "On Fire",
            "Complete every habit 7 days in a row.",
            Bronze,
            Consistency,
            stat(StatField::Streak, 7.0),
        ),
        badge(
            "streak-30",
            "Unbreakable",
            "Complete every habit 30 days in a row.",
            Silver,
            Consistency,
            stat(StatField::Streak, 30.0),
        ),
        badge(
            "streak-100",
            "Iron Will",
            "Complete every habit 100 days in a row.",
            Gold,
            Consistency,
            stat(StatField::Streak, 100.0),
        ),
        // ====================================================================
        // Strength
        // ====================================================================
        badge(
            "first-pr",
            "Record Breaker",
            "Set your first personal record.",
            Bronze,
            Strength,
            stat(StatField::PrCount, 1.0),
        ),
        badge(
            "pr-10",
            "PR Machine",
            "Set 10 personal records.",
            Silver,
            Strength,
            stat(StatField::PrCount, 10.0),
        ),
        badge(
            "weight-increases-25",
            "Progressive Overload",
            "Increase a working weight 25 times.",
            Silver,
            Strength,
            stat(StatField::WeightIncreases, 25.0),
        ),
        badge(
            "bench-100",
            "Three Plates Club",
            "Bench press 100 kg.",
            Silver,
            Strength,
            extra(ExtraMetric::MaxBenchWeight, 100.0),
        ),
        badge(
            "squat-140",
            "Deep Roots",
            "Squat 140 kg.",
            Silver,
            Strength,
            extra(ExtraMetric::MaxSquatWeight, 140.0),
        ),
        badge(
            "deadlift-180",
            "Floor Puller",
            "Deadlift 180 kg.",
            Silver,
            Strength,
            extra(ExtraMetric::MaxDeadliftWeight, 180.0),
        ),
        badge(
            "bench-bodyweight",
            "Bodyweight Bench",
            "Bench press your own bodyweight.",
            Silver,
            Strength,
            BadgeRule::LiftToBodyweight { lift: Lift::Bench, ratio: 1.0 },
        ),
        badge(
            "squat-1-5x",
            "Squat 1.5x",
            "Squat one and a half times your bodyweight.",
            Gold,
            Strength,
            BadgeRule::LiftToBodyweight { lift: Lift::Squat, ratio: 1.5 },
        ),
        badge(
            "deadlift-2x",
            "Double Bodyweight Pull",
            "Deadlift twice your bodyweight.",
            Gold,
            Strength,
            BadgeRule::LiftToBodyweight { lift: Lift::Deadlift, ratio: 2.0 },
        ),
        // ====================================================================
        // Volume
        // ====================================================================
        badge(
            "tonnage-10",
            "Ten Tons",
            "Move 10 tons of total volume.",
            Bronze,
            Volume,
            stat(StatField::TonnageTons, 10.0),
        ),
        badge(
            "tonnage-50",
            "Fifty Tons",
            "Move 50 tons of total volume.",
            Silver,
            Volume,
            stat(StatField::TonnageTons, 50.0),
        ),
        badge(
            "tonnage-100",
            "Hundred Tons",
            "Move 100 tons of total volume.",
            Gold,
            Volume,
            stat(StatField::TonnageTons, 100.0),
        ),
        badge(
            "volume-week-10t",
            "Big Week",
            "Lift 10,000 kg in a single week.",
            Silver,
            Volume,
            BadgeRule::PeakWeeklyVolume { at_least: 10_000.0 },
        ),
        badge(
            "volume-week-25t",
            "Monster Week",
            "Lift 25,000 kg in a single week.",
            Gold,
            Volume,
            BadgeRule::PeakWeeklyVolume { at_least: 25_000.0 },
        ),
        // ====================================================================
        // Habits
        // ====================================================================
        badge(
            "habits-100",
            "Habit Former",
            "Complete 100 habit check-ins.",
            Bronze,
            Habits,
            stat(StatField::HabitCompletions, 100.0),
        ),
        badge(
            "habits-500",
            "Creature of Habit",
            "Complete 500 habit check-ins.",
            Silver,
            Habits,
            stat(StatField::HabitCompletions, 500.0),
        ),
        badge(
            "perfect-days-7",
            "Perfect Week",
            "Complete every habit on 7 days.",
            Bronze,
            Habits,
            stat(StatField::AllHabitsDays, 7.0),
        ),
        badge(
            "perfect-days-30",
            "Perfect Month",
            "Complete every habit on 30 days.",
            Silver,
            Habits,
            stat(StatField::AllHabitsDays, 30.0),
        ),
        badge(
            "perfect-days-100",
            "Flawless",
            "Complete every habit on 100 days.",
            Gold,
            Habits,
            stat(StatField::AllHabitsDays, 100.0),
        ),
        // ====================================================================
        // Body composition
        // ====================================================================
        badge(
            "metrics-10",
            "Self Aware",
            "Log 10 body measurements.",
            Bronze,
            BodyComposition,
            stat(StatField::BodyMetricEntries, 10.0),
        ),
        badge(
            "fat-loss-5",
            "Leaner",
            "Lose 5% body fat.",
            Silver,
            BodyComposition,
            extra(ExtraMetric::FatLossPct, 5.0),
        ),
        badge(
            "fat-loss-10",
            "Shredded",
            "Lose 10% body fat.",
            Gold,
            BodyComposition,
            extra(ExtraMetric::FatLossPct, 10.0),
        ),
        badge(
            "muscle-gain-2",
            "Builder",
            "Gain 2 kg of muscle.",
            Silver,
            BodyComposition,
            extra(ExtraMetric::MuscleGainKg, 2.0),
        ),
        badge(
            "muscle-gain-5",
            "Architect",
            "Gain 5 kg of muscle.",
            Gold,
            BodyComposition,
            extra(ExtraMetric::MuscleGainKg, 5.0),
        ),
        badge(
            "recomp",
            "Recomposition",
            "Lose fat and gain muscle at the same time.",
            Gold,
            BodyComposition,
            BadgeRule::Flag { flag: ExtraFlag::Recomp },
        ),
        // ====================================================================
        // Explorer
        // ====================================================================
        badge(
            "exercises-10",
            "Explorer",
            "Try 10 different exercises.",
            Bronze,
            Explorer,
            stat(StatField::UniqueExercises, 10.0),
        ),
        badge(
            "exercises-25",
            "Globetrotter",
            "Try 25 different exercises.",
            Silver,
            Explorer,
            stat(StatField::UniqueExercises, 25.0),
        ),
        badge(
            "early-bird",
            "Early Bird",
            "Finish a workout before 7 am.",
            Bronze,
            Explorer,
            BadgeRule::Flag { flag: ExtraFlag::EarlyBird },
        ),
        badge(
            "night-owl",
            "Night Owl",
            "Finish a workout after 10 pm.",
            Bronze,
            Explorer,
            BadgeRule::Flag { flag: ExtraFlag::NightOwl },
        ),
        badge(
            "weekend-warrior",
            "Weekend Warrior",
            "Train on both days of a weekend.",
            Bronze,
            Explorer,
            BadgeRule::Flag { flag: ExtraFlag::WeekendWarrior },
        ),
    ];

    let milestones = vec![
        milestone("workouts-10", "10 workouts logged", 250, StatField::WorkoutCount, 10.0),
        milestone("workouts-50", "50 workouts logged", 1_000, StatField::WorkoutCount, 50.0),
        milestone("workouts-100", "100 workouts logged", 2_500, StatField::WorkoutCount, 100.0),
        milestone("streak-30", "30-day streak", 1_000, StatField::Streak, 30.0),
        milestone("prs-25", "25 personal records", 1_500, StatField::PrCount, 25.0),
        milestone("perfect-days-30", "30 perfect days", 750, StatField::AllHabitsDays, 30.0),
        milestone("tonnage-100", "100 tons lifted", 2_000, StatField::TonnageTons, 100.0),
    ];

    let ranks = vec![
        rank("rookie", "Rookie", 0, Some(4), "#9e9e9e"),
        rank("apprentice", "Apprentice", 5, Some(9), "#8d6e63"),
        rank("athlete", "Athlete", 10, Some(19), "#42a5f5"),
        rank("veteran", "Veteran", 20, Some(34), "#66bb6a"),
        rank("elite", "Elite", 35, Some(49), "#ab47bc"),
        rank("legend", "Legend", 50, None, "#ffca28"),
    ];

    let strength_standards = vec![
        standard(
            "Bench Press",
            &["bench", "barbell bench press", "flat bench press"],
            [0.5, 0.75, 1.0, 1.5, 2.0],
        ),
        standard("Squat", &["back squat", "barbell squat"], [0.75, 1.25, 1.5, 2.25, 2.75]),
        standard(
            "Deadlift",
            &["conventional deadlift", "barbell deadlift"],
            [1.0, 1.5, 2.0, 2.5, 3.0],
        ),
        standard(
            "Overhead Press",
            &["ohp", "military press", "shoulder press"],
            [0.35, 0.55, 0.75, 1.0, 1.25],
        ),
        standard("Barbell Row", &["bent over row", "pendlay row"], [0.5, 0.75, 1.0, 1.25, 1.5]),
    ];

    Catalogs {
        badges,
        milestones,
        ranks,
        strength_standards,
    }
}

impl Catalogs {
    /// Validate the catalogs for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mut badge_ids = HashSet::new();
        for badge in &self.badges {
            if badge.id.trim().is_empty() {
                errors.push(format!("Badge '{}' has empty ID", badge.name));
            }
            if !badge_ids.insert(badge.id.as_str()) {
                errors.push(format!("Duplicate badge ID '{}'", badge.id));
            }
            if badge.name.is_empty() {
                errors.push(format!("Badge '{}' has empty name", badge.id));
            }
        }

        let mut milestone_ids = HashSet::new();
        for milestone in &self.milestones {
            if milestone.id.trim().is_empty() {
                errors.push(format!("Milestone '{}' has empty ID", milestone.label));
            }
            if !milestone_ids.insert(milestone.id.as_str()) {
                errors.push(format!("Duplicate milestone ID '{}'", milestone.id));
            }
        }

        errors.extend(self.validate_ranks());

        for standard in &self.strength_standards {
            let ratios: Vec<f64> = StrengthLevel::ALL
                .iter()
                .map(|level| standard.thresholds.ratio_for(*level))
                .collect();
            if ratios.iter().any(|r| !(r.is_finite() && *r > 0.0)) {
                errors.push(format!(
                    "Strength standard '{}' has a non-positive threshold",
                    standard.exercise
                ));
            }
            if ratios.windows(2).any(|pair| pair[0] >= pair[1]) {
                errors.push(format!(
                    "Strength standard '{}' thresholds are not strictly increasing",
                    standard.exercise
                ));
            }
        }

        errors
    }

    /// Ranks must start at level 0 and tile the level axis without gaps or overlaps,
    /// ending in a single open-ended rank.
    fn validate_ranks(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let Some(first) = self.ranks.first() else {
            errors.push("Catalog has no ranks".to_string());
            return errors;
        };
        if first.min_level != 0 {
            errors.push(format!(
                "First rank '{}' starts at level {} instead of 0",
                first.id, first.min_level
            ));
        }

        let last_index = self.ranks.len() - 1;
        for (index, rank) in self.ranks.iter().enumerate() {
            match rank.max_level {
                None if index != last_index => {
                    errors.push(format!("Rank '{}' is open-ended but not last", rank.id));
                }
                Some(_) if index == last_index => {
                    errors.push(format!("Last rank '{}' must be open-ended", rank.id));
                }
                Some(max) if max < rank.min_level => {
                    errors.push(format!(
                        "Rank '{}' has max level {} below min level {}",
                        rank.id, max, rank.min_level
                    ));
                }
                _ => {}
            }

            if let Some(next) = self.ranks.get(index + 1) {
                if let Some(max) = rank.max_level {
                    if next.min_level != max.saturating_add(1) {
                        errors.push(format!(
                            "Ranks '{}' and '{}' leave a gap or overlap at level {}",
                            rank.id, next.id, max
                        ));
                    }
                }
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalogs_validate() {
        let catalogs = build_default_catalogs();
        let errors = catalogs.validate();
        assert!(
            errors.is_empty(),
            "Default catalogs have validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_cached_catalogs_match_built() {
        assert_eq!(get_default_catalogs(), &build_default_catalogs());
    }

    #[test]
    fn test_every_category_has_badges() {
        let catalogs = build_default_catalogs();
        for category in [
            BadgeCategory::Consistency,
            BadgeCategory::Strength,
            BadgeCategory::Volume,
            BadgeCategory::Habits,
            BadgeCategory::BodyComposition,
            BadgeCategory::Explorer,
        ] {
            assert!(
                catalogs.badges.iter().any(|b| b.category == category),
                "No badges in {:?}",
                category
            );
        }
    }

    #[test]
    fn test_rank_gap_detected() {
        let mut catalogs = build_default_catalogs();
        catalogs.ranks[1].min_level = 6;
        let errors = catalogs.validate();
        assert!(errors.iter().any(|e| e.contains("gap or overlap")));
    }

    #[test]
    fn test_bounded_last_rank_detected() {
        let mut catalogs = build_default_catalogs();
        if let Some(last) = catalogs.ranks.last_mut() {
            last.max_level = Some(99);
        }
        let errors = catalogs.validate();
        assert!(errors.iter().any(|e| e.contains("must be open-ended")));
    }

    #[test]
    fn test_duplicate_badge_detected() {
        let mut catalogs = build_default_catalogs();
        let copy = catalogs.badges[0].clone();
        catalogs.badges.push(copy);
        let errors = catalogs.validate();
        assert!(errors.iter().any(|e| e.contains("Duplicate badge ID")));
    }

    #[test]
    fn test_unordered_thresholds_detected() {
        let mut catalogs = build_default_catalogs();
        catalogs.strength_standards[0].thresholds.elite = 0.6;
        let errors = catalogs.validate();
        assert!(errors.iter().any(|e| e.contains("not strictly increasing")));
    }
}
