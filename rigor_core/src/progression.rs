//! Experience points, levels and ranks.
//!
//! XP is recomputed from a lifetime [`RawStats`] snapshot on every call:
//! - Per-action XP: each counted action earns a fixed rate
//! - Tonnage XP: every full block of lifted tons earns a fixed amount
//! - Milestone XP: one-time rewards for completed milestones
//!
//! Levels follow a quadratic curve, `xp_for_level(n) = base * n^2`.

use crate::achievements::completed_milestones;
use crate::config::XpRates;
use crate::{Milestone, Rank, RawStats, XpBreakdownEntry};
use serde::Serialize;

/// Label of the synthetic breakdown entry for milestone rewards
pub const MILESTONE_SOURCE: &str = "Milestones";

/// Total XP with a per-source breakdown, largest source first
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct XpSummary {
    pub total: u64,
    pub breakdown: Vec<XpBreakdownEntry>,
}

/// Presented progression state for one user
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ProgressionState {
    pub total_xp: u64,
    pub level: u32,
    /// Percentage of the way from this level to the next, in [0, 100)
    pub progress_pct: f64,
    pub xp_to_next_level: u64,
    pub rank: Rank,
    pub breakdown: Vec<XpBreakdownEntry>,
}

/// Compute total XP and its breakdown from a stats snapshot
pub fn compute_xp(stats: &RawStats, rates: &XpRates, milestones: &[Milestone]) -> XpSummary {
    let tonnage_blocks = if rates.tonnage_block_tons > 0.0 {
        let tons = stats.tonnage_tons;
        if tons.is_finite() && tons > 0.0 {
            (tons / rates.tonnage_block_tons).floor() as u64
        } else {
            0
        }
    } else {
        0
    };

    let rules: [(&str, u64, u64); 8] = [
        ("Workouts", stats.workout_count, rates.workout),
        ("Habit completions", stats.habit_completions, rates.habit_completion),
        ("Perfect days", stats.all_habits_days, rates.perfect_day),
        ("Personal records", stats.pr_count, rates.personal_record),
        ("Exercises explored", stats.unique_exercises, rates.unique_exercise),
        ("Body metrics logged", stats.body_metric_entries, rates.body_metric),
        ("Weight increases", stats.weight_increases, rates.weight_increase),
        ("Tonnage", tonnage_blocks, rates.tonnage_block),
    ];

    let mut breakdown: Vec<XpBreakdownEntry> = rules
        .iter()
        .filter(|(_, count, _)| *count > 0)
        .map(|(source, count, rate)| XpBreakdownEntry {
            source: (*source).to_string(),
            xp: count.saturating_mul(*rate),
            count: *count,
        })
        .collect();

    let completed = completed_milestones(stats, milestones);
    if !completed.is_empty() {
        breakdown.push(XpBreakdownEntry {
            source: MILESTONE_SOURCE.to_string(),
            xp: completed
                .iter()
                .fold(0u64, |sum, m| sum.saturating_add(m.xp_reward)),
            count: completed.len() as u64,
        });
    }

    // Stable sort keeps rule order for ties
    breakdown.sort_by(|a, b| b.xp.cmp(&a.xp));

    let total = breakdown
        .iter()
        .fold(0u64, |sum, entry| sum.saturating_add(entry.xp));

    XpSummary { total, breakdown }
}

/// XP required to reach a level
pub fn xp_for_level(level: u32, base: u64) -> u64 {
    let level = u64::from(level);
    base.saturating_mul(level.saturating_mul(level))
}

/// Highest level whose threshold does not exceed `xp`
///
/// Equivalent to `floor(sqrt(xp / base))`; the float estimate is corrected
/// with integer arithmetic so exact thresholds always land on their level.
pub fn level_from_xp(xp: u64, base: u64) -> u32 {
    if base == 0 {
        return 0;
    }

    let estimate = (xp as f64 / base as f64).sqrt().floor();
    let mut level = if estimate.is_finite() && estimate > 0.0 {
        estimate.min(f64::from(u32::MAX)) as u32
    } else {
        0
    };

    while level > 0 && checked_threshold(level, base).map_or(true, |t| t > xp) {
        level -= 1;
    }
    while let Some(next) = level.checked_add(1) {
        match checked_threshold(next, base) {
            Some(threshold) if threshold <= xp => level = next,
            _ => break,
        }
    }
    level
}

fn checked_threshold(level: u32, base: u64) -> Option<u64> {
    let level = u64::from(level);
    level.checked_mul(level)?.checked_mul(base)
}

/// Percentage of progress from the current level toward the next, in [0, 100)
pub fn level_progress(xp: u64, base: u64) -> f64 {
    let level = level_from_xp(xp, base);
    let floor = xp_for_level(level, base);
    let ceiling = xp_for_level(level.saturating_add(1), base);
    if ceiling <= floor {
        return 0.0;
    }
    let pct = 100.0 * (xp - floor) as f64 / (ceiling - floor) as f64;
    // Float rounding must never report a full level
    pct.clamp(0.0, 100.0 - 100.0 * f64::EPSILON)
}

/// First rank whose band contains the level, falling back to the last rank
pub fn rank_for_level(ranks: &[Rank], level: u32) -> Option<&Rank> {
    ranks
        .iter()
        .find(|rank| rank.contains(level))
        .or_else(|| ranks.last())
}

/// Build the full progression state for a stats snapshot
pub fn evaluate(
    stats: &RawStats,
    rates: &XpRates,
    level_base: u64,
    milestones: &[Milestone],
    ranks: &[Rank],
) -> Option<ProgressionState> {
    let summary = compute_xp(stats, rates, milestones);
    let level = level_from_xp(summary.total, level_base);
    let rank = rank_for_level(ranks, level)?.clone();
    let next_threshold = xp_for_level(level.saturating_add(1), level_base);

    tracing::debug!(
        "Progression: {} XP, level {}, rank {}",
        summary.total,
        level,
        rank.name
    );

    Some(ProgressionState {
        total_xp: summary.total,
        level,
        progress_pct: level_progress(summary.total, level_base),
        xp_to_next_level: next_threshold.saturating_sub(summary.total),
        rank,
        breakdown: summary.breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_default_catalogs;

    const BASE: u64 = 100;

    fn no_milestones() -> Vec<Milestone> {
        Vec::new()
    }

    #[test]
    fn test_tonnage_blocks() {
        let stats = RawStats {
            tonnage_tons: 12.0,
            ..Default::default()
        };
        let summary = compute_xp(&stats, &XpRates::default(), &no_milestones());
        assert_eq!(summary.total, 200);
        assert_eq!(summary.breakdown.len(), 1);
        assert_eq!(summary.breakdown[0].source, "Tonnage");
        assert_eq!(summary.breakdown[0].count, 2);
    }

    #[test]
    fn test_breakdown_sorted_and_summed() {
        let stats = RawStats {
            workout_count: 3,       // 300
            habit_completions: 40,  // 800
            pr_count: 1,            // 200
            body_metric_entries: 0, // omitted
            ..Default::default()
        };
        let summary = compute_xp(&stats, &XpRates::default(), &no_milestones());
        let sources: Vec<_> = summary.breakdown.iter().map(|e| e.source.as_str()).collect();
        assert_eq!(sources, vec!["Habit completions", "Workouts", "Personal records"]);
        assert_eq!(summary.total, 1300);
    }

    #[test]
    fn test_ties_keep_rule_order() {
        let stats = RawStats {
            all_habits_days: 2,  // 100
            weight_increases: 2, // 100
            ..Default::default()
        };
        let summary = compute_xp(&stats, &XpRates::default(), &no_milestones());
        assert_eq!(summary.breakdown[0].source, "Perfect days");
        assert_eq!(summary.breakdown[1].source, "Weight increases");
    }

    #[test]
    fn test_milestones_appended() {
        let catalogs = build_default_catalogs();
        let stats = RawStats {
            workout_count: 10,
            ..Default::default()
        };
        let summary = compute_xp(&stats, &XpRates::default(), &catalogs.milestones);
        let milestones = summary
            .breakdown
            .iter()
            .find(|e| e.source == MILESTONE_SOURCE)
            .unwrap();
        assert_eq!(milestones.count, 1);
        assert_eq!(milestones.xp, 250);
        assert_eq!(summary.total, 1000 + 250);
        assert_eq!(summary.breakdown[0].source, "Workouts");
    }

    #[test]
    fn test_empty_stats_zero_xp() {
        let summary = compute_xp(&RawStats::default(), &XpRates::default(), &no_milestones());
        assert_eq!(summary.total, 0);
        assert!(summary.breakdown.is_empty());
    }

    #[test]
    fn test_level_curve() {
        assert_eq!(level_from_xp(0, BASE), 0);
        assert_eq!(level_from_xp(99, BASE), 0);
        assert_eq!(level_from_xp(100, BASE), 1);
        assert_eq!(level_from_xp(399, BASE), 1);
        assert_eq!(level_from_xp(400, BASE), 2);
        assert_eq!(level_from_xp(2_500, BASE), 5);
    }

    #[test]
    fn test_level_round_trip() {
        for level in 0..=5_000u32 {
            assert_eq!(level_from_xp(xp_for_level(level, BASE), BASE), level);
            if level > 0 {
                assert_eq!(level_from_xp(xp_for_level(level, BASE) - 1, BASE), level - 1);
            }
        }
    }

    #[test]
    fn test_level_monotonic() {
        let mut previous = 0;
        for xp in (0..200_000u64).step_by(37) {
            let level = level_from_xp(xp, BASE);
            assert!(level >= previous);
            previous = level;
        }
    }

    #[test]
    fn test_level_progress() {
        assert_eq!(level_progress(0, BASE), 0.0);
        // Level 1 spans 100..400
        assert_eq!(level_progress(250, BASE), 50.0);
        assert_eq!(level_progress(400, BASE), 0.0);
        let almost = level_progress(399, BASE);
        assert!(almost > 99.0 && almost < 100.0);
    }

    #[test]
    fn test_rank_for_level() {
        let catalogs = build_default_catalogs();
        let ranks = &catalogs.ranks;
        assert_eq!(rank_for_level(ranks, 0).unwrap().id, "rookie");
        assert_eq!(rank_for_level(ranks, 4).unwrap().id, "rookie");
        assert_eq!(rank_for_level(ranks, 5).unwrap().id, "apprentice");
        assert_eq!(rank_for_level(ranks, 49).unwrap().id, "elite");
        assert_eq!(rank_for_level(ranks, 50).unwrap().id, "legend");
        assert_eq!(rank_for_level(ranks, 10_000).unwrap().id, "legend");
        assert!(rank_for_level(&[], 3).is_none());
    }

    #[test]
    fn test_evaluate() {
        let catalogs = build_default_catalogs();
        let stats = RawStats {
            workout_count: 12,  // 1200
            habit_completions: 5, // 100
            ..Default::default()
        };
        // 1300 + 250 milestone = 1550 XP -> level 3 (900..1600)
        let state = evaluate(
            &stats,
            &XpRates::default(),
            BASE,
            &catalogs.milestones,
            &catalogs.ranks,
        )
        .unwrap();
        assert_eq!(state.total_xp, 1550);
        assert_eq!(state.level, 3);
        assert_eq!(state.xp_to_next_level, 50);
        assert_eq!(state.rank.id, "rookie");
        assert!((state.progress_pct - 650.0 / 700.0 * 100.0).abs() < 1e-9);
    }
}
