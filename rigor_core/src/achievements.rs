//! Badge and milestone evaluation.
//!
//! Badges are recomputed from the current snapshots on every call. There is
//! no unlock history: if a statistic regresses below a badge's threshold,
//! the badge is absent from the next evaluation.

use crate::{Badge, BadgeRule, ExtraData, Milestone, RawStats};
use serde::Serialize;
use std::collections::BTreeSet;

/// A catalog badge together with whether it is currently unlocked
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct BadgeStatus<'a> {
    pub badge: &'a Badge,
    pub unlocked: bool,
}

/// Whether a single badge rule holds for the given snapshots
pub fn rule_holds(rule: &BadgeRule, stats: &RawStats, extra: &ExtraData) -> bool {
    match rule {
        BadgeRule::Stat { stat, at_least } => stats.get(*stat) >= *at_least,
        BadgeRule::Extra { metric, at_least } => extra.metric(*metric) >= *at_least,
        BadgeRule::LiftToBodyweight { lift, ratio } => {
            let bodyweight = extra.body_weight;
            bodyweight.is_finite()
                && bodyweight > 0.0
                && extra.max_lift(*lift) >= ratio * bodyweight
        }
        BadgeRule::PeakWeeklyVolume { at_least } => extra.peak_weekly_volume() >= *at_least,
        BadgeRule::Flag { flag } => extra.flag(*flag),
    }
}

/// Ids of every badge whose rule holds for the given snapshots
pub fn unlocked_badges(stats: &RawStats, extra: &ExtraData, badges: &[Badge]) -> BTreeSet<String> {
    let unlocked: BTreeSet<String> = badges
        .iter()
        .filter(|badge| rule_holds(&badge.rule, stats, extra))
        .map(|badge| badge.id.clone())
        .collect();

    tracing::debug!("{} of {} badges unlocked", unlocked.len(), badges.len());
    unlocked
}

/// Every badge in catalog order, flagged unlocked or locked
pub fn badge_board<'a>(
    stats: &RawStats,
    extra: &ExtraData,
    badges: &'a [Badge],
) -> Vec<BadgeStatus<'a>> {
    badges
        .iter()
        .map(|badge| BadgeStatus {
            badge,
            unlocked: rule_holds(&badge.rule, stats, extra),
        })
        .collect()
}

/// Milestones whose check holds, in catalog order
pub fn completed_milestones<'a>(
    stats: &RawStats,
    milestones: &'a [Milestone],
) -> Vec<&'a Milestone> {
    milestones
        .iter()
        .filter(|milestone| milestone.check.is_met(stats))
        .collect()
}
