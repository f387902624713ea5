//! One-rep-max estimation and strength classification.
//!
//! Estimates come from the Epley and Brzycki formulas; classification
//! compares the estimate to bodyweight-ratio standards from the catalog.

use crate::types::clamp_non_negative;
use crate::{LoggedSet, StrengthLevel, StrengthStandard};
use serde::{Deserialize, Serialize};

/// Brzycki divides by `37 - reps`, so it only applies below this rep count
const BRZYCKI_REP_LIMIT: u32 = 37;

/// Result of comparing an estimate against a strength standard
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StrengthClassification {
    /// Estimate divided by bodyweight
    pub ratio: f64,
    /// None when the ratio is below the beginner threshold
    pub level: Option<StrengthLevel>,
}

impl StrengthClassification {
    /// Load (kg) required to reach the next level at the given bodyweight
    ///
    /// Below beginner this is the beginner threshold; at elite there is none.
    pub fn next_target_kg(&self, standard: &StrengthStandard, bodyweight: f64) -> Option<f64> {
        let next = match self.level {
            None => StrengthLevel::Beginner,
            Some(level) => level.next()?,
        };
        Some(round_to_tenth(standard.thresholds.ratio_for(next) * bodyweight))
    }
}

/// Estimate a one-repetition max from a single set
///
/// A set of one rep (or fewer) is its own max. Otherwise the larger of the
/// Epley and Brzycki estimates is returned, rounded to one decimal place.
/// Brzycki is skipped at 37 reps and above where its denominator breaks down.
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> f64 {
    let weight = clamp_non_negative(weight);
    if reps <= 1 {
        return weight;
    }

    let r = f64::from(reps);
    let epley = weight * (1.0 + r / 30.0);

    let best = if reps < BRZYCKI_REP_LIMIT {
        let brzycki = weight * 36.0 / (37.0 - r);
        epley.max(brzycki)
    } else {
        epley
    };

    round_to_tenth(best.max(0.0))
}

/// Highest estimate across a group of sets, None when there are no sets
pub fn best_estimate(sets: &[LoggedSet]) -> Option<f64> {
    sets.iter()
        .map(|set| estimate_one_rep_max(set.clamped_weight(), set.clamped_reps()))
        .fold(None, |best, e1rm| match best {
            Some(current) if current >= e1rm => Some(current),
            _ => Some(e1rm),
        })
}

/// Find the standard for an exercise by name or alias
pub fn find_standard<'a>(
    standards: &'a [StrengthStandard],
    exercise_name: &str,
) -> Option<&'a StrengthStandard> {
    standards.iter().find(|s| s.matches(exercise_name))
}

/// Classify an estimate against the exercise's bodyweight-ratio standard
///
/// Returns None when no standard exists for the exercise or the bodyweight
/// is not positive.
pub fn classify_strength(
    standards: &[StrengthStandard],
    exercise_name: &str,
    estimate: f64,
    bodyweight: f64,
) -> Option<StrengthClassification> {
    if !(bodyweight.is_finite() && bodyweight > 0.0) {
        return None;
    }
    let standard = find_standard(standards, exercise_name)?;

    let ratio = clamp_non_negative(estimate) / bodyweight;
    let level = StrengthLevel::ALL
        .iter()
        .rev()
        .find(|level| standard.thresholds.ratio_for(**level) <= ratio)
        .copied();

    tracing::debug!(
        "Classified {} at {:.2}x bodyweight as {:?}",
        standard.exercise,
        ratio,
        level
    );

    Some(StrengthClassification { ratio, level })
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
