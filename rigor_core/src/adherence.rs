//! Session adherence ("rigor") scoring.
//!
//! A completed session is compared to the routine it was planned from:
//! - Exercise completion (30 points): share of planned exercises done
//! - Set completion (40 points): share of target sets logged
//! - Weight adherence (30 points): average load relative to target
//! - Extra bonus (uncapped): additional sets and unplanned exercises

use crate::{
    ExerciseDetail, ExerciseStatus, LoggedSet, PlannedExercise, RigorResult, ValidationError,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

const EXERCISE_COMPLETION_POINTS: f64 = 30.0;
const SET_COMPLETION_POINTS: f64 = 40.0;
const WEIGHT_ADHERENCE_POINTS: f64 = 30.0;
const BONUS_PER_EXTRA_SET: f64 = 2.0;
const BONUS_PER_EXTRA_EXERCISE: f64 = 5.0;

/// Score plus any logged sets that had to be left out
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ScoreReport {
    pub result: RigorResult,
    pub rejected: Vec<ValidationError>,
}

/// Logged sets grouped by exercise, in order of first appearance
struct SetGroups {
    order: Vec<String>,
    by_exercise: HashMap<String, Vec<LoggedSet>>,
}

impl SetGroups {
    fn take(&mut self, exercise_id: &str) -> Vec<LoggedSet> {
        self.by_exercise.remove(exercise_id).unwrap_or_default()
    }

    /// Groups not claimed by a planned exercise, in first-appearance order
    fn into_remaining(mut self) -> Vec<(String, Vec<LoggedSet>)> {
        self.order
            .into_iter()
            .filter_map(|id| self.by_exercise.remove(&id).map(|sets| (id, sets)))
            .collect()
    }
}

fn group_sets(logged_sets: &[LoggedSet], rejected: &mut Vec<ValidationError>) -> SetGroups {
    let mut order = Vec::new();
    let mut by_exercise: HashMap<String, Vec<LoggedSet>> = HashMap::new();

    for (position, set) in logged_sets.iter().enumerate() {
        if !set.has_exercise_id() {
            tracing::warn!("Skipping logged set #{} without an exercise id", position);
            rejected.push(ValidationError::MissingExerciseId { position });
            continue;
        }

        let id = set.exercise_id.trim().to_string();
        let clean = LoggedSet {
            exercise_id: id.clone(),
            reps: set.clamped_reps() as i32,
            weight: set.clamped_weight(),
        };

        by_exercise
            .entry(id.clone())
            .or_insert_with(|| {
                order.push(id);
                Vec::new()
            })
            .push(clean);
    }

    SetGroups { order, by_exercise }
}

/// Planned exercises with their first occurrence kept and repeats rejected
fn unique_plan<'a>(
    planned_exercises: &'a [PlannedExercise],
    rejected: &mut Vec<ValidationError>,
) -> Vec<&'a PlannedExercise> {
    let mut seen = HashSet::new();
    let mut plan = Vec::with_capacity(planned_exercises.len());

    for (position, planned) in planned_exercises.iter().enumerate() {
        let id = planned.exercise_id.trim();
        if seen.insert(id) {
            plan.push(planned);
            continue;
        }
        tracing::warn!("Skipping planned exercise #{} with repeated id '{}'", position, id);
        rejected.push(ValidationError::DuplicatePlannedExercise {
            position,
            exercise_id: id.to_string(),
        });
    }

    plan
}

fn average(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn average_weight(sets: &[LoggedSet]) -> f64 {
    average(sets.iter().map(|s| s.weight)).unwrap_or(0.0)
}

fn average_reps(sets: &[LoggedSet]) -> f64 {
    average(sets.iter().map(|s| f64::from(s.clamped_reps()))).unwrap_or(0.0)
}

/// Only a positive weight target takes part in weight comparisons
fn effective_weight_target(planned: &PlannedExercise) -> Option<f64> {
    planned.weight_target.filter(|w| w.is_finite() && *w > 0.0)
}

/// Decide the status of one planned exercise from the sets logged against it
///
/// Any surplus set, or any single set heavier or longer than planned, makes
/// the exercise `Exceeded` even when other sets fall short. Without excess it
/// is `Complete` once every target set is logged and the average reps and
/// load reach their targets, and `Incomplete` otherwise.
pub fn classify_exercise(planned: &PlannedExercise, sets: &[LoggedSet]) -> ExerciseStatus {
    let done = sets.len() as u64;
    let target = u64::from(planned.sets_target);

    if done == 0 {
        return ExerciseStatus::Skipped;
    }

    let reps_target = planned.reps_target;
    let weight_target = effective_weight_target(planned);

    let any_set_above = sets.iter().any(|set| {
        set.clamped_reps() > reps_target
            || weight_target.map_or(false, |target| set.clamped_weight() > target)
    });
    if done > target || any_set_above {
        return ExerciseStatus::Exceeded;
    }

    let reps_met = average_reps(sets) >= f64::from(reps_target);
    let weight_met = weight_target.map_or(true, |target| average_weight(sets) >= target);
    if done >= target && reps_met && weight_met {
        ExerciseStatus::Complete
    } else {
        ExerciseStatus::Incomplete
    }
}

/// Score a session's logged sets against its planned exercises
///
/// Sets without an exercise id, and planned exercises repeating an earlier
/// planned id, are excluded and reported in [`ScoreReport::rejected`].
/// Negative or non-finite numbers are treated as zero. Terms whose
/// denominator would be zero contribute zero.
pub fn score(logged_sets: &[LoggedSet], planned_exercises: &[PlannedExercise]) -> ScoreReport {
    let mut rejected = Vec::new();
    let mut groups = group_sets(logged_sets, &mut rejected);
    let plan = unique_plan(planned_exercises, &mut rejected);

    let mut details = Vec::with_capacity(plan.len());
    let mut done_exercises = 0usize;
    let mut planned_sets_logged = 0u64;
    let mut total_sets_target = 0u64;
    let mut surplus_sets = 0u64;
    let mut weight_ratios = Vec::new();

    for planned in plan.iter().copied() {
        let sets = groups.take(planned.exercise_id.trim());
        let status = classify_exercise(planned, &sets);
        let sets_done = sets.len() as u64;

        if status.is_done() {
            done_exercises += 1;
        }
        planned_sets_logged += sets_done;
        total_sets_target += u64::from(planned.sets_target);
        surplus_sets += sets_done.saturating_sub(u64::from(planned.sets_target));

        if let Some(target) = effective_weight_target(planned) {
            weight_ratios.push((average_weight(&sets) / target).min(1.0));
        }

        details.push(ExerciseDetail {
            exercise_id: planned.exercise_id.clone(),
            name: planned.name.clone(),
            muscle_group: planned.muscle_group.clone(),
            sets_target: planned.sets_target,
            reps_target: planned.reps_target,
            weight_target: planned.weight_target,
            sets_done: sets_done as u32,
            sets,
            status,
        });
    }

    let extras = groups.into_remaining();
    let extra_count = extras.len();
    for (exercise_id, sets) in extras {
        details.push(ExerciseDetail {
            name: exercise_id.clone(),
            exercise_id,
            muscle_group: String::new(),
            sets_target: 0,
            reps_target: 0,
            weight_target: None,
            sets_done: sets.len() as u32,
            sets,
            status: ExerciseStatus::Extra,
        });
    }

    let exercise_completion = if plan.is_empty() {
        0.0
    } else {
        EXERCISE_COMPLETION_POINTS * done_exercises as f64 / plan.len() as f64
    };

    let set_completion = if total_sets_target == 0 {
        0.0
    } else {
        SET_COMPLETION_POINTS * (planned_sets_logged as f64 / total_sets_target as f64).min(1.0)
    };

    let weight_adherence = average(weight_ratios.into_iter())
        .map(|mean| WEIGHT_ADHERENCE_POINTS * mean)
        .unwrap_or(0.0);

    let extra_bonus = BONUS_PER_EXTRA_SET * surplus_sets as f64
        + BONUS_PER_EXTRA_EXERCISE * extra_count as f64;

    let total = exercise_completion + set_completion + weight_adherence + extra_bonus;
    let score = total.round().max(0.0) as u32;

    tracing::debug!(
        "Rigor score {} (exercises {:.1}, sets {:.1}, weight {:.1}, bonus {:.1})",
        score,
        exercise_completion,
        set_completion,
        weight_adherence,
        extra_bonus
    );

    ScoreReport {
        result: RigorResult {
            score,
            exercise_completion,
            set_completion,
            weight_adherence,
            extra_bonus,
            details,
        },
        rejected,
    }
}
