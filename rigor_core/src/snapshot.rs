//! Loading of caller-prepared inputs.
//!
//! The engine itself never touches the filesystem. These helpers read the
//! JSON and CSV files an aggregation step writes out, so the CLI can feed
//! them to the engine.

use crate::{CalendarDay, ExtraData, LoggedSet, PlannedExercise, RawStats, Result};
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One session to score: the plan and what was logged
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionInput {
    #[serde(default)]
    pub planned: Vec<PlannedExercise>,
    #[serde(default)]
    pub sets: Vec<LoggedSet>,
}

/// Per-day habit completion counts for one user
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct HabitHistory {
    pub active_habits: u32,
    #[serde(default)]
    pub completions: BTreeMap<CalendarDay, u32>,
}

/// Aggregate snapshots for progression and achievements
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ProgressSnapshot {
    #[serde(default)]
    pub raw_stats: RawStats,
    #[serde(default)]
    pub extra: ExtraData,
}

/// A dated body-metric observation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MetricPoint {
    pub date: CalendarDay,
    pub value: f64,
}

/// Read and deserialize a JSON file
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)?;
    let value = serde_json::from_str(&contents)?;
    tracing::debug!("Loaded {:?}", path);
    Ok(value)
}

/// Load a `date,value` CSV of body metrics, oldest first
///
/// Rows that fail to parse are logged and skipped.
pub fn load_metric_series(path: &Path) -> Result<Vec<MetricPoint>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut points = Vec::new();
    for (row, result) in reader.deserialize::<MetricPoint>().enumerate() {
        match result {
            Ok(point) => points.push(point),
            Err(e) => {
                tracing::warn!("Skipping metric row {}: {}", row + 1, e);
            }
        }
    }

    // Stable sort keeps same-day entries in file order
    points.sort_by_key(|p| p.date);
    tracing::debug!("Loaded {} metric points from {:?}", points.len(), path);
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_load_session_input() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("session.json");
        let json = r#"{
            "planned": [
                {"exercise_id": "squat", "name": "Squat", "sets_target": 3,
                 "reps_target": 5, "weight_target": 100.0}
            ],
            "sets": [
                {"exercise_id": "squat", "reps": 5, "weight": 100.0},
                {"reps": 5, "weight": 100.0}
            ]
        }"#;
        std::fs::write(&path, json).unwrap();

        let input: SessionInput = load_json(&path).unwrap();
        assert_eq!(input.planned.len(), 1);
        assert_eq!(input.planned[0].rest_seconds, 0);
        assert_eq!(input.sets.len(), 2);
        assert!(!input.sets[1].has_exercise_id());
    }

    #[test]
    fn test_load_habit_history() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("habits.json");
        let json = r#"{
            "active_habits": 3,
            "completions": {"2024-04-08": 3, "2024-04-09": 3, "2024-04-10": 1}
        }"#;
        std::fs::write(&path, json).unwrap();

        let history: HabitHistory = load_json(&path).unwrap();
        assert_eq!(history.active_habits, 3);
        let first = history.completions.keys().next().unwrap();
        assert_eq!(first.to_string(), "2024-04-08");
    }

    #[test]
    fn test_partial_snapshot_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("snapshot.json");
        std::fs::write(&path, r#"{"raw_stats": {"workout_count": 4}}"#).unwrap();

        let snapshot: ProgressSnapshot = load_json(&path).unwrap();
        assert_eq!(snapshot.raw_stats.workout_count, 4);
        assert_eq!(snapshot.raw_stats.tonnage_tons, 0.0);
        assert!(snapshot.extra.weekly_volumes.is_empty());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        let result: Result<ProgressSnapshot> = load_json(&path);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result: Result<SessionInput> = load_json(&temp_dir.path().join("nope.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_load_metric_series_sorted_and_lenient() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("weight.csv");
        let csv = "date,value\n\
                   2024-05-03, 81.2\n\
                   2024-05-01,82.0\n\
                   not-a-date,80.0\n\
                   2024-05-02,81.6\n";
        std::fs::write(&path, csv).unwrap();

        let points = load_metric_series(&path).unwrap();
        let values: Vec<f64> = points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![82.0, 81.6, 81.2]);
    }
}
