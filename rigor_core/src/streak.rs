//! Perfect-day streaks over per-day habit completion counts.
//!
//! A day is "perfect" when the number of completed habits reaches the
//! user's active habit count. Today is exempt while still in progress.

use crate::CalendarDay;
use std::collections::BTreeMap;

/// Default bound on how many days the backward walk inspects
pub const DEFAULT_MAX_LOOKBACK_DAYS: u32 = 400;

fn is_perfect(
    counts: &BTreeMap<CalendarDay, u32>,
    day: CalendarDay,
    total_active_habits: u32,
) -> bool {
    counts.get(&day).copied().unwrap_or(0) >= total_active_habits
}

/// Current streak of perfect days ending today (or yesterday, if today is unfinished)
///
/// Returns 0 when the user has no active habits. The walk inspects at most
/// `max_lookback_days` days, today included.
pub fn current_streak(
    counts: &BTreeMap<CalendarDay, u32>,
    total_active_habits: u32,
    today: CalendarDay,
    max_lookback_days: u32,
) -> u32 {
    if total_active_habits == 0 {
        return 0;
    }

    let mut streak = 0;
    let mut day = today;
    for inspected in 0..max_lookback_days {
        if is_perfect(counts, day, total_active_habits) {
            streak += 1;
        } else if inspected > 0 {
            break;
        }
        day = day.pred();
    }

    tracing::debug!(
        "Current streak for {} active habits as of {}: {}",
        total_active_habits,
        today,
        streak
    );
    streak
}

/// Longest run of consecutive perfect days anywhere in the history
pub fn longest_streak(counts: &BTreeMap<CalendarDay, u32>, total_active_habits: u32) -> u32 {
    if total_active_habits == 0 {
        return 0;
    }

    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<CalendarDay> = None;

    for (day, count) in counts {
        if *count < total_active_habits {
            run = 0;
            previous = None;
            continue;
        }
        run = match previous {
            Some(prev) if prev.succ() == *day => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(*day);
    }

    longest
}

/// Number of perfect days in the history
pub fn perfect_days(counts: &BTreeMap<CalendarDay, u32>, total_active_habits: u32) -> u64 {
    if total_active_habits == 0 {
        return 0;
    }
    counts
        .values()
        .filter(|count| **count >= total_active_habits)
        .count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> CalendarDay {
        "2024-04-10".parse().unwrap()
    }

    fn history(entries: &[(u32, u32)]) -> BTreeMap<CalendarDay, u32> {
        // (days ago, completed count)
        entries
            .iter()
            .map(|(ago, count)| (today().minus_days(*ago), *count))
            .collect()
    }

    #[test]
    fn test_incomplete_today_is_skipped() {
        crate::logging::init_test();
        let counts = history(&[(0, 2), (1, 3), (2, 3)]);
        assert_eq!(current_streak(&counts, 3, today(), DEFAULT_MAX_LOOKBACK_DAYS), 2);
    }

    #[test]
    fn test_complete_today_counts() {
        let counts = history(&[(0, 3), (1, 3), (2, 3), (3, 1)]);
        assert_eq!(current_streak(&counts, 3, today(), DEFAULT_MAX_LOOKBACK_DAYS), 3);
    }

    #[test]
    fn test_gap_breaks_streak() {
        let counts = history(&[(0, 3), (1, 3), (3, 3), (4, 3)]);
        assert_eq!(current_streak(&counts, 3, today(), DEFAULT_MAX_LOOKBACK_DAYS), 2);
    }

    #[test]
    fn test_missed_yesterday_means_zero() {
        let counts = history(&[(0, 1), (1, 0), (2, 3)]);
        assert_eq!(current_streak(&counts, 3, today(), DEFAULT_MAX_LOOKBACK_DAYS), 0);
    }

    #[test]
    fn test_no_active_habits_is_zero() {
        let counts = history(&[(0, 5), (1, 5)]);
        assert_eq!(current_streak(&counts, 0, today(), DEFAULT_MAX_LOOKBACK_DAYS), 0);
        assert_eq!(current_streak(&BTreeMap::new(), 0, today(), 10), 0);
        assert_eq!(longest_streak(&counts, 0), 0);
        assert_eq!(perfect_days(&counts, 0), 0);
    }

    #[test]
    fn test_over_completion_counts() {
        let counts = history(&[(0, 5), (1, 4)]);
        assert_eq!(current_streak(&counts, 4, today(), DEFAULT_MAX_LOOKBACK_DAYS), 2);
    }

    #[test]
    fn test_walk_is_bounded() {
        let counts: BTreeMap<_, _> = (0..1000).map(|ago| (today().minus_days(ago), 2)).collect();
        assert_eq!(current_streak(&counts, 2, today(), DEFAULT_MAX_LOOKBACK_DAYS), 400);
        assert_eq!(current_streak(&counts, 2, today(), 30), 30);
    }

    #[test]
    fn test_future_entries_ignored() {
        let mut counts = history(&[(1, 3)]);
        counts.insert(today().succ(), 3);
        assert_eq!(current_streak(&counts, 3, today(), DEFAULT_MAX_LOOKBACK_DAYS), 1);
    }

    #[test]
    fn test_longest_streak() {
        let counts = history(&[(0, 3), (1, 3), (3, 3), (4, 3), (5, 3), (6, 1), (7, 3)]);
        assert_eq!(longest_streak(&counts, 3), 3);
        assert_eq!(perfect_days(&counts, 3), 6);
    }

    #[test]
    fn test_longest_streak_across_month_boundary() {
        let counts: BTreeMap<CalendarDay, u32> = ["2024-02-28", "2024-02-29", "2024-03-01"]
            .iter()
            .map(|d| (d.parse().unwrap(), 1))
            .collect();
        assert_eq!(longest_streak(&counts, 1), 3);
    }
}
