//! Exponential smoothing for body-metric trends and weekly volume bucketing.
//!
//! Formula: `alpha = 2/(N+1)`, `ema_t = alpha * x_t + (1 - alpha) * ema_{t-1}`,
//! seeded with the first finite observation.

use crate::CalendarDay;
use std::collections::BTreeMap;

/// Exponential moving average over an ordered series
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrendSmoother {
    alpha: f64,
}

impl TrendSmoother {
    /// Smoother with an explicit factor, clamped into (0, 1]
    pub fn new(alpha: f64) -> Self {
        let alpha = if alpha.is_finite() && alpha > 0.0 {
            alpha.min(1.0)
        } else {
            1.0
        };
        Self { alpha }
    }

    /// Smoother equivalent to an N-point window
    pub fn from_window(window: u32) -> Self {
        Self::new(2.0 / (f64::from(window.max(1)) + 1.0))
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Smoothed value at every position of the series
    ///
    /// Non-finite observations carry the previous average forward; positions
    /// before the first finite observation are reported as that observation.
    /// A series with no finite values smooths to zeros.
    pub fn smooth(&self, series: &[f64]) -> Vec<f64> {
        let Some(seed) = series.iter().copied().find(|v| v.is_finite()) else {
            return series.iter().map(|_| 0.0).collect();
        };

        let mut ema = seed;
        series
            .iter()
            .map(|value| {
                if value.is_finite() {
                    ema = value.mul_add(self.alpha, ema * (1.0 - self.alpha));
                }
                ema
            })
            .collect()
    }

    /// Final smoothed value, None for an empty series
    pub fn latest(&self, series: &[f64]) -> Option<f64> {
        self.smooth(series).last().copied()
    }
}

/// Sum per-day volumes into Monday-start weeks, oldest week first
///
/// Weeks with no entries between the first and last week appear as zero so
/// positions line up with calendar weeks.
pub fn weekly_totals(entries: &[(CalendarDay, f64)]) -> Vec<f64> {
    let mut weeks: BTreeMap<CalendarDay, f64> = BTreeMap::new();
    for (day, volume) in entries {
        let volume = if volume.is_finite() && *volume > 0.0 {
            *volume
        } else {
            0.0
        };
        *weeks.entry(day.week_start()).or_insert(0.0) += volume;
    }

    let (Some(first), Some(last)) = (
        weeks.keys().next().copied(),
        weeks.keys().next_back().copied(),
    ) else {
        return Vec::new();
    };

    let mut totals = Vec::new();
    let mut week = first;
    while week <= last {
        totals.push(weeks.get(&week).copied().unwrap_or(0.0));
        week = week.plus_days(7);
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_window_alpha() {
        assert!(approx(TrendSmoother::from_window(7).alpha(), 0.25));
        assert!(approx(TrendSmoother::from_window(1).alpha(), 1.0));
        assert!(approx(TrendSmoother::from_window(0).alpha(), 1.0));
    }

    #[test]
    fn test_smooth_series() {
        let smoother = TrendSmoother::new(0.5);
        let out = smoother.smooth(&[80.0, 82.0, 78.0]);
        assert!(approx(out[0], 80.0));
        assert!(approx(out[1], 81.0));
        assert!(approx(out[2], 79.5));
        assert_eq!(smoother.latest(&[80.0, 82.0, 78.0]), Some(out[2]));
    }

    #[test]
    fn test_empty_series() {
        let smoother = TrendSmoother::from_window(7);
        assert!(smoother.smooth(&[]).is_empty());
        assert_eq!(smoother.latest(&[]), None);
    }

    #[test]
    fn test_non_finite_values_carry_forward() {
        let smoother = TrendSmoother::new(0.5);
        let out = smoother.smooth(&[f64::NAN, 80.0, f64::INFINITY, 84.0]);
        assert!(approx(out[0], 80.0));
        assert!(approx(out[1], 80.0));
        assert!(approx(out[2], 80.0));
        assert!(approx(out[3], 82.0));
    }

    #[test]
    fn test_invalid_alpha_clamped() {
        assert_eq!(TrendSmoother::new(-1.0).alpha(), 1.0);
        assert_eq!(TrendSmoother::new(f64::NAN).alpha(), 1.0);
        assert_eq!(TrendSmoother::new(3.0).alpha(), 1.0);
    }

    #[test]
    fn test_constant_series_stays_constant() {
        let out = TrendSmoother::from_window(10).smooth(&[72.5; 20]);
        assert!(out.iter().all(|v| approx(*v, 72.5)));
    }

    #[test]
    fn test_weekly_totals() {
        let day = |s: &str| s.parse::<CalendarDay>().unwrap();
        let entries = vec![
            (day("2024-06-11"), 3_000.0), // week of 06-10
            (day("2024-06-13"), 2_000.0),
            (day("2024-06-25"), 4_500.0), // week of 06-24, 06-17 is empty
            (day("2024-06-16"), -50.0),   // clamped, still week of 06-10
        ];
        assert_eq!(weekly_totals(&entries), vec![5_000.0, 0.0, 4_500.0]);
        assert!(weekly_totals(&[]).is_empty());
    }
}
