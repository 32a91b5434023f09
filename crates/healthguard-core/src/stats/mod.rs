//! Statistics over daily records.
//!
//! All figures are derived on demand and never persisted. Rounding is half
//! away from zero throughout, done in integer arithmetic.

mod progress;

pub use progress::DayProgress;

use serde::{Deserialize, Serialize};

use crate::records::DailyRecord;

/// Default trailing window size.
pub const DEFAULT_WINDOW: usize = 5;

/// Daily targets a record is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goals {
    pub water_ml: u64,
    pub stand_count: u64,
}

/// Summary over a trailing window of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Share of days meeting both goals, 0..=100.
    pub completion_rate_percent: u64,
    pub avg_water_ml: u64,
    pub avg_stand_count: u64,
    /// Number of records the figures were computed over.
    pub days: usize,
}

impl DailyRecord {
    /// Both goals met.
    pub fn meets(&self, goals: Goals) -> bool {
        self.water_amount >= goals.water_ml && self.stand_count >= goals.stand_count
    }
}

/// Compute [`Stats`] over the first `window` entries of `records`.
///
/// `records` is expected most recent first, as returned by
/// `RecordStore::list_records`. An empty window yields all zeroes.
pub fn compute_stats(records: &[DailyRecord], window: usize, goals: Goals) -> Stats {
    let recent = &records[..window.min(records.len())];
    let days = recent.len() as u64;
    if days == 0 {
        return Stats::default();
    }

    let met = recent.iter().filter(|r| r.meets(goals)).count() as u128;
    let total_water: u128 = recent.iter().map(|r| u128::from(r.water_amount)).sum();
    let total_stand: u128 = recent.iter().map(|r| u128::from(r.stand_count)).sum();
    let days = u128::from(days);

    Stats {
        completion_rate_percent: rounded_div(100 * met, days),
        avg_water_ml: rounded_div(total_water, days),
        avg_stand_count: rounded_div(total_stand, days),
        days: recent.len(),
    }
}

/// `round(numerator / denominator)`, halves rounded up. `denominator` > 0.
///
/// Takes widened operands so sums of stored `u64` counters cannot overflow;
/// a quotient beyond `u64::MAX` clamps.
pub(crate) fn rounded_div(numerator: u128, denominator: u128) -> u64 {
    let quotient = numerator.saturating_mul(2).saturating_add(denominator) / (2 * denominator);
    u64::try_from(quotient).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const GOALS: Goals = Goals {
        water_ml: 2000,
        stand_count: 12,
    };

    fn rec(d: u32, water: u64, stand: u64) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2024, 6, d).unwrap(),
            water_amount: water,
            stand_count: stand,
        }
    }

    #[test]
    fn empty_records_yield_zeroes() {
        assert_eq!(compute_stats(&[], 5, GOALS), Stats::default());
    }

    #[test]
    fn zero_window_yields_zeroes() {
        assert_eq!(compute_stats(&[rec(1, 2000, 12)], 0, GOALS), Stats::default());
    }

    #[test]
    fn half_met_window() {
        let records = [rec(2, 2000, 12), rec(1, 1000, 6)];
        let stats = compute_stats(&records, 2, GOALS);
        assert_eq!(stats.completion_rate_percent, 50);
        assert_eq!(stats.avg_water_ml, 1500);
        assert_eq!(stats.avg_stand_count, 9);
        assert_eq!(stats.days, 2);
    }

    #[test]
    fn window_takes_most_recent_only() {
        let records = [rec(3, 2400, 12), rec(2, 2000, 13), rec(1, 0, 0)];
        let stats = compute_stats(&records, 2, GOALS);
        assert_eq!(stats.completion_rate_percent, 100);
        assert_eq!(stats.avg_water_ml, 2200);
        assert_eq!(stats.days, 2);
    }

    #[test]
    fn short_history_uses_what_exists() {
        let records = [rec(1, 1000, 3)];
        let stats = compute_stats(&records, 5, GOALS);
        assert_eq!(stats.days, 1);
        assert_eq!(stats.avg_water_ml, 1000);
        assert_eq!(stats.completion_rate_percent, 0);
    }

    #[test]
    fn meeting_one_goal_is_not_enough() {
        let records = [rec(1, 5000, 11)];
        assert_eq!(compute_stats(&records, 5, GOALS).completion_rate_percent, 0);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        // 1/3 met -> 33.33 -> 33; 2/3 -> 66.67 -> 67
        let one_of_three = [rec(3, 2000, 12), rec(2, 0, 0), rec(1, 0, 0)];
        assert_eq!(compute_stats(&one_of_three, 3, GOALS).completion_rate_percent, 33);
        let two_of_three = [rec(3, 2000, 12), rec(2, 2000, 12), rec(1, 0, 0)];
        assert_eq!(compute_stats(&two_of_three, 3, GOALS).completion_rate_percent, 67);

        // (1 + 2) / 2 = 1.5 -> 2; (0 + 5) / 2 = 2.5 -> 3
        let halves = [rec(2, 1, 0), rec(1, 2, 5)];
        let stats = compute_stats(&halves, 2, GOALS);
        assert_eq!(stats.avg_water_ml, 2);
        assert_eq!(stats.avg_stand_count, 3);
    }

    #[test]
    fn huge_counters_do_not_overflow() {
        let big = 10_000_000_000_000_000_000;
        let records = [rec(2, big, u64::MAX), rec(1, big, u64::MAX)];
        let stats = compute_stats(&records, 2, GOALS);
        assert_eq!(stats.avg_water_ml, big);
        assert_eq!(stats.avg_stand_count, u64::MAX);
        assert_eq!(stats.completion_rate_percent, 100);
    }
}
