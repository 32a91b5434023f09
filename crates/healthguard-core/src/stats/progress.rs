use chrono::NaiveDate;
use serde::Serialize;

use super::{rounded_div, Goals};
use crate::records::DailyRecord;

/// Completion of a single day against the goals, in percent.
///
/// Percentages are not capped: 3000 ml against a 2000 ml goal is 150.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayProgress {
    pub date: NaiveDate,
    pub water_amount: u64,
    pub stand_count: u64,
    pub water_percent: u64,
    pub stand_percent: u64,
    /// Mean of the two percentages.
    pub overall_percent: u64,
}

impl DayProgress {
    pub fn for_record(record: &DailyRecord, goals: Goals) -> Self {
        let water_percent = percent(record.water_amount, goals.water_ml);
        let stand_percent = percent(record.stand_count, goals.stand_count);
        Self {
            date: record.date,
            water_amount: record.water_amount,
            stand_count: record.stand_count,
            water_percent,
            stand_percent,
            overall_percent: rounded_div(u128::from(water_percent) + u128::from(stand_percent), 2),
        }
    }
}

fn percent(value: u64, goal: u64) -> u64 {
    if goal == 0 {
        return 0;
    }
    rounded_div(100 * u128::from(value), u128::from(goal))
}
