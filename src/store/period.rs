use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

/// Largest word count or goal accepted anywhere, so that counts always fit the signed
/// arithmetic of the statistics.
pub const MAX_WORD_COUNT: u64 = i64::MAX as u64;

/// One tracked writing challenge. `daily_counts` holds cumulative totals, the first entry
/// being the total at the end of day 1.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct Period {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub word_goal: u64,
    #[serde(default)]
    pub daily_counts: Vec<u64>,
}

impl Period {
    /// Creates a period that starts on `start_date` and ends `days` later. Note that the end date is
    /// included, so the period actually spans `days + 1` calendar days.
    pub fn starting_on(start_date: NaiveDate, days: u32, word_goal: u64) -> Result<Self> {
        if word_goal > MAX_WORD_COUNT {
            return Err(TrackerError::GoalTooLarge { word_goal });
        }
        let end_date = start_date
            .checked_add_days(Days::new(days.into()))
            .ok_or(TrackerError::PeriodTooLong { days })?;
        Ok(Self {
            start_date,
            end_date,
            word_goal,
            daily_counts: vec![0],
        })
    }

    /// Number of calendar days in the period, both ends included.
    pub fn length_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Latest cumulative count, 0 if nothing was recorded yet.
    pub fn total_written(&self) -> u64 {
        self.daily_counts.last().copied().unwrap_or(0)
    }

    pub fn with_counts(self, daily_counts: Vec<u64>) -> Self {
        Self {
            daily_counts,
            ..self
        }
    }
}

/// All periods stored in a tracking file, oldest first. Only the latest one is ever read or
/// changed by the tracker, the rest is kept as history.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Default)]
pub struct Periods(Vec<Period>);

impl Periods {
    pub fn new(periods: Vec<Period>) -> Self {
        Self(periods)
    }

    pub fn current(&self) -> Option<&Period> {
        self.0.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut Period> {
        self.0.last_mut()
    }

    /// Appends a period, which makes it the current one.
    pub fn push(&mut self, period: Period) {
        self.0.push(period)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Period> {
        self.0.iter()
    }
}

impl From<Vec<Period>> for Periods {
    fn from(value: Vec<Period>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::error::TrackerError;

    use super::{Period, Periods, MAX_WORD_COUNT};

    const START: NaiveDate = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    #[test]
    fn test_starting_on_includes_end_date() {
        let period = Period::starting_on(START, 30, 50000).unwrap();
        assert_eq!(period.end_date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(period.length_days(), 31);
        assert_eq!(period.daily_counts, vec![0]);
    }

    #[test]
    fn test_starting_on_rejects_out_of_range_values() {
        assert!(matches!(
            Period::starting_on(START, 200_000_000, 50000),
            Err(TrackerError::PeriodTooLong { days: 200_000_000 })
        ));
        assert!(matches!(
            Period::starting_on(START, u32::MAX, 50000),
            Err(TrackerError::PeriodTooLong { .. })
        ));
        assert!(matches!(
            Period::starting_on(START, 30, u64::MAX),
            Err(TrackerError::GoalTooLarge { .. })
        ));
        assert!(Period::starting_on(START, 30, MAX_WORD_COUNT).is_ok());
    }

    #[test]
    fn test_current_is_last_pushed() {
        let mut periods = Periods::default();
        assert!(periods.current().is_none());

        periods.push(Period::starting_on(START, 10, 100).unwrap());
        periods.push(Period::starting_on(START, 20, 200).unwrap());

        assert_eq!(periods.len(), 2);
        assert_eq!(periods.current().map(|p| p.word_goal), Some(200));

        if let Some(current) = periods.current_mut() {
            current.daily_counts.push(15);
        }
        assert_eq!(periods.iter().next().map(|p| p.daily_counts.len()), Some(1));
        assert_eq!(periods.current().map(Period::total_written), Some(15));
    }
}
