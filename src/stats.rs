//! Progress statistics of a single period, computed the same way the writing challenge dashboard
//! does it. Nothing here is persisted: statistics are recomputed for every request.

use std::fmt::{self, Display};

use chrono::{Days, NaiveDate};
use serde::{Serialize, Serializer};
use tracing::trace;

use crate::{
    error::{Result, TrackerError},
    store::period::Period,
};

pub const EXPIRED_LABEL: &str = "Time passed!";
pub const GOAL_REACHED_LABEL: &str = "Goal reached!";
pub const NOT_STARTED_LABEL: &str = "Not started yet!";

/// A statistic that either has a meaningful number or is replaced by a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading<T> {
    Value(T),
    /// The period is over.
    Expired,
    /// The goal was reached, so nothing is left to write.
    GoalReached,
    /// Nothing can be estimated yet.
    NotStarted,
}

impl<T> Reading<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Reading::Value(v) => Some(v),
            Reading::Expired | Reading::GoalReached | Reading::NotStarted => None,
        }
    }
}

impl<T: Display> Display for Reading<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Value(v) => Display::fmt(v, f),
            Reading::Expired => f.write_str(EXPIRED_LABEL),
            Reading::GoalReached => f.write_str(GOAL_REACHED_LABEL),
            Reading::NotStarted => f.write_str(NOT_STARTED_LABEL),
        }
    }
}

impl<T: Serialize> Serialize for Reading<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reading::Value(v) => v.serialize(serializer),
            Reading::Expired => serializer.serialize_str(EXPIRED_LABEL),
            Reading::GoalReached => serializer.serialize_str(GOAL_REACHED_LABEL),
            Reading::NotStarted => serializer.serialize_str(NOT_STARTED_LABEL),
        }
    }
}

/// Word counts are unsigned on disk but take part in signed differences. Counts past
/// `i64::MAX` are clamped to it.
pub(crate) fn signed_words(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Date the statistics were computed for.
    pub today: NaiveDate,
    /// Length of the period in days.
    pub target_days: i64,
    /// 1 on the start date. Can be below 1 or past `target_days`.
    pub elapsed_day: i64,
    pub current_day: Reading<i64>,
    pub days_remaining: Reading<i64>,
    pub word_goal: u64,
    pub total_written: u64,
    pub words_today: i64,
    /// Words per day needed from the start to finish on time, rounded up.
    pub target_average: i64,
    pub current_pace: f64,
    /// `current_pace` without the fraction.
    pub average_per_day: i64,
    pub words_remaining: Reading<i64>,
    /// Day number on which the goal is reached at the current pace.
    pub finish_day: Option<i64>,
    pub finish_date: Reading<NaiveDate>,
    /// Words per day needed from today to finish on time, rounded up.
    pub needed_per_day: i64,
}

impl Statistics {
    pub fn compute(period: &Period, today: NaiveDate) -> Result<Self> {
        if period.end_date < period.start_date {
            return Err(TrackerError::InvalidPeriod {
                start_date: period.start_date,
                end_date: period.end_date,
            });
        }

        let target_days = period.length_days();
        let elapsed_day = (today - period.start_date).num_days() + 1;
        let days_remaining = target_days - elapsed_day + 1;

        let total_written = period.total_written();
        let word_goal = period.word_goal;
        let words_remaining = signed_words(word_goal) - signed_words(total_written);

        let target_pace = if target_days > 0 {
            word_goal as f64 / target_days as f64
        } else {
            0.
        };
        let current_pace = if elapsed_day > 0 {
            total_written as f64 / elapsed_day as f64
        } else {
            0.
        };

        let finish_day = (current_pace > 0.).then(|| {
            elapsed_day.saturating_add((words_remaining as f64 / current_pace).ceil() as i64)
        });
        let finish_date = match finish_day {
            _ if words_remaining <= 0 => Reading::GoalReached,
            Some(day) if day != elapsed_day => days_after(today, day.saturating_sub(elapsed_day))
                .map_or(Reading::NotStarted, Reading::Value),
            Some(_) | None => Reading::NotStarted,
        };

        let needed_per_day = if days_remaining > 0 {
            (words_remaining as f64 / days_remaining as f64).ceil() as i64
        } else {
            0
        };

        let stats = Statistics {
            start_date: period.start_date,
            end_date: period.end_date,
            today,
            target_days,
            elapsed_day,
            current_day: if elapsed_day > target_days {
                Reading::Expired
            } else if elapsed_day < 1 {
                Reading::NotStarted
            } else {
                Reading::Value(elapsed_day)
            },
            days_remaining: if days_remaining <= 0 {
                Reading::Expired
            } else {
                Reading::Value(days_remaining)
            },
            word_goal,
            total_written,
            words_today: words_written_today(&period.daily_counts, elapsed_day),
            target_average: target_pace.ceil() as i64,
            current_pace,
            average_per_day: current_pace as i64,
            words_remaining: if words_remaining <= 0 {
                Reading::GoalReached
            } else {
                Reading::Value(words_remaining)
            },
            finish_day,
            finish_date,
            needed_per_day,
        };
        trace!("Computed {stats:?}");
        Ok(stats)
    }

    /// Updates are refused once the period is over.
    pub fn is_expired(&self) -> bool {
        matches!(self.days_remaining, Reading::Expired)
    }
}

/// `None` when the date would fall outside the supported calendar.
fn days_after(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let days = u64::try_from(days).ok()?;
    date.checked_add_days(Days::new(days))
}

/// On the first day the first count is what was written today. On later days it's the difference
/// between the two latest counts, a missing previous count being 0.
fn words_written_today(counts: &[u64], elapsed_day: i64) -> i64 {
    if elapsed_day == 1 {
        return signed_words(counts.first().copied().unwrap_or(0));
    }
    match counts {
        [] => 0,
        [last] => signed_words(*last),
        [.., previous, last] => signed_words(*last) - signed_words(*previous),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::{error::TrackerError, store::period::Period};

    use super::{Reading, Statistics};

    const START: NaiveDate = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    const END: NaiveDate = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();

    fn period(counts: Vec<u64>) -> Period {
        Period {
            start_date: START,
            end_date: END,
            word_goal: 50000,
            daily_counts: counts,
        }
    }

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, n).unwrap()
    }

    #[test]
    fn test_first_day() {
        let stats = Statistics::compute(&period(vec![1667]), START).unwrap();
        assert_eq!(stats.target_days, 30);
        assert_eq!(stats.current_day, Reading::Value(1));
        assert_eq!(stats.days_remaining, Reading::Value(30));
        assert_eq!(stats.words_today, 1667);
        assert_eq!(stats.target_average, 1667);
        assert_eq!(stats.average_per_day, 1667);
        assert_eq!(stats.words_remaining, Reading::Value(48333));
        assert_eq!(stats.finish_day, Some(30));
        assert_eq!(stats.finish_date, Reading::Value(END));
        assert_eq!(stats.needed_per_day, 1612);
    }

    #[test]
    fn test_later_day() {
        let stats = Statistics::compute(&period(vec![1000, 2500, 2500, 4000]), day(4)).unwrap();
        assert_eq!(stats.current_day, Reading::Value(4));
        assert_eq!(stats.words_today, 1500);
        assert_eq!(stats.total_written, 4000);
        assert_eq!(stats.average_per_day, 1000);
        assert_eq!(stats.finish_day, Some(50));
        assert_eq!(
            stats.finish_date,
            Reading::Value(NaiveDate::from_ymd_opt(2024, 2, 19).unwrap())
        );
        assert_eq!(stats.days_remaining, Reading::Value(27));
        assert_eq!(stats.needed_per_day, 1704);
    }

    #[test]
    fn test_words_today_without_previous_count() {
        let stats = Statistics::compute(&period(vec![500]), day(3)).unwrap();
        assert_eq!(stats.words_today, 500);

        let stats = Statistics::compute(&period(vec![]), day(3)).unwrap();
        assert_eq!(stats.words_today, 0);
        assert_eq!(stats.total_written, 0);
        assert_eq!(stats.finish_date, Reading::NotStarted);
    }

    #[test]
    fn test_expired_exactly_after_end_date() {
        let last_day = Statistics::compute(&period(vec![100]), END).unwrap();
        assert_eq!(last_day.days_remaining, Reading::Value(1));
        assert_eq!(last_day.current_day, Reading::Value(30));
        assert!(!last_day.is_expired());

        let after = Statistics::compute(&period(vec![100]), day(31)).unwrap();
        assert_eq!(after.days_remaining, Reading::Expired);
        assert_eq!(after.current_day, Reading::Expired);
        assert_eq!(after.needed_per_day, 0);
        assert!(after.is_expired());
    }

    #[test]
    fn test_goal_reached_exactly_at_goal() {
        let almost = Statistics::compute(&period(vec![49999]), START).unwrap();
        assert_eq!(almost.words_remaining, Reading::Value(1));

        let reached = Statistics::compute(&period(vec![50000]), START).unwrap();
        assert_eq!(reached.words_remaining, Reading::GoalReached);
        assert_eq!(reached.finish_date, Reading::GoalReached);
        assert_eq!(reached.needed_per_day, 0);

        let exceeded = Statistics::compute(&period(vec![60000]), day(2)).unwrap();
        assert_eq!(exceeded.words_remaining, Reading::GoalReached);
    }

    #[test]
    fn test_before_start() {
        let stats = Statistics::compute(&period(vec![0]), NaiveDate::from_ymd_opt(2023, 12, 30).unwrap())
            .unwrap();
        assert_eq!(stats.elapsed_day, -1);
        assert_eq!(stats.current_day, Reading::NotStarted);
        assert_eq!(stats.days_remaining, Reading::Value(32));
        assert_eq!(stats.current_pace, 0.);
        assert_eq!(stats.finish_day, None);
        assert_eq!(stats.finish_date, Reading::NotStarted);
    }

    #[test]
    fn test_far_finish_date() {
        let slow = Period {
            word_goal: 100_000_000,
            ..period(vec![1])
        };
        let stats = Statistics::compute(&slow, START).unwrap();
        assert_eq!(stats.finish_day, Some(100_000_000));
        assert_eq!(stats.finish_date, Reading::NotStarted);
        assert_eq!(stats.words_remaining, Reading::Value(99_999_999));
    }

    #[test]
    fn test_huge_counts_are_clamped() {
        let huge_goal = Period {
            word_goal: u64::MAX,
            ..period(vec![1000])
        };
        let stats = Statistics::compute(&huge_goal, START).unwrap();
        assert_eq!(stats.words_remaining, Reading::Value(i64::MAX - 1000));
        assert_eq!(stats.finish_date, Reading::NotStarted);

        let huge_total = period(vec![10, u64::MAX]);
        let stats = Statistics::compute(&huge_total, day(2)).unwrap();
        assert_eq!(stats.total_written, u64::MAX);
        assert_eq!(stats.words_today, i64::MAX - 10);
        assert_eq!(stats.words_remaining, Reading::GoalReached);
    }

    #[test]
    fn test_end_before_start_is_invalid() {
        let broken = Period {
            start_date: END,
            end_date: START,
            word_goal: 10,
            daily_counts: vec![],
        };
        assert!(matches!(
            Statistics::compute(&broken, START),
            Err(TrackerError::InvalidPeriod { .. })
        ));
    }

    #[test]
    fn test_reading_display_and_json() {
        assert_eq!(Reading::Value(12).to_string(), "12");
        assert_eq!(Reading::<i64>::Expired.to_string(), "Time passed!");
        assert_eq!(Reading::<i64>::GoalReached.to_string(), "Goal reached!");
        assert_eq!(Reading::<i64>::NotStarted.to_string(), "Not started yet!");

        assert_eq!(serde_json::to_string(&Reading::Value(START)).unwrap(), "\"2024-01-01\"");
        assert_eq!(
            serde_json::to_string(&Reading::<i64>::Expired).unwrap(),
            "\"Time passed!\""
        );
    }
}
