use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::{chart::ChartError, store::codec::DecodeError};

/// Errors produced by the tracking operations. Everything that isn't [TrackerError::Io] or
/// [TrackerError::Decode] is a regular user-facing outcome rather than a failure.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Cannot read tracking data in {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
    #[error("No active period. Start one with `wordtrack start`")]
    NoActivePeriod,
    #[error("The period ended on {end_date}. Please start a new time period.")]
    PeriodExpired { end_date: NaiveDate },
    #[error("Period {start_date} - {end_date} ends before it starts")]
    InvalidPeriod {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    #[error("A period of {days} days ends past the last supported date")]
    PeriodTooLong { days: u32 },
    #[error("A goal of {word_goal} words is too large")]
    GoalTooLarge { word_goal: u64 },
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = TrackerError> = std::result::Result<T, E>;
