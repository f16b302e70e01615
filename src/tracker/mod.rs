//! Operations behind every command: loading the periods, changing the current one, and saving
//! them back as a whole.

pub mod report;

use std::path::PathBuf;

use tracing::{debug, info, instrument, warn};

use crate::{
    chart::ChartRenderer,
    error::{Result, TrackerError},
    stats::Statistics,
    store::{
        file_store::{FileStore, PeriodStore},
        period::Period,
    },
    utils::clock::Clock,
};

pub const DEFAULT_FILE: &str = "./wordtrack.dat";
pub const DEFAULT_TIME_PERIOD: u32 = 30;
pub const DEFAULT_WORD_GOAL: u64 = 50000;

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Tracking file holding all periods.
    pub file: PathBuf,
    /// Used by `start` when no length is given.
    pub default_days: u32,
    /// Used by `start` when no goal is given.
    pub default_word_goal: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_FILE),
            default_days: DEFAULT_TIME_PERIOD,
            default_word_goal: DEFAULT_WORD_GOAL,
        }
    }
}

pub struct Tracker<S: PeriodStore> {
    store: S,
    clock: Box<dyn Clock>,
    default_days: u32,
    default_word_goal: u64,
}

impl Tracker<FileStore> {
    pub fn open(config: TrackerConfig, clock: Box<dyn Clock>) -> Self {
        let TrackerConfig {
            file,
            default_days,
            default_word_goal,
        } = config;
        Self {
            store: FileStore::new(file),
            clock,
            default_days,
            default_word_goal,
        }
    }
}

impl<S: PeriodStore> Tracker<S> {
    pub fn new(store: S, clock: Box<dyn Clock>, default_days: u32, default_word_goal: u64) -> Self {
        Self {
            store,
            clock,
            default_days,
            default_word_goal,
        }
    }

    /// Current period together with its statistics as of today.
    pub fn status(&self) -> Result<(Period, Statistics)> {
        let periods = self.store.load()?;
        let current = periods
            .current()
            .cloned()
            .ok_or(TrackerError::NoActivePeriod)?;
        let stats = Statistics::compute(&current, self.clock.today())?;
        Ok((current, stats))
    }

    pub fn display(&self) -> Result<String> {
        let (_, stats) = self.status()?;
        Ok(report::format_report(&stats))
    }

    /// Stores `word_count` as today's total in the current period. Repeated updates during the
    /// same day replace each other.
    #[instrument(skip(self))]
    pub fn update(&self, word_count: u64) -> Result<Statistics> {
        let mut periods = self.store.load()?;
        let today = self.clock.today();
        let current = periods
            .current_mut()
            .ok_or(TrackerError::NoActivePeriod)?;

        let stats = Statistics::compute(current, today)?;
        if stats.is_expired() {
            warn!("Refusing to update a period that ended on {}", current.end_date);
            return Err(TrackerError::PeriodExpired {
                end_date: current.end_date,
            });
        }

        record_count(&mut current.daily_counts, stats.elapsed_day, word_count);
        let stats = Statistics::compute(current, today)?;

        self.store.save(&periods)?;
        info!("Recorded {word_count} words for day {}", stats.elapsed_day);
        Ok(stats)
    }

    /// Appends a new period starting today. Previous periods are kept as history.
    #[instrument(skip(self))]
    pub fn start(&self, days: Option<u32>, word_goal: Option<u64>) -> Result<Period> {
        let days = days.unwrap_or(self.default_days);
        let word_goal = word_goal.unwrap_or(self.default_word_goal);

        let mut periods = self.store.load()?;
        let period = Period::starting_on(self.clock.today(), days, word_goal)?;
        periods.push(period.clone());
        self.store.save(&periods)?;

        info!(
            "Started period {} - {} ({} in history)",
            period.start_date,
            period.end_date,
            periods.len()
        );
        Ok(period)
    }

    /// Hands the current period and its statistics to `renderer`.
    pub fn plot(&self, renderer: &impl ChartRenderer) -> Result<String> {
        let (period, stats) = self.status()?;
        Ok(renderer.render(&period, &stats)?)
    }
}

/// Places `word_count` at position `elapsed_day` of `counts`. Days that were skipped since the
/// last update get a count of 0.
fn record_count(counts: &mut Vec<u64>, elapsed_day: i64, word_count: u64) {
    let day = elapsed_day.max(0) as usize;
    if day == 0 {
        // Before the period starts there is no day to write into, the latest count is corrected.
        match counts.last_mut() {
            Some(last) => *last = word_count,
            None => counts.push(word_count),
        }
        return;
    }

    if counts.len() < day {
        if counts.len() < day - 1 {
            debug!("Filling {} skipped days", day - 1 - counts.len());
        }
        counts.resize(day - 1, 0);
        counts.push(word_count);
    } else {
        counts[day - 1] = word_count;
    }
}
