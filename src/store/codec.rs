//! Text format of the tracking file.
//!
//! ```text
//! # comment
//! -----------------------
//! startdate: 2024-01-01
//! enddate: 2024-01-30
//! wordgoal: 50000
//! day 1: 1667
//! day 2: 3400
//! ```
//!
//! Every line starting with `---` closes the section collected so far. Day labels are not read
//! back, only the order of `day` lines matters.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{trace, warn};

use crate::utils::time::{format_date, parse_date};

use super::period::{Period, Periods, MAX_WORD_COUNT};

const HEADER: &str = "# wordtrack data file";
const DELIMITER: &str = "-----------------------";
const DELIMITER_PREFIX: &str = "---";

const START_DATE_KEY: &str = "startdate";
const END_DATE_KEY: &str = "enddate";
const WORD_GOAL_KEY: &str = "wordgoal";
const DAY_KEY_PREFIX: &str = "day";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct DecodeError {
    pub line: usize,
    pub kind: DecodeErrorKind,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeErrorKind {
    #[error("expected `key: value`, found {0:?}")]
    MissingSeparator(String),
    #[error("{0:?} is not a YYYY-MM-DD date")]
    InvalidDate(String),
    #[error("{0:?} is not a word count")]
    InvalidNumber(String),
    #[error("`{0}` is given twice for the same period")]
    DuplicateField(&'static str),
    #[error("period is missing `{0}`")]
    MissingField(&'static str),
}

impl DecodeErrorKind {
    fn at(self, line: usize) -> DecodeError {
        DecodeError { line, kind: self }
    }
}

/// Fields collected between two delimiters.
#[derive(Default)]
struct Section {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    word_goal: Option<u64>,
    daily_counts: Vec<u64>,
}

impl Section {
    fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.word_goal.is_none()
            && self.daily_counts.is_empty()
    }

    fn set(&mut self, key: &str, value: &str, line: usize) -> Result<(), DecodeError> {
        match key {
            START_DATE_KEY => set_once(&mut self.start_date, START_DATE_KEY, date(value, line)?, line),
            END_DATE_KEY => set_once(&mut self.end_date, END_DATE_KEY, date(value, line)?, line),
            WORD_GOAL_KEY => set_once(&mut self.word_goal, WORD_GOAL_KEY, number(value, line)?, line),
            key if key.starts_with(DAY_KEY_PREFIX) => {
                self.daily_counts.push(number(value, line)?);
                Ok(())
            }
            key => {
                warn!("Ignoring unknown key {key:?} on line {line}");
                Ok(())
            }
        }
    }

    /// Turns the collected fields into a [Period]. Returns `None` if nothing was collected.
    fn finish(self, line: usize) -> Result<Option<Period>, DecodeError> {
        if self.is_empty() {
            return Ok(None);
        }
        let Section {
            start_date,
            end_date,
            word_goal,
            daily_counts,
        } = self;
        Ok(Some(Period {
            start_date: start_date.ok_or(DecodeErrorKind::MissingField(START_DATE_KEY).at(line))?,
            end_date: end_date.ok_or(DecodeErrorKind::MissingField(END_DATE_KEY).at(line))?,
            word_goal: word_goal.ok_or(DecodeErrorKind::MissingField(WORD_GOAL_KEY).at(line))?,
            daily_counts,
        }))
    }
}

fn set_once<T>(
    slot: &mut Option<T>,
    key: &'static str,
    value: T,
    line: usize,
) -> Result<(), DecodeError> {
    if slot.is_some() {
        return Err(DecodeErrorKind::DuplicateField(key).at(line));
    }
    *slot = Some(value);
    Ok(())
}

fn date(value: &str, line: usize) -> Result<NaiveDate, DecodeError> {
    parse_date(value).ok_or_else(|| DecodeErrorKind::InvalidDate(value.to_string()).at(line))
}

fn number(value: &str, line: usize) -> Result<u64, DecodeError> {
    value
        .parse::<u64>()
        .ok()
        .filter(|count| *count <= MAX_WORD_COUNT)
        .ok_or_else(|| DecodeErrorKind::InvalidNumber(value.to_string()).at(line))
}

/// Parses the whole content of a tracking file. An empty input results in no periods.
pub fn decode(text: &str) -> Result<Periods, DecodeError> {
    let mut periods = Vec::new();
    let mut section = Section::default();
    let mut last_line = 0;

    for (index, raw) in text.lines().enumerate() {
        let line_number = index + 1;
        last_line = line_number;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with(DELIMITER_PREFIX) {
            if let Some(period) = std::mem::take(&mut section).finish(line_number)? {
                periods.push(period);
            }
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            return Err(DecodeErrorKind::MissingSeparator(line.to_string()).at(line_number));
        };
        section.set(key.trim(), value.trim(), line_number)?;
    }

    // The last section doesn't need a closing delimiter.
    if let Some(period) = section.finish(last_line)? {
        periods.push(period);
    }

    trace!("Decoded {} periods", periods.len());
    Ok(periods.into())
}

/// Produces the text form of `periods`. Day labels are numbered from 1 by position.
pub fn encode(periods: &Periods) -> String {
    let mut output = format!("{HEADER}\n");
    for period in periods.iter() {
        output.push_str(&format!(
            "{DELIMITER}\n{START_DATE_KEY}: {}\n{END_DATE_KEY}: {}\n{WORD_GOAL_KEY}: {}\n",
            format_date(period.start_date),
            format_date(period.end_date),
            period.word_goal
        ));
        for (index, count) in period.daily_counts.iter().enumerate() {
            output.push_str(&format!("{DAY_KEY_PREFIX} {}: {count}\n", index + 1));
        }
    }
    output
}
