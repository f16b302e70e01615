use std::iter;

use crate::{
    stats::{signed_words, Statistics},
    store::period::Period,
    tracker::report::format_report,
};

use super::{ChartError, ChartRenderer};

const BAR: char = '█';
const TARGET_PACE: char = '-';
const CURRENT_PACE: char = '*';
const ON_TRACK: char = '░';
const PAST_DEADLINE: char = '▒';

/// Columns drawn after the last day of the period.
const DEADLINE_COLUMNS: usize = 2;

/// Plots progress as text: one column per day with the cumulative count as a bar, the target
/// and the current pace as lines, and the formatted statistics below.
pub struct TerminalChart {
    height: usize,
}

impl TerminalChart {
    pub fn with_height(height: usize) -> Self {
        Self {
            height: height.max(2),
        }
    }

    /// Row index (1 is the bottom row) that `value` reaches, 0 if below the first row.
    fn row_of(&self, value: i64, top: u64) -> usize {
        if value <= 0 {
            return 0;
        }
        (value as f64 / top as f64 * self.height as f64).round() as usize
    }
}

impl Default for TerminalChart {
    fn default() -> Self {
        Self::with_height(16)
    }
}

#[derive(Clone, Copy)]
enum Zone {
    Pending,
    OnTrack,
    PastDeadline,
}

struct Column {
    bar: usize,
    target: usize,
    current: usize,
    zone: Zone,
}

impl ChartRenderer for TerminalChart {
    fn render(&self, period: &Period, stats: &Statistics) -> Result<String, ChartError> {
        let days_left = stats.days_remaining.value().map_or(0, |v| (*v).max(0) as usize);
        let counts = period
            .daily_counts
            .iter()
            .copied()
            .chain(iter::repeat(0).take(days_left + 1))
            .collect::<Vec<_>>();
        let days = counts.len();
        let top = counts
            .iter()
            .copied()
            .max()
            .unwrap_or(0)
            .max(stats.word_goal)
            .max(1);

        let columns = (0..days + DEADLINE_COLUMNS)
            .map(|index| {
                let day = index as i64 + 1;
                let zone = if index >= days {
                    Zone::PastDeadline
                } else if stats.finish_day.is_some_and(|finish| day > finish) {
                    Zone::OnTrack
                } else {
                    Zone::Pending
                };
                Column {
                    bar: counts
                        .get(index)
                        .map_or(0, |count| self.row_of(signed_words(*count), top)),
                    target: self.row_of((index as i64).saturating_mul(stats.target_average), top),
                    current: self.row_of((index as i64).saturating_mul(stats.average_per_day), top),
                    zone,
                }
            })
            .collect::<Vec<_>>();

        let label_width = top.to_string().len();
        let mut output = format!("Wordtrack {} - {}\n\n", stats.start_date, stats.end_date);

        for row in (1..=self.height).rev() {
            let label = if row == self.height {
                top.to_string()
            } else if row == self.height / 2 {
                (top / 2).to_string()
            } else {
                String::new()
            };
            output.push_str(&format!("{label:>label_width$} │"));
            output.extend(columns.iter().map(|column| {
                if column.bar >= row {
                    BAR
                } else if column.target == row {
                    TARGET_PACE
                } else if column.current == row {
                    CURRENT_PACE
                } else {
                    match column.zone {
                        Zone::Pending => ' ',
                        Zone::OnTrack => ON_TRACK,
                        Zone::PastDeadline => PAST_DEADLINE,
                    }
                }
            }));
            output.push('\n');
        }

        output.push_str(&format!(
            "{:>label_width$} └{}\n",
            0,
            "─".repeat(columns.len())
        ));
        let ticks = (1..=columns.len())
            .map(|day| if day == 1 || day % 5 == 0 { '|' } else { ' ' })
            .collect::<String>();
        output.push_str(&format!("{:label_width$}  {ticks}\n", ""));
        output.push_str(&format!(
            "{:label_width$}  day 1 to {days}\n\n",
            ""
        ));
        output.push_str(&format!(
            "{BAR} words written  {TARGET_PACE} target average  {CURRENT_PACE} current average  \
             {ON_TRACK} on track  {PAST_DEADLINE} past deadline\n\n"
        ));
        output.push_str(&framed(&format_report(stats)));
        Ok(output)
    }
}

fn framed(text: &str) -> String {
    let width = text.lines().map(|line| line.chars().count()).max().unwrap_or(0);
    let mut output = format!("╭{}╮\n", "─".repeat(width + 2));
    for line in text.lines() {
        output.push_str(&format!("│ {line:<width$} │\n"));
    }
    output.push_str(&format!("╰{}╯\n", "─".repeat(width + 2)));
    output
}
