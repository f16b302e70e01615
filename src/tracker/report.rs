use serde::Serialize;

use crate::{stats::Statistics, store::period::Period};

/// Formats statistics the way the writing challenge dashboard shows them.
pub fn format_report(stats: &Statistics) -> String {
    format!(
        "Period: {start} - {end}

Your average per day:  {average}
Words written today:   {today}
Target word count:     {goal}
Target average word
       count per day:  {target_average}
Total words written:   {total}
Words remaining:       {remaining}
Current day:           {current_day}
Days remaining:        {days_remaining}
At this rate you
      will finish on:  {finish_date}
Words per day to
      finish on time:  {needed}
",
        start = stats.start_date,
        end = stats.end_date,
        average = stats.average_per_day,
        today = stats.words_today,
        goal = stats.word_goal,
        target_average = stats.target_average,
        total = stats.total_written,
        remaining = stats.words_remaining,
        current_day = stats.current_day,
        days_remaining = stats.days_remaining,
        finish_date = stats.finish_date,
        needed = stats.needed_per_day,
    )
}

pub fn start_message(period: &Period) -> String {
    format!(
        "Started new wordtrack period ({} days including today) with the goal of writing {} words. Good luck!",
        (period.end_date - period.start_date).num_days(),
        period.word_goal
    )
}

#[derive(Serialize)]
struct Snapshot<'a> {
    period: &'a Period,
    statistics: &'a Statistics,
}

pub fn to_json(period: &Period, stats: &Statistics) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Snapshot {
        period,
        statistics: stats,
    })
}
