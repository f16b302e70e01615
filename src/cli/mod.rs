use std::{fmt::Display, path::PathBuf, process::ExitCode};

use anyhow::Result;
use chrono::Local;
use chrono_english::parse_date_string;
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand, ValueEnum};
use tracing::{error, level_filters::LevelFilter};

use crate::{
    chart::{ChartError, GenericChartRenderer},
    error::TrackerError,
    store::{file_store::FileStore, period::MAX_WORD_COUNT},
    tracker::{
        report::{format_report, start_message, to_json},
        Tracker, TrackerConfig, DEFAULT_FILE,
    },
    utils::{
        clock::{Clock, DefaultClock, FixedClock},
        dir::state_dir,
        logging::{enable_logging, env_level, LogSettings},
    },
};

const MALFORMED_INPUT: &str = "Malformed input. Use --help.";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "wordtrack", version, disable_help_subcommand = true)]
#[command(about = "Track daily word counts toward a writing goal", long_about = None)]
#[command(
    after_help = "Run without a command to show the statistics of the current period.\n\
                  Pass a number to store your current word count, e.g. `wordtrack 1500`. \
                  You can update as many times as you want in a day, only the latest is kept."
)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
    #[arg(long, global = true, default_value = DEFAULT_FILE, help = "File storing the tracked periods")]
    file: PathBuf,
    #[arg(long, global = true, help = "Print logs to stderr")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Level of the logs kept in the state directory. Defaults to trace with --log"
    )]
    log_level: Option<LevelFilter>,
    #[arg(
        long,
        global = true,
        help = "Act as if today was another date. Examples are \"yesterday\", \"3 days ago\", \"15/03/2025\""
    )]
    today: Option<String>,
    #[arg(long, global = true, default_value_t = DateStyle::Uk, help = "Style of dates used by --today. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
    #[arg(long, global = true, help = "Print the statistics as JSON")]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(visible_alias = "s", about = "Start a new period, starting from today")]
    Start {
        #[arg(help = "Number of days in the period [default: 30]")]
        days: Option<u32>,
        #[arg(
            help = "Target number of words [default: 50000]",
            value_parser = clap::value_parser!(u64).range(..=MAX_WORD_COUNT)
        )]
        wordgoal: Option<u64>,
    },
    #[command(visible_alias = "p", about = "Plot your progress")]
    Plot,
    #[command(visible_alias = "h", about = "Print this message")]
    Help,
    #[command(external_subcommand)]
    WordCount(Vec<String>),
}

pub fn run_cli() -> Result<ExitCode> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e)
            if matches!(
                e.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) =>
        {
            e.exit()
        }
        Err(e) => {
            eprintln!("{}", e.render());
            println!("{MALFORMED_INPUT}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let log_settings = LogSettings::from_flags(args.log, args.log_level);
    if log_settings.is_requested(env_level().as_deref()) {
        enable_logging(log_settings, &state_dir()?)?;
    }

    let clock = create_clock(args.today.as_deref(), args.date_style)?;
    let tracker = Tracker::open(
        TrackerConfig {
            file: args.file,
            ..Default::default()
        },
        clock,
    );

    let outcome = match args.command {
        None => show(&tracker, args.json),
        Some(Commands::Start { days, wordgoal }) => tracker
            .start(days, wordgoal)
            .map(|period| println!("{}", start_message(&period)))
            .map_err(Into::into),
        Some(Commands::Plot) => tracker
            .plot(&GenericChartRenderer::new())
            .map(|chart| println!("{chart}"))
            .map_err(Into::into),
        Some(Commands::Help) => {
            print_usage();
            Ok(())
        }
        Some(Commands::WordCount(tokens)) => match parse_word_count(&tokens) {
            Some(word_count) => tracker
                .update(word_count)
                .map_err(Into::into)
                .and_then(|_| show(&tracker, args.json)),
            None => {
                println!("{MALFORMED_INPUT}");
                return Ok(ExitCode::FAILURE);
            }
        },
    };

    report_outcome(outcome)
}

fn create_clock(today: Option<&str>, date_style: DateStyle) -> Result<Box<dyn Clock>> {
    let Some(today) = today else {
        return Ok(Box::new(DefaultClock));
    };
    match parse_date_string(today, Local::now(), date_style.into()) {
        Ok(date) => Ok(Box::new(FixedClock(date.date_naive()))),
        Err(e) => Err(Args::command()
            .error(
                ErrorKind::ValueValidation,
                format!("Failed to validate --today {e}"),
            )
            .into()),
    }
}

/// Word counts are given as a single token made of digits only.
fn parse_word_count(tokens: &[String]) -> Option<u64> {
    match tokens {
        [token] if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) => {
            token.parse().ok().filter(|count| *count <= MAX_WORD_COUNT)
        }
        _ => None,
    }
}

fn show(tracker: &Tracker<FileStore>, json: bool) -> Result<()> {
    let (period, stats) = tracker.status()?;
    if json {
        println!("{}", to_json(&period, &stats)?);
    } else {
        println!("{}", format_report(&stats));
    }
    Ok(())
}

fn usage() -> String {
    Args::command().render_long_help().to_string()
}

fn print_usage() {
    println!("{}", usage());
}

#[derive(Debug, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// What the user gets to see for an expected failure.
#[derive(Debug, PartialEq)]
struct Reply {
    text: String,
    stream: Stream,
    code: ExitCode,
}

impl Reply {
    fn out(text: impl Into<String>, code: ExitCode) -> Self {
        Self {
            text: text.into(),
            stream: Stream::Stdout,
            code,
        }
    }
}

/// Maps expected failures to a reply. Unexpected ones are handed back.
fn reply_for(error: TrackerError) -> Result<Reply, TrackerError> {
    match error {
        TrackerError::NoActivePeriod => Ok(Reply::out(usage(), ExitCode::SUCCESS)),
        TrackerError::PeriodExpired { .. } => Ok(Reply::out(
            "Please start a new time period.",
            ExitCode::FAILURE,
        )),
        TrackerError::Chart(ChartError::Unavailable(message)) => {
            Ok(Reply::out(message, ExitCode::SUCCESS))
        }
        TrackerError::PeriodTooLong { .. } | TrackerError::GoalTooLarge { .. } => {
            Ok(Reply::out(MALFORMED_INPUT, ExitCode::FAILURE))
        }
        e @ (TrackerError::Decode { .. } | TrackerError::InvalidPeriod { .. }) => Ok(Reply {
            text: e.to_string(),
            stream: Stream::Stderr,
            code: ExitCode::FAILURE,
        }),
        e @ TrackerError::Io(_) => Err(e),
    }
}

/// Turns expected outcomes into messages for the user. Only unexpected failures are returned as
/// errors.
fn report_outcome(outcome: Result<()>) -> Result<ExitCode> {
    let Err(e) = outcome else {
        return Ok(ExitCode::SUCCESS);
    };
    let reply = reply_for(e.downcast::<TrackerError>()?)?;
    match reply.stream {
        Stream::Stdout => println!("{}", reply.text),
        Stream::Stderr => {
            error!("{}", reply.text);
            eprintln!("{}", reply.text);
        }
    }
    Ok(reply.code)
}
