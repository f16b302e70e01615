use std::{fs, path::Path, sync::LazyLock};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

const LOG_FILE_PREFIX: &str = "wordtrack";
const KEPT_LOG_FILES: usize = 5;
const LEVEL_ENV: &str = "RUST_LOG";

/// How much to log and where. Log files are written whenever logging is enabled at all, stderr
/// only on request since stdout carries the reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogSettings {
    pub level: Option<LevelFilter>,
    pub to_stderr: bool,
}

impl LogSettings {
    /// `--log` alone traces everything to stderr, `--log-level` picks the level.
    pub fn from_flags(log: bool, level: Option<LevelFilter>) -> Self {
        Self {
            level: level.or(log.then_some(LevelFilter::TRACE)),
            to_stderr: log,
        }
    }

    /// Logging stays off unless asked for through flags or `RUST_LOG`.
    pub fn is_requested(&self, env_level: Option<&str>) -> bool {
        self.to_stderr || self.level.is_some() || env_level.is_some()
    }

    /// Filter directive for this crate. An explicit level wins over the environment.
    fn directive(&self, env_level: Option<&str>) -> String {
        let level = match (self.level, env_level) {
            (Some(level), _) => level.to_string(),
            (None, Some(env)) => env.to_string(),
            (None, None) => LevelFilter::INFO.to_string(),
        };
        format!("{}={level}", env!("CARGO_PKG_NAME").replace('-', "_"))
    }
}

/// Level chosen through `RUST_LOG`, if any.
pub fn env_level() -> Option<String> {
    std::env::var(LEVEL_ENV).ok()
}

/// Installs the global subscriber. Files rotate daily inside `state_dir/logs`.
pub fn enable_logging(settings: LogSettings, state_dir: &Path) -> Result<()> {
    let env_level = env_level();
    let log_dir = state_dir.join("logs");
    fs::create_dir_all(&log_dir)?;
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(KEPT_LOG_FILES)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(log_dir)?;

    let to_stderr = settings.to_stderr;
    let stderr = std::io::stderr.with_filter(move |_| to_stderr);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(settings.directive(env_level.as_deref())))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(stderr.and(appender))
        .pretty()
        .init();
    Ok(())
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .init()
});

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::LogSettings;

    #[test]
    fn test_settings_from_flags() {
        let quiet = LogSettings::from_flags(false, None);
        assert_eq!(quiet, LogSettings::default());
        assert!(!quiet.is_requested(None));
        assert!(quiet.is_requested(Some("debug")));

        let verbose = LogSettings::from_flags(true, None);
        assert_eq!(verbose.level, Some(LevelFilter::TRACE));
        assert!(verbose.to_stderr);

        let files_only = LogSettings::from_flags(false, Some(LevelFilter::WARN));
        assert!(files_only.is_requested(None));
        assert!(!files_only.to_stderr);

        let chosen = LogSettings::from_flags(true, Some(LevelFilter::DEBUG));
        assert_eq!(chosen.level, Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_directive() {
        let settings = LogSettings::from_flags(false, Some(LevelFilter::WARN));
        assert_eq!(settings.directive(Some("trace")), "wordtrack=warn");

        let from_env = LogSettings::default();
        assert_eq!(from_env.directive(Some("debug")), "wordtrack=debug");
        assert_eq!(from_env.directive(None), "wordtrack=info");
    }
}
