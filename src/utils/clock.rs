use chrono::{Local, NaiveDate};

/// Represents an entity responsible for providing the current date across application. This
/// allows it to be replaced during testing or when the user wants to act as of another day.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Sync + Send + 'static {
    fn today(&self) -> NaiveDate;
}

/// Uses the local calendar date, since writing days follow the user's timezone.
pub struct DefaultClock;

impl Clock for DefaultClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
