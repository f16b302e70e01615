use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// This is the standard way of converting a date to a string in wordtrack.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{format_date, parse_date};

    #[test]
    fn test_date_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_date(date), "2024-03-07");
        assert_eq!(parse_date("2024-03-07"), Some(date));
        assert_eq!(parse_date("07/03/2024"), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }
}
