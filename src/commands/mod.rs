use chrono::NaiveDate;

use crate::error::{LifeQuestError, Result};

pub mod add;
pub mod calendar;
pub mod delete;
pub mod edit;
pub mod goal;
pub mod init;
pub mod list;
pub mod profile;
pub mod show;
pub mod today;
pub mod toggle;

/// Parse a `YYYY-MM-DD` argument.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| LifeQuestError::InvalidDate(input.to_string()))
}

/// Parse a `YYYY-MM` argument into the first day of that month.
pub fn parse_month(input: &str) -> Result<NaiveDate> {
    let mut parts = input.splitn(2, '-');
    let year = parts.next().and_then(|p| p.parse::<i32>().ok());
    let month = parts.next().and_then(|p| p.parse::<u32>().ok());
    match (year, month) {
        (Some(y), Some(m)) => NaiveDate::from_ymd_opt(y, m, 1)
            .ok_or_else(|| LifeQuestError::InvalidMonth(input.to_string())),
        _ => Err(LifeQuestError::InvalidMonth(input.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dates_and_months() {
        assert_eq!(
            parse_date("2025-06-10").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
        );
        assert!(parse_date("2025-13-40").is_err());
        assert!(parse_date("junk").is_err());

        assert_eq!(
            parse_month("2025-06").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("2025").is_err());
    }
}
