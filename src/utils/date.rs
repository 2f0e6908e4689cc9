use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Parse an optional `YYYY-MM-DD` CLI argument.
pub fn parse_optional(s: Option<&str>) -> AppResult<Option<NaiveDate>> {
    match s {
        None => Ok(None),
        Some(raw) => parse_date(raw.trim())
            .map(Some)
            .ok_or_else(|| AppError::InvalidDate(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_date("2024-03-01"), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(parse_date("03/01/2024"), None);
    }

    #[test]
    fn optional_argument() {
        assert_eq!(parse_optional(None).unwrap(), None);
        assert!(parse_optional(Some("2024-13-01")).is_err());
        assert_eq!(
            parse_optional(Some(" 2024-03-01 ")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }
}
