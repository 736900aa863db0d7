use chrono::NaiveDate;
use crate::error::MatchError;

/// The single accepted format for caller-supplied dates (DD-MM-YYYY)
pub const DESIRED_DATE_FORMAT: &str = "%d-%m-%Y";

/// Normalize a caller-supplied date string to a calendar date
///
/// Only `DD-MM-YYYY` is accepted, with no surrounding whitespace; anything
/// else (including ISO dates) is rejected with `InvalidDateFormat`.
pub fn parse_desired_date(input: &str) -> Result<NaiveDate, MatchError> {
    let invalid = || MatchError::InvalidDateFormat {
        input: input.to_string(),
    };

    // chrono skips whitespace ahead of numeric fields
    if input.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(input, DESIRED_DATE_FORMAT).map_err(|_| invalid())
}
