//! Errors for user-entered form data.

use chrono::{NaiveDate, NaiveTime};

/// A form that cannot be submitted as entered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// One or more required fields are missing.
    #[error("Please fill out all fields")]
    Incomplete,
    /// A text field is empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),
    /// The colour is not part of the tag palette.
    #[error("unknown colour {0:?}")]
    UnknownColour(String),
    /// An announcement must be published under at least one tag.
    #[error("Select at least one tag")]
    NoTags,
    /// The announcement does not accept replies.
    #[error("This announcement does not accept answers")]
    AnswersClosed,
    /// An update form with every field left blank.
    #[error("No data to update!")]
    NothingToUpdate,
    /// A date that is not `YYYY-MM-DD`.
    #[error("invalid date {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),
    /// A course that ends before it starts.
    #[error("end date must not be before start date")]
    EndBeforeStart,
}

/// Returns the trimmed value, or [`FormError::Empty`] naming the field.
///
/// # Errors
///
/// Returns an error when the value is empty after trimming.
pub fn require_text(field: &'static str, value: &str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FormError::Empty(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Parses a `YYYY-MM-DD` date into the Unix timestamp of its midnight (UTC).
///
/// # Errors
///
/// Returns [`FormError::InvalidDate`] when the text is not a calendar date.
pub fn parse_date(value: &str) -> Result<i64, FormError> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| FormError::InvalidDate(value.to_string()))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_calendar_dates_to_midnight() {
        assert_eq!(parse_date("1970-01-02"), Ok(86_400));
        assert_eq!(parse_date(" 2024-09-01 "), Ok(1_725_148_800));
        assert_eq!(parse_date("2024-13-01"), Err(FormError::InvalidDate("2024-13-01".into())));
    }

    #[test]
    fn rejects_whitespace_only_text() {
        assert_eq!(require_text("title", "   "), Err(FormError::Empty("title")));
        assert_eq!(require_text("title", " Exams "), Ok("Exams".to_string()));
    }
}
