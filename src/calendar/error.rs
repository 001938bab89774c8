use thiserror::Error;
use time::Date;

/// A calendar setting that cannot produce a well-formed grid.  These are
/// always reported before any row is generated.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum ConfigurationError {
    #[error("weekday ordinal must be between 1 (Sunday) and 7 (Saturday), got {0}")]
    InvalidWeekdayOrdinal(i64),
    #[error("unknown weekday name {0:?}")]
    UnknownWeekday(String),
    #[error("first valid day {first} is after last valid day {last}")]
    InvertedBounds { first: Date, last: Date },
    #[error("invalid date {value:?}; expected YYYY-MM-DD")]
    InvalidDate {
        value: String,
        source: time::error::Parse,
    },
    #[error("invalid month {0:?}; expected YYYY-MM")]
    InvalidMonth(String),
    #[error("year {0} is outside the supported range")]
    YearOutOfRange(i32),
    #[error("unknown typeface modifier {0:?}")]
    UnknownTypeface(String),
    #[error("maximum tile size must be greater than zero")]
    ZeroTileSize,
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;
