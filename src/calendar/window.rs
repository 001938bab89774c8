use super::error::ConfigurationError;
use std::iter::successors;
use time::Weekday::{self, *};

pub(crate) const DAYS_IN_WEEK: u8 = 7;

pub(crate) trait WeekdayExt {
    fn index0(&self) -> u8;

    /// Number of days from `self` forwards to `other`, in `0..7`
    fn days_until(&self, other: Weekday) -> u8;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u8 {
        self.number_days_from_sunday()
    }

    fn days_until(&self, other: Weekday) -> u8 {
        (other.index0() + DAYS_IN_WEEK - self.index0()) % DAYS_IN_WEEK
    }
}

/// Converts a 1-based weekday ordinal (1 = Sunday … 7 = Saturday) into a
/// `Weekday`.
pub(crate) fn weekday_from_ordinal(ordinal: i64) -> Result<Weekday, ConfigurationError> {
    match ordinal {
        1 => Ok(Sunday),
        2 => Ok(Monday),
        3 => Ok(Tuesday),
        4 => Ok(Wednesday),
        5 => Ok(Thursday),
        6 => Ok(Friday),
        7 => Ok(Saturday),
        n => Err(ConfigurationError::InvalidWeekdayOrdinal(n)),
    }
}

/// Parses either a weekday ordinal or an English weekday name (full or
/// abbreviated to at least two letters, case-insensitive).
pub(crate) fn parse_weekday(s: &str) -> Result<Weekday, ConfigurationError> {
    let s = s.trim();
    if let Ok(n) = s.parse::<i64>() {
        return weekday_from_ordinal(n);
    }
    let lower = s.to_ascii_lowercase();
    if lower.len() >= 2 {
        for wd in [
            Sunday, Monday, Tuesday, Wednesday, Thursday, Friday, Saturday,
        ] {
            if wd.to_string().to_ascii_lowercase().starts_with(&lower) {
                return Ok(wd);
            }
        }
    }
    Err(ConfigurationError::UnknownWeekday(s.to_owned()))
}

/// The circular range of visible weekdays, from `first` through `last`
/// inclusive.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct DayOfWeekWindow {
    first: Weekday,
    last: Weekday,
}

impl DayOfWeekWindow {
    /// When `last` is `None`, the window ends on the day before `first` and
    /// thus covers the whole week.
    pub(crate) fn new(first: Weekday, last: Option<Weekday>) -> DayOfWeekWindow {
        DayOfWeekWindow {
            first,
            last: last.unwrap_or_else(|| first.previous()),
        }
    }

    pub(crate) fn first(&self) -> Weekday {
        self.first
    }

    pub(crate) fn last(&self) -> Weekday {
        self.last
    }

    /// Number of weekdays in the window, in `1..=7`
    pub(crate) fn width(&self) -> u8 {
        self.first.days_until(self.last) + 1
    }

    pub(crate) fn contains(&self, wd: Weekday) -> bool {
        self.first.days_until(wd) <= self.first.days_until(self.last)
    }

    /// Iterates over the visible weekdays in window order
    pub(crate) fn weekdays(&self) -> impl Iterator<Item = Weekday> {
        let last = self.last;
        successors(Some(self.first), move |&wd| (wd != last).then_some(wd.next()))
    }
}

impl Default for DayOfWeekWindow {
    fn default() -> DayOfWeekWindow {
        DayOfWeekWindow::new(Monday, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Weekday; 7] = [
        Sunday, Monday, Tuesday, Wednesday, Thursday, Friday, Saturday,
    ];

    #[test]
    fn test_default_window_is_whole_week() {
        let window = DayOfWeekWindow::default();
        assert_eq!(window.first(), Monday);
        assert_eq!(window.last(), Sunday);
        assert_eq!(window.width(), 7);
        assert!(ALL.iter().all(|&wd| window.contains(wd)));
    }

    #[test]
    fn test_default_last_wraps_from_sunday() {
        let window = DayOfWeekWindow::new(Sunday, None);
        assert_eq!(weekday_from_ordinal(1), Ok(window.first()));
        assert_eq!(window.last(), Saturday);
        assert_eq!(window.width(), 7);
    }

    #[test]
    fn test_width_formula() {
        for (f, &first) in (1i64..).zip(&ALL) {
            for (l, &last) in (1i64..).zip(&ALL) {
                let window = DayOfWeekWindow::new(first, Some(last));
                let expected = (l - f + 7) % 7 + 1;
                assert_eq!(i64::from(window.width()), expected, "{first}..{last}");
                assert_eq!(window.weekdays().count(), usize::from(window.width()));
            }
        }
    }

    #[test]
    fn test_contains_plain_range() {
        let window = DayOfWeekWindow::new(Monday, Some(Friday));
        assert_eq!(
            ALL.into_iter()
                .filter(|&wd| window.contains(wd))
                .collect::<Vec<_>>(),
            [Monday, Tuesday, Wednesday, Thursday, Friday]
        );
    }

    #[test]
    fn test_contains_wrapping_range() {
        // Friday through Tuesday; Wednesday and Thursday are excluded
        assert_eq!(weekday_from_ordinal(6), Ok(Friday));
        assert_eq!(weekday_from_ordinal(3), Ok(Tuesday));
        let window = DayOfWeekWindow::new(Friday, Some(Tuesday));
        assert_eq!(window.width(), 5);
        assert!(!window.contains(Wednesday));
        assert!(!window.contains(Thursday));
        assert_eq!(
            window.weekdays().collect::<Vec<_>>(),
            [Friday, Saturday, Sunday, Monday, Tuesday]
        );
    }

    #[test]
    fn test_single_day_window() {
        let window = DayOfWeekWindow::new(Wednesday, Some(Wednesday));
        assert_eq!(window.width(), 1);
        assert_eq!(window.weekdays().collect::<Vec<_>>(), [Wednesday]);
        assert!(window.contains(Wednesday));
        assert!(!window.contains(Thursday));
        assert!(!window.contains(Tuesday));
    }

    #[test]
    fn test_explicit_last_before_first_is_whole_week() {
        let window = DayOfWeekWindow::new(Tuesday, Some(Monday));
        assert_eq!(window.width(), 7);
        assert!(ALL.iter().all(|&wd| window.contains(wd)));
    }

    #[test]
    fn test_invalid_ordinals() {
        assert_eq!(
            weekday_from_ordinal(0),
            Err(ConfigurationError::InvalidWeekdayOrdinal(0))
        );
        assert_eq!(
            weekday_from_ordinal(8),
            Err(ConfigurationError::InvalidWeekdayOrdinal(8))
        );
        assert_eq!(
            weekday_from_ordinal(-1),
            Err(ConfigurationError::InvalidWeekdayOrdinal(-1))
        );
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("monday"), Ok(Monday));
        assert_eq!(parse_weekday("Sat"), Ok(Saturday));
        assert_eq!(parse_weekday("th"), Ok(Thursday));
        assert_eq!(parse_weekday("7"), Ok(Saturday));
        assert_eq!(
            parse_weekday("t"),
            Err(ConfigurationError::UnknownWeekday(String::from("t")))
        );
        assert_eq!(
            parse_weekday("0"),
            Err(ConfigurationError::InvalidWeekdayOrdinal(0))
        );
        assert_eq!(
            parse_weekday("funday"),
            Err(ConfigurationError::UnknownWeekday(String::from("funday")))
        );
    }
}
