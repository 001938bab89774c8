mod controller;
mod error;
mod grid;
mod header;
mod tile;
mod widget;
mod window;
pub(crate) use self::controller::{CalendarController, CalendarSettings};
pub(crate) use self::error::ConfigurationError;
pub(crate) use self::grid::{MonthAnchor, ValidDateBounds};
pub(crate) use self::widget::MonthCalendar;
pub(crate) use self::window::{parse_weekday, weekday_from_ordinal, DayOfWeekWindow};
use ratatui::style::{Color, Modifier, Style};
use time::{Date, Weekday};

/// Per-day behavior supplied by the embedding application.  The calendar
/// only guarantees when and with what arguments these are called.
pub(crate) trait DayAdapter {
    fn is_day_enabled(&self, _date: Date) -> bool {
        true
    }

    fn category_colors(&self, _date: Date) -> Option<Vec<Color>> {
        None
    }

    /// Called only for enabled days, after the typeface has been applied
    fn update_day(&self, _target: &mut DayDecoration, _date: Date) {}

    /// Called once per visible weekday, in window order
    fn update_header(&self, _target: &mut HeaderDecoration, _weekday: Weekday) {}
}

impl<A: DayAdapter + ?Sized> DayAdapter for &A {
    fn is_day_enabled(&self, date: Date) -> bool {
        (**self).is_day_enabled(date)
    }

    fn category_colors(&self, date: Date) -> Option<Vec<Color>> {
        (**self).category_colors(date)
    }

    fn update_day(&self, target: &mut DayDecoration, date: Date) {
        (**self).update_day(target, date);
    }

    fn update_header(&self, target: &mut HeaderDecoration, weekday: Weekday) {
        (**self).update_header(target, weekday);
    }
}

/// Text modifiers applied to every day and header label.  The calendar never
/// looks inside; it only forwards them.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Typeface(pub(crate) Modifier);

impl Typeface {
    pub(crate) fn parse<S: AsRef<str>>(names: &[S]) -> Result<Typeface, ConfigurationError> {
        let mut modifier = Modifier::empty();
        for name in names {
            modifier |= match name.as_ref().to_ascii_lowercase().as_str() {
                "bold" => Modifier::BOLD,
                "italic" => Modifier::ITALIC,
                "underlined" => Modifier::UNDERLINED,
                "dim" => Modifier::DIM,
                _ => return Err(ConfigurationError::UnknownTypeface(name.as_ref().to_owned())),
            };
        }
        Ok(Typeface(modifier))
    }
}

/// The render target handed to [`DayAdapter::update_day`]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct DayDecoration {
    pub(crate) style: Style,
    pub(crate) typeface: Typeface,
    /// Replaces the day-of-month label when set
    pub(crate) text: Option<String>,
}

/// The render target handed to [`DayAdapter::update_header`]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct HeaderDecoration {
    pub(crate) style: Style,
    pub(crate) typeface: Typeface,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typeface_parse() {
        assert_eq!(
            Typeface::parse(&["bold", "Italic"]),
            Ok(Typeface(Modifier::BOLD | Modifier::ITALIC))
        );
        assert_eq!(Typeface::parse::<&str>(&[]), Ok(Typeface::default()));
        assert_eq!(
            Typeface::parse(&["blink"]),
            Err(ConfigurationError::UnknownTypeface(String::from("blink")))
        );
    }
}
