use crate::calendar::{DayAdapter, DayDecoration, HeaderDecoration};
use crate::theme::{FULL_MOON_STYLE, NEW_MOON_STYLE};
use ratatui::style::{Color, Style, Stylize};
use std::collections::BTreeSet;
use time::{Date, Weekday};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
enum Phase {
    Normal,
    Full,
    New,
}

impl Phase {
    fn for_date(date: Date) -> Phase {
        // Will give wrong results pre-1900
        let year = date.year().abs_diff(1900);
        let goldn = (year % 19) + 1;
        let mut epact = (11 * goldn + 18) % 30;
        if (epact == 25 && goldn > 11) || epact == 24 {
            epact += 1;
        }
        let ordinal0 = u32::from(date.ordinal()) - 1;
        match ((((ordinal0 + epact) * 6) + 11) % 177) / 22 & 7 {
            0 => Phase::New,
            4 => Phase::Full,
            _ => Phase::Normal,
        }
    }
}

/// Marks NetHack's full and new moons, brackets today's date, and disables
/// a configured set of dates
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Phoon {
    today: Date,
    disabled: BTreeSet<Date>,
}

impl Phoon {
    pub(crate) fn new(today: Date) -> Phoon {
        Phoon {
            today,
            disabled: BTreeSet::new(),
        }
    }

    pub(crate) fn disable<I: IntoIterator<Item = Date>>(mut self, dates: I) -> Phoon {
        self.disabled.extend(dates);
        self
    }
}

impl DayAdapter for Phoon {
    fn is_day_enabled(&self, date: Date) -> bool {
        !self.disabled.contains(&date)
    }

    fn category_colors(&self, date: Date) -> Option<Vec<Color>> {
        match Phase::for_date(date) {
            Phase::Normal => None,
            Phase::Full => Some(vec![Color::LightYellow]),
            Phase::New => Some(vec![Color::LightBlue]),
        }
    }

    fn update_day(&self, target: &mut DayDecoration, date: Date) {
        target.style = match Phase::for_date(date) {
            Phase::Normal => Style::new(),
            Phase::Full => FULL_MOON_STYLE,
            Phase::New => NEW_MOON_STYLE,
        };
        if date == self.today {
            target.text = Some(format!("[{:2}]", date.day()));
        }
    }

    fn update_header(&self, target: &mut HeaderDecoration, weekday: Weekday) {
        if weekday == self.today.weekday() {
            target.style = target.style.underlined();
        }
    }
}
