use super::error::ConfigurationError;
use super::window::{DayOfWeekWindow, WeekdayExt};
use super::{DayAdapter, DayDecoration, Typeface};
use ratatui::style::Color;
use std::iter::successors;
use time::{Date, Month};

/// The month being displayed
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct MonthAnchor {
    // Always the first of the month
    first: Date,
}

impl MonthAnchor {
    pub(crate) fn new(year: i32, month: Month) -> Result<MonthAnchor, ConfigurationError> {
        Date::from_calendar_date(year, month, 1)
            .map(|first| MonthAnchor { first })
            .map_err(|_| ConfigurationError::YearOutOfRange(year))
    }

    pub(crate) fn containing(date: Date) -> MonthAnchor {
        MonthAnchor {
            first: date.replace_day(1).unwrap_or(date),
        }
    }

    /// Parses a month in `YYYY-MM` form
    pub(crate) fn parse(s: &str) -> Result<MonthAnchor, ConfigurationError> {
        let invalid = || ConfigurationError::InvalidMonth(s.to_owned());
        let (year, month) = s.rsplit_once('-').ok_or_else(invalid)?;
        if month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month
            .parse::<u8>()
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .ok_or_else(invalid)?;
        MonthAnchor::new(year, month)
    }

    pub(crate) fn year(&self) -> i32 {
        self.first.year()
    }

    pub(crate) fn month(&self) -> Month {
        self.first.month()
    }

    pub(crate) fn first_day(&self) -> Date {
        self.first
    }

    pub(crate) fn last_day(&self) -> Date {
        self.next()
            .and_then(|m| m.first.previous_day())
            .unwrap_or(Date::MAX)
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    pub(crate) fn next(&self) -> Option<MonthAnchor> {
        let month = self.month().next();
        let year = if month == Month::January {
            self.year().checked_add(1)?
        } else {
            self.year()
        };
        MonthAnchor::new(year, month).ok()
    }

    pub(crate) fn previous(&self) -> Option<MonthAnchor> {
        let month = self.month().previous();
        let year = if month == Month::December {
            self.year().checked_sub(1)?
        } else {
            self.year()
        };
        MonthAnchor::new(year, month).ok()
    }
}

/// Optional inclusive limits on which dates may be enabled
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct ValidDateBounds {
    first: Option<Date>,
    last: Option<Date>,
}

impl ValidDateBounds {
    pub(crate) fn new(
        first: Option<Date>,
        last: Option<Date>,
    ) -> Result<ValidDateBounds, ConfigurationError> {
        if let (Some(first), Some(last)) = (first, last) {
            if first > last {
                return Err(ConfigurationError::InvertedBounds { first, last });
            }
        }
        Ok(ValidDateBounds { first, last })
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        self.first.map_or(true, |first| first <= date) && self.last.map_or(true, |last| date <= last)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DayCell {
    pub(crate) date: Date,
    pub(crate) day_of_month: u8,
    pub(crate) is_enabled: bool,
    pub(crate) is_in_anchor_month: bool,
    // Empty whenever `is_enabled` is false
    pub(crate) category_colors: Vec<Color>,
    pub(crate) decoration: DayDecoration,
}

#[derive(Clone, Debug, Eq, PartialEq)]
// Invariant: Nonempty
pub(crate) struct WeekRow(Vec<DayCell>);

impl WeekRow {
    pub(crate) fn cells(&self) -> &[DayCell] {
        &self.0
    }

    pub(crate) fn get(&self, i: usize) -> Option<&DayCell> {
        self.0.get(i)
    }
}

/// An owned position in the calendar that only moves forwards, one day at a
/// time
#[derive(Debug, Eq, PartialEq)]
struct DateCursor(Date);

impl DateCursor {
    /// Positions the cursor on the last `window.first()` on or before the
    /// first of the month
    fn start(anchor: MonthAnchor, window: DayOfWeekWindow) -> DateCursor {
        let first = anchor.first_day();
        let back = window.first().days_until(first.weekday());
        let date = successors(Some(first), |d| d.previous_day())
            .take(usize::from(back) + 1)
            .last()
            .unwrap_or(first);
        DateCursor(date)
    }

    fn date(&self) -> Date {
        self.0
    }

    // Returns `None` at the end of time
    fn advance(self) -> Option<DateCursor> {
        self.0.next_day().map(DateCursor)
    }
}

/// Lays out the weeks of `anchor`'s month as rows of the days in `window`.
pub(crate) fn build_grid<A: DayAdapter + ?Sized>(
    anchor: MonthAnchor,
    window: DayOfWeekWindow,
    bounds: ValidDateBounds,
    typeface: Typeface,
    adapter: &A,
) -> Vec<WeekRow> {
    let width = usize::from(window.width());
    let month_end = anchor.last_day();
    let stop_weekday = window.last().next();
    let mut rows = Vec::new();
    let mut row = Vec::with_capacity(width);
    let mut cursor = Some(DateCursor::start(anchor, window));
    while let Some(here) = cursor {
        let date = here.date();
        let weekday = date.weekday();
        if date > month_end && weekday == stop_weekday {
            break;
        }
        if window.contains(weekday) {
            row.push(make_cell(date, anchor, bounds, typeface, adapter));
            if weekday == window.last() {
                rows.push(WeekRow(std::mem::replace(
                    &mut row,
                    Vec::with_capacity(width),
                )));
            }
        }
        cursor = here.advance();
    }
    if !row.is_empty() {
        rows.push(WeekRow(row));
    }
    rows
}

fn make_cell<A: DayAdapter + ?Sized>(
    date: Date,
    anchor: MonthAnchor,
    bounds: ValidDateBounds,
    typeface: Typeface,
    adapter: &A,
) -> DayCell {
    let is_in_anchor_month = anchor.contains(date);
    let is_enabled = adapter.is_day_enabled(date) && is_in_anchor_month && bounds.contains(date);
    let mut decoration = DayDecoration {
        typeface,
        ..DayDecoration::default()
    };
    let category_colors = if is_enabled {
        adapter.update_day(&mut decoration, date);
        adapter.category_colors(date).unwrap_or_default()
    } else {
        Vec::new()
    };
    DayCell {
        date,
        day_of_month: date.day(),
        is_enabled,
        is_in_anchor_month,
        category_colors,
        decoration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use time::macros::date;
    use time::Weekday::{self, *};

    struct AllEnabled;

    impl DayAdapter for AllEnabled {}

    /// Colors every day and records which days were decorated
    #[derive(Default)]
    struct Recorder {
        disabled: Vec<Date>,
        decorated: RefCell<Vec<Date>>,
    }

    impl DayAdapter for Recorder {
        fn is_day_enabled(&self, date: Date) -> bool {
            !self.disabled.contains(&date)
        }

        fn category_colors(&self, _date: Date) -> Option<Vec<Color>> {
            Some(vec![Color::Red, Color::Green])
        }

        fn update_day(&self, target: &mut DayDecoration, date: Date) {
            target.text = Some(String::from("*"));
            self.decorated.borrow_mut().push(date);
        }
    }

    const ALL: [Weekday; 7] = [
        Sunday, Monday, Tuesday, Wednesday, Thursday, Friday, Saturday,
    ];

    fn dates(rows: &[WeekRow]) -> Vec<Vec<Date>> {
        rows.iter()
            .map(|r| r.cells().iter().map(|c| c.date).collect())
            .collect()
    }

    fn anchors() -> impl Iterator<Item = MonthAnchor> {
        successors(MonthAnchor::new(2023, Month::October).ok(), |m| m.next()).take(30)
    }

    #[test]
    fn test_default_window_october_2026() {
        let anchor = MonthAnchor::containing(date!(2026 - 10 - 01));
        let rows = build_grid(
            anchor,
            DayOfWeekWindow::default(),
            ValidDateBounds::default(),
            Typeface::default(),
            &AllEnabled,
        );
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].cells()[0].date, date!(2026 - 09 - 28));
        assert_eq!(rows[0].cells()[3].date, date!(2026 - 10 - 01));
        assert_eq!(rows[4].cells()[6].date, date!(2026 - 11 - 01));
        assert!(rows.iter().all(|r| r.cells().len() == 7));
        let in_month = rows
            .iter()
            .flat_map(WeekRow::cells)
            .filter(|c| c.is_in_anchor_month)
            .count();
        assert_eq!(in_month, 31);
    }

    #[test]
    fn test_thirty_day_month_row_count() {
        // June 2025 starts on a Sunday, so Monday-first has six leading days
        let anchor = MonthAnchor::containing(date!(2025 - 06 - 01));
        let rows = build_grid(
            anchor,
            DayOfWeekWindow::default(),
            ValidDateBounds::default(),
            Typeface::default(),
            &AllEnabled,
        );
        assert_eq!(rows.len(), (6 + 30usize).div_ceil(7));
        assert_eq!(rows[0].cells()[0].date, date!(2025 - 05 - 26));
        assert_eq!(rows[0].cells()[6].date, date!(2025 - 06 - 01));
        assert_eq!(rows[5].cells()[6].date, date!(2025 - 07 - 06));
    }

    #[test]
    fn test_month_ending_on_last_weekday_adds_no_trailing_row() {
        // February 2026 runs from a Sunday to a Saturday
        let anchor = MonthAnchor::containing(date!(2026 - 02 - 01));
        let rows = build_grid(
            anchor,
            DayOfWeekWindow::new(Sunday, None),
            ValidDateBounds::default(),
            Typeface::default(),
            &AllEnabled,
        );
        assert_eq!(
            dates(&rows),
            successors(Some(date!(2026 - 02 - 01)), |d| d.next_day())
                .take(28)
                .collect::<Vec<_>>()
                .chunks(7)
                .map(<[Date]>::to_vec)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_crosses_year_boundary() {
        let anchor = MonthAnchor::containing(date!(2025 - 12 - 01));
        let rows = build_grid(
            anchor,
            DayOfWeekWindow::default(),
            ValidDateBounds::default(),
            Typeface::default(),
            &AllEnabled,
        );
        let last = rows.last().and_then(|r| r.cells().last());
        assert_eq!(
            last.map(|c| (c.date, c.is_in_anchor_month, c.is_enabled)),
            Some((date!(2026 - 01 - 04), false, false))
        );
        let anchor = MonthAnchor::containing(date!(2026 - 01 - 01));
        let rows = build_grid(
            anchor,
            DayOfWeekWindow::default(),
            ValidDateBounds::default(),
            Typeface::default(),
            &AllEnabled,
        );
        assert_eq!(rows[0].cells()[0].date, date!(2025 - 12 - 29));
    }

    #[test]
    fn test_wrapping_window() {
        // Friday through Tuesday
        let window = DayOfWeekWindow::new(Friday, Some(Tuesday));
        let anchor = MonthAnchor::containing(date!(2026 - 10 - 01));
        let rows = build_grid(
            anchor,
            window,
            ValidDateBounds::default(),
            Typeface::default(),
            &AllEnabled,
        );
        assert_eq!(rows[0].cells()[0].date, date!(2026 - 09 - 25));
        assert_eq!(rows[0].cells()[4].date, date!(2026 - 09 - 29));
        assert_eq!(rows[1].cells()[0].date, date!(2026 - 10 - 02));
        assert!(rows
            .iter()
            .flat_map(WeekRow::cells)
            .all(|c| !matches!(c.date.weekday(), Wednesday | Thursday)));
        assert_eq!(
            rows.last().and_then(|r| r.cells().last()).map(|c| c.date),
            Some(date!(2026 - 11 - 03))
        );
    }

    #[test]
    fn test_single_day_window() {
        let window = DayOfWeekWindow::new(Monday, Some(Monday));
        let anchor = MonthAnchor::containing(date!(2026 - 08 - 01));
        let rows = build_grid(
            anchor,
            window,
            ValidDateBounds::default(),
            Typeface::default(),
            &AllEnabled,
        );
        assert_eq!(
            dates(&rows),
            [
                [date!(2026 - 07 - 27)],
                [date!(2026 - 08 - 03)],
                [date!(2026 - 08 - 10)],
                [date!(2026 - 08 - 17)],
                [date!(2026 - 08 - 24)],
                [date!(2026 - 08 - 31)],
            ]
        );
    }

    #[test]
    fn test_row_shape_for_all_windows() {
        for first in ALL {
            for last in ALL {
                let window = DayOfWeekWindow::new(first, Some(last));
                for anchor in anchors() {
                    let rows = build_grid(
                        anchor,
                        window,
                        ValidDateBounds::default(),
                        Typeface::default(),
                        &AllEnabled,
                    );
                    assert!(!rows.is_empty(), "{window:?} {anchor:?}");
                    for r in &rows {
                        assert_eq!(r.cells().len(), usize::from(window.width()), "{window:?} {anchor:?}");
                        for (cell, wd) in r.cells().iter().zip(window.weekdays()) {
                            assert_eq!(cell.date.weekday(), wd, "{window:?} {anchor:?}");
                        }
                    }
                    let all = rows
                        .iter()
                        .flat_map(WeekRow::cells)
                        .map(|c| c.date)
                        .collect::<Vec<_>>();
                    assert!(
                        all.windows(2).all(|w| w[0] < w[1]),
                        "dates should strictly increase: {window:?} {anchor:?}"
                    );
                    let first_cell = &rows[0].cells()[0];
                    assert!(first_cell.date <= anchor.first_day(), "{window:?} {anchor:?}");
                    let Some(last_cell) = rows.last().and_then(|r| r.cells().last()) else {
                        panic!("empty grid for {window:?} {anchor:?}");
                    };
                    assert_eq!(last_cell.date.weekday(), last, "{window:?} {anchor:?}");
                    assert!(last_cell.date >= anchor.last_day(), "{window:?} {anchor:?}");
                    // Every visible day of the month is present
                    let expected = successors(Some(anchor.first_day()), |d| d.next_day())
                        .take_while(|&d| d <= anchor.last_day())
                        .filter(|d| window.contains(d.weekday()))
                        .count();
                    let got = all.iter().filter(|&&d| anchor.contains(d)).count();
                    assert_eq!(got, expected, "{window:?} {anchor:?}");
                }
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let adapter = Recorder {
            disabled: vec![date!(2026 - 10 - 13)],
            ..Recorder::default()
        };
        let anchor = MonthAnchor::containing(date!(2026 - 10 - 01));
        let window = DayOfWeekWindow::new(Tuesday, Some(Saturday));
        let bounds = ValidDateBounds {
            first: Some(date!(2026 - 10 - 05)),
            last: None,
        };
        let one = build_grid(anchor, window, bounds, Typeface::default(), &adapter);
        let two = build_grid(anchor, window, bounds, Typeface::default(), &adapter);
        assert_eq!(one, two);
    }

    #[test]
    fn test_disabled_days() {
        let adapter = Recorder {
            disabled: vec![date!(2026 - 10 - 13)],
            ..Recorder::default()
        };
        let anchor = MonthAnchor::containing(date!(2026 - 10 - 01));
        let bounds = ValidDateBounds {
            first: Some(date!(2026 - 10 - 05)),
            last: Some(date!(2026 - 10 - 25)),
        };
        let rows = build_grid(
            anchor,
            DayOfWeekWindow::default(),
            bounds,
            Typeface::default(),
            &adapter,
        );
        for cell in rows.iter().flat_map(WeekRow::cells) {
            let expected = cell.is_in_anchor_month
                && bounds.contains(cell.date)
                && cell.date != date!(2026 - 10 - 13);
            assert_eq!(cell.is_enabled, expected, "{}", cell.date);
            if cell.is_enabled {
                assert_eq!(cell.category_colors, [Color::Red, Color::Green]);
                assert_eq!(cell.decoration.text.as_deref(), Some("*"));
            } else {
                assert!(cell.category_colors.is_empty(), "{}", cell.date);
                assert_eq!(cell.decoration, DayDecoration::default());
            }
        }
        let decorated = adapter.decorated.borrow();
        assert_eq!(decorated.len(), 20);
        assert_eq!(decorated.first(), Some(&date!(2026 - 10 - 05)));
        assert_eq!(decorated.last(), Some(&date!(2026 - 10 - 25)));
    }

    #[test]
    fn test_typeface_forwarded() {
        let typeface = Typeface(ratatui::style::Modifier::ITALIC);
        let anchor = MonthAnchor::containing(date!(2026 - 10 - 01));
        let rows = build_grid(
            anchor,
            DayOfWeekWindow::default(),
            ValidDateBounds::default(),
            typeface,
            &AllEnabled,
        );
        assert!(rows
            .iter()
            .flat_map(WeekRow::cells)
            .all(|c| c.decoration.typeface == typeface));
    }

    #[test]
    fn test_inverted_bounds() {
        assert_eq!(
            ValidDateBounds::new(Some(date!(2026 - 10 - 02)), Some(date!(2026 - 10 - 01))),
            Err(ConfigurationError::InvertedBounds {
                first: date!(2026 - 10 - 02),
                last: date!(2026 - 10 - 01),
            })
        );
        assert!(ValidDateBounds::new(Some(date!(2026 - 10 - 01)), Some(date!(2026 - 10 - 01))).is_ok());
    }

    #[test]
    fn test_month_anchor() {
        let anchor = MonthAnchor::containing(date!(2024 - 02 - 10));
        assert_eq!(MonthAnchor::parse("2024-02"), Ok(anchor));
        assert_eq!(anchor.last_day(), date!(2024 - 02 - 29));
        assert_eq!(anchor.previous(), MonthAnchor::new(2024, Month::January).ok());
        assert_eq!(
            MonthAnchor::containing(date!(2024 - 12 - 01)).next(),
            MonthAnchor::new(2025, Month::January).ok()
        );
        assert_eq!(
            MonthAnchor::containing(date!(2026 - 10 - 14)),
            MonthAnchor::containing(date!(2026 - 10 - 01))
        );
        assert!(MonthAnchor::parse("-0044-03").is_ok());
        for bad in ["2024", "2024-13", "2024-1", "abcd-01", "2024-00"] {
            assert_eq!(
                MonthAnchor::parse(bad),
                Err(ConfigurationError::InvalidMonth(String::from(bad))),
                "{bad}"
            );
        }
    }
}
