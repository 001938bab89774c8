use super::window::DayOfWeekWindow;
use super::{DayAdapter, HeaderDecoration, Typeface};
use time::Weekday;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct HeaderLabel {
    pub(crate) weekday: Weekday,
    pub(crate) text: &'static str,
    pub(crate) decoration: HeaderDecoration,
}

impl HeaderLabel {
    /// Returns the longest name for the weekday that fits in `width` columns
    pub(crate) fn text_for_width(&self, width: u16) -> String {
        let full = self.weekday.to_string();
        if full.len() <= usize::from(width) {
            full
        } else {
            self.text.chars().take(usize::from(width)).collect()
        }
    }
}

pub(crate) fn short_name(wd: Weekday) -> &'static str {
    match wd {
        Weekday::Sunday => "Sun",
        Weekday::Monday => "Mon",
        Weekday::Tuesday => "Tue",
        Weekday::Wednesday => "Wed",
        Weekday::Thursday => "Thu",
        Weekday::Friday => "Fri",
        Weekday::Saturday => "Sat",
    }
}

/// Labels the visible weekdays, starting at `window.first()` and wrapping
/// around through `window.last()`.
pub(crate) fn build_headers<A: DayAdapter + ?Sized>(
    window: DayOfWeekWindow,
    typeface: Typeface,
    adapter: &A,
) -> Vec<HeaderLabel> {
    window
        .weekdays()
        .map(|weekday| {
            let mut decoration = HeaderDecoration {
                typeface,
                ..HeaderDecoration::default()
            };
            adapter.update_header(&mut decoration, weekday);
            HeaderLabel {
                weekday,
                text: short_name(weekday),
                decoration,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::{Modifier, Style, Stylize};
    use std::cell::RefCell;
    use time::Weekday::*;

    #[derive(Default)]
    struct WeekendHeaders {
        calls: RefCell<Vec<Weekday>>,
    }

    impl DayAdapter for WeekendHeaders {
        fn update_header(&self, target: &mut HeaderDecoration, weekday: Weekday) {
            if matches!(weekday, Saturday | Sunday) {
                target.style = Style::new().red();
            }
            self.calls.borrow_mut().push(weekday);
        }
    }

    #[test]
    fn test_headers_follow_window() {
        let adapter = WeekendHeaders::default();
        let window = DayOfWeekWindow::new(Thursday, Some(Monday));
        let headers = build_headers(window, Typeface::default(), &adapter);
        assert_eq!(
            headers.iter().map(|h| h.text).collect::<Vec<_>>(),
            ["Thu", "Fri", "Sat", "Sun", "Mon"]
        );
        assert_eq!(headers.len(), usize::from(window.width()));
        assert_eq!(
            *adapter.calls.borrow(),
            [Thursday, Friday, Saturday, Sunday, Monday]
        );
        assert_eq!(headers[2].decoration.style, Style::new().red());
        assert_eq!(headers[0].decoration.style, Style::new());
    }

    #[test]
    fn test_header_count_matches_width_for_all_windows() {
        let all = [
            Sunday, Monday, Tuesday, Wednesday, Thursday, Friday, Saturday,
        ];
        for first in all {
            for last in all {
                let window = DayOfWeekWindow::new(first, Some(last));
                let headers = build_headers(window, Typeface::default(), &WeekendHeaders::default());
                assert_eq!(headers.len(), usize::from(window.width()));
                assert_eq!(headers[0].weekday, first);
                assert_eq!(headers.last().map(|h| h.weekday), Some(last));
            }
        }
    }

    #[test]
    fn test_text_for_width() {
        let headers = build_headers(
            DayOfWeekWindow::new(Wednesday, Some(Wednesday)),
            Typeface::default(),
            &WeekendHeaders::default(),
        );
        assert_eq!(headers[0].text_for_width(12), "Wednesday");
        assert_eq!(headers[0].text_for_width(9), "Wednesday");
        assert_eq!(headers[0].text_for_width(8), "Wed");
        assert_eq!(headers[0].text_for_width(2), "We");
    }

    /// Records the typeface each header arrives with and clears it on Sundays
    #[derive(Default)]
    struct PlainSundays {
        seen: RefCell<Vec<Typeface>>,
    }

    impl DayAdapter for PlainSundays {
        fn update_header(&self, target: &mut HeaderDecoration, weekday: Weekday) {
            self.seen.borrow_mut().push(target.typeface);
            if weekday == Sunday {
                target.typeface = Typeface::default();
            }
        }
    }

    #[test]
    fn test_typeface_forwarded_to_headers() {
        let adapter = PlainSundays::default();
        let italic = Typeface(Modifier::ITALIC);
        let headers = build_headers(DayOfWeekWindow::new(Saturday, Some(Monday)), italic, &adapter);
        assert_eq!(*adapter.seen.borrow(), [italic, italic, italic]);
        assert_eq!(
            headers.iter().map(|h| h.decoration.typeface).collect::<Vec<_>>(),
            [italic, Typeface::default(), italic]
        );
    }
}
