use super::controller::{CalendarController, Extent, Visibility};
use super::grid::{DayCell, MonthAnchor};
use super::header::HeaderLabel;
use super::DayAdapter;
use crate::theme::{BASE_STYLE, DISABLED_STYLE, SELECTED_MODIFIER, TITLE_STYLE, WEEKDAY_STYLE};
use ratatui::{prelude::*, widgets::*};
use std::marker::PhantomData;
use time::Date;

/// Line on which the month and year are written
const TITLE_LINE: u16 = 0;

/// Line on which the weekday names are written
const HEADER_LINE: u16 = 1;

/// Line holding the rule under the weekday names
const RULE_LINE: u16 = 2;

/// Number of lines above the first week
const HEADER_LINES: u16 = 3;

const ACS_HLINE: char = '─';

/// Drawn once per category color of a day
const CATEGORY_MARK: char = '●';

/// Draws the grid held by a [`CalendarController`], sizing the tiles from
/// the width of the area it is given.  Nothing is drawn while the tile size
/// is unavailable.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MonthCalendar<A> {
    selected: Option<Date>,
    _data: PhantomData<A>,
}

impl<A> MonthCalendar<A> {
    pub(crate) fn new() -> MonthCalendar<A> {
        MonthCalendar {
            selected: None,
            _data: PhantomData,
        }
    }

    pub(crate) fn selected(mut self, date: Option<Date>) -> MonthCalendar<A> {
        self.selected = date;
        self
    }
}

impl<A: DayAdapter> StatefulWidget for MonthCalendar<A> {
    type State = CalendarController<A>;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if state.layout_ready(i32::from(area.width)) == Visibility::Hidden {
            return;
        }
        let (Some(header), Some(day)) = (state.extent(0), state.extent(1)) else {
            return;
        };
        let padding = state.settings().padding;
        let slot = day.width.saturating_add(padding.saturating_mul(2));
        let columns = u16::from(state.settings().window.width());
        let grid_width = slot.saturating_mul(columns);
        let left = area.width.saturating_sub(grid_width) / 2;
        let tile_x = |col: u16| {
            left.saturating_add(col.saturating_mul(slot))
                .saturating_add(padding)
        };
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_title(state.anchor(), left, grid_width);
        for (col, label) in std::iter::zip(0u16.., state.headers()) {
            canvas.draw_header(tile_x(col), header, label);
        }
        canvas.hline(RULE_LINE, left, ACS_HLINE, grid_width);
        for (week_no, row) in std::iter::zip(0u16.., state.rows()) {
            let y = HEADER_LINES.saturating_add(week_no.saturating_mul(day.height));
            for (col, cell) in std::iter::zip(0u16.., row.cells()) {
                let selected = self.selected == Some(cell.date);
                canvas.draw_day(y, tile_x(col), day, cell, selected);
            }
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_title(&mut self, anchor: MonthAnchor, left: u16, grid_width: u16) {
        let title = format!("{} {}", anchor.month(), anchor.year());
        let offset = grid_width.saturating_sub(text_width(&title)) / 2;
        self.mvprint(TITLE_LINE, left.saturating_add(offset), title, TITLE_STYLE);
    }

    fn draw_header(&mut self, x: u16, extent: Extent, label: &HeaderLabel) {
        let text = label.text_for_width(extent.width);
        let offset = extent.width.saturating_sub(text_width(&text)) / 2;
        let style = WEEKDAY_STYLE
            .patch(label.decoration.style)
            .add_modifier(label.decoration.typeface.0);
        self.mvprint(HEADER_LINE, x.saturating_add(offset), text, style);
    }

    fn draw_day(&mut self, y: u16, x: u16, extent: Extent, cell: &DayCell, selected: bool) {
        let mut style = if cell.is_enabled {
            BASE_STYLE.patch(cell.decoration.style)
        } else {
            DISABLED_STYLE
        };
        if selected {
            style = style.add_modifier(SELECTED_MODIFIER);
        }
        self.fill(y, x, extent, style);
        let label = cell
            .decoration
            .text
            .clone()
            .unwrap_or_else(|| format!("{:2}", cell.day_of_month));
        let label_width = text_width(&label);
        self.mvprint(
            y,
            x,
            label,
            style.add_modifier(cell.decoration.typeface.0),
        );
        // Category marks go along the bottom of the tile, or after the label
        // when the tile is only one line tall
        let (mark_y, mut mark_x) = if extent.height > 1 {
            (y.saturating_add(extent.height - 1), x)
        } else {
            (y, x.saturating_add(label_width).saturating_add(1))
        };
        let right = x.saturating_add(extent.width);
        for &color in &cell.category_colors {
            if mark_x >= right {
                break;
            }
            self.mvprint(mark_y, mark_x, String::from(CATEGORY_MARK), style.fg(color));
            mark_x += 1;
        }
    }

    fn fill(&mut self, y: u16, x: u16, extent: Extent, style: Style) {
        if y < self.area.height && x < self.area.width {
            let rect = Rect {
                x: x + self.area.x,
                y: y + self.area.y,
                width: extent.width.min(self.area.width - x),
                height: extent.height.min(self.area.height - y),
            };
            self.buf.set_style(rect, style);
        }
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style);
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // calendar's area, though we need to be sure that the Rect passed
            // to the Paragraph is entirely within the frame lest a panic
            // result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), BASE_STYLE);
    }
}

fn text_width(s: &str) -> u16 {
    u16::try_from(Line::raw(s).width()).unwrap_or(u16::MAX)
}
