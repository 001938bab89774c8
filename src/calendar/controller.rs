use super::error::{ConfigurationError, OutOfTimeError};
use super::grid::{build_grid, DayCell, MonthAnchor, ValidDateBounds, WeekRow};
use super::header::{build_headers, HeaderLabel};
use super::tile::{tile_size, TileSize};
use super::window::DayOfWeekWindow;
use super::{DayAdapter, Typeface};
use std::num::NonZeroU16;
use time::Date;

pub(crate) const DEFAULT_MAX_TILE_SIZE: u16 = 9;

pub(crate) const DEFAULT_PADDING: u16 = 1;

/// Validated calendar configuration
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct CalendarSettings {
    pub(crate) window: DayOfWeekWindow,
    pub(crate) bounds: ValidDateBounds,
    pub(crate) typeface: Typeface,
    pub(crate) max_tile_size: NonZeroU16,
    /// Columns on each side of every tile
    pub(crate) padding: u16,
}

impl CalendarSettings {
    pub(crate) fn with_max_tile_size(
        mut self,
        size: u16,
    ) -> Result<CalendarSettings, ConfigurationError> {
        self.max_tile_size = NonZeroU16::new(size).ok_or(ConfigurationError::ZeroTileSize)?;
        Ok(self)
    }
}

impl Default for CalendarSettings {
    fn default() -> CalendarSettings {
        CalendarSettings {
            window: DayOfWeekWindow::default(),
            bounds: ValidDateBounds::default(),
            typeface: Typeface::default(),
            max_tile_size: NonZeroU16::new(DEFAULT_MAX_TILE_SIZE).unwrap_or(NonZeroU16::MIN),
            padding: DEFAULT_PADDING,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Visibility {
    Visible,
    Hidden,
}

/// Columns and rows taken up by one tile
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Extent {
    pub(crate) width: u16,
    pub(crate) height: u16,
}

/// Owns the presentation model of one calendar: the current month's week
/// rows and header labels, plus the tile size from the last measured layout.
/// Every rebuild replaces all of these at once.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CalendarController<A> {
    adapter: A,
    settings: CalendarSettings,
    anchor: MonthAnchor,
    headers: Vec<HeaderLabel>,
    rows: Vec<WeekRow>,
    measured_width: Option<i32>,
    tile_size: TileSize,
}

impl<A: DayAdapter> CalendarController<A> {
    pub(crate) fn new(adapter: A, settings: CalendarSettings, anchor: MonthAnchor) -> Self {
        let mut this = CalendarController {
            adapter,
            settings,
            anchor,
            headers: Vec::new(),
            rows: Vec::new(),
            measured_width: None,
            tile_size: TileSize::Unmeasured,
        };
        this.rebuild();
        this
    }

    pub(crate) fn reconfigure(&mut self, settings: CalendarSettings) {
        self.settings = settings;
        self.rebuild();
    }

    pub(crate) fn show_month(&mut self, anchor: MonthAnchor) {
        self.anchor = anchor;
        self.rebuild();
    }

    pub(crate) fn next_month(&mut self) -> Result<(), OutOfTimeError> {
        let anchor = self.anchor.next().ok_or(OutOfTimeError)?;
        self.show_month(anchor);
        Ok(())
    }

    pub(crate) fn previous_month(&mut self) -> Result<(), OutOfTimeError> {
        let anchor = self.anchor.previous().ok_or(OutOfTimeError)?;
        self.show_month(anchor);
        Ok(())
    }

    fn rebuild(&mut self) {
        let CalendarSettings {
            window,
            bounds,
            typeface,
            ..
        } = self.settings;
        self.headers = build_headers(window, typeface, &self.adapter);
        self.rows = build_grid(self.anchor, window, bounds, typeface, &self.adapter);
        tracing::debug!(
            year = self.anchor.year(),
            month = %self.anchor.month(),
            first_day_of_week = %window.first(),
            last_day_of_week = %window.last(),
            rows = self.rows.len(),
            "rebuilt month grid"
        );
        self.tile_size = match self.measured_width {
            Some(width) => self.compute_tile_size(width),
            None => TileSize::Unmeasured,
        };
    }

    fn compute_tile_size(&self, width: i32) -> TileSize {
        let days = self.settings.window.width();
        tile_size(
            width,
            i32::from(self.settings.padding),
            2 * i32::from(days),
            days,
            self.settings.max_tile_size,
        )
    }

    /// Signals that the rendering surface has been measured at `width`
    /// columns.  May be called on every layout pass.
    pub(crate) fn layout_ready(&mut self, width: i32) -> Visibility {
        if self.measured_width != Some(width) {
            self.measured_width = Some(width);
            self.tile_size = self.compute_tile_size(width);
        }
        self.visibility()
    }

    pub(crate) fn visibility(&self) -> Visibility {
        if self.tile_size().is_available() {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }

    /// Size of each tile in `row`, where row 0 is the header row and rows 1
    /// and up are weeks
    pub(crate) fn extent(&self, row: usize) -> Option<Extent> {
        let size = self.tile_size();
        let width = size.get()?;
        let height = if row == 0 { 1 } else { size.rows()? };
        Some(Extent { width, height })
    }

    pub(crate) fn tile_size(&self) -> TileSize {
        self.tile_size
    }

    pub(crate) fn settings(&self) -> &CalendarSettings {
        &self.settings
    }

    pub(crate) fn anchor(&self) -> MonthAnchor {
        self.anchor
    }

    pub(crate) fn headers(&self) -> &[HeaderLabel] {
        &self.headers
    }

    pub(crate) fn rows(&self) -> &[WeekRow] {
        &self.rows
    }

    pub(crate) fn cell(&self, row: usize, column: usize) -> Option<&DayCell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Returns the grid position of `date`, if it is shown
    pub(crate) fn position_of(&self, date: Date) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(i, r)| {
            r.cells()
                .iter()
                .position(|c| c.date == date)
                .map(|j| (i, j))
        })
    }

    /// Dispatches a click on the cell showing `date`.  Returns the date if
    /// the cell is shown and enabled; clicks on anything else are ignored.
    pub(crate) fn activate(&self, date: Date) -> Option<Date> {
        let (i, j) = self.position_of(date)?;
        let cell = self.cell(i, j)?;
        if cell.is_enabled {
            tracing::info!(%date, "day activated");
            Some(date)
        } else {
            tracing::debug!(%date, "ignoring activation of disabled day");
            None
        }
    }
}
