use crate::calendar::{CalendarController, DayAdapter, MonthAnchor, MonthCalendar};
use crate::config::ConfigSource;
use crate::help::Help;
use crate::jumpto::{JumpTo, JumpToInput, JumpToOutput, JumpToState};
use crate::theme::{BASE_STYLE, STATUS_STYLE};
use anyhow::Context;
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::Date;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App<A> {
    calendar: CalendarController<A>,
    today: Date,
    selected: Option<Date>,
    activated: Option<Date>,
    notice: Option<String>,
    source: Option<ConfigSource>,
    state: AppState,
}

impl<A: DayAdapter> App<A> {
    pub(crate) fn new(calendar: CalendarController<A>, today: Date) -> App<A> {
        let mut app = App {
            calendar,
            today,
            selected: None,
            activated: None,
            notice: None,
            source: None,
            state: AppState::Calendar,
        };
        app.reset_selection();
        app
    }

    /// Lets `r` re-read the calendar settings from `source`
    pub(crate) fn reload_from(mut self, source: ConfigSource) -> App<A> {
        self.source = Some(source);
        self
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(&mut *self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.move_selection(-1),
                KeyCode::Char('l') | KeyCode::Right => self.move_selection(1),
                KeyCode::Char('k') | KeyCode::Up => self.move_selection(-self.row_width()),
                KeyCode::Char('j') | KeyCode::Down => self.move_selection(self.row_width()),
                KeyCode::Enter => self.activate(),
                KeyCode::Char('n') | KeyCode::PageDown => self.next_month(),
                KeyCode::Char('p') | KeyCode::PageUp => self.previous_month(),
                KeyCode::Char('0') | KeyCode::Home => {
                    self.show_month(MonthAnchor::containing(self.today));
                    true
                }
                KeyCode::Char('g') => {
                    self.state = AppState::Jumping(JumpToState::new());
                    true
                }
                KeyCode::Char('r') => self.reload(),
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Jumping(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Calendar;
                    return true;
                }
                let input = match key {
                    KeyCode::Char('-') => Some(JumpToInput::Negative),
                    KeyCode::Char('+') => Some(JumpToInput::Positive),
                    KeyCode::Char(c) => c
                        .to_digit(10)
                        .and_then(|d| u8::try_from(d).ok())
                        .map(JumpToInput::Digit),
                    KeyCode::Backspace | KeyCode::Delete => Some(JumpToInput::Backspace),
                    KeyCode::Enter => Some(JumpToInput::Enter),
                    _ => None,
                };
                match input.map_or(JumpToOutput::Invalid, |i| state.handle_input(i)) {
                    JumpToOutput::Ok => true,
                    JumpToOutput::Invalid => false,
                    JumpToOutput::Jump(anchor) => {
                        self.state = AppState::Calendar;
                        self.show_month(anchor);
                        true
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn row_width(&self) -> isize {
        isize::from(self.calendar.settings().window.width())
    }

    fn next_month(&mut self) -> bool {
        let r = self.calendar.next_month().is_ok();
        self.reset_selection();
        r
    }

    fn previous_month(&mut self) -> bool {
        let r = self.calendar.previous_month().is_ok();
        self.reset_selection();
        r
    }

    fn show_month(&mut self, anchor: MonthAnchor) {
        self.calendar.show_month(anchor);
        self.reset_selection();
    }

    /// Selects today if it is in the displayed month, otherwise the first of
    /// the month if it is shown, otherwise the first cell
    fn reset_selection(&mut self) {
        let anchor = self.calendar.anchor();
        let shown = |date: Date| self.calendar.position_of(date).is_some();
        self.selected = if anchor.contains(self.today) && shown(self.today) {
            Some(self.today)
        } else if shown(anchor.first_day()) {
            Some(anchor.first_day())
        } else {
            self.calendar.cell(0, 0).map(|c| c.date)
        };
    }

    fn move_selection(&mut self, delta: isize) -> bool {
        let dates = self
            .calendar
            .rows()
            .iter()
            .flat_map(|r| r.cells().iter().map(|c| c.date))
            .collect::<Vec<_>>();
        let Some(current) = self
            .selected
            .and_then(|sel| dates.iter().position(|&d| d == sel))
        else {
            return false;
        };
        match current
            .checked_add_signed(delta)
            .and_then(|i| dates.get(i))
        {
            Some(&date) => {
                self.selected = Some(date);
                true
            }
            None => false,
        }
    }

    fn activate(&mut self) -> bool {
        match self.selected.and_then(|date| self.calendar.activate(date)) {
            Some(date) => {
                self.activated = Some(date);
                self.notice = None;
                true
            }
            None => false,
        }
    }

    /// Re-reads the configuration and rebuilds the calendar with it.  The
    /// current settings stay in place if the configuration is invalid.
    fn reload(&mut self) -> bool {
        let Some(source) = &self.source else {
            return false;
        };
        let settings = source
            .load()
            .and_then(|config| config.settings().context("invalid calendar settings"));
        match settings {
            Ok(settings) => {
                self.calendar.reconfigure(settings);
                self.reset_selection();
                self.notice = Some(String::from("Reloaded configuration"));
                true
            }
            Err(e) => {
                tracing::warn!(error = ?e, "failed to reload configuration");
                self.notice = Some(format!("Reload failed: {e:#}"));
                false
            }
        }
    }

    fn status_line(&self) -> Line<'static> {
        match (&self.notice, self.activated) {
            (Some(notice), _) => Line::styled(notice.clone(), STATUS_STYLE),
            (None, Some(date)) => Line::styled(format!("Activated {date}"), STATUS_STYLE),
            (None, None) => Line::styled("Press ? for help", STATUS_STYLE),
        }
    }
}

impl<A: DayAdapter> Widget for &mut App<A> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [cal_area, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        MonthCalendar::<A>::new()
            .selected(self.selected)
            .render(cal_area, buf, &mut self.calendar);
        self.status_line().centered().render(status_area, buf);
        if self.state == AppState::Helping {
            Help.render(area, buf);
        } else if let AppState::Jumping(ref mut state) = self.state {
            JumpTo.render(area, buf, state);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Jumping(JumpToState),
    Quitting,
}
