use crate::calendar::{
    parse_weekday, weekday_from_ordinal, CalendarSettings, ConfigurationError, DayOfWeekWindow,
    Typeface, ValidDateBounds,
};
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use time::{macros::format_description, Date, Weekday};

/// A weekday given in a config file either by name or by ordinal
/// (1 = Sunday … 7 = Saturday)
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
pub(crate) enum WeekdayValue {
    Ordinal(i64),
    Name(String),
}

impl WeekdayValue {
    fn to_weekday(&self) -> Result<Weekday, ConfigurationError> {
        match self {
            WeekdayValue::Ordinal(n) => weekday_from_ordinal(*n),
            WeekdayValue::Name(s) => parse_weekday(s),
        }
    }
}

/// The contents of `config.toml`.  Every key is optional.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub(crate) first_day_of_week: Option<WeekdayValue>,
    pub(crate) last_day_of_week: Option<WeekdayValue>,
    pub(crate) first_valid_day: Option<String>,
    pub(crate) last_valid_day: Option<String>,
    pub(crate) typeface: Vec<String>,
    pub(crate) max_tile_size: Option<u16>,
    pub(crate) padding: Option<u16>,
    /// Dates shown as disabled by the moon adapter
    pub(crate) disabled_dates: Vec<String>,
}

impl Config {
    pub(crate) fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("monthgrid").join("config.toml"))
    }

    /// Loads the configuration from `path`, or from the default location if
    /// `path` is `None`.  A missing file at the default location yields the
    /// default configuration; a missing explicit file is an error.
    pub(crate) fn load(path: Option<&Path>) -> anyhow::Result<Config> {
        match path {
            Some(p) => Config::load_file(p, true),
            None => match Config::default_path() {
                Some(p) => Config::load_file(&p, false),
                None => {
                    tracing::warn!("could not determine config directory; using defaults");
                    Ok(Config::default())
                }
            },
        }
    }

    fn load_file(path: &Path, required: bool) -> anyhow::Result<Config> {
        if !required && !path.exists() {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Config::parse(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub(crate) fn parse(content: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(content)
    }

    pub(crate) fn settings(&self) -> Result<CalendarSettings, ConfigurationError> {
        let defaults = CalendarSettings::default();
        let first = match &self.first_day_of_week {
            Some(wd) => wd.to_weekday()?,
            None => defaults.window.first(),
        };
        let last = self
            .last_day_of_week
            .as_ref()
            .map(WeekdayValue::to_weekday)
            .transpose()?;
        let first_valid = self.first_valid_day.as_deref().map(parse_date).transpose()?;
        let last_valid = self.last_valid_day.as_deref().map(parse_date).transpose()?;
        let settings = CalendarSettings {
            window: DayOfWeekWindow::new(first, last),
            bounds: ValidDateBounds::new(first_valid, last_valid)?,
            typeface: Typeface::parse(&self.typeface)?,
            padding: self.padding.unwrap_or(defaults.padding),
            ..defaults
        };
        match self.max_tile_size {
            Some(size) => settings.with_max_tile_size(size),
            None => Ok(settings),
        }
    }

    pub(crate) fn disabled_dates(&self) -> Result<Vec<Date>, ConfigurationError> {
        self.disabled_dates.iter().map(|s| parse_date(s)).collect()
    }
}

pub(crate) fn parse_date(s: &str) -> Result<Date, ConfigurationError> {
    Date::parse(s, format_description!("[year]-[month]-[day]")).map_err(|source| {
        ConfigurationError::InvalidDate {
            value: s.to_owned(),
            source,
        }
    })
}

/// Where the configuration comes from: a config file plus weekday overrides
/// from the command line.  Kept around so the file can be read again.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct ConfigSource {
    pub(crate) path: Option<PathBuf>,
    pub(crate) first_day: Option<String>,
    pub(crate) last_day: Option<String>,
}

impl ConfigSource {
    pub(crate) fn load(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.path.as_deref())?;
        if let Some(first) = &self.first_day {
            config.first_day_of_week = Some(WeekdayValue::Name(first.clone()));
        }
        if let Some(last) = &self.last_day {
            config.last_day_of_week = Some(WeekdayValue::Name(last.clone()));
        }
        Ok(config)
    }
}
