mod app;
mod calendar;
mod config;
mod help;
mod jumpto;
mod moon;
mod theme;
use crate::app::App;
use crate::calendar::{CalendarController, MonthAnchor};
use crate::config::ConfigSource;
use crate::moon::Phoon;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::OffsetDateTime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        month: Option<MonthAnchor>,
        source: ConfigSource,
        log_file: Option<PathBuf>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut month = None;
        let mut source = ConfigSource::default();
        let mut log_file = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('c') | Arg::Long("config") => {
                    source.path = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("first-day") => source.first_day = Some(parser.value()?.string()?),
                Arg::Long("last-day") => source.last_day = Some(parser.value()?.string()?),
                Arg::Long("log-file") => log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if month.is_none() => {
                    let value = value.string()?;
                    match MonthAnchor::parse(&value) {
                        Ok(m) => month = Some(m),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run {
            month,
            source,
            log_file,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                month,
                source,
                log_file,
            } => {
                if let Some(path) = log_file {
                    init_logging(&path)?;
                }
                let config = source.load()?;
                let settings = config.settings().context("invalid calendar settings")?;
                let disabled = config
                    .disabled_dates()
                    .context("invalid disabled_dates")?;
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                let anchor = month.unwrap_or_else(|| MonthAnchor::containing(today));
                let calendar =
                    CalendarController::new(Phoon::new(today).disable(disabled), settings, anchor);
                tracing::info!(%today, year = anchor.year(), month = %anchor.month(), "starting");
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(calendar, today)
                        .reload_from(source)
                        .run(terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: monthgrid [OPTIONS] [YYYY-MM]");
                println!();
                println!("Month calendar highlighting NetHack's new & full moons");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>     Read configuration from the given file");
                println!("      --first-day <DAY>   First day of the week (name or 1-7, Sunday = 1)");
                println!("      --last-day <DAY>    Last day of the week (name or 1-7, Sunday = 1)");
                println!("      --log-file <PATH>   Write log messages to the given file");
                println!("  -h, --help              Display this help message and exit");
                println!("  -V, --version           Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    Ok(())
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_args(args.iter().copied()))
    }

    #[test]
    fn test_parse_run() {
        assert_eq!(
            parse(&["--first-day", "sun", "-c", "cal.toml", "2026-02"]).ok(),
            Some(Command::Run {
                month: Some(MonthAnchor::containing(date!(2026 - 02 - 01))),
                source: ConfigSource {
                    path: Some(PathBuf::from("cal.toml")),
                    first_day: Some(String::from("sun")),
                    last_day: None,
                },
                log_file: None,
            })
        );
    }

    #[test]
    fn test_parse_bad_month() {
        assert!(parse(&["2026-2"]).is_err());
        assert!(parse(&["2026-02", "2026-03"]).is_err());
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(parse(&["--log-file", "x.log", "-h"]).ok(), Some(Command::Help));
        assert_eq!(parse(&["-V"]).ok(), Some(Command::Version));
    }
}
