use clap::{Parser, ValueEnum};
use color_eyre::Result;
use crossterm::event::{self, Event as CEvent};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use reqwest::Url;
use seatmatrix::config::Config;
use seatmatrix::tui::{App, AppOptions, Theme};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

/// Browse the NEET PG seat matrix in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable file logging at the given level (overrides RUST_LOG)
    #[arg(long = "logging", value_enum)]
    logging: Option<LogLevel>,
    /// Path to a config file (overrides default config discovery)
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,
    /// Extra CSV location tried before the configured candidates. Repeatable.
    /// Accepts http(s) URLs or local paths.
    #[arg(long = "source", value_name = "LOC")]
    source: Vec<String>,
    /// URL or directory that relative candidates resolve against
    #[arg(long = "base", value_name = "URL|DIR")]
    base: Option<String>,
    /// Records per page
    #[arg(long = "page-size", value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    page_size: Option<u16>,
    /// Do not show the results announcement on start
    #[arg(long = "no-announcement")]
    no_announcement: bool,
    /// Colour scheme
    #[arg(long = "theme", value_enum, default_value_t = ThemeChoice::Dark)]
    theme: ThemeChoice,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ThemeChoice {
    Dark,
    Light,
}

/// `--source` paths become absolute `file://` URLs so that `--base` never applies to them
fn source_candidate(raw: &str) -> Result<String> {
    let lower = raw.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("file://") {
        return Ok(raw.to_string());
    }
    let path = std::path::absolute(raw)?;
    Url::from_file_path(&path)
        .map(|url| url.to_string())
        .map_err(|_| color_eyre::eyre::eyre!("Invalid source path: {}", path.display()))
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

/// Run a terminal setup step, restoring the terminal if it fails
fn restore_on_err<T>(
    step: impl FnOnce() -> io::Result<T>,
    restore: impl FnOnce() -> io::Result<()>,
) -> io::Result<T> {
    step().inspect_err(|_| {
        let _ = restore();
    })
}

fn main() -> Result<()> {
    color_eyre::install()?;
    // Parse CLI args
    let args = Args::parse();
    // Initialize logging to file in current working directory
    let cwd = std::env::current_dir()?;
    let log_path = cwd.join(seatmatrix::logging::LOG_FILE.as_str());
    let level = match args.logging {
        Some(LogLevel::Error) => Some(tracing::Level::ERROR),
        Some(LogLevel::Warn) => Some(tracing::Level::WARN),
        Some(LogLevel::Info) => Some(tracing::Level::INFO),
        Some(LogLevel::Debug) => Some(tracing::Level::DEBUG),
        Some(LogLevel::Trace) => Some(tracing::Level::TRACE),
        None => None,
    };
    seatmatrix::logging::init_with(Some(log_path), level)?;

    let config = Config::from_path(args.config.as_ref())?;
    let sources = args
        .source
        .iter()
        .map(|s| source_candidate(s))
        .collect::<Result<Vec<_>>>()?;
    let options = AppOptions {
        sources,
        base: args.base.clone(),
        page_size: args.page_size.map(usize::from),
        no_announcement: args.no_announcement,
        theme: match args.theme {
            ThemeChoice::Dark => Theme::default(),
            ThemeChoice::Light => Theme::light(),
        },
    };
    let mut app = App::new(config, options)?;
    info!("Starting {}", env!("CARGO_PKG_NAME"));

    // Panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    restore_on_err(|| execute!(stdout, EnterAlternateScreen), restore_terminal)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = restore_on_err(|| Terminal::new(backend), restore_terminal)?;

    // App loop
    app.start();
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    restore_terminal()?;
    if let Err(e) = &res {
        error!("Error: {e}");
    }
    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        // Poll for events
        if event::poll(Duration::from_millis(100))?
            && let CEvent::Key(key_event) = event::read()?
            && let Err(e) = app.handle_key_event(key_event)
        {
            warn!("Error handling key event: {e}");
        }

        // Tick update (apply finished background work)
        app.update()?;
        if app.should_quit() {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_candidate() {
        assert_eq!(
            source_candidate("https://example.org/a.csv").unwrap(),
            "https://example.org/a.csv"
        );
        let local = source_candidate("data/Seat_Matrix.csv").unwrap();
        assert!(local.starts_with("file://"));
        assert!(local.ends_with("/data/Seat_Matrix.csv"));
    }

    #[test]
    fn test_failed_setup_step_restores_terminal() {
        let mut restored = 0;
        let res: io::Result<()> = restore_on_err(
            || Err(io::Error::other("no tty")),
            || {
                restored += 1;
                Ok(())
            },
        );
        assert!(res.is_err());
        assert_eq!(restored, 1);

        let mut restored = 0;
        let value = restore_on_err(
            || Ok(7),
            || {
                restored += 1;
                Ok(())
            },
        )
        .unwrap();
        assert_eq!(value, 7);
        assert_eq!(restored, 0);
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "seatmatrix",
            "--source",
            "a.csv",
            "--source",
            "b.csv",
            "--page-size",
            "25",
            "--no-announcement",
            "--theme",
            "light",
        ])
        .unwrap();
        assert_eq!(args.source, vec!["a.csv", "b.csv"]);
        assert_eq!(args.page_size, Some(25));
        assert!(args.no_announcement);
        assert_eq!(args.theme, ThemeChoice::Light);
        assert!(Args::try_parse_from(["seatmatrix", "--page-size", "0"]).is_err());
    }
}
