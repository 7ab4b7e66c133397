use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use crate::api::{HttpAttendeeSource, HttpOptions};
use crate::cli::args::CliArgs;
use crate::cli::commands::{self, Command};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::controller::{AttendeeList, FetchStatus};
use crate::debounce::{Debouncer, DEFAULT_DEBOUNCE};
use crate::navigation::Location;
use crate::output::{OutputFormat, TerminalScreen};
use crate::session::{Input, Session};

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

#[derive(Clone, Debug)]
struct RunConfig {
    http: HttpOptions,
    location: String,
    search: String,
    debounce: Duration,
    once: bool,
    output_format: OutputFormat,
    no_color: bool,
    verbose: u8,
}

fn build_location(args: &CliArgs) -> String {
    if let Some(location) = args.location.as_deref() {
        return location.trim().to_string();
    }
    match args.page.as_deref() {
        Some(page) => format!("{}?page={}", Location::DEFAULT, page.trim()),
        None => Location::DEFAULT.to_string(),
    }
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let base_url = args
        .base_url
        .clone()
        .or(cfg.base_url)
        .unwrap_or_else(|| HttpOptions::default().base_url);
    let event_id = args
        .event_id
        .clone()
        .or(cfg.event_id)
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| {
            "an event is required (--event or event_id in the config file)".to_string()
        })?;

    let timeout_seconds = args.timeout.or(cfg.timeout).unwrap_or(10);
    let retries = args.retries.or(cfg.retries).unwrap_or(2);
    let retry_delay = Duration::from_millis(cfg.retry_delay_ms.unwrap_or(500));
    let debounce = args
        .debounce_ms
        .or(cfg.debounce_ms)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_DEBOUNCE);

    let output_format = if args.json {
        OutputFormat::Json
    } else {
        match cfg.output_format.as_deref() {
            Some(raw) => OutputFormat::parse(raw)
                .ok_or_else(|| format!("invalid output_format '{raw}', expected table or json"))?,
            None => OutputFormat::Table,
        }
    };

    Ok(RunConfig {
        http: HttpOptions {
            base_url,
            event_id: event_id.trim().to_string(),
            timeout_seconds,
            retries,
            retry_delay,
        },
        location: build_location(&args),
        search: args.search.clone().unwrap_or_default(),
        debounce,
        once: args.once,
        output_format,
        no_color: args.no_color || cfg.no_color.unwrap_or(false),
        verbose: args.verbose,
    })
}

async fn read_commands(tx: mpsc::Sender<Input>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "stdin read failed");
                break;
            }
        };
        match commands::parse_command(&line) {
            Ok(Command::Input(input)) => {
                let quit = input == Input::Quit;
                if tx.send(input).await.is_err() || quit {
                    break;
                }
            }
            Ok(Command::Help) => print!("{}", commands::HELP),
            Ok(Command::Nothing) => {}
            Err(e) => eprintln!("{} {}", "[ERR]".bold().red(), e),
        }
    }
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    let source = HttpAttendeeSource::new(&run.http).map_err(|e| e.to_string())?;
    let location = Location::parse(&run.location).map_err(|e| e.to_string())?;

    if run.output_format == OutputFormat::Table && !run.once {
        format_kv_line("Service", source.endpoint().as_str());
        format_kv_line("Location", location.url().as_str());
        println!();
    }

    let list = AttendeeList::new(location).with_search(&run.search);
    let screen = TerminalScreen::new(run.output_format, !run.once);
    let mut session = Session::new(
        list,
        Arc::new(source),
        Debouncer::new(run.debounce),
        screen,
    );

    if run.once {
        session.run_once().await;
    } else {
        let (tx, rx) = mpsc::channel(16);
        let reader = tokio::spawn(read_commands(tx));
        session.run(rx).await;
        reader.abort();
    }

    if let FetchStatus::Failed(message) = session.list().status() {
        if run.once {
            return Err(format!("failed to load attendees: {message}"));
        }
    }
    Ok(())
}

fn config_path(args: &CliArgs) -> Option<PathBuf> {
    match args.config.as_deref() {
        Some(path) => Some(config::expand_tilde(path)),
        None => config::default_config_path(),
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let path = config_path(&args);
    if args.init_config {
        let path = path.ok_or_else(|| "cannot determine a config file location".to_string())?;
        config::ensure_default_config_file(&path)?;
        println!("config: {}", path.display());
        return Ok(());
    }

    // an explicit --config must exist, the default location is optional
    let cfg = match path.as_ref() {
        Some(p) => config::load_config(p, args.config.is_none())?,
        None => ConfigFile::default(),
    };

    let run = build_run_config(args, cfg)?;

    if run.no_color {
        colored::control::set_override(false);
    }
    crate::logging::init_logging(run.verbose, run.no_color);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    let result = rt.block_on(run_async(run));
    // stdin reads may still be parked on a blocking thread
    rt.shutdown_background();
    result
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn event_is_required() {
        let args = CliArgs::parse_from(["attendees"]);
        let err = build_run_config(args, ConfigFile::default()).unwrap_err();
        assert!(err.contains("event"));
    }

    #[test]
    fn cli_overrides_config() {
        let args = CliArgs::parse_from(["attendees", "-e", "cli-event", "--timeout", "3"]);
        let cfg = ConfigFile {
            base_url: Some("http://config:1".to_string()),
            event_id: Some("config-event".to_string()),
            timeout: Some(30),
            debounce_ms: Some(200),
            ..ConfigFile::default()
        };
        let run = build_run_config(args, cfg).unwrap();
        assert_eq!(run.http.event_id, "cli-event");
        assert_eq!(run.http.base_url, "http://config:1");
        assert_eq!(run.http.timeout_seconds, 3);
        assert_eq!(run.debounce, Duration::from_millis(200));
    }

    #[test]
    fn defaults_without_config() {
        let args = CliArgs::parse_from(["attendees", "-e", "e1"]);
        let run = build_run_config(args, ConfigFile::default()).unwrap();
        assert_eq!(run.http.base_url, "http://localhost:3333");
        assert_eq!(run.debounce, DEFAULT_DEBOUNCE);
        assert_eq!(run.output_format, OutputFormat::Table);
        assert_eq!(run.location, Location::DEFAULT);
        assert!(!run.once);
    }

    #[test]
    fn page_flag_becomes_location_parameter() {
        let args = CliArgs::parse_from(["attendees", "-e", "e1", "-p", "2"]);
        let run = build_run_config(args, ConfigFile::default()).unwrap();
        assert_eq!(run.location, "app:/attendees?page=2");
    }

    #[test]
    fn json_flag_and_config_format() {
        let args = CliArgs::parse_from(["attendees", "-e", "e1", "--json"]);
        let run = build_run_config(args, ConfigFile::default()).unwrap();
        assert_eq!(run.output_format, OutputFormat::Json);

        let args = CliArgs::parse_from(["attendees", "-e", "e1"]);
        let cfg = ConfigFile {
            output_format: Some("xml".to_string()),
            ..ConfigFile::default()
        };
        assert!(build_run_config(args, cfg).is_err());
    }
}
