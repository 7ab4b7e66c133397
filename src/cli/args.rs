use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "attendees",
    version,
    about = "browse and search event attendees",
    long_about = "Attendees is a terminal client for an event's attendee list: a searchable, paginated table with check-in status.\n\nExamples:\n  attendees -e 9e9bd979-9d10-4915-b339-3786b1634f70\n  attendees -u https://api.example.com -e <EVENT> -p 2 --once\n  attendees -e <EVENT> -s ana --once --json\n\nTip: Put base_url and event_id in ~/.attendees/config.yml to keep invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv, -vvv)."
    )]
    pub verbose: u8,

    #[arg(
        long = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        long = "json",
        help_heading = "Output",
        help = "Print pages as JSON instead of a table."
    )]
    pub json: bool,

    #[arg(
        short = 'u',
        long = "url",
        visible_alias = "base-url",
        value_name = "URL",
        help_heading = "Service",
        help = "Base URL of the attendees service (default http://localhost:3333)."
    )]
    pub base_url: Option<String>,

    #[arg(
        short = 'e',
        long = "event",
        visible_alias = "event-id",
        value_name = "ID",
        help_heading = "Service",
        help = "Event whose attendees are listed."
    )]
    pub event_id: Option<String>,

    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        help_heading = "Service",
        help = "Request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        long = "retries",
        value_name = "N",
        help_heading = "Service",
        help = "Retries for transient failures (timeouts, 429, 5xx)."
    )]
    pub retries: Option<u32>,

    #[arg(
        short = 'p',
        long = "page",
        value_name = "PAGE",
        help_heading = "Screen",
        help = "Initial page (1-based); invalid values fall back to page 1."
    )]
    pub page: Option<String>,

    #[arg(
        long = "location",
        value_name = "URL",
        help_heading = "Screen",
        help = "Screen URL whose 'page' parameter seeds the initial page."
    )]
    pub location: Option<String>,

    #[arg(
        short = 's',
        long = "search",
        value_name = "TEXT",
        help_heading = "Screen",
        help = "Initial search term."
    )]
    pub search: Option<String>,

    #[arg(
        long = "debounce-ms",
        value_name = "MS",
        help_heading = "Screen",
        help = "Quiet period after typing before a search is sent."
    )]
    pub debounce_ms: Option<u64>,

    #[arg(
        long = "once",
        help_heading = "Screen",
        help = "Fetch and print a single page, then exit."
    )]
    pub once: bool,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.attendees/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a default config file if none exists, then exit."
    )]
    pub init_config: bool,
}
