use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Maps the `-v` count to a log level, warnings and up by default.
pub fn level_for(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs the stderr subscriber. `RUST_LOG` takes precedence over `verbose`.
pub fn init_logging(verbose: u8, no_color: bool) {
    let default_filter = format!("attendee_list={}", level_for(verbose));
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(!no_color)
            .with_target(true),
    );

    let _ = subscriber.try_init();
}
