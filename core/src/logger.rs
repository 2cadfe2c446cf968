//----------------------------------------------------------------------------------------- std lib
use std::io::Write;
use std::time::Instant;
//--------------------------------------------------------------------------------- other libraries
use env_logger::fmt::style::{AnsiColor, Style};
use log::info;
use once_cell::sync::Lazy;

use crate::format_duration;

// This will get initialized below.
/// Returns the init [`Instant`]
pub static INIT_INSTANT: Lazy<Instant> = Lazy::new(Instant::now);

/// Returns the seconds since [`INIT_INSTANT`].
#[cfg(not(tarpaulin_include))]
#[must_use]
pub fn uptime() -> u64 {
    INIT_INSTANT.elapsed().as_secs()
}

/// The single-letter tag and color used for each log level.
const fn level_tag(level: log::Level) -> (&'static str, AnsiColor) {
    match level {
        log::Level::Error => ("E", AnsiColor::Red),
        log::Level::Warn => ("W", AnsiColor::Yellow),
        log::Level::Info => ("I", AnsiColor::White),
        log::Level::Debug => ("D", AnsiColor::Blue),
        log::Level::Trace => ("T", AnsiColor::Magenta),
    }
}

//---------------------------------------------------------------------------------------------------- Logger init function
#[allow(clippy::module_name_repetitions)]
/// Initializes the logger.
///
/// This enables console logging on all the internals of `tunescout`.
///
/// Functionality is provided by [`log`].
///
/// The levels are:
/// - ERROR
/// - WARN
/// - INFO
/// - DEBUG
/// - TRACE
///
/// If `RUST_LOG` is set it takes precedence over `filter`,
/// otherwise all library crate logs except for tunescout and its sub-crates are disabled.
///
/// # Panics
/// This must only be called _once_.
#[cfg(not(tarpaulin_include))]
pub fn init_logger(filter: log::LevelFilter) {
    // Initialize timer.
    let now = Lazy::force(&INIT_INSTANT);

    let env = std::env::var("RUST_LOG").unwrap_or_default();

    let mut builder = env_logger::Builder::new();
    builder
        .format(move |buf, record| {
            let (tag, color) = level_tag(record.level());
            let level_style = Style::new().fg_color(Some(color.into())).bold();
            let dimmed = Style::new().dimmed();
            writeln!(
                buf,
                // Longest PATH in the repo: `catalog/src/models.rs` - `21` characters
                "| {level_style}{}{level_style:#} | {dimmed}{}{dimmed:#} | {dimmed}{: >24}{dimmed:#} @ {dimmed}{: <4}{dimmed:#} | {}",
                tag,
                format_duration(&now.elapsed()),
                record.file_static().unwrap_or("???"),
                record.line().unwrap_or(0),
                record.args(),
            )
        })
        .write_style(env_logger::WriteStyle::Auto);

    if env.is_empty() {
        builder
            .filter_level(log::LevelFilter::Off)
            .filter_module("tunescout", filter)
            .filter_module("tunescout_core", filter)
            .filter_module("tunescout_catalog", filter)
            .filter_module("tunescout_search", filter)
            .filter_module("tunescout_cli", filter);
    } else {
        builder.parse_filters(&env);
    }

    builder.init();

    if env.is_empty() {
        info!("Log Level (Flag) ... {filter}");
    } else {
        info!("Log Level (RUST_LOG) ... {env}");
    }
}

/// Initializes the tracing layer.
///
/// Spans from the tunescout crates are recorded, everything else is filtered out
/// unless the `verbose_tracing` feature is enabled.
#[must_use]
pub fn init_tracing() -> impl tracing::Subscriber {
    use tracing_subscriber::layer::SubscriberExt as _;

    #[cfg(not(feature = "verbose_tracing"))]
    let directives = "off,tunescout_catalog=trace,tunescout_search=trace";
    #[cfg(feature = "verbose_tracing")]
    let directives = "trace,h2=off,hyper=off";

    let filter = tracing_subscriber::EnvFilter::builder()
        .parse(directives)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off"));

    tracing_subscriber::registry().with(filter)
}
