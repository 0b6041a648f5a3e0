//! Logging setup on top of the `log` facade and `env_logger`.
//!
//! Log records go to stderr so they never mix with the plan printed on
//! stdout. The level is chosen by, in priority order:
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. `--quiet` (errors only) or `-v`/`-vv` (debug/trace)
//! 3. Default: info
//!
//! ```rust,no_run
//! pdfdupe::logging::init_logging(1, false, true);
//! log::debug!("visible at -v");
//! ```

use std::env;
use std::io::Write;

use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;

/// Initialize logging from CLI verbosity flags.
///
/// Safe to call more than once; later calls are ignored (useful in tests
/// that drive `run_app` repeatedly).
///
/// # Arguments
///
/// * `verbose` - Verbosity count from CLI (0=info, 1=debug, 2+=trace)
/// * `quiet` - If true, only show errors (overridden by `RUST_LOG`)
/// * `color` - Whether level names may be colored
pub fn init_logging(verbose: u8, quiet: bool, color: bool) {
    let mut builder = Builder::new();
    builder.target(Target::Stderr);
    builder.write_style(if color {
        WriteStyle::Auto
    } else {
        WriteStyle::Never
    });

    let from_env = env::var("RUST_LOG").is_ok();
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    let detailed = verbose >= 1 || cfg!(debug_assertions);
    builder.format(move |buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        if detailed {
            writeln!(
                buf,
                "{} {style}{:<5}{style:#} [{}] {}",
                buf.timestamp_seconds(),
                level,
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(buf, "{style}{:<5}{style:#} {}", level, record.args())
        }
    });

    if builder.try_init().is_ok() {
        log::debug!(
            "Logging initialized at {} (from RUST_LOG: {})",
            current_level_name(),
            from_env
        );
    }
}

/// Determine the log level from CLI flags.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Get the current maximum log level as a lowercase name.
#[must_use]
pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}
