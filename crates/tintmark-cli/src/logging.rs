//! Logging setup
//!
//! Logs go to stderr so stdout carries only the rendered document.
//! `RUST_LOG` takes precedence over `-v`/`-q`.

use clap::ArgMatches;
use tracing_subscriber::EnvFilter;

/// Net verbosity: `-v` count minus `-q` count
#[must_use]
pub fn verbosity(matches: &ArgMatches) -> i8 {
    let verbose = matches.get_count("verbose");
    let silent = matches.get_count("silent");
    i8::try_from(i16::from(verbose) - i16::from(silent)).unwrap_or(0)
}

/// Level directive for a verbosity
#[must_use]
pub fn level(verbosity: i8) -> &'static str {
    match verbosity {
        i8::MIN..=-2 => "error",
        -1 => "warn",
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global stderr subscriber
///
/// A second call is a no-op.
pub fn init(verbosity: i8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level(verbosity)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level(-5), "error");
        assert_eq!(level(-1), "warn");
        assert_eq!(level(0), "info");
        assert_eq!(level(1), "debug");
        assert_eq!(level(3), "trace");
    }

    #[test]
    fn verbosity_counts_flags() {
        let matches = crate::cli::command()
            .try_get_matches_from(["tintmark", "-vv", "-q", "show-config"])
            .unwrap();
        assert_eq!(verbosity(&matches), 1);
    }
}
