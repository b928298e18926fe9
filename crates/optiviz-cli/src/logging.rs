//! Logging setup for the `optiviz` binary
//!
//! All log output goes to stderr so that JSON written to stdout stays machine
//! readable. `RUST_LOG` takes precedence over the configured default filter.

use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Emit one JSON object per event instead of human-readable lines
    pub json: bool,

    /// Whether to include file/line information in logs
    pub include_location: bool,

    /// Whether to log span open/close events (for timing)
    pub enable_spans: bool,

    /// Default log level filter, used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: false,
            include_location: false,
            enable_spans: false,
            default_filter: "warn".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Configuration for the given number of `-v` flags
    pub fn from_verbosity(verbose: u8) -> Self {
        let default_filter = match verbose {
            0 => "warn",
            1 => "warn,optiviz_services=info,optiviz_analyzer=info",
            2 => "info,optiviz_services=debug,optiviz_analyzer=debug",
            _ => "debug,optiviz_services=trace,optiviz_analyzer=trace",
        };

        Self {
            include_location: verbose >= 3,
            enable_spans: verbose >= 2,
            default_filter: default_filter.to_string(),
            ..Self::default()
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

/// Initialize the logging system with the given configuration
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let span_events = if config.enable_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_span_events(span_events);

    let layer = if config.json {
        layer
            .json()
            .with_current_span(true)
            .with_filter(env_filter)
            .boxed()
    } else {
        layer
            .with_ansi(std::io::IsTerminal::is_terminal(&std::io::stderr()))
            .with_filter(env_filter)
            .boxed()
    };

    tracing_subscriber::registry().with(layer).try_init()?;

    tracing::debug!(
        filter = %config.default_filter,
        json = config.json,
        "Logging system initialized"
    );

    Ok(())
}
