//! Structured logging setup
//!
//! Logging goes through `tracing` with a `tracing-subscriber` registry. The
//! crate's own level comes from [`LoggingConfig`]; `RUST_LOG` directives are
//! layered on top, and the HTTP stack is capped at `warn` unless `RUST_LOG`
//! says otherwise.
//!
//! ```no_run
//! use springshift::util::logging;
//!
//! // SPRINGSHIFT_LOG_LEVEL=debug SPRINGSHIFT_LOG_JSON=true
//! logging::init_from_env();
//!
//! tracing::info!(project = "shop", "Starting migration");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Crates whose output is capped at `warn` when `RUST_LOG` is unset
const NOISY_TARGETS: &[&str] = &["h2", "hyper", "hyper_util", "reqwest"];

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for this crate's events
    pub level: Level,

    /// One JSON object per line instead of human-readable output
    pub use_json: bool,

    pub include_target: bool,

    /// File and line number of each event
    pub include_location: bool,

    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    /// Reads `SPRINGSHIFT_LOG_LEVEL` and `SPRINGSHIFT_LOG_JSON`
    pub fn from_env() -> Self {
        let level = env::var("SPRINGSHIFT_LOG_LEVEL")
            .map(|s| parse_level_or_default(&s))
            .unwrap_or(Level::INFO);

        let use_json = env::var("SPRINGSHIFT_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            level,
            use_json,
            ..Default::default()
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Filter directives applied on top of `RUST_LOG`
    fn directives(&self, rust_log_set: bool) -> Vec<String> {
        let mut directives = vec![format!(
            "{}={}",
            env!("CARGO_CRATE_NAME"),
            self.level.to_string().to_lowercase()
        )];
        if !rust_log_set {
            directives.extend(NOISY_TARGETS.iter().map(|t| format!("{}=warn", t)));
        }
        directives
    }
}

/// Parses a level name case-insensitively
///
/// ```
/// use springshift::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("DEBUG"), Some(Level::DEBUG));
/// assert_eq!(parse_level("loud"), None);
/// ```
pub fn parse_level(level_str: &str) -> Option<Level> {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Like [`parse_level`], falling back to INFO with a note on stderr
pub fn parse_level_or_default(level_str: &str) -> Level {
    parse_level(level_str).unwrap_or_else(|| {
        eprintln!(
            "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
            level_str
        );
        Level::INFO
    })
}

fn build_filter(config: &LoggingConfig) -> EnvFilter {
    let rust_log_set = env::var("RUST_LOG").is_ok();
    config
        .directives(rust_log_set)
        .iter()
        .filter_map(|d| d.parse::<Directive>().ok())
        .fold(EnvFilter::from_default_env(), EnvFilter::add_directive)
}

/// Installs the global subscriber; later calls are no-ops
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(&config);

        let result = if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_thread_ids(config.include_thread_ids)
                        .with_thread_names(config.include_thread_ids),
                )
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_thread_ids(config.include_thread_ids)
                        .with_thread_names(config.include_thread_ids),
                )
                .try_init()
        };

        if let Err(e) = result {
            eprintln!("Logging already initialized elsewhere: {}", e);
        }
    });
}

/// [`init_logging`] with [`LoggingConfig::from_env`]
pub fn init_from_env() {
    init_logging(LoggingConfig::from_env());
}
