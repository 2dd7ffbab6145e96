use crate::config::{AppEnvironment, TelemetryConfig};
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Directives appended below the configured level so HTTP-stack noise
/// stays out of the prediction and analytics logs.
const QUIET_DEPENDENCIES: &[&str] = &["hyper=warn", "h2=warn", "tower=warn"];

#[derive(Debug)]
pub enum TelemetryError {
    Filter {
        directives: String,
        source: ParseError,
    },
    Init(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Filter { directives, .. } => {
                write!(f, "invalid log filter '{directives}'")
            }
            TelemetryError::Init(err) => write!(f, "failed to initialize telemetry: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::Filter { source, .. } => Some(source),
            TelemetryError::Init(err) => Some(&**err),
        }
    }
}

/// The configured level applied globally and to this crate by name, with
/// the HTTP stack pinned to warnings. `RUST_LOG` overrides the whole set.
fn filter_directives(level: &str) -> String {
    let mut directives = format!("{level},passenger_ai={level}");
    for dependency in QUIET_DEPENDENCIES {
        directives.push(',');
        directives.push_str(dependency);
    }
    directives
}

pub fn init(environment: AppEnvironment, config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directives = filter_directives(&config.log_level);
            EnvFilter::try_new(&directives)
                .map_err(|source| TelemetryError::Filter { directives, source })?
        }
    };

    // Color only in development; staging and production logs are scraped.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(matches!(environment, AppEnvironment::Development))
        .try_init()
        .map_err(TelemetryError::Init)
}
