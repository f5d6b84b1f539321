use std::env;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

const DEFAULT_DIRECTIVE: &str = "info";
// hyper and reqwest are chatty at debug; keep them at warn unless asked for explicitly.
const QUIET_DEPENDENCIES: &[&str] = &["hyper=warn", "hyper_util=warn", "reqwest=warn"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(raw) if raw.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` picks the filter (default `info`); `LOG_FORMAT=json` switches to one JSON object
/// per line for log shippers.
pub fn init_logging() {
    let filter = build_filter(env::var("RUST_LOG").ok().as_deref());
    let format = LogFormat::from_env_value(env::var("LOG_FORMAT").ok().as_deref());
    let timer = fmt::time::UtcTime::rfc_3339();

    let result = match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_timer(timer)
                    .with_file(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_timer(timer)
                    .with_current_span(false)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("Failed to initialize tracing subscriber: {}", e);
    }
}

fn build_filter(rust_log: Option<&str>) -> EnvFilter {
    EnvFilter::new(filter_directives(rust_log))
}

fn filter_directives(rust_log: Option<&str>) -> String {
    match rust_log.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => raw.to_string(),
        None => {
            let mut directives = vec![DEFAULT_DIRECTIVE];
            directives.extend_from_slice(QUIET_DEPENDENCIES);
            directives.join(",")
        }
    }
}
