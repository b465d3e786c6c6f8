//! Structured logging via `tracing`.
//!
//! The terminal view owns the screen, so the default filter only lets warnings
//! through; `RUST_LOG` overrides it, and `--log-file` moves output off stderr.

use anyhow::{Context, Result};
use std::{fs::OpenOptions, io, path::Path, sync::Mutex};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub(crate) const DEFAULT_FILTER: &str = "warn";

pub(crate) fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

pub(crate) fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_env_filter());
    let registry = tracing_subscriber::registry().with(env_filter);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            let layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::uptime());
            registry.with(layer).try_init()?;
        }
        None => {
            let layer = fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_timer(fmt::time::uptime());
            registry.with(layer).try_init()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_quiet() {
        let filter = format!("{}", default_env_filter());
        assert!(filter.contains("warn"));
    }

    #[test]
    fn module_filters_parse() {
        for s in ["tycho=debug", "warn,tycho::driver=trace", "info"] {
            assert!(EnvFilter::try_new(s).is_ok(), "failed to parse {s}");
        }
    }
}
