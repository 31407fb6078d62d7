//! Tracing initialization.
//!
//! - LOG_LEVEL sets the filter (default [`DEFAULT_FILTER`]).
//! - LOG_FORMAT=json switches to JSON lines; anything else is plain text.
//!
//! The terminal UI owns stdout, so events go to a log file instead.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::Result;

/// Events are logged under short per-area targets, so each one is named.
pub const DEFAULT_FILTER: &str =
    "info,catalog_admin=debug,api=debug,auth=debug,config=debug,editor=debug,forms=debug,tui=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_tracing(log_file: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    use super::*;

    #[test]
    fn default_filter_keeps_debug_for_every_area() {
        let subscriber = Registry::default().with(EnvFilter::new(DEFAULT_FILTER));
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(target: "api", Level::DEBUG));
            assert!(tracing::enabled!(target: "auth", Level::DEBUG));
            assert!(tracing::enabled!(target: "editor", Level::DEBUG));
            assert!(tracing::enabled!(target: "forms", Level::DEBUG));
            assert!(tracing::enabled!(target: "tui", Level::DEBUG));
            assert!(!tracing::enabled!(target: "hyper", Level::DEBUG));
        });
    }
}
