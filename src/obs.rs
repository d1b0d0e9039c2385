//! Logging setup.
//!
//! Diagnostics go to an append-mode log file so stdout stays reserved for
//! command results. A cleanup failure at exit is at worst logged by the
//! runtime; it never terminates the process.

// std
use std::{fs::OpenOptions, path::Path, sync::Arc};
// crates.io
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
// self
use crate::{_prelude::*, error::ConfigError};

/// Opens the log file and installs the global subscriber.
///
/// The filter honors `RUST_LOG` and defaults to `info`.
pub fn init(log_path: &Path) -> Result<()> {
	let file = OpenOptions::new().append(true).create(true).open(log_path).map_err(|source| {
		ConfigError::LogFile { path: log_path.to_path_buf(), source }
	})?;

	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
		.init();

	Ok(())
}
