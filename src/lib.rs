//! Command-line client for the 1Source securities lending REST API.
//!
//! One process invocation performs configuration load, OAuth 2.0
//! authentication, exactly one dispatched command, and console output. Read
//! responses are forwarded as opaque text; only the mutating operations decode
//! a typed acknowledgment.

#![deny(clippy::all, missing_docs)]

pub mod auth;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod model;
pub mod obs;

mod _prelude {
	pub use std::fmt::{Debug, Display, Formatter, Result as FmtResult};

	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
