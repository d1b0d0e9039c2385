//! Command-line surface: argument parsing and console output.
//!
//! Parsing happens up front; the dispatcher only ever sees a resolved
//! [`Command`]. Stdout carries command results exclusively, diagnostics go to
//! the log file, and error prompts go to stderr from the binary entry point.

// std
use std::path::PathBuf;
// crates.io
use clap::{Parser, Subcommand};
// self
use crate::{
	config::EntityKind,
	dispatch::{Command, Outcome},
};

/// Command-line client for the 1Source securities lending REST API.
#[derive(Debug, Parser)]
#[command(name = "onesource", version, about)]
pub struct Cli {
	/// Path to the configuration TOML file.
	#[arg(short = 't', long = "config", value_name = "FILE")]
	pub config: PathBuf,
	/// Path to the append-mode log file.
	#[arg(long, value_name = "FILE", default_value = "onesource.log")]
	pub log_file: PathBuf,
	/// Operation to perform.
	#[command(subcommand)]
	pub command: CliCommand,
}

/// One subcommand per dispatcher operation.
#[derive(Clone, Debug, Subcommand)]
pub enum CliCommand {
	/// Lists every resource of the given kind.
	All {
		/// Resource kind to list.
		#[arg(value_enum)]
		kind: EntityKind,
	},
	/// Fetches a single resource by identifier.
	Get {
		/// Resource kind to fetch.
		#[arg(value_enum)]
		kind: EntityKind,
		/// Resource identifier.
		id: String,
	},
	/// Fetches the event history of a loan.
	History {
		/// Loan identifier.
		loan_id: String,
	},
	/// Proposes a loan from a JSON payload file.
	Propose {
		/// Path to the JSON payload.
		file: PathBuf,
	},
	/// Cancels a loan that is still in the proposed state.
	Cancel {
		/// Loan identifier.
		loan_id: String,
	},
	/// Declines a loan that is still in the proposed state.
	Decline {
		/// Loan identifier.
		loan_id: String,
	},
}
impl From<CliCommand> for Command {
	fn from(command: CliCommand) -> Self {
		match command {
			CliCommand::All { kind } => Self::GetAll(kind),
			CliCommand::Get { kind, id } => Self::GetById(kind, id),
			CliCommand::History { loan_id } => Self::LoanHistory(loan_id),
			CliCommand::Propose { file } => Self::Propose(file),
			CliCommand::Cancel { loan_id } => Self::Cancel(loan_id),
			CliCommand::Decline { loan_id } => Self::Decline(loan_id),
		}
	}
}

/// Prints a terminal outcome to stdout in the classic console layout.
pub fn print_outcome(command: &Command, outcome: &Outcome) {
	match outcome {
		Outcome::Body(body) => {
			let header = command.header();

			println!("{header}");
			println!("{}", "=".repeat(header.len()));
			println!("{body}");
		},
		Outcome::Message(message) => println!("Success: {message}"),
		Outcome::UnexpectedStatus(status) => println!(
			"The request was not accepted (HTTP status {status}); see the log for details",
		),
		Outcome::Rejected(message) => println!("{message}"),
	}
}
