//! Binary entry point: parse, log, load, authenticate, dispatch, print.

// std
use std::process::ExitCode;
// crates.io
use clap::Parser;
// self
use onesource::{
	auth,
	cli::{self, Cli},
	config::AppConfig,
	dispatch::{Command, Dispatcher},
	http::ApiClient,
	obs,
};

#[tokio::main]
async fn main() -> ExitCode {
	let cli = Cli::parse();

	if let Err(error) = obs::init(&cli.log_file) {
		eprintln!("Error opening the log file: {error}");

		return ExitCode::FAILURE;
	}

	let config = match AppConfig::load(&cli.config) {
		Ok(config) => config,
		Err(error) => {
			tracing::error!(%error, "configuration load failed");
			eprintln!("Error reading and parsing the configuration file: {error}");

			return ExitCode::FAILURE;
		},
	};
	let bearer = match auth::authenticate(&config).await {
		Ok(bearer) => bearer,
		Err(error) => {
			tracing::error!(%error, "credential exchange failed");
			eprintln!("Error retrieving auth token: {error}");

			return ExitCode::FAILURE;
		},
	};
	let client = match ApiClient::new(bearer) {
		Ok(client) => client,
		Err(error) => {
			tracing::error!(%error, "HTTP client construction failed");
			eprintln!("Error building the HTTP client: {error}");

			return ExitCode::FAILURE;
		},
	};
	let command = Command::from(cli.command);
	let dispatcher = Dispatcher::new(&config, client);

	match dispatcher.dispatch(&command).await {
		Ok(outcome) => {
			cli::print_outcome(&command, &outcome);

			ExitCode::SUCCESS
		},
		Err(error) => {
			tracing::error!(%error, "command failed");
			eprintln!("{}: {error}", command.error_prompt());

			ExitCode::FAILURE
		},
	}
}
