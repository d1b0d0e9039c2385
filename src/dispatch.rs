//! Command dispatch: endpoint resolution, state preconditions, verb calls.
//!
//! Each process invocation runs exactly one [`Command`] to a terminal
//! [`Outcome`]. Cancel and decline re-read the loan first and refuse locally
//! unless it is still `PROPOSED`; the refusal is an outcome, not an error,
//! and costs zero network calls for the mutating step.

// std
use std::{fs, path::PathBuf};
// self
use crate::{
	_prelude::*,
	config::{AppConfig, EntityKind},
	http::{ApiClient, PostOutcome},
	model,
};

/// Operations the dispatcher can execute, one per process invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
	/// Lists every resource of a kind.
	GetAll(EntityKind),
	/// Fetches one resource of a kind by identifier.
	GetById(EntityKind, String),
	/// Fetches the event history of a loan.
	LoanHistory(String),
	/// Proposes a loan from a JSON payload file.
	Propose(PathBuf),
	/// Cancels a proposed loan.
	Cancel(String),
	/// Declines a proposed loan.
	Decline(String),
}
impl Command {
	/// Returns the console heading printed above a successful read result.
	pub fn header(&self) -> &'static str {
		match self {
			Self::GetAll(kind) => kind.collection_label(),
			Self::GetById(kind, _) => kind.singular_label(),
			Self::LoanHistory(_) => "1Source Loan History",
			Self::Propose(_) | Self::Cancel(_) | Self::Decline(_) => "1Source Loan",
		}
	}

	/// Returns the prompt printed when the command fails.
	pub fn error_prompt(&self) -> String {
		match self {
			Self::GetAll(kind) => format!("Error retrieving {}", kind.collection_label()),
			Self::GetById(kind, id) => {
				format!("Error retrieving {} with id = [{id}]", kind.singular_label())
			},
			Self::LoanHistory(id) => {
				format!("Error retrieving 1Source Loan History with loan_id = [{id}]")
			},
			Self::Propose(path) => format!("Error proposing loan from [{}]", path.display()),
			Self::Cancel(id) => format!("Error canceling loan with loan_id = [{id}]"),
			Self::Decline(id) => format!("Error declining loan with loan_id = [{id}]"),
		}
	}
}

/// Terminal result of one dispatched command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
	/// Raw response body from a read operation.
	Body(String),
	/// Acknowledgment message from an accepted mutation.
	Message(String),
	/// Server answered a mutation with an unexpected status.
	UnexpectedStatus(u16),
	/// Mutation refused locally before any network call.
	Rejected(String),
}
impl From<PostOutcome> for Outcome {
	fn from(outcome: PostOutcome) -> Self {
		match outcome {
			PostOutcome::Accepted(message) => Self::Message(message),
			PostOutcome::UnexpectedStatus(status) => Self::UnexpectedStatus(status.as_u16()),
		}
	}
}

/// Loan state transitions gated by the `PROPOSED` precondition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Transition {
	Cancel,
	Decline,
}
impl Transition {
	const fn suffix(self) -> &'static str {
		match self {
			Self::Cancel => "cancel",
			Self::Decline => "decline",
		}
	}

	const fn past_tense(self) -> &'static str {
		match self {
			Self::Cancel => "canceled",
			Self::Decline => "declined",
		}
	}
}

/// Executes commands against the configured endpoints.
pub struct Dispatcher<'a> {
	config: &'a AppConfig,
	client: ApiClient,
}
impl<'a> Dispatcher<'a> {
	/// Creates a dispatcher bound to one configuration and one credential.
	pub fn new(config: &'a AppConfig, client: ApiClient) -> Self {
		Self { config, client }
	}

	/// Runs a single command to its terminal outcome.
	pub async fn dispatch(&self, command: &Command) -> Result<Outcome> {
		match command {
			Command::GetAll(kind) => {
				let endpoint = self.config.endpoints.url_for(*kind)?;

				Ok(Outcome::Body(self.client.get_collection(endpoint).await?))
			},
			Command::GetById(kind, id) => {
				let endpoint = self.config.endpoints.url_for(*kind)?;

				Ok(Outcome::Body(self.client.get_by_id(endpoint, id).await?))
			},
			Command::LoanHistory(id) => {
				let loans = self.config.endpoints.url_for(EntityKind::Loans)?;

				Ok(Outcome::Body(
					self.client.get_collection(&format!("{loans}/{id}/history")).await?,
				))
			},
			Command::Propose(path) => {
				let loans = self.config.endpoints.url_for(EntityKind::Loans)?;
				let payload = fs::read(path)
					.map_err(|source| Error::Payload { path: path.clone(), source })?;

				Ok(self.client.propose_loan(loans, payload).await?.into())
			},
			Command::Cancel(id) => self.transition(id, Transition::Cancel).await,
			Command::Decline(id) => self.transition(id, Transition::Decline).await,
		}
	}

	/// Re-reads the loan and dispatches the transition only from `PROPOSED`.
	///
	/// The check is point-in-time: the server may still move the loan between
	/// the read and the write, in which case the POST reports an unexpected
	/// status instead.
	async fn transition(&self, loan_id: &str, transition: Transition) -> Result<Outcome> {
		let loans = self.config.endpoints.url_for(EntityKind::Loans)?;
		let body = self.client.get_by_id(loans, loan_id).await?;
		let loan = model::decode_loan(&body)?;

		if !loan.is_proposed() {
			tracing::info!(loan_id, status = %loan.loan_status, "transition refused locally");

			return Ok(Outcome::Rejected(format!(
				"Loan with id [{loan_id}] is not in PROPOSED state and cannot be {}",
				transition.past_tense(),
			)));
		}

		let endpoint = format!("{loans}/{loan_id}/{}", transition.suffix());
		let outcome = match transition {
			Transition::Cancel => self.client.cancel_loan(&endpoint).await?,
			Transition::Decline => self.client.decline_loan(&endpoint).await?,
		};

		Ok(outcome.into())
	}
}
