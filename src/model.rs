//! Wire-format structures for the API's typed responses.
//!
//! Only the three mutating operations return a typed acknowledgment; read
//! operations forward their bodies verbatim, so no decoded collection types
//! live here. [`Loan`] is decoded solely to evaluate the state precondition
//! ahead of a cancel or decline. Decoding is lenient on purpose: unknown
//! fields are ignored and missing fields default, matching the upstream
//! contract where partial records are routine.

// self
use crate::{_prelude::*, error::DecodeError};

/// Loan status required before a cancel or decline is dispatched.
pub const LOAN_STATUS_PROPOSED: &str = "PROPOSED";

/// Uniform acknowledgment returned by propose, cancel, and decline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseEnvelope {
	/// Server-side timestamp of the acknowledgment.
	pub timestamp: String,
	/// HTTP status echoed in the body.
	pub status: u32,
	/// Human-readable acknowledgment surfaced to the caller.
	pub message: String,
	/// Request path echoed by the server.
	pub path: String,
}

/// Decodes a mutation acknowledgment body.
pub fn decode_envelope(body: &str) -> Result<ResponseEnvelope, DecodeError> {
	let mut deserializer = serde_json::Deserializer::from_str(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| DecodeError::Envelope { source })
}

/// Decodes a loan body ahead of a state-transition precondition check.
pub fn decode_loan(body: &str) -> Result<Loan, DecodeError> {
	let mut deserializer = serde_json::Deserializer::from_str(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| DecodeError::Loan { source })
}

/// Loan contract as returned by the loans endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Loan {
	/// Loan identifier assigned at proposal time.
	pub loan_id: String,
	/// Identifier of the most recent lifecycle event.
	pub last_event_id: u32,
	/// Free-text lifecycle status; `PROPOSED` until counterparty action.
	pub loan_status: String,
	/// Settlement progress reported by the venue.
	pub settlement_status: String,
	/// Party that performed the latest update.
	pub last_update_party_id: String,
	/// Instant of the latest update.
	pub last_update_date_time: String,
	/// Trade terms agreed at proposal.
	pub trade: Trade,
	/// Settlement routing for the loan.
	pub settlement: Settlement,
}
impl Loan {
	/// Returns `true` while the loan still awaits counterparty action.
	///
	/// The comparison is exact; statuses that merely contain the word (e.g. a
	/// hypothetical `CANCEL_PROPOSED`) do not qualify.
	pub fn is_proposed(&self) -> bool {
		self.loan_status == LOAN_STATUS_PROPOSED
	}
}

/// Trade terms nested inside a [`Loan`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Trade {
	/// Venue the trade was executed on.
	pub execution_venue: ExecutionVenue,
	/// Instrument on loan.
	pub instrument: Instrument,
	/// Rate terms.
	pub rate: Rate,
	/// Quantity on loan.
	pub quantity: u32,
	/// Billing currency code.
	pub billing_currency: String,
	/// Dividend rate percentage.
	pub dividend_rate_pct: f32,
	/// Trade date.
	pub trade_date: String,
	/// Settlement type label.
	pub settlement_type: String,
	/// Collateral terms.
	pub collateral: Collateral,
	/// Parties to the transaction with their roles.
	pub transacting_parties: Vec<TransactingParty>,
}

/// Execution venue metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecutionVenue {
	/// Venue type label.
	#[serde(rename = "type")]
	pub venue_type: String,
	/// Platform the venue runs on.
	pub platform: Platform,
	/// Roles the venue parties play.
	pub venue_parties: Vec<VenueParty>,
}

/// Role entry for a venue party.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VenueParty {
	/// Role label.
	pub party_role: String,
}

/// Venue platform descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Platform {
	/// Platform LEI; the upstream field name carries the historical spelling.
	#[serde(rename = "gliefLei")]
	pub gleif_lei: String,
	/// Registered legal name.
	pub legal_name: String,
	/// Venue display name.
	pub venue_name: String,
	/// Venue-assigned reference identifier.
	pub venue_ref_id: String,
}

/// Instrument identifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Instrument {
	/// Ticker symbol.
	pub ticker: String,
	/// CUSIP identifier.
	pub cusip: String,
	/// ISIN identifier.
	pub isin: String,
	/// SEDOL identifier.
	pub sedol: String,
	/// FIGI identifier.
	pub figi: String,
	/// Free-text description.
	pub description: String,
}

/// Rate terms wrapper.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Rate {
	/// Rebate component.
	pub rebate: Rebate,
}

/// Rebate component wrapper.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Rebate {
	/// Fixed-rate leg.
	pub fixed: FixedRate,
}

/// Fixed-rate leg of a rebate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FixedRate {
	/// Base rate.
	pub base_rate: f32,
	/// Date the rate takes effect.
	pub effective_date: String,
	/// Effective rate.
	pub effective_rate: f32,
}

/// Collateral terms.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Collateral {
	/// Value of the loan leg.
	pub loan_value: f64,
	/// Value of the collateral leg.
	pub collateral_value: f64,
	/// Collateral currency code.
	pub currency: String,
	/// Rounding rule identifier.
	pub rounding_rule: u32,
	/// Rounding mode label.
	pub rounding_mode: String,
	/// Margin percentage.
	pub margin: u32,
}

/// Party to the transaction together with its role.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactingParty {
	/// Role label.
	pub party_role: String,
	/// Party descriptor.
	pub party: Party,
}

/// Party descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Party {
	/// Party identifier.
	pub party_id: String,
	/// Display name.
	pub party_name: String,
	/// Party LEI.
	pub gleif_lei: String,
	/// Internal identifier at the counterparty.
	pub internal_party_id: String,
}

/// Settlement routing for one side of the loan.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settlement {
	/// Role the instruction applies to.
	pub party_role: String,
	/// Settlement instruction details.
	pub instruction: Instruction,
}

/// Settlement instruction details.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Instruction {
	/// Settlement BIC; the upstream field name is capitalized on the wire.
	#[serde(rename = "SettlementBic")]
	pub settlement_bic: String,
	/// Local agent BIC.
	pub local_agent_bic: String,
	/// Local agent name.
	pub local_agent_name: String,
	/// Local agent account.
	pub local_agent_acct: String,
	/// Market-specific extension fields.
	pub local_market_fields: LocalMarketFields,
}

/// Market-specific extension field pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocalMarketFields {
	/// Field name.
	pub local_field_name: String,
	/// Field value.
	pub local_field_value: String,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn envelope_round_trips_losslessly() {
		let envelope = ResponseEnvelope {
			timestamp: "2024-01-01T00:00:00Z".into(),
			status: 201,
			message: "Created".into(),
			path: "/loans".into(),
		};
		let encoded =
			serde_json::to_string(&envelope).expect("Envelope should serialize to JSON.");
		let decoded = decode_envelope(&encoded).expect("Encoded envelope should decode back.");

		assert_eq!(decoded, envelope);
	}

	#[test]
	fn malformed_envelope_is_a_decode_error_not_a_panic() {
		let err = decode_envelope("{not json").expect_err("Malformed JSON should fail to decode.");

		assert!(matches!(err, DecodeError::Envelope { .. }));
	}

	#[test]
	fn envelope_with_wrong_field_type_names_the_path() {
		let err = decode_envelope(r#"{"timestamp":"t","status":"201","message":"m","path":"/"}"#)
			.expect_err("A string status should fail to decode.");
		let DecodeError::Envelope { source } = err else {
			panic!("Expected an envelope decode error.");
		};

		assert_eq!(source.path().to_string(), "status");
	}

	#[test]
	fn loan_decodes_with_missing_and_unknown_fields() {
		let loan = decode_loan(
			r#"{"loanId":"L123","loanStatus":"PROPOSED","sideshow":true}"#,
		)
		.expect("Partial loan body should decode.");

		assert_eq!(loan.loan_id, "L123");
		assert!(loan.is_proposed());
		assert_eq!(loan.settlement_status, "");
		assert_eq!(loan.trade.quantity, 0);
	}

	#[test]
	fn loan_decodes_nested_wire_names() {
		let loan = decode_loan(
			r#"{
				"loanId": "L9",
				"loanStatus": "OPEN",
				"trade": {
					"executionVenue": {
						"type": "offvenue",
						"platform": {"gliefLei": "LEI123", "venueName": "V"}
					},
					"instrument": {"ticker": "AAPL", "cusip": "037833100"},
					"rate": {"rebate": {"fixed": {"baseRate": 0.25}}},
					"quantity": 15000,
					"transactingParties": [
						{"partyRole": "LENDER", "party": {"partyId": "P1", "gleifLei": "LEI-P1"}}
					]
				},
				"settlement": {
					"partyRole": "BORROWER",
					"instruction": {"SettlementBic": "DTCYUS33", "localAgentBic": "IRVTBEBB"}
				}
			}"#,
		)
		.expect("Nested loan body should decode.");

		assert_eq!(loan.trade.execution_venue.venue_type, "offvenue");
		assert_eq!(loan.trade.execution_venue.platform.gleif_lei, "LEI123");
		assert_eq!(loan.trade.instrument.ticker, "AAPL");
		assert_eq!(loan.trade.rate.rebate.fixed.base_rate, 0.25);
		assert_eq!(loan.trade.quantity, 15000);
		assert_eq!(loan.trade.transacting_parties[0].party.gleif_lei, "LEI-P1");
		assert_eq!(loan.settlement.instruction.settlement_bic, "DTCYUS33");
		assert!(!loan.is_proposed());
	}

	#[test]
	fn proposed_check_is_exact_not_substring() {
		let proposed = Loan { loan_status: "PROPOSED".into(), ..Loan::default() };
		let canceled = Loan { loan_status: "CANCELED".into(), ..Loan::default() };
		let lookalike = Loan { loan_status: "CANCEL_PROPOSED".into(), ..Loan::default() };

		assert!(proposed.is_proposed());
		assert!(!canceled.is_proposed());
		assert!(!lookalike.is_proposed());
	}
}
