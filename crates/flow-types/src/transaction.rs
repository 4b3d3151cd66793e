//! Transaction types.
//!
//! This module defines the transaction lifecycle as reported by an access
//! node, the result snapshot returned for a submitted transaction, and the
//! transaction body itself together with its signatures.

use crate::common::{Address, Identifier};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a submitted transaction.
///
/// States advance `Unknown → Pending → Finalized → Executed → Sealed`;
/// `Expired` is the alternate terminal state for transactions whose
/// reference block fell too far behind before inclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransactionStatus {
	Unknown,
	Pending,
	Finalized,
	Executed,
	Sealed,
	Expired,
}

impl TransactionStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			TransactionStatus::Unknown => "UNKNOWN",
			TransactionStatus::Pending => "PENDING",
			TransactionStatus::Finalized => "FINALIZED",
			TransactionStatus::Executed => "EXECUTED",
			TransactionStatus::Sealed => "SEALED",
			TransactionStatus::Expired => "EXPIRED",
		}
	}

	/// Parse the status name used on the wire. Anything unrecognised is
	/// reported as `Unknown` rather than rejected.
	pub fn from_wire(value: &str) -> Self {
		match value.to_ascii_lowercase().as_str() {
			"pending" => TransactionStatus::Pending,
			"finalized" => TransactionStatus::Finalized,
			"executed" => TransactionStatus::Executed,
			"sealed" => TransactionStatus::Sealed,
			"expired" => TransactionStatus::Expired,
			_ => TransactionStatus::Unknown,
		}
	}

	pub fn is_sealed(&self) -> bool {
		matches!(self, TransactionStatus::Sealed)
	}

	pub fn is_terminal(&self) -> bool {
		matches!(self, TransactionStatus::Sealed | TransactionStatus::Expired)
	}
}

impl fmt::Display for TransactionStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Event emitted while executing a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
	/// Fully qualified event type, e.g. `A.0x1.FlowToken.TokensWithdrawn`.
	pub event_type: String,
	pub transaction_id: Identifier,
	pub transaction_index: u32,
	pub event_index: u32,
	/// JSON-Cadence encoded payload.
	pub payload: Vec<u8>,
}

/// Snapshot of a transaction's processing state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
	pub status: TransactionStatus,
	pub status_code: u32,
	/// Populated only when the transaction failed on-chain.
	pub error: Option<String>,
	pub block_id: Option<Identifier>,
	pub computation_used: u64,
	pub events: Vec<Event>,
}

impl TransactionResult {
	/// Result with the given status and nothing else set.
	pub fn with_status(status: TransactionStatus) -> Self {
		Self {
			status,
			status_code: 0,
			error: None,
			block_id: None,
			computation_used: 0,
			events: Vec::new(),
		}
	}

	pub fn is_failed(&self) -> bool {
		self.error.is_some()
	}
}

/// Account key used to propose a transaction and the sequence number it
/// consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalKey {
	pub address: Address,
	pub key_index: u32,
	pub sequence_number: u64,
}

/// Signature attached to a transaction by one of its signers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSignature {
	pub address: Address,
	/// Position of `address` in [`Transaction::signer_addresses`].
	pub signer_index: u32,
	pub key_index: u32,
	/// Raw 64-byte `r || s` signature.
	pub signature: Vec<u8>,
}

/// Transaction body plus the signatures collected so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
	/// Cadence source.
	pub script: Vec<u8>,
	/// JSON-Cadence encoded arguments.
	pub arguments: Vec<Vec<u8>>,
	pub reference_block_id: Identifier,
	pub gas_limit: u64,
	pub proposal_key: ProposalKey,
	pub payer: Address,
	pub authorizers: Vec<Address>,
	pub payload_signatures: Vec<TransactionSignature>,
	pub envelope_signatures: Vec<TransactionSignature>,
}

impl Transaction {
	/// Every distinct signer in canonical order: proposer, payer, then
	/// authorizers. Signature signer indices refer to this list.
	pub fn signer_addresses(&self) -> Vec<Address> {
		let mut signers = Vec::new();
		let mut add = |address: Address| {
			if address != Address::EMPTY && !signers.contains(&address) {
				signers.push(address);
			}
		};

		add(self.proposal_key.address);
		add(self.payer);
		for authorizer in &self.authorizers {
			add(*authorizer);
		}
		signers
	}

	/// Index of `address` in [`Self::signer_addresses`], if it signs at all.
	pub fn signer_index(&self, address: &Address) -> Option<u32> {
		self.signer_addresses()
			.iter()
			.position(|candidate| candidate == address)
			.map(|index| index as u32)
	}
}
