//! Wire models of the REST access API.
//!
//! 64-bit integers travel as decimal strings, byte payloads as base64 and
//! identifiers as hex. These types exist only to translate between that
//! representation and the ones in `flow-types`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use flow_types::{
	decode_hex, Account, AccountKey, Address, Block, BlockHeader, ClientError, Event,
	HashAlgorithm, Identifier, SignatureAlgorithm, Transaction, TransactionResult,
	TransactionSignature, TransactionStatus,
};
use serde::{Deserialize, Serialize};

fn parse_u64(field: &str, value: &str) -> Result<u64, ClientError> {
	value
		.parse()
		.map_err(|e| ClientError::Decode(format!("{} {:?}: {}", field, value, e)))
}

fn parse_u32(field: &str, value: &str) -> Result<u32, ClientError> {
	value
		.parse()
		.map_err(|e| ClientError::Decode(format!("{} {:?}: {}", field, value, e)))
}

fn parse_identifier(field: &str, value: &str) -> Result<Identifier, ClientError> {
	Identifier::from_hex(value).map_err(|e| ClientError::Decode(format!("{}: {}", field, e)))
}

fn parse_address(field: &str, value: &str) -> Result<Address, ClientError> {
	Address::from_hex(value).map_err(|e| ClientError::Decode(format!("{}: {}", field, e)))
}

fn decode_base64(field: &str, value: &str) -> Result<Vec<u8>, ClientError> {
	STANDARD
		.decode(value)
		.map_err(|e| ClientError::Decode(format!("{}: {}", field, e)))
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
	#[serde(default)]
	pub code: Option<u16>,
	pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct AccountResponse {
	pub address: String,
	pub balance: String,
	#[serde(default)]
	pub keys: Vec<AccountKeyResponse>,
}

#[derive(Debug, Deserialize)]
pub struct AccountKeyResponse {
	pub index: String,
	pub public_key: String,
	pub signing_algorithm: String,
	pub hashing_algorithm: String,
	pub sequence_number: String,
	pub weight: String,
	#[serde(default)]
	pub revoked: bool,
}

impl TryFrom<AccountKeyResponse> for AccountKey {
	type Error = ClientError;

	fn try_from(key: AccountKeyResponse) -> Result<Self, Self::Error> {
		Ok(AccountKey {
			index: parse_u32("key index", &key.index)?,
			public_key: decode_hex(&key.public_key)
				.map_err(|e| ClientError::Decode(format!("public key: {}", e)))?,
			sig_algo: key
				.signing_algorithm
				.parse::<SignatureAlgorithm>()
				.map_err(|e| ClientError::Decode(e.to_string()))?,
			hash_algo: key
				.hashing_algorithm
				.parse::<HashAlgorithm>()
				.map_err(|e| ClientError::Decode(e.to_string()))?,
			weight: parse_u32("key weight", &key.weight)?,
			sequence_number: parse_u64("sequence number", &key.sequence_number)?,
			revoked: key.revoked,
		})
	}
}

impl TryFrom<AccountResponse> for Account {
	type Error = ClientError;

	fn try_from(account: AccountResponse) -> Result<Self, Self::Error> {
		Ok(Account {
			address: parse_address("account address", &account.address)?,
			balance: parse_u64("balance", &account.balance)?,
			keys: account
				.keys
				.into_iter()
				.map(AccountKey::try_from)
				.collect::<Result<_, _>>()?,
		})
	}
}

#[derive(Debug, Deserialize)]
pub struct BlockResponse {
	pub header: BlockHeaderResponse,
}

#[derive(Debug, Deserialize)]
pub struct BlockHeaderResponse {
	pub id: String,
	pub parent_id: String,
	pub height: String,
	pub timestamp: DateTime<Utc>,
}

impl TryFrom<BlockResponse> for Block {
	type Error = ClientError;

	fn try_from(block: BlockResponse) -> Result<Self, Self::Error> {
		let header = block.header;
		Ok(Block {
			header: BlockHeader {
				id: parse_identifier("block id", &header.id)?,
				parent_id: parse_identifier("parent id", &header.parent_id)?,
				height: parse_u64("height", &header.height)?,
				timestamp: header.timestamp,
			},
		})
	}
}

#[derive(Debug, Deserialize)]
pub struct EventResponse {
	#[serde(rename = "type")]
	pub event_type: String,
	pub transaction_id: String,
	pub transaction_index: String,
	pub event_index: String,
	pub payload: String,
}

impl TryFrom<EventResponse> for Event {
	type Error = ClientError;

	fn try_from(event: EventResponse) -> Result<Self, Self::Error> {
		Ok(Event {
			event_type: event.event_type,
			transaction_id: parse_identifier("event transaction id", &event.transaction_id)?,
			transaction_index: parse_u32("transaction index", &event.transaction_index)?,
			event_index: parse_u32("event index", &event.event_index)?,
			payload: decode_base64("event payload", &event.payload)?,
		})
	}
}

#[derive(Debug, Deserialize)]
pub struct TransactionResultResponse {
	#[serde(default)]
	pub block_id: String,
	pub status: String,
	#[serde(default)]
	pub status_code: u32,
	#[serde(default)]
	pub error_message: String,
	#[serde(default)]
	pub computation_used: Option<String>,
	#[serde(default)]
	pub events: Vec<EventResponse>,
}

impl TryFrom<TransactionResultResponse> for TransactionResult {
	type Error = ClientError;

	fn try_from(result: TransactionResultResponse) -> Result<Self, Self::Error> {
		let block_id = if result.block_id.is_empty() {
			None
		} else {
			Some(parse_identifier("result block id", &result.block_id)?)
		};
		let computation_used = match result.computation_used.as_deref() {
			Some(value) if !value.is_empty() => parse_u64("computation used", value)?,
			_ => 0,
		};

		Ok(TransactionResult {
			status: TransactionStatus::from_wire(&result.status),
			status_code: result.status_code,
			error: Some(result.error_message).filter(|message| !message.is_empty()),
			block_id,
			computation_used,
			events: result
				.events
				.into_iter()
				.map(Event::try_from)
				.collect::<Result<_, _>>()?,
		})
	}
}

#[derive(Debug, Serialize)]
pub struct ProposalKeyBody {
	pub address: String,
	pub key_index: String,
	pub sequence_number: String,
}

#[derive(Debug, Serialize)]
pub struct SignatureBody {
	pub address: String,
	pub key_index: String,
	pub signature: String,
}

impl From<&TransactionSignature> for SignatureBody {
	fn from(signature: &TransactionSignature) -> Self {
		Self {
			address: signature.address.to_string(),
			key_index: signature.key_index.to_string(),
			signature: STANDARD.encode(&signature.signature),
		}
	}
}

#[derive(Debug, Serialize)]
pub struct TransactionBody {
	pub script: String,
	pub arguments: Vec<String>,
	pub reference_block_id: String,
	pub gas_limit: String,
	pub payer: String,
	pub proposal_key: ProposalKeyBody,
	pub authorizers: Vec<String>,
	pub payload_signatures: Vec<SignatureBody>,
	pub envelope_signatures: Vec<SignatureBody>,
}

impl From<&Transaction> for TransactionBody {
	fn from(tx: &Transaction) -> Self {
		Self {
			script: STANDARD.encode(&tx.script),
			arguments: tx.arguments.iter().map(|arg| STANDARD.encode(arg)).collect(),
			reference_block_id: tx.reference_block_id.to_string(),
			gas_limit: tx.gas_limit.to_string(),
			payer: tx.payer.to_string(),
			proposal_key: ProposalKeyBody {
				address: tx.proposal_key.address.to_string(),
				key_index: tx.proposal_key.key_index.to_string(),
				sequence_number: tx.proposal_key.sequence_number.to_string(),
			},
			authorizers: tx.authorizers.iter().map(Address::to_string).collect(),
			payload_signatures: tx.payload_signatures.iter().map(SignatureBody::from).collect(),
			envelope_signatures: tx.envelope_signatures.iter().map(SignatureBody::from).collect(),
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct TransactionResponse {
	pub id: String,
}
