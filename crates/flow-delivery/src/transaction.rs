//! Transaction construction and signing.
//!
//! Signatures cover the RLP canonical form of the transaction prefixed with
//! a 32-byte domain tag. Payload signatures cover the payload alone; envelope
//! signatures cover the payload together with every payload signature, so
//! payload signers must sign before the payer signs the envelope.

use crate::DeliveryError;
use alloy::rlp::{Encodable, Header};
use flow_account::Signer;
use flow_types::{Address, Identifier, ProposalKey, Transaction, TransactionSignature};
use sha3::{Digest, Sha3_256};
use tracing::debug;

/// Gas limit used when none is given.
pub const DEFAULT_GAS_LIMIT: u64 = 9999;

/// Domain separation tag prepended to every signed transaction message.
pub const TRANSACTION_DOMAIN_TAG: [u8; 32] = padded_tag(b"FLOW-V0.0-transaction");

const fn padded_tag(tag: &[u8]) -> [u8; 32] {
	let mut out = [0u8; 32];
	let mut i = 0;
	while i < tag.len() {
		out[i] = tag[i];
		i += 1;
	}
	out
}

/// Assembles an unsigned [`Transaction`].
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
	script: Vec<u8>,
	arguments: Vec<Vec<u8>>,
	reference_block_id: Identifier,
	gas_limit: u64,
	proposal_key: Option<ProposalKey>,
	payer: Option<Address>,
	authorizers: Vec<Address>,
}

impl TransactionBuilder {
	pub fn new(script: impl Into<Vec<u8>>) -> Self {
		Self {
			script: script.into(),
			arguments: Vec::new(),
			reference_block_id: Identifier::EMPTY,
			gas_limit: DEFAULT_GAS_LIMIT,
			proposal_key: None,
			payer: None,
			authorizers: Vec::new(),
		}
	}

	/// Append one JSON-Cadence encoded argument.
	pub fn argument(mut self, argument: impl Into<Vec<u8>>) -> Self {
		self.arguments.push(argument.into());
		self
	}

	pub fn arguments(mut self, arguments: impl IntoIterator<Item = Vec<u8>>) -> Self {
		self.arguments.extend(arguments);
		self
	}

	pub fn reference_block(mut self, id: Identifier) -> Self {
		self.reference_block_id = id;
		self
	}

	pub fn gas_limit(mut self, gas_limit: u64) -> Self {
		self.gas_limit = gas_limit;
		self
	}

	pub fn proposal_key(mut self, address: Address, key_index: u32, sequence_number: u64) -> Self {
		self.proposal_key = Some(ProposalKey {
			address,
			key_index,
			sequence_number,
		});
		self
	}

	pub fn payer(mut self, address: Address) -> Self {
		self.payer = Some(address);
		self
	}

	pub fn authorizer(mut self, address: Address) -> Self {
		self.authorizers.push(address);
		self
	}

	pub fn build(self) -> Result<Transaction, DeliveryError> {
		if self.script.is_empty() {
			return Err(DeliveryError::Encoding("Transaction script is empty".into()));
		}
		if self.reference_block_id.is_empty() {
			return Err(DeliveryError::Encoding("Reference block id is not set".into()));
		}
		let proposal_key = self
			.proposal_key
			.ok_or_else(|| DeliveryError::Encoding("Proposal key is not set".into()))?;
		let payer = self
			.payer
			.ok_or_else(|| DeliveryError::Encoding("Payer is not set".into()))?;

		Ok(Transaction {
			script: self.script,
			arguments: self.arguments,
			reference_block_id: self.reference_block_id,
			gas_limit: self.gas_limit,
			proposal_key,
			payer,
			authorizers: self.authorizers,
			payload_signatures: Vec::new(),
			envelope_signatures: Vec::new(),
		})
	}
}

fn encode_list(fields: &[u8], out: &mut Vec<u8>) {
	Header {
		list: true,
		payload_length: fields.len(),
	}
	.encode(out);
	out.extend_from_slice(fields);
}

fn encode_bytes_list<'a>(items: impl IntoIterator<Item = &'a [u8]>, out: &mut Vec<u8>) {
	let mut fields = Vec::new();
	for item in items {
		item.encode(&mut fields);
	}
	encode_list(&fields, out);
}

fn encode_payload(tx: &Transaction, out: &mut Vec<u8>) {
	let mut fields = Vec::new();
	tx.script.as_slice().encode(&mut fields);
	encode_bytes_list(tx.arguments.iter().map(Vec::as_slice), &mut fields);
	tx.reference_block_id.as_bytes().encode(&mut fields);
	tx.gas_limit.encode(&mut fields);
	tx.proposal_key.address.0.as_slice().encode(&mut fields);
	u64::from(tx.proposal_key.key_index).encode(&mut fields);
	tx.proposal_key.sequence_number.encode(&mut fields);
	tx.payer.0.as_slice().encode(&mut fields);
	encode_bytes_list(tx.authorizers.iter().map(|a| a.0.as_slice()), &mut fields);
	encode_list(&fields, out);
}

fn encode_signatures(signatures: &[TransactionSignature], out: &mut Vec<u8>) {
	let mut list = Vec::new();
	for signature in signatures {
		let mut fields = Vec::new();
		u64::from(signature.signer_index).encode(&mut fields);
		u64::from(signature.key_index).encode(&mut fields);
		signature.signature.as_slice().encode(&mut fields);
		encode_list(&fields, &mut list);
	}
	encode_list(&list, out);
}

/// Canonical RLP encoding of the transaction payload.
pub fn payload_canonical_form(tx: &Transaction) -> Vec<u8> {
	let mut out = Vec::new();
	encode_payload(tx, &mut out);
	out
}

/// Canonical RLP encoding of the payload plus its payload signatures.
pub fn envelope_canonical_form(tx: &Transaction) -> Vec<u8> {
	let mut fields = Vec::new();
	encode_payload(tx, &mut fields);
	encode_signatures(&tx.payload_signatures, &mut fields);

	let mut out = Vec::new();
	encode_list(&fields, &mut out);
	out
}

/// Bytes a payload signer signs.
pub fn payload_message(tx: &Transaction) -> Vec<u8> {
	let mut message = TRANSACTION_DOMAIN_TAG.to_vec();
	message.extend(payload_canonical_form(tx));
	message
}

/// Bytes the payer signs.
pub fn envelope_message(tx: &Transaction) -> Vec<u8> {
	let mut message = TRANSACTION_DOMAIN_TAG.to_vec();
	message.extend(envelope_canonical_form(tx));
	message
}

/// Identifier of `tx`: the SHA3-256 hash of its complete canonical form,
/// including both signature lists.
pub fn transaction_id(tx: &Transaction) -> Identifier {
	let mut fields = Vec::new();
	encode_payload(tx, &mut fields);
	encode_signatures(&tx.payload_signatures, &mut fields);
	encode_signatures(&tx.envelope_signatures, &mut fields);

	let mut encoded = Vec::new();
	encode_list(&fields, &mut encoded);

	let mut id = [0u8; 32];
	id.copy_from_slice(&Sha3_256::digest(&encoded));
	Identifier(id)
}

fn signer_index(tx: &Transaction, address: &Address) -> Result<u32, DeliveryError> {
	tx.signer_index(address).ok_or_else(|| {
		DeliveryError::Encoding(format!("{} is not a signer of this transaction", address))
	})
}

fn sort_signatures(signatures: &mut [TransactionSignature]) {
	signatures.sort_by_key(|s| (s.signer_index, s.key_index));
}

/// Sign the payload as `address` with the key at `key_index`.
pub async fn sign_payload(
	tx: &mut Transaction,
	address: Address,
	key_index: u32,
	signer: &dyn Signer,
) -> Result<(), DeliveryError> {
	let signer_index = signer_index(tx, &address)?;
	let signature = signer.sign(&payload_message(tx)).await?;
	debug!(%address, key_index, signer_index, "Signed payload");

	tx.payload_signatures.push(TransactionSignature {
		address,
		signer_index,
		key_index,
		signature,
	});
	sort_signatures(&mut tx.payload_signatures);
	Ok(())
}

/// Sign the envelope as `address` with the key at `key_index`.
///
/// Must run after every payload signature has been added.
pub async fn sign_envelope(
	tx: &mut Transaction,
	address: Address,
	key_index: u32,
	signer: &dyn Signer,
) -> Result<(), DeliveryError> {
	let signer_index = signer_index(tx, &address)?;
	let signature = signer.sign(&envelope_message(tx)).await?;
	debug!(%address, key_index, signer_index, "Signed envelope");

	tx.envelope_signatures.push(TransactionSignature {
		address,
		signer_index,
		key_index,
		signature,
	});
	sort_signatures(&mut tx.envelope_signatures);
	Ok(())
}
