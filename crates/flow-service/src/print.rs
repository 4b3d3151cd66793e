//! Human-readable output for the commands.

use flow_account::ResolvedAccount;
use flow_types::{AccountKey, Block, Identifier, Transaction, TransactionResult};
use std::io::{self, Write};

const SEPARATOR: &str = "================================";

/// Block timestamp as `2024-03-01 12:00:00 +0000 UTC`.
pub fn block_timestamp(block: &Block) -> String {
	block
		.timestamp()
		.format("%Y-%m-%d %H:%M:%S%.f %z %Z")
		.to_string()
}

pub fn print_block(out: &mut impl Write, block: &Block) -> io::Result<()> {
	writeln!(out)?;
	writeln!(out, "ID: {}", block.id())?;
	writeln!(out, "height: {}", block.height())?;
	writeln!(out, "timestamp: {}", block_timestamp(block))?;
	writeln!(out)
}

pub fn print_transaction(
	out: &mut impl Write,
	id: &Identifier,
	tx: &Transaction,
) -> io::Result<()> {
	let authorizers: Vec<String> = tx.authorizers.iter().map(|a| a.to_string()).collect();

	writeln!(out, "Printing Transaction")?;
	writeln!(out, "{}", SEPARATOR)?;
	writeln!(out, "ID: {}", id)?;
	writeln!(out, "Payer: {}", tx.payer)?;
	writeln!(out, "Proposer: {}", tx.proposal_key.address)?;
	writeln!(out, "Authorizers: [{}]", authorizers.join(", "))?;
	writeln!(out, "{}", SEPARATOR)
}

pub fn print_transaction_result(
	out: &mut impl Write,
	result: &TransactionResult,
) -> io::Result<()> {
	writeln!(out, "Printing Tx Result")?;
	writeln!(out, "{}", SEPARATOR)?;
	writeln!(out, "Status: {}", result.status)?;
	writeln!(out, "Error: {}", result.error.as_deref().unwrap_or("none"))?;
	if let Some(block_id) = &result.block_id {
		writeln!(out, "Block: {}", block_id)?;
	}
	for event in &result.events {
		writeln!(out, "Event: {} (index {})", event.event_type, event.event_index)?;
	}
	writeln!(out, "{}", SEPARATOR)
}

pub fn print_account(out: &mut impl Write, account: &ResolvedAccount) -> io::Result<()> {
	writeln!(out, "Address: 0x{}", account.address)?;
	print_account_key(out, &account.key)
}

pub fn print_account_key(out: &mut impl Write, key: &AccountKey) -> io::Result<()> {
	writeln!(out, "Key index: {}", key.index)?;
	writeln!(out, "Public key: {}", hex::encode(&key.public_key))?;
	writeln!(out, "Signature algorithm: {}", key.sig_algo)?;
	writeln!(out, "Hash algorithm: {}", key.hash_algo)?;
	writeln!(out, "Weight: {}", key.weight)?;
	writeln!(out, "Sequence number: {}", key.sequence_number)?;
	if key.revoked {
		writeln!(out, "Revoked: true")?;
	}
	Ok(())
}
