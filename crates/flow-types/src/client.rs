//! Access node client abstraction.

use crate::{Account, Address, Block, Identifier, Transaction, TransactionResult};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Access API error ({status}): {message}")]
	Api { status: u16, message: String },

	#[error("Transport error: {0}")]
	Transport(String),

	#[error("Decode error: {0}")]
	Decode(String),

	#[error("Invalid endpoint: {0}")]
	InvalidEndpoint(String),
}

/// Remote operations delegated to an access node.
///
/// Implementations must be safe to call repeatedly with the same arguments;
/// each call returns a fresh snapshot of chain state.
#[async_trait]
pub trait AccessClient: Send + Sync {
	/// Fetch an account together with its public keys.
	async fn get_account(&self, address: &Address) -> Result<Account, ClientError>;

	/// Fetch the latest block, either the latest sealed or latest finalized.
	async fn get_latest_block(&self, sealed: bool) -> Result<Block, ClientError>;

	/// Fetch the current result of a submitted transaction.
	async fn get_transaction_result(
		&self,
		id: &Identifier,
	) -> Result<TransactionResult, ClientError>;

	/// Submit a fully signed transaction, returning its identifier.
	async fn send_transaction(&self, tx: &Transaction) -> Result<Identifier, ClientError>;
}
