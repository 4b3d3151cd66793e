// flow-delivery/src/lib.rs

use flow_account::AccountError;
use flow_config::ConfigError;
use flow_types::{AccessClient, ClientError, Identifier};
use thiserror::Error;
use tracing::debug;

pub mod seal;
pub mod session;
pub mod transaction;

pub use seal::{
	wait_for_seal, ProgressReporter, SealError, SealWaiter, SilentProgress, StdoutProgress,
	DEFAULT_POLL_INTERVAL,
};
pub use session::Session;
pub use transaction::{
	envelope_message, payload_message, sign_envelope, sign_payload, transaction_id,
	TransactionBuilder, DEFAULT_GAS_LIMIT, TRANSACTION_DOMAIN_TAG,
};

#[derive(Debug, Error)]
pub enum DeliveryError {
	#[error("Client error: {0}")]
	Client(#[from] ClientError),

	#[error("Account error: {0}")]
	Account(#[from] AccountError),

	#[error("Configuration error: {0}")]
	Config(#[from] ConfigError),

	#[error(transparent)]
	Seal(#[from] SealError),

	#[error("Encoding error: {0}")]
	Encoding(String),
}

/// Id of the latest sealed block, used as a transaction's reference block.
pub async fn reference_block_id(client: &dyn AccessClient) -> Result<Identifier, DeliveryError> {
	let block = client.get_latest_block(true).await?;
	debug!(id = %block.id(), height = block.height(), "Using reference block");
	Ok(block.id())
}
