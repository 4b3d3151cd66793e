//! A connected, signing-capable view of one account on one network.

use crate::seal::SealWaiter;
use crate::transaction::{sign_envelope, TransactionBuilder, DEFAULT_GAS_LIMIT};
use crate::{reference_block_id, DeliveryError};
use flow_account::{resolve_account, resolve_account_key, AccountError, ResolvedAccount};
use flow_client::{HttpAccessClient, Network};
use flow_config::{ConfigError, FlowConfig};
use flow_types::{AccessClient, Identifier, Transaction, TransactionResult};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// An access client paired with a resolved signing account.
pub struct Session {
	client: Arc<dyn AccessClient>,
	account: ResolvedAccount,
}

impl Session {
	/// Connect to `network` and resolve `address` with its first key.
	pub async fn connect(
		network: Network,
		private_key_hex: &str,
		address: &str,
	) -> Result<Self, DeliveryError> {
		let client = HttpAccessClient::for_network(network)?;
		info!(%network, endpoint = client.endpoint(), "Connecting");
		Self::with_client(Arc::new(client), private_key_hex, address).await
	}

	pub async fn testnet(private_key_hex: &str, address: &str) -> Result<Self, DeliveryError> {
		Self::connect(Network::Testnet, private_key_hex, address).await
	}

	pub async fn mainnet(private_key_hex: &str, address: &str) -> Result<Self, DeliveryError> {
		Self::connect(Network::Mainnet, private_key_hex, address).await
	}

	pub async fn emulator(private_key_hex: &str, address: &str) -> Result<Self, DeliveryError> {
		Self::connect(Network::Emulator, private_key_hex, address).await
	}

	pub async fn with_client(
		client: Arc<dyn AccessClient>,
		private_key_hex: &str,
		address: &str,
	) -> Result<Self, DeliveryError> {
		let account = resolve_account(client.as_ref(), private_key_hex, address).await?;
		Ok(Self { client, account })
	}

	/// Resolve the account named `account_name` in `config` on `network`.
	pub async fn from_config(
		config: &FlowConfig,
		account_name: &str,
		network: Network,
	) -> Result<Self, DeliveryError> {
		let client = HttpAccessClient::for_network(network)?;
		info!(%network, account = account_name, "Connecting from configuration");
		Self::from_config_with_client(config, account_name, Arc::new(client)).await
	}

	pub async fn from_config_with_client(
		config: &FlowConfig,
		account_name: &str,
		client: Arc<dyn AccessClient>,
	) -> Result<Self, DeliveryError> {
		let entry = config
			.account(account_name)
			.ok_or_else(|| ConfigError::AccountNotFound(account_name.to_string()))?;
		let key_hex = entry.private_key_hex().ok_or_else(|| {
			AccountError::InvalidKey(format!(
				"Account {} has no inline private key",
				account_name
			))
		})?;

		let account =
			resolve_account_key(client.as_ref(), key_hex, &entry.address, entry.key_index())
				.await?;
		Ok(Self { client, account })
	}

	pub fn client(&self) -> Arc<dyn AccessClient> {
		self.client.clone()
	}

	pub fn account(&self) -> &ResolvedAccount {
		&self.account
	}

	pub async fn reference_block_id(&self) -> Result<Identifier, DeliveryError> {
		reference_block_id(self.client.as_ref()).await
	}

	/// Build and sign a transaction with this account as proposer, payer and
	/// sole authorizer.
	///
	/// The proposal key's sequence number is re-read from the network so
	/// consecutive transactions from one session stay valid.
	pub async fn prepare(
		&self,
		script: &str,
		arguments: Vec<Vec<u8>>,
		gas_limit: u64,
	) -> Result<Transaction, DeliveryError> {
		let address = self.account.address;
		let key_index = self.account.key.index;

		let onchain = self.client.get_account(&address).await?;
		let sequence_number = onchain
			.keys
			.iter()
			.find(|key| key.index == key_index)
			.map(|key| key.sequence_number)
			.ok_or(AccountError::KeyNotFound {
				address,
				index: key_index,
			})?;

		let mut tx = TransactionBuilder::new(script)
			.arguments(arguments)
			.reference_block(self.reference_block_id().await?)
			.gas_limit(gas_limit)
			.proposal_key(address, key_index, sequence_number)
			.payer(address)
			.authorizer(address)
			.build()?;

		sign_envelope(&mut tx, address, key_index, self.account.signer.as_ref()).await?;
		Ok(tx)
	}

	/// Send an already signed transaction.
	pub async fn send(&self, tx: &Transaction) -> Result<Identifier, DeliveryError> {
		let id = self.client.send_transaction(tx).await?;
		info!(%id, payer = %tx.payer, "Transaction submitted");
		Ok(id)
	}

	/// Build, sign and send `script` with the default gas limit.
	pub async fn submit(
		&self,
		script: &str,
		arguments: Vec<Vec<u8>>,
	) -> Result<Identifier, DeliveryError> {
		let tx = self.prepare(script, arguments, DEFAULT_GAS_LIMIT).await?;
		self.send(&tx).await
	}

	/// Block until `id` is sealed, printing progress to standard output.
	pub async fn wait_for_seal(
		&self,
		id: &Identifier,
		cancel: &CancellationToken,
	) -> Result<TransactionResult, DeliveryError> {
		Ok(SealWaiter::new(self.client.clone()).wait(id, cancel).await?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::seal::SilentProgress;
	use crate::transaction::envelope_message;
	use async_trait::async_trait;
	use flow_account::{new_account_key, PrivateKey};
	use flow_config::AccountConfig;
	use flow_types::{Account, Address, Block, BlockHeader, ClientError, TransactionStatus};
	use std::sync::Mutex;

	const KEY: &str = "c9c0f04adddf7674d265c395de300a65a777d3ec412bba5bfdfd12cffbbb78d9";
	const ADDRESS: &str = "01cf0e2f2f715450";

	struct NodeStub {
		sequence_number: u64,
		sent: Mutex<Vec<Transaction>>,
	}

	impl NodeStub {
		fn new(sequence_number: u64) -> Self {
			Self {
				sequence_number,
				sent: Mutex::new(Vec::new()),
			}
		}
	}

	#[async_trait]
	impl AccessClient for NodeStub {
		async fn get_account(&self, address: &Address) -> Result<Account, ClientError> {
			let mut key = new_account_key(&PrivateKey::from_hex(KEY).unwrap(), 1000);
			key.sequence_number = self.sequence_number;
			Ok(Account {
				address: *address,
				balance: 0,
				keys: vec![key],
			})
		}

		async fn get_latest_block(&self, sealed: bool) -> Result<Block, ClientError> {
			assert!(sealed);
			Ok(Block {
				header: BlockHeader {
					id: Identifier([0x0c; 32]),
					parent_id: Identifier([0x0b; 32]),
					height: 100,
					timestamp: Default::default(),
				},
			})
		}

		async fn get_transaction_result(
			&self,
			_id: &Identifier,
		) -> Result<TransactionResult, ClientError> {
			Ok(TransactionResult::with_status(TransactionStatus::Sealed))
		}

		async fn send_transaction(&self, tx: &Transaction) -> Result<Identifier, ClientError> {
			self.sent.lock().unwrap().push(tx.clone());
			Ok(Identifier([0x77; 32]))
		}
	}

	#[tokio::test]
	async fn test_submit_single_signer_transaction() {
		let node = Arc::new(NodeStub::new(5));
		let session = Session::with_client(node.clone(), KEY, ADDRESS).await.unwrap();

		let id = session.submit("transaction {}", vec![]).await.unwrap();
		assert_eq!(id, Identifier([0x77; 32]));

		let sent = node.sent.lock().unwrap();
		let tx = &sent[0];
		let address = Address::from_hex(ADDRESS).unwrap();
		assert_eq!(tx.reference_block_id, Identifier([0x0c; 32]));
		assert_eq!(tx.gas_limit, DEFAULT_GAS_LIMIT);
		assert_eq!(tx.proposal_key.sequence_number, 5);
		assert_eq!(tx.payer, address);
		assert_eq!(tx.authorizers, vec![address]);
		assert!(tx.payload_signatures.is_empty());
		assert_eq!(tx.envelope_signatures.len(), 1);
		assert_eq!(tx.envelope_signatures[0].signer_index, 0);
		assert!(!envelope_message(tx).is_empty());
	}

	#[tokio::test]
	async fn test_from_config_uses_named_account() {
		let mut config = FlowConfig::default();
		config
			.accounts
			.insert("testnet-admin".to_string(), AccountConfig::new(ADDRESS, KEY));

		let node: Arc<dyn AccessClient> = Arc::new(NodeStub::new(0));
		let session = Session::from_config_with_client(&config, "testnet-admin", node.clone())
			.await
			.unwrap();
		assert_eq!(session.account().address.to_string(), ADDRESS);

		let err = Session::from_config_with_client(&config, "missing", node)
			.await
			.err()
			.unwrap();
		assert!(matches!(
			err,
			DeliveryError::Config(ConfigError::AccountNotFound(name)) if name == "missing"
		));
	}

	#[tokio::test]
	async fn test_wait_for_seal_through_session() {
		let node = Arc::new(NodeStub::new(0));
		let session = Session::with_client(node, KEY, ADDRESS).await.unwrap();
		let id = Identifier([0x77; 32]);

		let result = SealWaiter::new(session.client())
			.with_progress(Arc::new(SilentProgress))
			.wait(&id, &CancellationToken::new())
			.await
			.unwrap();
		assert_eq!(result.status, TransactionStatus::Sealed);

		let result = session.wait_for_seal(&id, &CancellationToken::new()).await.unwrap();
		assert!(result.status.is_sealed());
	}
}
