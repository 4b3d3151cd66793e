//! Account keys, signers and account resolution.
//!
//! Resolving an account pairs a locally held private key with the key record
//! the network holds for that account, producing a signer that hashes with
//! the algorithm the account key was registered with.

use async_trait::async_trait;
use flow_types::{AccessClient, AccountKey, Address, ClientError, SignatureAlgorithm};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

pub mod implementations;
pub mod keys;

pub use implementations::InMemorySigner;
pub use keys::{new_account_key, random_private_key, PrivateKey};

#[derive(Debug, Error)]
pub enum AccountError {
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	#[error("Invalid address: {0}")]
	InvalidAddress(String),
	#[error("Account {0} has no keys")]
	NoKeys(Address),
	#[error("Account {address} has no key with index {index}")]
	KeyNotFound { address: Address, index: u32 },
	#[error("Unsupported signature algorithm: {0}")]
	UnsupportedAlgorithm(SignatureAlgorithm),
	#[error("Client error: {0}")]
	Client(#[from] ClientError),
}

/// Produces signatures over transaction payloads.
#[async_trait]
pub trait Signer: Send + Sync {
	/// Public key matching the signatures this signer produces.
	fn public_key(&self) -> Vec<u8>;

	/// Hash `message` and sign the digest, returning raw `r || s` bytes.
	async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, AccountError>;
}

/// An account ready to sign: its address, the on-chain key it signs with,
/// and the signer holding the matching private key.
#[derive(Clone)]
pub struct ResolvedAccount {
	pub address: Address,
	pub key: AccountKey,
	pub signer: Arc<dyn Signer>,
}

impl std::fmt::Debug for ResolvedAccount {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ResolvedAccount")
			.field("address", &self.address)
			.field("key", &self.key)
			.finish_non_exhaustive()
	}
}

/// Resolve `address` on the network and pair its first key with `key_hex`.
pub async fn resolve_account(
	client: &dyn AccessClient,
	key_hex: &str,
	address: &str,
) -> Result<ResolvedAccount, AccountError> {
	resolve(client, key_hex, address, None).await
}

/// Like [`resolve_account`], but signs with the key at `key_index`.
pub async fn resolve_account_key(
	client: &dyn AccessClient,
	key_hex: &str,
	address: &str,
	key_index: u32,
) -> Result<ResolvedAccount, AccountError> {
	resolve(client, key_hex, address, Some(key_index)).await
}

async fn resolve(
	client: &dyn AccessClient,
	key_hex: &str,
	address: &str,
	key_index: Option<u32>,
) -> Result<ResolvedAccount, AccountError> {
	let private_key = PrivateKey::from_hex(key_hex)?;
	let address =
		Address::from_hex(address).map_err(|e| AccountError::InvalidAddress(e.to_string()))?;

	let account = client.get_account(&address).await?;
	debug!(%address, keys = account.keys.len(), "Fetched account");

	let key = match key_index {
		None => account.keys.into_iter().next().ok_or(AccountError::NoKeys(address))?,
		Some(index) => {
			if account.keys.is_empty() {
				return Err(AccountError::NoKeys(address));
			}
			account
				.keys
				.into_iter()
				.find(|key| key.index == index)
				.ok_or(AccountError::KeyNotFound { address, index })?
		}
	};

	if key.sig_algo != private_key.algorithm() {
		return Err(AccountError::UnsupportedAlgorithm(key.sig_algo));
	}
	if key.public_key != private_key.public_key() {
		warn!(%address, index = key.index, "Private key does not match the on-chain account key");
	}
	if key.revoked {
		warn!(%address, index = key.index, "Signing with a revoked account key");
	}

	let signer = InMemorySigner::new(private_key, key.hash_algo);
	Ok(ResolvedAccount {
		address,
		key,
		signer: Arc::new(signer),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use flow_types::{Account, Block, HashAlgorithm, Identifier, Transaction, TransactionResult};

	const KEY: &str = "c9c0f04adddf7674d265c395de300a65a777d3ec412bba5bfdfd12cffbbb78d9";

	struct MockClient {
		keys: Vec<AccountKey>,
	}

	#[async_trait]
	impl AccessClient for MockClient {
		async fn get_account(&self, address: &Address) -> Result<flow_types::Account, ClientError> {
			Ok(Account {
				address: *address,
				balance: 0,
				keys: self.keys.clone(),
			})
		}

		async fn get_latest_block(&self, _sealed: bool) -> Result<Block, ClientError> {
			Err(ClientError::NotFound("block".to_string()))
		}

		async fn get_transaction_result(
			&self,
			id: &Identifier,
		) -> Result<TransactionResult, ClientError> {
			Err(ClientError::NotFound(id.to_string()))
		}

		async fn send_transaction(&self, _tx: &Transaction) -> Result<Identifier, ClientError> {
			Err(ClientError::NotFound("send".to_string()))
		}
	}

	fn key_record(index: u32, hash_algo: HashAlgorithm) -> AccountKey {
		let private_key = PrivateKey::from_hex(KEY).unwrap();
		let mut key = new_account_key(&private_key, 1000);
		key.index = index;
		key.hash_algo = hash_algo;
		key
	}

	#[tokio::test]
	async fn test_resolve_uses_first_key() {
		let client = MockClient {
			keys: vec![
				key_record(0, HashAlgorithm::Sha2_256),
				key_record(1, HashAlgorithm::Sha3_256),
			],
		};

		let resolved = resolve_account(&client, KEY, "0x01cf0e2f2f715450").await.unwrap();
		assert_eq!(resolved.address.to_string(), "01cf0e2f2f715450");
		assert_eq!(resolved.key.index, 0);
		assert_eq!(resolved.key.hash_algo, HashAlgorithm::Sha2_256);
		assert_eq!(resolved.signer.public_key(), resolved.key.public_key);
	}

	#[tokio::test]
	async fn test_resolve_specific_key_index() {
		let client = MockClient {
			keys: vec![
				key_record(0, HashAlgorithm::Sha2_256),
				key_record(1, HashAlgorithm::Sha3_256),
			],
		};

		let resolved = resolve_account_key(&client, KEY, "01cf0e2f2f715450", 1)
			.await
			.unwrap();
		assert_eq!(resolved.key.index, 1);

		let err = resolve_account_key(&client, KEY, "01cf0e2f2f715450", 5)
			.await
			.unwrap_err();
		assert!(matches!(err, AccountError::KeyNotFound { index: 5, .. }));
	}

	#[tokio::test]
	async fn test_resolve_account_without_keys() {
		let client = MockClient { keys: vec![] };

		let err = resolve_account(&client, KEY, "01").await.unwrap_err();
		assert!(matches!(err, AccountError::NoKeys(_)));
	}

	#[tokio::test]
	async fn test_resolve_rejects_bad_key_before_fetching() {
		let client = MockClient { keys: vec![] };

		let err = resolve_account(&client, "not-a-key", "01").await.unwrap_err();
		assert!(matches!(err, AccountError::InvalidKey(_)));
	}

	#[tokio::test]
	async fn test_resolve_rejects_mismatched_curve() {
		let mut key = key_record(0, HashAlgorithm::Sha3_256);
		key.sig_algo = SignatureAlgorithm::EcdsaSecp256k1;
		let client = MockClient { keys: vec![key] };

		let err = resolve_account(&client, KEY, "01").await.unwrap_err();
		assert!(matches!(
			err,
			AccountError::UnsupportedAlgorithm(SignatureAlgorithm::EcdsaSecp256k1)
		));
	}
}
