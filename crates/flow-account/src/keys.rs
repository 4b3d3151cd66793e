//! Private keys and account key records.

use crate::AccountError;
use flow_types::{AccountKey, HashAlgorithm, SignatureAlgorithm};
use p256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use std::fmt;

/// ECDSA P-256 private key.
#[derive(Clone)]
pub struct PrivateKey {
	inner: SigningKey,
}

impl PrivateKey {
	/// Decode a 32-byte scalar given as 64 hex characters, with or without
	/// `0x`.
	pub fn from_hex(key: &str) -> Result<Self, AccountError> {
		let key_without_prefix = key.strip_prefix("0x").unwrap_or(key);
		if key_without_prefix.len() != 64 {
			return Err(AccountError::InvalidKey(
				"Private key must be 64 hex characters (32 bytes)".to_string(),
			));
		}

		let bytes = hex::decode(key_without_prefix)
			.map_err(|e| AccountError::InvalidKey(format!("Invalid hex: {}", e)))?;
		let inner = SigningKey::from_slice(&bytes)
			.map_err(|e| AccountError::InvalidKey(format!("Invalid private key: {}", e)))?;

		Ok(Self { inner })
	}

	pub fn to_hex(&self) -> String {
		hex::encode(self.inner.to_bytes())
	}

	pub fn algorithm(&self) -> SignatureAlgorithm {
		SignatureAlgorithm::EcdsaP256
	}

	/// Public key as the 64-byte `X || Y` point encoding used on-chain.
	pub fn public_key(&self) -> Vec<u8> {
		let point = self.inner.verifying_key().to_encoded_point(false);
		point.as_bytes()[1..].to_vec()
	}

	pub(crate) fn signing_key(&self) -> &SigningKey {
		&self.inner
	}
}

impl fmt::Debug for PrivateKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "PrivateKey(public: {})", hex::encode(self.public_key()))
	}
}

/// Generate a fresh ECDSA P-256 private key from the OS random source.
pub fn random_private_key() -> PrivateKey {
	PrivateKey {
		inner: SigningKey::random(&mut OsRng),
	}
}

/// Account key record for `key`, hashed with SHA3-256 and carrying `weight`.
///
/// The index and sequence number are assigned by the network once the key
/// is added to an account.
pub fn new_account_key(key: &PrivateKey, weight: u32) -> AccountKey {
	AccountKey {
		index: 0,
		public_key: key.public_key(),
		sig_algo: key.algorithm(),
		hash_algo: HashAlgorithm::Sha3_256,
		weight,
		sequence_number: 0,
		revoked: false,
	}
}
