//! Local signer implementation.
//!
//! Holds a private key in memory and signs with it directly. Suitable for
//! development, testnet work and scripts where the key already lives in a
//! project file.

use crate::keys::PrivateKey;
use crate::{AccountError, Signer};
use async_trait::async_trait;
use flow_types::HashAlgorithm;
use p256::ecdsa::signature::hazmat::PrehashSigner;
use p256::ecdsa::Signature;
use sha2::Sha256;
use sha3::{Digest, Sha3_256};

/// Signer backed by an in-memory P-256 key.
///
/// Messages are hashed with the account key's hash algorithm before being
/// signed, so the same private key produces different signatures for
/// SHA2 and SHA3 accounts.
#[derive(Debug, Clone)]
pub struct InMemorySigner {
	key: PrivateKey,
	hash_algo: HashAlgorithm,
}

impl InMemorySigner {
	pub fn new(key: PrivateKey, hash_algo: HashAlgorithm) -> Self {
		Self { key, hash_algo }
	}

	pub fn hash_algo(&self) -> HashAlgorithm {
		self.hash_algo
	}

	fn digest(&self, message: &[u8]) -> Vec<u8> {
		match self.hash_algo {
			HashAlgorithm::Sha2_256 => Sha256::digest(message).to_vec(),
			HashAlgorithm::Sha3_256 => Sha3_256::digest(message).to_vec(),
		}
	}
}

#[async_trait]
impl Signer for InMemorySigner {
	fn public_key(&self) -> Vec<u8> {
		self.key.public_key()
	}

	async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, AccountError> {
		let digest = self.digest(message);
		let signature: Signature = self
			.key
			.signing_key()
			.sign_prehash(&digest)
			.map_err(|e| AccountError::SigningFailed(format!("Failed to sign message: {}", e)))?;

		Ok(signature.to_bytes().to_vec())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use p256::ecdsa::signature::hazmat::PrehashVerifier;

	const KEY: &str = "c9c0f04adddf7674d265c395de300a65a777d3ec412bba5bfdfd12cffbbb78d9";

	#[tokio::test]
	async fn test_signature_verifies_against_sha3_digest() {
		let key = PrivateKey::from_hex(KEY).unwrap();
		let signer = InMemorySigner::new(key.clone(), HashAlgorithm::Sha3_256);

		let message = b"hello flow";
		let bytes = signer.sign(message).await.unwrap();
		assert_eq!(bytes.len(), 64);

		let signature = Signature::from_slice(&bytes).unwrap();
		let digest = Sha3_256::digest(message);
		key.signing_key()
			.verifying_key()
			.verify_prehash(&digest, &signature)
			.unwrap();
	}

	#[tokio::test]
	async fn test_hash_algorithm_changes_the_signed_digest() {
		let key = PrivateKey::from_hex(KEY).unwrap();
		let sha2 = InMemorySigner::new(key.clone(), HashAlgorithm::Sha2_256);

		let message = b"hello flow";
		let bytes = sha2.sign(message).await.unwrap();
		let signature = Signature::from_slice(&bytes).unwrap();

		let verifying_key = key.signing_key().verifying_key();
		assert!(verifying_key
			.verify_prehash(&Sha256::digest(message), &signature)
			.is_ok());
		assert!(verifying_key
			.verify_prehash(&Sha3_256::digest(message), &signature)
			.is_err());
	}
}
