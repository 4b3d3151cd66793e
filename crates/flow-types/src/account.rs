//! Account-related types.
//!
//! This module defines the on-chain account record and its public keys,
//! together with the signature and hashing algorithm identifiers that pair a
//! key with the way its signatures are produced.

use crate::common::Address;
use crate::errors::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Elliptic curve a key lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
	#[serde(rename = "ECDSA_P256")]
	EcdsaP256,
	#[serde(rename = "ECDSA_secp256k1")]
	EcdsaSecp256k1,
}

impl SignatureAlgorithm {
	pub fn as_str(&self) -> &'static str {
		match self {
			SignatureAlgorithm::EcdsaP256 => "ECDSA_P256",
			SignatureAlgorithm::EcdsaSecp256k1 => "ECDSA_secp256k1",
		}
	}
}

impl fmt::Display for SignatureAlgorithm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for SignatureAlgorithm {
	type Err = TypesError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().replace('-', "_").as_str() {
			"ECDSA_P256" => Ok(SignatureAlgorithm::EcdsaP256),
			"ECDSA_SECP256K1" => Ok(SignatureAlgorithm::EcdsaSecp256k1),
			_ => Err(TypesError::UnknownAlgorithm(s.to_string())),
		}
	}
}

/// Digest applied to a message before it is signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
	#[serde(rename = "SHA2_256")]
	Sha2_256,
	#[serde(rename = "SHA3_256")]
	Sha3_256,
}

impl HashAlgorithm {
	pub fn as_str(&self) -> &'static str {
		match self {
			HashAlgorithm::Sha2_256 => "SHA2_256",
			HashAlgorithm::Sha3_256 => "SHA3_256",
		}
	}
}

impl fmt::Display for HashAlgorithm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for HashAlgorithm {
	type Err = TypesError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().replace('-', "_").as_str() {
			"SHA2_256" => Ok(HashAlgorithm::Sha2_256),
			"SHA3_256" => Ok(HashAlgorithm::Sha3_256),
			_ => Err(TypesError::UnknownAlgorithm(s.to_string())),
		}
	}
}

/// Public key registered on an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountKey {
	pub index: u32,
	/// Uncompressed curve point without the SEC1 tag (64 bytes for P-256).
	pub public_key: Vec<u8>,
	pub sig_algo: SignatureAlgorithm,
	pub hash_algo: HashAlgorithm,
	pub weight: u32,
	pub sequence_number: u64,
	pub revoked: bool,
}

/// On-chain account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
	pub address: Address,
	/// Balance in the smallest FLOW unit.
	pub balance: u64,
	pub keys: Vec<AccountKey>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_algorithm_names_round_trip() {
		for algo in [SignatureAlgorithm::EcdsaP256, SignatureAlgorithm::EcdsaSecp256k1] {
			assert_eq!(algo.as_str().parse::<SignatureAlgorithm>().unwrap(), algo);
		}
		for algo in [HashAlgorithm::Sha2_256, HashAlgorithm::Sha3_256] {
			assert_eq!(algo.as_str().parse::<HashAlgorithm>().unwrap(), algo);
		}
	}

	#[test]
	fn test_algorithm_parse_is_lenient_about_case() {
		assert_eq!(
			"ecdsa_p256".parse::<SignatureAlgorithm>().unwrap(),
			SignatureAlgorithm::EcdsaP256
		);
		assert_eq!("sha3-256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha3_256);
		assert!("BLS".parse::<SignatureAlgorithm>().is_err());
	}
}
