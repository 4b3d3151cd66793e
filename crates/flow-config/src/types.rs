//! # Configuration Types
//!
//! Structures mirroring the `flow.json` project file: named accounts with
//! their key material, contract sources and network hosts.

use flow_types::{Address, HashAlgorithm, SignatureAlgorithm};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Account used when none is named explicitly.
pub const DEFAULT_ACCOUNT: &str = "testnet-admin";

/// Root of a `flow.json` file.
///
/// Unknown sections such as `deployments` are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowConfig {
	/// Named accounts with address and private key
	#[serde(default)]
	pub accounts: HashMap<String, AccountConfig>,
	/// Contract name to source location
	#[serde(default)]
	pub contracts: HashMap<String, ContractConfig>,
	/// Network name to access node host
	#[serde(default)]
	pub networks: HashMap<String, NetworkConfig>,
}

impl FlowConfig {
	pub fn account(&self, name: &str) -> Option<&AccountConfig> {
		self.accounts.get(name)
	}

	pub fn default_account(&self) -> Option<&AccountConfig> {
		self.account(DEFAULT_ACCOUNT)
	}
}

/// A named account entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
	/// Hex address, with or without `0x`
	pub address: String,
	pub key: AccountKeyConfig,
}

impl AccountConfig {
	pub fn new(address: impl Into<String>, private_key: impl Into<String>) -> Self {
		Self {
			address: address.into(),
			key: AccountKeyConfig::Hex(private_key.into()),
		}
	}

	pub fn parsed_address(&self) -> Result<Address, flow_types::TypesError> {
		Address::from_hex(&self.address)
	}

	/// Hex private key, when the key is held inline.
	pub fn private_key_hex(&self) -> Option<&str> {
		match &self.key {
			AccountKeyConfig::Hex(key) => Some(key),
			AccountKeyConfig::Detailed(detail) if detail.key_type == "hex" => {
				detail.private_key.as_deref()
			}
			AccountKeyConfig::Detailed(_) => None,
		}
	}

	/// Index of the account key this entry signs with.
	pub fn key_index(&self) -> u32 {
		match &self.key {
			AccountKeyConfig::Hex(_) => 0,
			AccountKeyConfig::Detailed(detail) => detail.index,
		}
	}
}

/// Key material: either a bare hex string or the long form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountKeyConfig {
	Hex(String),
	Detailed(KeyDetail),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyDetail {
	#[serde(rename = "type", default = "default_key_type")]
	pub key_type: String,
	#[serde(default)]
	pub index: u32,
	#[serde(default = "default_signature_algorithm")]
	pub signature_algorithm: SignatureAlgorithm,
	#[serde(default = "default_hash_algorithm")]
	pub hash_algorithm: HashAlgorithm,
	#[serde(default)]
	pub private_key: Option<String>,
}

fn default_key_type() -> String {
	"hex".to_string()
}

fn default_signature_algorithm() -> SignatureAlgorithm {
	SignatureAlgorithm::EcdsaP256
}

fn default_hash_algorithm() -> HashAlgorithm {
	HashAlgorithm::Sha3_256
}

/// Access node of a named network: a bare host or a host pinned to a
/// network key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NetworkConfig {
	Host(String),
	Advanced {
		host: String,
		#[serde(default)]
		key: Option<String>,
	},
}

impl NetworkConfig {
	pub fn host(&self) -> &str {
		match self {
			NetworkConfig::Host(host) => host,
			NetworkConfig::Advanced { host, .. } => host,
		}
	}

	pub fn key(&self) -> Option<&str> {
		match self {
			NetworkConfig::Host(_) => None,
			NetworkConfig::Advanced { key, .. } => key.as_deref(),
		}
	}
}

/// Contract location: a bare path or a source with per-network aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContractConfig {
	Path(String),
	Detailed {
		source: String,
		#[serde(default)]
		aliases: HashMap<String, String>,
	},
}

impl ContractConfig {
	pub fn source(&self) -> &str {
		match self {
			ContractConfig::Path(path) => path,
			ContractConfig::Detailed { source, .. } => source,
		}
	}

	pub fn alias(&self, network: &str) -> Option<&str> {
		match self {
			ContractConfig::Path(_) => None,
			ContractConfig::Detailed { aliases, .. } => aliases.get(network).map(String::as_str),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_short_and_long_key_forms() {
		let json = r#"{
			"accounts": {
				"testnet-admin": {
					"address": "0x01cf0e2f2f715450",
					"key": "1a2b3c"
				},
				"emulator-account": {
					"address": "f8d6e0586b0a20c7",
					"key": {
						"type": "hex",
						"index": 2,
						"signatureAlgorithm": "ECDSA_P256",
						"hashAlgorithm": "SHA3_256",
						"privateKey": "4d5e6f"
					}
				},
				"kms-account": {
					"address": "0x02",
					"key": { "type": "google-kms", "resourceID": "projects/x" }
				}
			}
		}"#;

		let config: FlowConfig = serde_json::from_str(json).unwrap();
		let admin = config.default_account().unwrap();
		assert_eq!(admin.private_key_hex(), Some("1a2b3c"));
		assert_eq!(admin.key_index(), 0);

		let emulator = config.account("emulator-account").unwrap();
		assert_eq!(emulator.private_key_hex(), Some("4d5e6f"));
		assert_eq!(emulator.key_index(), 2);

		let kms = config.account("kms-account").unwrap();
		assert_eq!(kms.private_key_hex(), None);
	}

	#[test]
	fn test_contract_forms() {
		let json = r#"{
			"contracts": {
				"HelloWorld": "./cadence/HelloWorld.cdc",
				"FungibleToken": {
					"source": "./cadence/FungibleToken.cdc",
					"aliases": { "testnet": "0x9a0766d93b6608b7" }
				}
			}
		}"#;

		let config: FlowConfig = serde_json::from_str(json).unwrap();
		let hello = &config.contracts["HelloWorld"];
		assert_eq!(hello.source(), "./cadence/HelloWorld.cdc");
		assert_eq!(hello.alias("testnet"), None);

		let ft = &config.contracts["FungibleToken"];
		assert_eq!(ft.source(), "./cadence/FungibleToken.cdc");
		assert_eq!(ft.alias("testnet"), Some("0x9a0766d93b6608b7"));
		assert!(config.accounts.is_empty());
	}

	#[test]
	fn test_network_forms() {
		let json = r#"{
			"networks": {
				"emulator": "127.0.0.1:3569",
				"testnet-secure": {
					"host": "access-001.devnet.nodes.onflow.org:9001",
					"key": "ba69f7d2e82b9edf25b103c195cd371cf0cc047ef8884a9bbe331e62982d46daeebf836f7445a2ac16741013b192959d8ad26998aff12f2adc67a99e1eb2988d"
				}
			}
		}"#;

		let config: FlowConfig = serde_json::from_str(json).unwrap();
		let emulator = &config.networks["emulator"];
		assert_eq!(emulator.host(), "127.0.0.1:3569");
		assert_eq!(emulator.key(), None);

		let secure = &config.networks["testnet-secure"];
		assert_eq!(secure.host(), "access-001.devnet.nodes.onflow.org:9001");
		assert!(secure.key().is_some_and(|key| key.starts_with("ba69")));
	}
}
