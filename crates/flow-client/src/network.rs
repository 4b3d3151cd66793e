//! Network selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// REST access endpoint of a locally running emulator.
pub const EMULATOR_HOST: &str = "http://127.0.0.1:8888/v1";
/// Public REST access endpoint of the test network.
pub const TESTNET_HOST: &str = "https://rest-testnet.onflow.org/v1";
/// Public REST access endpoint of the production network.
pub const MAINNET_HOST: &str = "https://rest-mainnet.onflow.org/v1";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown network: {0} (expected emulator, testnet or mainnet)")]
pub struct UnknownNetwork(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
	Emulator,
	Testnet,
	Mainnet,
}

impl Network {
	pub fn endpoint(&self) -> &'static str {
		match self {
			Network::Emulator => EMULATOR_HOST,
			Network::Testnet => TESTNET_HOST,
			Network::Mainnet => MAINNET_HOST,
		}
	}

	pub fn name(&self) -> &'static str {
		match self {
			Network::Emulator => "emulator",
			Network::Testnet => "testnet",
			Network::Mainnet => "mainnet",
		}
	}
}

impl fmt::Display for Network {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Network {
	type Err = UnknownNetwork;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"emulator" | "local" => Ok(Network::Emulator),
			"testnet" => Ok(Network::Testnet),
			"mainnet" => Ok(Network::Mainnet),
			_ => Err(UnknownNetwork(s.to_string())),
		}
	}
}

/// Connection settings for an access client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
	/// Base URL of the REST access API, including the `/v1` prefix
	pub endpoint: String,
	/// Per-request timeout
	pub request_timeout: Duration,
}

impl ClientConfig {
	pub fn new(endpoint: impl Into<String>) -> Self {
		Self {
			endpoint: endpoint.into(),
			request_timeout: Duration::from_secs(30),
		}
	}

	pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;
		self
	}
}

impl From<Network> for ClientConfig {
	fn from(network: Network) -> Self {
		Self::new(network.endpoint())
	}
}
