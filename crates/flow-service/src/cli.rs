//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use flow_client::Network;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flow-helper")]
#[command(about = "Submit Flow transactions and wait for them to be sealed", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
	/// Path to the flow.json project file
	#[arg(short, long, value_name = "FILE", env = "FLOW_CONFIG", default_value = "./flow.json")]
	pub config: PathBuf,

	/// Network to talk to (emulator, testnet, mainnet)
	#[arg(short, long, env = "FLOW_NETWORK", default_value = "testnet")]
	pub network: Network,

	/// Account entry in the project file to sign with
	#[arg(short, long, env = "FLOW_ACCOUNT", default_value = "testnet-admin")]
	pub account: String,

	/// Log level used when RUST_LOG is not set
	#[arg(long, env = "FLOW_LOG_LEVEL", default_value = "info")]
	pub log_level: String,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Resolve the configured account and print its signing key
	Account,

	/// Print the latest sealed block
	Block,

	/// Wait for a submitted transaction to be sealed
	Wait {
		/// Transaction id in hex
		tx_id: String,

		/// Give up after this many seconds
		#[arg(long, value_name = "SECS")]
		timeout: Option<u64>,

		/// Stop waiting once the transaction has expired
		#[arg(long)]
		fail_on_expired: bool,
	},

	/// Sign and submit a transaction script, then wait for it to be sealed
	Send {
		/// Cadence transaction file
		script: PathBuf,

		/// JSON-Cadence argument, repeatable and passed in order
		#[arg(long = "arg", value_name = "JSON")]
		args: Vec<String>,

		#[arg(long, default_value_t = flow_delivery::DEFAULT_GAS_LIMIT)]
		gas_limit: u64,
	},

	/// Generate a fresh private key and the account key it would register
	Keygen {
		#[arg(long, default_value_t = 1000)]
		weight: u32,
	},

	/// Validate the project file
	Validate,
}
