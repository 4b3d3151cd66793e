//! Access node clients.
//!
//! This crate selects a network endpoint and provides the HTTP implementation
//! of [`flow_types::AccessClient`].

pub mod implementations;
pub mod models;
pub mod network;

pub use implementations::HttpAccessClient;
pub use network::{
	ClientConfig, Network, UnknownNetwork, EMULATOR_HOST, MAINNET_HOST, TESTNET_HOST,
};
