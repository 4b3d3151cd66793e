//! REST access client.
//!
//! Talks to an access node's public HTTP API using `reqwest`. Every call is a
//! single request with no retries; transient and permanent failures are
//! reported the same way and left to the caller to classify.

use crate::models::{
	AccountResponse, BlockResponse, ErrorResponse, TransactionBody, TransactionResponse,
	TransactionResultResponse,
};
use crate::network::{ClientConfig, Network};
use async_trait::async_trait;
use flow_types::{
	AccessClient, Account, Address, Block, ClientError, Identifier, Transaction,
	TransactionResult,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Access client for the REST API of a Flow access node.
#[derive(Debug, Clone)]
pub struct HttpAccessClient {
	http: reqwest::Client,
	endpoint: String,
}

impl HttpAccessClient {
	/// Client bound to a locally running emulator.
	pub fn emulator() -> Result<Self, ClientError> {
		Self::for_network(Network::Emulator)
	}

	/// Client bound to the public test network.
	pub fn testnet() -> Result<Self, ClientError> {
		Self::for_network(Network::Testnet)
	}

	/// Client bound to the production network.
	pub fn mainnet() -> Result<Self, ClientError> {
		Self::for_network(Network::Mainnet)
	}

	pub fn for_network(network: Network) -> Result<Self, ClientError> {
		Self::with_config(ClientConfig::from(network))
	}

	pub fn with_config(config: ClientConfig) -> Result<Self, ClientError> {
		let endpoint = config.endpoint.trim_end_matches('/').to_string();
		if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
			return Err(ClientError::InvalidEndpoint(format!(
				"{} (must start with http:// or https://)",
				config.endpoint
			)));
		}

		let http = reqwest::Client::builder()
			.timeout(config.request_timeout)
			.build()
			.map_err(|e| ClientError::Transport(format!("Failed to build HTTP client: {}", e)))?;

		Ok(Self { http, endpoint })
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	async fn get<T: DeserializeOwned>(
		&self,
		path: &str,
		query: &[(&str, &str)],
	) -> Result<T, ClientError> {
		let url = format!("{}{}", self.endpoint, path);
		debug!(%url, "GET");

		let response = self
			.http
			.get(&url)
			.query(query)
			.send()
			.await
			.map_err(|e| ClientError::Transport(format!("GET {}: {}", url, e)))?;

		Self::decode(response).await
	}

	async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
		let status = response.status();
		let body = response
			.text()
			.await
			.map_err(|e| ClientError::Transport(format!("Failed to read response: {}", e)))?;

		if !status.is_success() {
			let message = serde_json::from_str::<ErrorResponse>(&body)
				.map(|error| error.message)
				.unwrap_or(body);

			if status == StatusCode::NOT_FOUND {
				return Err(ClientError::NotFound(message));
			}
			return Err(ClientError::Api {
				status: status.as_u16(),
				message,
			});
		}

		serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
	}
}

#[async_trait]
impl AccessClient for HttpAccessClient {
	async fn get_account(&self, address: &Address) -> Result<Account, ClientError> {
		let response: AccountResponse = self
			.get(&format!("/accounts/{}", address), &[("expand", "keys")])
			.await?;
		Account::try_from(response)
	}

	async fn get_latest_block(&self, sealed: bool) -> Result<Block, ClientError> {
		let height = if sealed { "sealed" } else { "final" };
		let blocks: Vec<BlockResponse> = self.get("/blocks", &[("height", height)]).await?;

		let block = blocks
			.into_iter()
			.next()
			.ok_or_else(|| ClientError::NotFound(format!("No {} block returned", height)))?;
		Block::try_from(block)
	}

	async fn get_transaction_result(
		&self,
		id: &Identifier,
	) -> Result<TransactionResult, ClientError> {
		let response: TransactionResultResponse = self
			.get(&format!("/transaction_results/{}", id), &[])
			.await?;
		TransactionResult::try_from(response)
	}

	async fn send_transaction(&self, tx: &Transaction) -> Result<Identifier, ClientError> {
		let url = format!("{}/transactions", self.endpoint);
		debug!(%url, "POST");

		let response = self
			.http
			.post(&url)
			.json(&TransactionBody::from(tx))
			.send()
			.await
			.map_err(|e| ClientError::Transport(format!("POST {}: {}", url, e)))?;

		let created: TransactionResponse = Self::decode(response).await?;
		Identifier::from_hex(&created.id).map_err(|e| ClientError::Decode(e.to_string()))
	}
}
