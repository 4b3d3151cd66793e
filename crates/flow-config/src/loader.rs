//! Configuration loading from files and environment.

use crate::types::{AccountConfig, AccountKeyConfig, FlowConfig, DEFAULT_ACCOUNT};
use crate::{ConfigError, DEFAULT_CONFIG_PATH};
use regex::Regex;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
	file_path: PathBuf,
	env_prefix: String,
	account: Option<String>,
}

impl Default for ConfigLoader {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: PathBuf::from(DEFAULT_CONFIG_PATH),
			env_prefix: "FLOW_".to_string(),
			account: None,
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = path.as_ref().to_path_buf();
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	/// Account that receives the environment overrides, taking precedence
	/// over `{prefix}ACCOUNT`.
	pub fn with_account(mut self, name: impl Into<String>) -> Self {
		self.account = Some(name.into());
		self
	}

	pub async fn load(&self) -> Result<FlowConfig, ConfigError> {
		info!("Loading configuration from {:?}", self.file_path);

		let mut config = self.load_from_file(&self.file_path).await?;
		self.apply_env_overrides(&mut config)?;
		Self::validate_config(&config)?;

		Ok(config)
	}

	async fn load_from_file(&self, path: &Path) -> Result<FlowConfig, ConfigError> {
		let content = match tokio::fs::read_to_string(path).await {
			Ok(content) => content,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				return Err(ConfigError::FileNotFound(path.display().to_string()));
			}
			Err(e) => return Err(e.into()),
		};

		let substituted = self.substitute_env_vars(&content)?;

		match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Self::from_toml(&substituted),
			Some("yaml") | Some("yml") => Self::from_yaml(&substituted),
			_ => Self::from_json(&substituted),
		}
	}

	/// Load from JSON string
	pub fn from_json(contents: &str) -> Result<FlowConfig, ConfigError> {
		serde_json::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
	}

	/// Load from TOML string
	pub fn from_toml(contents: &str) -> Result<FlowConfig, ConfigError> {
		toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
	}

	/// Load from YAML string
	pub fn from_yaml(contents: &str) -> Result<FlowConfig, ConfigError> {
		serde_yaml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
	}

	fn substitute_env_vars(&self, content: &str) -> Result<String, ConfigError> {
		let mut result = content.to_string();

		// Find and replace ${VAR_NAME} patterns
		let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::ParseError(e.to_string()))?;

		for cap in re.captures_iter(content) {
			let full_match = &cap[0];
			let var_name = &cap[1];

			let env_value = env::var(var_name)
				.map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;

			result = result.replace(full_match, &env_value);
		}

		Ok(result)
	}

	/// The account set with [`Self::with_account`], else `{prefix}ACCOUNT`,
	/// else `testnet-admin`, is the entry to override; `{prefix}ADDRESS` and
	/// `{prefix}PRIVATE_KEY` replace its fields. Both must be set to create
	/// an entry that does not exist.
	fn apply_env_overrides(&self, config: &mut FlowConfig) -> Result<(), ConfigError> {
		let account_name = match &self.account {
			Some(name) => name.clone(),
			None => env::var(format!("{}ACCOUNT", self.env_prefix))
				.unwrap_or_else(|_| DEFAULT_ACCOUNT.to_string()),
		};
		let address = env::var(format!("{}ADDRESS", self.env_prefix)).ok();
		let private_key = env::var(format!("{}PRIVATE_KEY", self.env_prefix)).ok();

		match config.accounts.get_mut(&account_name) {
			Some(account) => {
				if let Some(address) = address {
					debug!("Overriding address of {} from environment", account_name);
					account.address = address;
				}
				if let Some(key) = private_key {
					debug!("Overriding private key of {} from environment", account_name);
					account.key = AccountKeyConfig::Hex(key);
				}
			}
			None => {
				if let (Some(address), Some(key)) = (address, private_key) {
					debug!("Creating account {} from environment", account_name);
					config
						.accounts
						.insert(account_name, AccountConfig::new(address, key));
				}
			}
		}

		Ok(())
	}

	/// Validate configuration
	pub fn validate_config(config: &FlowConfig) -> Result<(), ConfigError> {
		for (name, account) in &config.accounts {
			account.parsed_address().map_err(|e| {
				ConfigError::ValidationError(format!("Account {} has invalid address: {}", name, e))
			})?;

			match account.private_key_hex() {
				Some(key) => validate_private_key(key).map_err(|reason| {
					ConfigError::ValidationError(format!("Account {}: {}", name, reason))
				})?,
				None => warn!("Account {} has no inline hex key; it cannot sign", name),
			}
		}

		Ok(())
	}
}

fn validate_private_key(key: &str) -> Result<(), String> {
	let key_without_prefix = key.strip_prefix("0x").unwrap_or(key);

	if key_without_prefix.len() != 64 {
		return Err("Private key must be 64 hex characters (32 bytes)".to_string());
	}

	if hex::decode(key_without_prefix).is_err() {
		return Err("Private key must be valid hexadecimal".to_string());
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::NetworkConfig;
	use std::io::Write;

	const KEY: &str = "c9c0f04adddf7674d265c395de300a65a777d3ec412bba5bfdfd12cffbbb78d9";

	fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
		let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
		file.write_all(contents.as_bytes()).unwrap();
		file
	}

	#[tokio::test]
	async fn test_load_json() {
		let json = format!(
			r#"{{
				"accounts": {{
					"testnet-admin": {{ "address": "0x01cf0e2f2f715450", "key": "{}" }}
				}},
				"contracts": {{ "HelloWorld": "./HelloWorld.cdc" }}
			}}"#,
			KEY
		);
		let file = write_config(".json", &json);

		let config = ConfigLoader::new()
			.with_file(file.path())
			.with_env_prefix("FLOW_TEST_JSON_")
			.load()
			.await
			.unwrap();

		let admin = config.default_account().unwrap();
		assert_eq!(admin.private_key_hex(), Some(KEY));
		assert_eq!(admin.parsed_address().unwrap().to_string(), "01cf0e2f2f715450");
		assert_eq!(config.contracts.len(), 1);
	}

	#[tokio::test]
	async fn test_load_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let err = ConfigLoader::new()
			.with_file(dir.path().join("flow.json"))
			.load()
			.await
			.unwrap_err();

		assert!(matches!(err, ConfigError::FileNotFound(_)));
	}

	#[tokio::test]
	async fn test_env_substitution() {
		env::set_var("FLOW_TEST_SUBST_KEY", KEY);
		let json = r#"{
			"accounts": {
				"testnet-admin": { "address": "01cf0e2f2f715450", "key": "${FLOW_TEST_SUBST_KEY}" }
			}
		}"#;
		let file = write_config(".json", json);

		let config = ConfigLoader::new()
			.with_file(file.path())
			.with_env_prefix("FLOW_TEST_SUBST_")
			.load()
			.await
			.unwrap();

		assert_eq!(config.default_account().unwrap().private_key_hex(), Some(KEY));
	}

	#[tokio::test]
	async fn test_env_substitution_missing_var() {
		let json = r#"{ "accounts": { "a": { "address": "01", "key": "${FLOW_TEST_DEFINITELY_UNSET}" } } }"#;
		let file = write_config(".json", json);

		let err = ConfigLoader::new().with_file(file.path()).load().await.unwrap_err();
		assert!(matches!(err, ConfigError::EnvVarNotFound(name) if name == "FLOW_TEST_DEFINITELY_UNSET"));
	}

	#[tokio::test]
	async fn test_env_overrides_create_account() {
		env::set_var("FLOW_TEST_OVR_ACCOUNT", "ci-account");
		env::set_var("FLOW_TEST_OVR_ADDRESS", "0xf8d6e0586b0a20c7");
		env::set_var("FLOW_TEST_OVR_PRIVATE_KEY", KEY);
		let file = write_config(".json", "{}");

		let config = ConfigLoader::new()
			.with_file(file.path())
			.with_env_prefix("FLOW_TEST_OVR_")
			.load()
			.await
			.unwrap();

		let account = config.account("ci-account").unwrap();
		assert_eq!(account.address, "0xf8d6e0586b0a20c7");
		assert_eq!(account.private_key_hex(), Some(KEY));
	}

	#[tokio::test]
	async fn test_env_overrides_target_selected_account() {
		const OTHER_KEY: &str = "0b4a8c5e3f2d1e6a7b8c9d0e1f2a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c";
		env::set_var("FLOW_TEST_SEL_ACCOUNT", "testnet-admin");
		env::set_var("FLOW_TEST_SEL_PRIVATE_KEY", OTHER_KEY);
		let json = format!(
			r#"{{
				"accounts": {{
					"testnet-admin": {{ "address": "01cf0e2f2f715450", "key": "{key}" }},
					"emulator-account": {{ "address": "f8d6e0586b0a20c7", "key": "{key}" }}
				}}
			}}"#,
			key = KEY
		);
		let file = write_config(".json", &json);

		let config = ConfigLoader::new()
			.with_file(file.path())
			.with_env_prefix("FLOW_TEST_SEL_")
			.with_account("emulator-account")
			.load()
			.await
			.unwrap();

		assert_eq!(
			config.account("emulator-account").unwrap().private_key_hex(),
			Some(OTHER_KEY)
		);
		assert_eq!(config.default_account().unwrap().private_key_hex(), Some(KEY));
	}

	#[tokio::test]
	async fn test_load_toml() {
		let toml = format!(
			r#"
[accounts.testnet-admin]
address = "0x01cf0e2f2f715450"
key = "{}"

[networks]
testnet = "access.devnet.nodes.onflow.org:9000"
"#,
			KEY
		);
		let file = write_config(".toml", &toml);

		let config = ConfigLoader::new()
			.with_file(file.path())
			.with_env_prefix("FLOW_TEST_TOML_")
			.load()
			.await
			.unwrap();

		assert!(config.default_account().is_some());
		assert_eq!(
			config.networks.get("testnet").map(NetworkConfig::host),
			Some("access.devnet.nodes.onflow.org:9000")
		);
	}

	#[test]
	fn test_validation_rejects_short_key() {
		let config = ConfigLoader::from_json(
			r#"{ "accounts": { "testnet-admin": { "address": "01", "key": "abcd" } } }"#,
		)
		.unwrap();

		let err = ConfigLoader::validate_config(&config).unwrap_err();
		assert!(err.to_string().contains("64 hex characters"));
	}

	#[test]
	fn test_validation_rejects_bad_address() {
		let json = format!(
			r#"{{ "accounts": {{ "testnet-admin": {{ "address": "0xnothex", "key": "{}" }} }} }}"#,
			KEY
		);
		let config = ConfigLoader::from_json(&json).unwrap();

		let err = ConfigLoader::validate_config(&config).unwrap_err();
		assert!(err.to_string().contains("invalid address"));
	}

	#[test]
	fn test_yaml_parsing() {
		let yaml = format!(
			"accounts:\n  testnet-admin:\n    address: \"01cf0e2f2f715450\"\n    key: \"{}\"\n",
			KEY
		);
		let config = ConfigLoader::from_yaml(&yaml).unwrap();
		assert!(ConfigLoader::validate_config(&config).is_ok());
	}
}
