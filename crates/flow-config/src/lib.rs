// flow-config/src/lib.rs

use std::path::Path;
use thiserror::Error;

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::*;

/// Project file read when no other path is given.
pub const DEFAULT_CONFIG_PATH: &str = "./flow.json";

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("Account not found: {0}")]
	AccountNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

/// Whether anything exists at `path`.
pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
	path.as_ref().exists()
}

/// Read a whole text file, typically a Cadence script or contract.
pub async fn read_file<P: AsRef<Path>>(path: P) -> Result<String, ConfigError> {
	let path = path.as_ref();
	if !file_exists(path) {
		return Err(ConfigError::FileNotFound(path.display().to_string()));
	}
	Ok(tokio::fs::read_to_string(path).await?)
}
