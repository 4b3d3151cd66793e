//! Error types for value parsing.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypesError {
	#[error("Invalid hex: {0}")]
	InvalidHex(String),

	#[error("Invalid length: expected {expected} bytes, got {actual}")]
	InvalidLength { expected: usize, actual: usize },

	#[error("Unknown algorithm: {0}")]
	UnknownAlgorithm(String),
}
