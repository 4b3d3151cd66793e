//! Identifier and address primitives.
//!
//! Both are fixed-size byte arrays rendered as lowercase hex. Parsing accepts
//! an optional `0x` prefix so values copied from explorers, `flow.json` files
//! and REST responses can be used interchangeably.

use crate::errors::TypesError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

fn strip_hex_prefix(value: &str) -> &str {
	value
		.strip_prefix("0x")
		.or_else(|| value.strip_prefix("0X"))
		.unwrap_or(value)
}

/// Decode a hex string, with or without `0x` prefix.
pub fn decode_hex(value: &str) -> Result<Vec<u8>, TypesError> {
	hex::decode(strip_hex_prefix(value))
		.map_err(|e| TypesError::InvalidHex(format!("{}: {}", value, e)))
}

/// 32-byte content hash naming a transaction or a block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Identifier(pub [u8; 32]);

impl Identifier {
	pub const EMPTY: Self = Self([0u8; 32]);

	pub fn from_hex(value: &str) -> Result<Self, TypesError> {
		let bytes = decode_hex(value)?;
		Self::from_slice(&bytes)
	}

	pub fn from_slice(bytes: &[u8]) -> Result<Self, TypesError> {
		let array: [u8; 32] = bytes.try_into().map_err(|_| TypesError::InvalidLength {
			expected: 32,
			actual: bytes.len(),
		})?;
		Ok(Self(array))
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		*self == Self::EMPTY
	}
}

impl fmt::Display for Identifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", hex::encode(self.0))
	}
}

impl fmt::Debug for Identifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Identifier({})", self)
	}
}

impl FromStr for Identifier {
	type Err = TypesError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_hex(s)
	}
}

impl Serialize for Identifier {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_string())
	}
}

impl<'de> Deserialize<'de> for Identifier {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let value = String::deserialize(deserializer)?;
		Self::from_hex(&value).map_err(serde::de::Error::custom)
	}
}

/// 8-byte Flow account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address(pub [u8; 8]);

impl Address {
	pub const EMPTY: Self = Self([0u8; 8]);

	/// Parse a hex address. Short values are left-padded with zeros, so
	/// `"0x01"` and `"0000000000000001"` name the same account.
	pub fn from_hex(value: &str) -> Result<Self, TypesError> {
		let trimmed = strip_hex_prefix(value);
		let padded = if trimmed.len() % 2 == 1 {
			format!("0{}", trimmed)
		} else {
			trimmed.to_string()
		};
		let bytes = hex::decode(&padded)
			.map_err(|e| TypesError::InvalidHex(format!("{}: {}", value, e)))?;
		if bytes.len() > 8 {
			return Err(TypesError::InvalidLength {
				expected: 8,
				actual: bytes.len(),
			});
		}

		let mut array = [0u8; 8];
		array[8 - bytes.len()..].copy_from_slice(&bytes);
		Ok(Self(array))
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	/// `0x`-prefixed form, as used in Cadence and `flow.json`.
	pub fn to_prefixed_hex(&self) -> String {
		format!("0x{}", self)
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", hex::encode(self.0))
	}
}

impl fmt::Debug for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Address({})", self)
	}
}

impl FromStr for Address {
	type Err = TypesError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_hex(s)
	}
}

impl Serialize for Address {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_string())
	}
}

impl<'de> Deserialize<'de> for Address {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let value = String::deserialize(deserializer)?;
		Self::from_hex(&value).map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_address_left_pads_short_values() {
		let short = Address::from_hex("0x01").unwrap();
		let full = Address::from_hex("0000000000000001").unwrap();
		assert_eq!(short, full);
		assert_eq!(short.to_string(), "0000000000000001");
		assert_eq!(short.to_prefixed_hex(), "0x0000000000000001");
	}

	#[test]
	fn test_address_odd_length() {
		let addr = Address::from_hex("f8d6e0586b0a20c").unwrap();
		assert_eq!(addr.to_string(), "0f8d6e0586b0a20c");
	}

	#[test]
	fn test_address_rejects_oversized_values() {
		let err = Address::from_hex("0x000102030405060708").unwrap_err();
		assert_eq!(
			err,
			TypesError::InvalidLength {
				expected: 8,
				actual: 9
			}
		);
	}

	#[test]
	fn test_identifier_requires_32_bytes() {
		assert!(Identifier::from_hex("abcd").is_err());
		assert!(Identifier::from_hex("zz").is_err());

		let hex_id = "a096c418fd1192ba7f5b506beea682a633f9ab82911fa3d7a249b8d80889a0b4";
		let id: Identifier = format!("0x{}", hex_id).parse().unwrap();
		assert_eq!(id.to_string(), hex_id);
		assert!(!id.is_empty());
		assert!(Identifier::EMPTY.is_empty());
	}

	#[test]
	fn test_serde_as_hex_strings() {
		let addr = Address::from_hex("0xe467b9dd11fa00df").unwrap();
		let json = serde_json::to_string(&addr).unwrap();
		assert_eq!(json, "\"e467b9dd11fa00df\"");

		let back: Address = serde_json::from_str("\"0xe467b9dd11fa00df\"").unwrap();
		assert_eq!(back, addr);
	}
}
