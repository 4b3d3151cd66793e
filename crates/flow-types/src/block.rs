//! Block types.

use crate::common::Identifier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
	pub id: Identifier,
	pub parent_id: Identifier,
	pub height: u64,
	pub timestamp: DateTime<Utc>,
}

/// Block as seen through the access API. Only the header is retrieved;
/// payload contents are not needed by the helper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
	pub header: BlockHeader,
}

impl Block {
	pub fn id(&self) -> Identifier {
		self.header.id
	}

	pub fn height(&self) -> u64 {
		self.header.height
	}

	pub fn timestamp(&self) -> DateTime<Utc> {
		self.header.timestamp
	}
}
