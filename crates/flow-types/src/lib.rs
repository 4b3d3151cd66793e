//! Shared types for the Flow transaction helper.
//!
//! Everything that crosses a crate boundary lives here: identifiers and
//! addresses, transaction and account records, blocks, and the
//! [`AccessClient`] trait through which every remote operation is delegated
//! to an access node.

pub mod account;
pub mod block;
pub mod client;
pub mod common;
pub mod errors;
pub mod transaction;

pub use account::*;
pub use block::*;
pub use client::*;
pub use common::*;
pub use errors::*;
pub use transaction::*;
