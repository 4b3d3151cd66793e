//! Signer implementations.
//!
//! Available implementations:
//! - `local`: in-memory private key

pub mod local;

pub use local::*;
