//! Access client implementations.
//!
//! Available implementations:
//! - `rest`: the access node's public REST API

pub mod rest;

pub use rest::*;
