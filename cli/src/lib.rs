//! keygate-cli library — typed HTTP client, argument parsing and output
//! rendering for the `keygate-cli` binary.

pub mod client;
pub mod config;
pub mod output;

pub use client::{ClientError, GeneratedKey, KeyListItem, KeygateClient};
