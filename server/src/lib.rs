#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

//! keygate library — API key issuance and validation over HTTP.
//!
//! - `keys` — the in-memory key store and Argon2id hasher
//! - `auth` — the `x-api-key` gate middleware
//! - `config` — configuration loading
//! - `routes` — REST handlers and router assembly
//! - `state` — shared handler state

pub mod auth;
pub mod config;
pub mod keys;
pub mod routes;
pub mod state;

pub use config::Config;
pub use keys::{HashConfig, IssuedKey, KeyStore, KeySummary};
pub use routes::router;
pub use state::AppState;
