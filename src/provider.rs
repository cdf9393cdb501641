//! Provider configuration (data) and strategies (behavior).
//!
//! `config` holds the endpoint and credential options a strategy is built from, with Jive's
//! defaults filled in. `strategy` defines [`OAuth2Strategy`] and the application's [`Verify`]
//! hook. `jive` is the Jive implementation: tolerant profile parsing and redirect options.

pub mod config;
pub mod jive;
pub mod strategy;

pub use config::*;
pub use jive::*;
pub use strategy::*;
