//! Read-only client for the Lunch Money v1 API.
//!
//! Every operation is an HTTP GET; nothing here can create, update, or
//! delete provider data. Records come back as `serde_json::Value` because
//! the upstream schema varies by import source.

pub mod client;
pub mod error;
pub mod query;

pub use client::LunchMoneyClient;
pub use error::{LunchMoneyError, Result};
pub use query::TransactionQuery;
