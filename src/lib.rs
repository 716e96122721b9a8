// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! PrimeTrust Client - Custodial Account API Client
//!
//! This crate talks to the PrimeTrust JSON:API: it authenticates an operator,
//! maps typed contacts, accounts and funds-transfer methods into JSON:API
//! request envelopes, and decodes response envelopes back.
//!
//! ## Modules
//!
//! - `jsonapi` - Envelope model (`DataNode`, `RootDataNode`, `RootListDataNode`)
//! - `models` - Domain resources (`Contact`, `FundTransferMethod`, ...)
//! - `client` - `PrimeTrustClient` and its operations
//! - `auth` - Session token gate for authenticated operations
//! - `transport` - HTTP seam (`reqwest` by default)
//! - `config` - Environment selection and `PRIMETRUST_*` variables
//! - `telemetry` - Tracing subscriber setup
//!
//! ## Example
//!
//! ```rust,no_run
//! use primetrust_client::{ClientConfig, Contact, Environment, PrimeTrustClient};
//!
//! # async fn run() -> Result<(), primetrust_client::PrimeTrustError> {
//! let config = ClientConfig::new("ops@example.com", "password", Environment::Sandbox);
//! let mut client = PrimeTrustClient::new(config)?;
//! client.connect().await?;
//!
//! let owner = Contact::natural_person("Jane Doe", "jane@example.com");
//! let account = client.create_custody_account(&owner).await?;
//! println!("account id: {:?}", account.id);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod jsonapi;
pub mod models;
pub mod telemetry;
pub mod transport;

pub use client::PrimeTrustClient;
pub use config::{ClientConfig, Environment};
pub use error::PrimeTrustError;
pub use jsonapi::{DataNode, Links, ListQuery, Meta, Relationship, Resource, RootDataNode, RootListDataNode};
pub use models::{AccountQuestionnaire, Address, Contact, ContactType, FundTransferMethod, PhoneNumber, Sex};
pub use rust_decimal::Decimal;
pub use transport::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};
