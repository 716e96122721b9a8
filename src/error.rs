// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client error type.

use rust_decimal::Decimal;
use serde_json::Value;

/// Every failure an operation can surface.
///
/// No variant is retried internally. `NotAuthenticated`,
/// `MissingSignatory` and `UnrepresentableAmount` are raised before any
/// network I/O.
#[derive(Debug, thiserror::Error)]
pub enum PrimeTrustError {
    #[error("PrimeTrust session not established: call connect() first")]
    NotAuthenticated,

    #[error("PrimeTrust auth failed: {0}")]
    Authentication(String),

    #[error("PrimeTrust transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("PrimeTrust returned {status}: {body}")]
    Remote { status: u16, body: Value },

    #[error("PrimeTrust response did not match the expected envelope: {0}")]
    SchemaMismatch(String),

    #[error("PrimeTrust request body could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("PrimeTrust configuration missing: {0}")]
    MissingConfig(String),

    #[error("entity contact has no related contact to sign for the account")]
    MissingSignatory,

    #[error("amount {0} cannot be sent as a JSON number without losing precision")]
    UnrepresentableAmount(Decimal),
}

impl PrimeTrustError {
    /// Build a `Remote` error, keeping the body as JSON when it parses.
    pub fn remote(status: u16, body: &str) -> Self {
        let body = serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()));
        Self::Remote { status, body }
    }

    /// HTTP status for `Remote` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}
