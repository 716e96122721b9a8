// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Gate
//!
//! ## Auth Flow
//!
//! 1. `connect()` POSTs to `/auth/jwts` with the operator's basic-auth
//!    credentials
//! 2. PrimeTrust answers `{"token": "<jwt>"}`
//! 3. The token is kept in [`Session`] and sent as
//!    `Authorization: Bearer <jwt>` on every later request
//!
//! Gated operations call [`Session::bearer`] before building a request, so
//! an unauthenticated call fails with
//! [`PrimeTrustError::NotAuthenticated`] and never reaches the transport.

use serde::Deserialize;

use crate::error::PrimeTrustError;
use crate::transport::{BasicAuth, HttpResponse};

/// Operator credentials exchanged for a session token.
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn basic_auth(&self) -> BasicAuth {
        BasicAuth {
            username: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct JwtResponse {
    #[serde(default)]
    token: Option<String>,
}

/// Session token holder.
#[derive(Default)]
pub struct Session {
    token: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl Session {
    pub fn is_connected(&self) -> bool {
        self.token.is_some()
    }

    /// Bearer token, or `NotAuthenticated` when no session exists.
    pub fn bearer(&self) -> Result<&str, PrimeTrustError> {
        self.token.as_deref().ok_or(PrimeTrustError::NotAuthenticated)
    }

    /// `Authorization` header value for the current session.
    pub fn authorization(&self) -> Result<String, PrimeTrustError> {
        Ok(format!("Bearer {}", self.bearer()?))
    }

    /// Replace the session token with the one in a `/auth/jwts` response.
    ///
    /// On failure the previous token is left untouched.
    pub fn establish(&mut self, response: &HttpResponse) -> Result<(), PrimeTrustError> {
        self.token = Some(extract_token(response)?);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.token = None;
    }
}

fn extract_token(response: &HttpResponse) -> Result<String, PrimeTrustError> {
    if !response.is_success() {
        return Err(PrimeTrustError::Authentication(format!(
            "token request returned {}: {}",
            response.status, response.body
        )));
    }

    let parsed: JwtResponse = serde_json::from_str(&response.body)
        .map_err(|e| PrimeTrustError::Authentication(format!("invalid token response: {e}")))?;

    match parsed.token {
        Some(token) if !token.trim().is_empty() => Ok(token),
        _ => Err(PrimeTrustError::Authentication(
            "token response did not include token".to_string(),
        )),
    }
}
