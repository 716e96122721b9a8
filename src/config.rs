// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, the target API
//! environment, and the [`ClientConfig`] consumed by
//! [`PrimeTrustClient`](crate::client::PrimeTrustClient).
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `PRIMETRUST_EMAIL` | Operator (root user) email for basic auth | Required |
//! | `PRIMETRUST_PASSWORD` | Operator password for basic auth | Required |
//! | `PRIMETRUST_SANDBOX` | `true`/`1`/`yes` targets the sandbox | `false` |
//! | `PRIMETRUST_BASE_URL` | Override the environment base URL | Unset |
//! | `PRIMETRUST_TIMEOUT_SECS` | HTTP timeout in seconds | `15` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::time::Duration;

use crate::error::PrimeTrustError;

/// Environment variable name for the operator email.
pub const EMAIL_ENV: &str = "PRIMETRUST_EMAIL";

/// Environment variable name for the operator password.
pub const PASSWORD_ENV: &str = "PRIMETRUST_PASSWORD";

/// Environment variable name selecting the sandbox.
pub const SANDBOX_ENV: &str = "PRIMETRUST_SANDBOX";

/// Environment variable name overriding the base URL.
pub const BASE_URL_ENV: &str = "PRIMETRUST_BASE_URL";

/// Environment variable name for the HTTP timeout.
pub const TIMEOUT_ENV: &str = "PRIMETRUST_TIMEOUT_SECS";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Remote API environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

impl Environment {
    /// Subdomain and path segment naming this environment.
    pub fn segment(self) -> &'static str {
        match self {
            Environment::Production => "api",
            Environment::Sandbox => "sandbox",
        }
    }

    /// Default base URL for this environment.
    pub fn base_url(self) -> String {
        format!("https://{}.primetrust.com", self.segment())
    }
}

/// Connection settings for a [`PrimeTrustClient`](crate::client::PrimeTrustClient).
#[derive(Clone)]
pub struct ClientConfig {
    pub email: String,
    pub password: String,
    pub environment: Environment,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            environment,
            base_url: environment.base_url(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point the client at a different host (proxy, local test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, PrimeTrustError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PrimeTrustError> {
        let optional = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let email = optional(EMAIL_ENV)
            .ok_or_else(|| PrimeTrustError::MissingConfig(EMAIL_ENV.to_string()))?;
        let password = optional(PASSWORD_ENV)
            .ok_or_else(|| PrimeTrustError::MissingConfig(PASSWORD_ENV.to_string()))?;

        let environment = match optional(SANDBOX_ENV) {
            Some(flag) if is_truthy(&flag) => Environment::Sandbox,
            _ => Environment::Production,
        };

        let mut config = Self::new(email, password, environment);

        if let Some(base_url) = optional(BASE_URL_ENV) {
            url::Url::parse(&base_url).map_err(|e| {
                PrimeTrustError::MissingConfig(format!("{BASE_URL_ENV} is not a valid URL: {e}"))
            })?;
            config = config.with_base_url(base_url);
        }

        if let Some(raw) = optional(TIMEOUT_ENV) {
            let secs: u64 = raw.parse().map_err(|_| {
                PrimeTrustError::MissingConfig(format!("{TIMEOUT_ENV} must be whole seconds"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
