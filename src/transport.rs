// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP transport seam.
//!
//! [`PrimeTrustClient`](crate::client::PrimeTrustClient) owns a
//! [`Transport`] and hands it fully built requests. [`ReqwestTransport`] is
//! the production implementation; tests plug in a recording transport.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::error::PrimeTrustError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Basic-auth credential pair.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A fully resolved outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub basic_auth: Option<BasicAuth>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            basic_auth: None,
            body: None,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns the raw response.
///
/// Implementations must not retry; a network failure comes back as
/// [`PrimeTrustError::Transport`].
pub trait Transport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, PrimeTrustError>> + Send;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, PrimeTrustError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// Wrap an already configured reqwest client.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, PrimeTrustError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
            HttpMethod::Post => self.http.post(&request.url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(auth) = &request.basic_auth {
            builder = builder.basic_auth(&auth.username, Some(&auth.password));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut request = HttpRequest::new(HttpMethod::Post, "https://sandbox.primetrust.com/v2/users");
        request
            .headers
            .push(("X-Request-ID".to_string(), "abc".to_string()));
        assert_eq!(request.header("x-request-id"), Some("abc"));
        assert_eq!(request.header("authorization"), None);
    }

    #[test]
    fn success_range() {
        let ok = HttpResponse { status: 201, body: String::new() };
        let redirect = HttpResponse { status: 302, body: String::new() };
        let err = HttpResponse { status: 401, body: String::new() };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
        assert!(!err.is_success());
    }

    #[test]
    fn basic_auth_debug_redacts_password() {
        let auth = BasicAuth {
            username: "ops@example.com".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{auth:?}").contains("hunter2"));
    }

    #[test]
    fn transport_builds_with_timeout() {
        let transport = ReqwestTransport::new(Duration::from_secs(5));
        assert!(transport.is_ok());
        assert_eq!(HttpMethod::Get.to_string(), "GET");
    }
}
