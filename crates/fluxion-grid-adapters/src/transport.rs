// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! HTTP transport handed to every fetch call
//!
//! The caller builds the session, passes it by reference into each adapter
//! call and drops it when done. Adapters never open their own.

use crate::config::HttpConfig;
use fluxion_grid_types::GridError;
use parking_lot::Mutex;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::{debug, trace};

/// A GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// URL with the query appended, unencoded
    pub fn full_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let query: Vec<String> = self.query.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{}?{}", self.url, query.join("&"))
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A completed response, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub url: String,
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Non-2xx becomes `HttpStatus`; a 2xx with an empty body passes through
    pub fn error_for_status(self) -> Result<Self, GridError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(GridError::HttpStatus {
                status: self.status,
                url: self.url,
            })
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, GridError> {
        serde_json::from_slice(&self.body).map_err(|e| {
            GridError::malformed(format!("invalid JSON from {}: {e}", self.url))
        })
    }
}

/// Fetch a resource and hand back the raw response
pub trait Transport: fmt::Debug {
    fn send(&self, request: &Request) -> Result<Response, GridError>;
}

/// Blocking HTTP session
#[derive(Debug, Clone)]
pub struct HttpSession {
    client: Client,
}

impl HttpSession {
    pub fn new(config: &HttpConfig) -> Result<Self, GridError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GridError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for HttpSession {
    fn send(&self, request: &Request) -> Result<Response, GridError> {
        debug!("🌐 GET {} {:?}", request.url, request.query);

        let mut builder = self.client.get(&request.url).query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .map_err(|e| GridError::Transport(format!("Request to {} failed: {e}", request.url)))?;
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body = response
            .bytes()
            .map_err(|e| GridError::Transport(format!("Failed to read response bytes: {e}")))?
            .to_vec();

        trace!("   {} -> {} ({} bytes)", url, status, body.len());
        Ok(Response { url, status, body })
    }
}

/// Serves canned responses by URL and records every request
///
/// For replaying captured payloads through the adapters without a network.
#[derive(Debug, Default)]
pub struct ReplayTransport {
    responses: HashMap<String, (u16, Vec<u8>)>,
    requests: Mutex<Vec<Request>>,
}

impl ReplayTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests to `url` with `status` and `body`
    ///
    /// A `url` carrying a query only answers that exact query; a bare one
    /// answers any query not registered separately.
    #[must_use]
    pub fn respond(mut self, url: impl Into<String>, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(url.into(), (status, body.into()));
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl Transport for ReplayTransport {
    fn send(&self, request: &Request) -> Result<Response, GridError> {
        self.requests.lock().push(request.clone());
        let (status, body) = self
            .responses
            .get(&request.full_url())
            .or_else(|| self.responses.get(&request.url))
            .cloned()
            .ok_or_else(|| {
                GridError::Transport(format!("no canned response for {}", request.full_url()))
            })?;
        Ok(Response {
            url: request.url.clone(),
            status,
            body,
        })
    }
}
