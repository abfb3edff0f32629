//! Spyable client
//!
//! A [`StripeClient`] whose transport records each request instead of
//! sending it.

use crate::stripe::client::StripeClient;
use crate::stripe::transport::{Method, RequestTransport};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::ops::Deref;
use std::sync::{Arc, Mutex, PoisonError};

/// Credential a spyable client is built with. It never leaves the process.
pub const PLACEHOLDER_API_KEY: &str = "fakeAuthToken";

/// The last request handed to a [`RecordingTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedRequest {
    pub method: Method,
    pub url: String,
    pub data: Option<Value>,
}

/// Transport that keeps only the most recent request and answers every
/// call with `Value::Null`
#[derive(Debug)]
pub struct RecordingTransport {
    api_key: String,
    last_request: Mutex<Option<CapturedRequest>>,
}

impl RecordingTransport {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            last_request: Mutex::new(None),
        }
    }

    /// Credential the client would have authenticated with
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn last_request(&self) -> Option<CapturedRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl RequestTransport for RecordingTransport {
    async fn dispatch(&self, method: Method, url: &str, data: Option<&Value>) -> Result<Value> {
        tracing::debug!("Recorded {} {}", method, url);

        let captured = CapturedRequest {
            method,
            url: url.to_string(),
            data: data.cloned(),
        };
        *self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(captured);

        Ok(Value::Null)
    }
}

/// Client with every resource wired to one [`RecordingTransport`]
#[derive(Clone)]
pub struct SpyableClient {
    client: StripeClient,
    recorder: Arc<RecordingTransport>,
}

impl SpyableClient {
    pub fn new() -> Self {
        let recorder = Arc::new(RecordingTransport::new(PLACEHOLDER_API_KEY));
        let client = StripeClient::with_transport(recorder.clone());
        Self { client, recorder }
    }

    /// The request most recently issued by any resource on this client
    pub fn last_request(&self) -> Option<CapturedRequest> {
        self.recorder.last_request()
    }

    pub fn recorder(&self) -> &RecordingTransport {
        &self.recorder
    }
}

impl Default for SpyableClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for SpyableClient {
    type Target = StripeClient;

    fn deref(&self) -> &StripeClient {
        &self.client
    }
}

/// Build a spyable client
pub fn get_spyable_stripe() -> SpyableClient {
    SpyableClient::new()
}
