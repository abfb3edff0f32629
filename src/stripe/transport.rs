//! Request transport
//!
//! Resources never talk to the network directly. They hand a fully built
//! request (verb, API-relative url, optional data) to a [`RequestTransport`],
//! which is either the HTTP implementation in [`super::http`] or a recorder
//! from [`crate::testing`].

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// HTTP verbs used by the Stripe API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Capability to send one request to the API.
///
/// `url` is relative to the API host (e.g. `/v1/terminal/readers`). `data`
/// is the request parameters as a JSON object; transports decide how to
/// encode it.
#[async_trait]
pub trait RequestTransport: Send + Sync {
    async fn dispatch(&self, method: Method, url: &str, data: Option<&Value>) -> Result<Value>;
}
