//! Stripe Client
//!
//! Main client, binding every resource in the catalog to one shared
//! transport.

use super::http::HttpTransport;
use super::transport::RequestTransport;
use crate::resource::{get_registry, Resource};
use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(80);

/// Connection settings for the HTTP transport
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme and host requests are sent to
    pub api_base: String,
    /// Pinned `Stripe-Version`; the account default is used when unset
    pub api_version: Option<String>,
    pub timeout: Duration,
    pub user_agent: String,
    /// Connected account to act on behalf of (`Stripe-Account` header)
    pub stripe_account: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_version: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("stripekit/{}", env!("CARGO_PKG_VERSION")),
            stripe_account: None,
        }
    }
}

impl ClientConfig {
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.to_string();
        self
    }

    pub fn with_api_version(mut self, api_version: &str) -> Self {
        self.api_version = Some(api_version.to_string());
        self
    }

    pub fn with_stripe_account(mut self, account: &str) -> Self {
        self.stripe_account = Some(account.to_string());
        self
    }
}

/// Main Stripe client
#[derive(Clone)]
pub struct StripeClient {
    resources: Arc<BTreeMap<String, Resource>>,
}

impl StripeClient {
    /// Create a client talking to the live API host
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_config(api_key, ClientConfig::default())
    }

    pub fn with_config(api_key: &str, config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(api_key, &config)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Bind every catalog resource to `transport`.
    /// All resources share the handle, so swapping the transport here
    /// swaps it everywhere.
    pub fn with_transport(transport: Arc<dyn RequestTransport>) -> Self {
        let resources = get_registry()
            .resources
            .iter()
            .map(|(key, descriptor)| (key.clone(), Resource::new(descriptor, transport.clone())))
            .collect();

        Self {
            resources: Arc::new(resources),
        }
    }

    /// Get a resource by catalog key (e.g. `terminal.readers`)
    pub fn resource(&self, key: &str) -> Option<&Resource> {
        self.resources.get(key)
    }

    pub fn resource_keys(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(|k| k.as_str())
    }

    pub fn customers(&self) -> &Resource {
        self.catalog_resource("customers")
    }

    pub fn plans(&self) -> &Resource {
        self.catalog_resource("plans")
    }

    pub fn charges(&self) -> &Resource {
        self.catalog_resource("charges")
    }

    pub fn terminal_readers(&self) -> &Resource {
        self.catalog_resource("terminal.readers")
    }

    // Keys passed here are part of the embedded catalog
    fn catalog_resource(&self, key: &str) -> &Resource {
        self.resources
            .get(key)
            .unwrap_or_else(|| panic!("Resource missing from embedded catalog: {}", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_targets_live_host() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base, "https://api.stripe.com");
        assert!(config.api_version.is_none());
        assert!(config.user_agent.starts_with("stripekit/"));
    }

    #[test]
    fn test_client_binds_whole_catalog() {
        let client = StripeClient::new("sk_test_123").unwrap();
        let keys: Vec<&str> = client.resource_keys().collect();
        assert_eq!(keys.len(), get_registry().resources.len());
        assert_eq!(client.terminal_readers().path(), "terminal/readers");
        assert_eq!(client.customers().path(), "customers");
    }

    #[test]
    fn test_invalid_api_base_is_rejected() {
        let config = ClientConfig::default().with_api_base("not a url");
        assert!(StripeClient::with_config("sk_test_123", config).is_err());
    }
}
