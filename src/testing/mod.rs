//! Test utilities
//!
//! - [`spy`] - Spyable client: records the last request, never hits the network
//! - [`cleanup`] - Registry of teardown actions run after a test
//!
//! # Example
//!
//! ```no_run
//! use serde_json::json;
//! use stripekit::testing::{get_spyable_stripe, CleanupRegistry};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let stripe = get_spyable_stripe();
//!     stripe.customers().create(&json!({"email": "jenny@example.com"})).await?;
//!     assert_eq!(stripe.last_request().unwrap().url, "/v1/customers");
//!
//!     let mut cleanup = CleanupRegistry::new()?;
//!     cleanup.delete_customer("cus_123");
//!     cleanup.drain().await?;
//!     Ok(())
//! }
//! ```

pub mod cleanup;
pub mod spy;

pub use cleanup::CleanupRegistry;
pub use spy::{
    get_spyable_stripe, CapturedRequest, RecordingTransport, SpyableClient, PLACEHOLDER_API_KEY,
};
