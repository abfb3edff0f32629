//! Stripe API interaction module
//!
//! # Module Structure
//!
//! - [`credentials`] - API key lookup and validation
//! - [`client`] - Main client binding the resource catalog to a transport
//! - [`transport`] - The [`RequestTransport`](transport::RequestTransport) seam
//! - [`http`] - reqwest-backed transport and Stripe parameter encoding
//!
//! # Example
//!
//! ```no_run
//! use serde_json::json;
//! use stripekit::StripeClient;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let stripe = StripeClient::new("sk_test_...")?;
//!     let reader = stripe
//!         .terminal_readers()
//!         .create(&json!({"registration_code": "simulated-wpe", "location": "tml_123"}))
//!         .await?;
//!     println!("{}", reader["id"]);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod credentials;
pub mod http;
pub mod transport;
