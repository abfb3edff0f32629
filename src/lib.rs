//! Stripe API bindings built from declarative resource descriptors.
//!
//! Each resource (customers, plans, terminal readers, ...) is described by a
//! path and the standard operations it supports. [`StripeClient`] expands
//! every descriptor into a [`Resource`] bound to one shared
//! [`RequestTransport`](stripe::transport::RequestTransport).
//!
//! The [`testing`] module swaps that transport for a recorder and provides a
//! registry for deleting objects created during tests.

pub mod config;
pub mod resource;
pub mod stripe;
pub mod testing;

pub use resource::{Operation, Resource, ResourceDescriptor, ResourceError};
pub use stripe::client::{ClientConfig, StripeClient};
pub use stripe::http::{format_stripe_error, ApiError};
