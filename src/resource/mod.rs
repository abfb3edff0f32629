//! Resource abstraction layer
//!
//! Stripe resources are declared as data rather than code. Each descriptor
//! names a path and the standard operations it supports; the binding layer
//! turns that into a callable [`Resource`].
//!
//! # Architecture
//!
//! - [`registry`] - Loads and caches resource descriptors from embedded JSON
//! - [`operation`] - Verb and URL shape of each standard operation
//! - [`binding`] - Expands a descriptor into a [`Resource`] bound to a transport
//! - [`fetcher`] - Cursor pagination over list operations
//!
//! # Resource Descriptors
//!
//! Descriptors live in JSON files under `src/resources/`:
//! - `core.json` - customers, charges, events
//! - `billing.json` - plans, products, prices
//! - `terminal.json` - terminal readers and locations
//!
//! ```json
//! "terminal.readers": {
//!   "path": "terminal/readers",
//!   "includeBasic": ["create", "del", "list", "retrieve", "update"]
//! }
//! ```

pub mod binding;
mod fetcher;
pub mod operation;
mod registry;

pub use binding::{Resource, ResourceError};
pub use fetcher::{fetch_page, list_all, ListPage};
pub use operation::Operation;
pub use registry::*;
