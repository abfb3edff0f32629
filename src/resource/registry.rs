//! Resource Registry - Load resource descriptors from JSON
//!
//! This module loads all Stripe resource descriptors from embedded JSON files
//! and provides lookup functions for the rest of the library.

use super::operation::Operation;
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[
    include_str!("../resources/core.json"),
    include_str!("../resources/billing.json"),
    include_str!("../resources/terminal.json"),
];

/// Resource descriptor from JSON
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceDescriptor {
    /// Path below the API prefix, e.g. `terminal/readers`
    pub path: String,
    #[serde(
        rename = "includeBasic",
        default,
        deserialize_with = "deserialize_operations"
    )]
    pub operations: BTreeSet<Operation>,
}

impl ResourceDescriptor {
    pub fn new(path: &str, operations: impl IntoIterator<Item = Operation>) -> Self {
        Self {
            path: path.to_string(),
            operations: operations.into_iter().collect(),
        }
    }
}

/// Unknown names are dropped rather than rejected, so a descriptor written
/// for a newer operation set still loads.
fn deserialize_operations<'de, D>(deserializer: D) -> Result<BTreeSet<Operation>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = Vec::<String>::deserialize(deserializer)?;
    Ok(names
        .iter()
        .filter_map(|name| {
            let op = Operation::from_name(name);
            if op.is_none() {
                tracing::warn!("Skipping unrecognized operation in descriptor: {}", name);
            }
            op
        })
        .collect())
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceCatalog {
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceDescriptor>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceCatalog> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceCatalog {
    REGISTRY.get_or_init(|| {
        let mut catalog = ResourceCatalog::default();

        for content in RESOURCE_FILES {
            let partial: ResourceCatalog = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            catalog.resources.extend(partial.resources);
        }

        catalog
    })
}

/// Get a resource descriptor by key
pub fn get_descriptor(key: &str) -> Option<&'static ResourceDescriptor> {
    get_registry().resources.get(key)
}
