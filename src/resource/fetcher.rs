//! Resource Fetcher
//!
//! Walks Stripe's cursor pagination for list operations.

use super::binding::Resource;
use anyhow::Result;
use serde_json::{Map, Value};

/// One page of a list response
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub data: Vec<Value>,
    pub has_more: bool,
}

impl ListPage {
    /// Parse a Stripe list object (`{"object": "list", "data": [...], "has_more": bool}`)
    pub fn from_response(response: &Value) -> Self {
        Self {
            data: response
                .get("data")
                .and_then(|v| v.as_array())
                .cloned()
                .unwrap_or_default(),
            has_more: response
                .get("has_more")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        }
    }

    /// Cursor for the next page
    pub fn last_id(&self) -> Option<&str> {
        self.data.last()?.get("id")?.as_str()
    }
}

/// Fetch one page, starting after `starting_after` when given
pub async fn fetch_page(
    resource: &Resource,
    params: Option<&Value>,
    starting_after: Option<&str>,
) -> Result<ListPage> {
    let mut query = match params {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };

    if let Some(cursor) = starting_after {
        query.insert(
            "starting_after".to_string(),
            Value::String(cursor.to_string()),
        );
    }

    let query = Value::Object(query);
    let response = resource.list(Some(&query)).await?;
    Ok(ListPage::from_response(&response))
}

/// Fetch all objects (auto-paginate)
pub async fn list_all(resource: &Resource, params: Option<&Value>) -> Result<Vec<Value>> {
    let mut all_items = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = fetch_page(resource, params, cursor.as_deref()).await?;
        let next = page.last_id().map(|s| s.to_string());

        if cursor.is_some() && next == cursor {
            tracing::warn!(
                "{} returned the page after {} again, stopping pagination",
                resource.path(),
                cursor.as_deref().unwrap_or_default()
            );
            break;
        }

        let has_more = page.has_more;
        all_items.extend(page.data);

        if !has_more {
            break;
        }

        match next {
            Some(id) => cursor = Some(id),
            None => {
                tracing::warn!(
                    "{} reported has_more without an object id, stopping pagination",
                    resource.path()
                );
                break;
            },
        }
    }

    tracing::debug!("Fetched {} objects from {}", all_items.len(), resource.path());
    Ok(all_items)
}
