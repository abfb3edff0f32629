//! Resource binding
//!
//! Expands a [`ResourceDescriptor`] into a [`Resource`] whose enabled
//! operations dispatch through the shared transport.

use super::operation::Operation;
use super::registry::ResourceDescriptor;
use crate::stripe::transport::RequestTransport;
use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Call-time errors raised before anything reaches the transport
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    #[error("{path} does not support {operation}")]
    UnsupportedOperation { path: String, operation: Operation },
    #[error("{operation} on {path} requires a non-empty id")]
    MissingId { path: String, operation: Operation },
}

/// One API resource with its enabled operations bound to a transport
#[derive(Clone)]
pub struct Resource {
    path: String,
    operations: BTreeSet<Operation>,
    transport: Arc<dyn RequestTransport>,
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("path", &self.path)
            .field("operations", &self.operations)
            .finish_non_exhaustive()
    }
}

impl Resource {
    /// Expand a descriptor. No I/O happens here.
    pub fn new(descriptor: &ResourceDescriptor, transport: Arc<dyn RequestTransport>) -> Self {
        Self {
            path: descriptor.path.clone(),
            operations: descriptor.operations.clone(),
            transport,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn supports(&self, operation: Operation) -> bool {
        self.operations.contains(&operation)
    }

    /// Enabled operations, in a stable order
    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        self.operations.iter().copied()
    }

    /// `POST /v1/{path}`
    pub async fn create(&self, payload: &Value) -> Result<Value> {
        self.call(Operation::Create, None, Some(payload)).await
    }

    /// `GET /v1/{path}/{id}`
    pub async fn retrieve(&self, id: &str, params: Option<&Value>) -> Result<Value> {
        self.call(Operation::Retrieve, Some(id), params).await
    }

    /// `POST /v1/{path}/{id}`
    pub async fn update(&self, id: &str, payload: &Value) -> Result<Value> {
        self.call(Operation::Update, Some(id), Some(payload)).await
    }

    /// `DELETE /v1/{path}/{id}`
    pub async fn delete(&self, id: &str) -> Result<Value> {
        self.call(Operation::Delete, Some(id), None).await
    }

    /// `GET /v1/{path}`
    pub async fn list(&self, params: Option<&Value>) -> Result<Value> {
        self.call(Operation::List, None, params).await
    }

    /// Dispatch any operation by value
    pub async fn call(
        &self,
        operation: Operation,
        id: Option<&str>,
        data: Option<&Value>,
    ) -> Result<Value> {
        if !self.supports(operation) {
            return Err(ResourceError::UnsupportedOperation {
                path: self.path.clone(),
                operation,
            }
            .into());
        }

        let id = id.filter(|id| !id.is_empty());
        if operation.targets_member() && id.is_none() {
            return Err(ResourceError::MissingId {
                path: self.path.clone(),
                operation,
            }
            .into());
        }

        let url = operation.url(&self.path, id);
        self.transport
            .dispatch(operation.method(), &url, data)
            .await
    }
}
