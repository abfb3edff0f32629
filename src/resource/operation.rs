//! Standard resource operations
//!
//! Each operation maps to a fixed HTTP verb and a URL shape: either the
//! collection (`/v1/{path}`) or one member (`/v1/{path}/{id}`).

use crate::stripe::transport::Method;
use std::fmt;

/// API version prefix for every resource path
pub const API_PREFIX: &str = "/v1";

/// The operations a descriptor can enable
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    Create,
    Delete,
    List,
    Retrieve,
    Update,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Create,
        Operation::Delete,
        Operation::List,
        Operation::Retrieve,
        Operation::Update,
    ];

    /// Parse a descriptor name. `del` is the spelling used by generated
    /// descriptors for delete.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "create" => Some(Operation::Create),
            "del" | "delete" => Some(Operation::Delete),
            "list" => Some(Operation::List),
            "retrieve" => Some(Operation::Retrieve),
            "update" => Some(Operation::Update),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Delete => "delete",
            Operation::List => "list",
            Operation::Retrieve => "retrieve",
            Operation::Update => "update",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Operation::Create | Operation::Update => Method::Post,
            Operation::List | Operation::Retrieve => Method::Get,
            Operation::Delete => Method::Delete,
        }
    }

    /// Whether the operation targets a single object by id
    pub fn targets_member(&self) -> bool {
        matches!(
            self,
            Operation::Delete | Operation::Retrieve | Operation::Update
        )
    }

    /// Build the API-relative URL for this operation
    pub fn url(&self, path: &str, id: Option<&str>) -> String {
        let path = path.trim_matches('/');
        match (self.targets_member(), id) {
            (true, Some(id)) => format!("{}/{}/{}", API_PREFIX, path, urlencoding::encode(id)),
            _ => format!("{}/{}", API_PREFIX, path),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_del_alias() {
        assert_eq!(Operation::from_name("del"), Some(Operation::Delete));
        assert_eq!(Operation::from_name("delete"), Some(Operation::Delete));
        assert_eq!(Operation::from_name("search"), None);
    }

    #[test]
    fn test_verbs() {
        assert_eq!(Operation::Create.method(), Method::Post);
        assert_eq!(Operation::Update.method(), Method::Post);
        assert_eq!(Operation::List.method(), Method::Get);
        assert_eq!(Operation::Retrieve.method(), Method::Get);
        assert_eq!(Operation::Delete.method(), Method::Delete);
    }

    #[test]
    fn test_collection_and_member_urls() {
        assert_eq!(Operation::Create.url("terminal/readers", None), "/v1/terminal/readers");
        assert_eq!(
            Operation::Retrieve.url("terminal/readers", Some("tmr_123")),
            "/v1/terminal/readers/tmr_123"
        );
        // Collection operations ignore the id
        assert_eq!(Operation::List.url("customers", Some("cus_1")), "/v1/customers");
    }

    #[test]
    fn test_member_id_is_escaped() {
        assert_eq!(
            Operation::Delete.url("customers", Some("a/b c")),
            "/v1/customers/a%2Fb%20c"
        );
    }

    #[test]
    fn test_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_name(op.name()), Some(op));
        }
    }
}
