//! Property-based tests using proptest
//!
//! These tests check that expanding a descriptor exposes exactly the
//! operations it enables, whatever subset and path are chosen.

use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;
use stripekit::testing::RecordingTransport;
use stripekit::{Operation, Resource, ResourceDescriptor};

/// Generate an arbitrary subset of the standard operations
fn arb_operations() -> impl Strategy<Value = BTreeSet<Operation>> {
    prop::sample::subsequence(Operation::ALL.to_vec(), 0..=Operation::ALL.len())
        .prop_map(|ops| ops.into_iter().collect())
}

/// Generate a resource path such as `terminal/readers`
fn arb_path() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z_]{0,15}", 1..3).prop_map(|parts| parts.join("/"))
}

fn expand(path: &str, ops: &BTreeSet<Operation>) -> (Resource, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::new("fakeAuthToken"));
    let descriptor = ResourceDescriptor::new(path, ops.iter().copied());
    (Resource::new(&descriptor, transport.clone()), transport)
}

#[test]
fn create_and_retrieve_only() {
    let ops = BTreeSet::from([Operation::Create, Operation::Retrieve]);
    let (resource, _) = expand("terminal/readers", &ops);

    let exposed: Vec<Operation> = resource.operations().collect();
    assert_eq!(exposed, vec![Operation::Create, Operation::Retrieve]);
    for absent in [Operation::List, Operation::Update, Operation::Delete] {
        assert!(!resource.supports(absent));
    }
}

proptest! {
    /// The expanded resource exposes exactly the enabled set
    #[test]
    fn exposes_exactly_enabled_operations(path in arb_path(), ops in arb_operations()) {
        let (resource, _) = expand(&path, &ops);
        let exposed: BTreeSet<Operation> = resource.operations().collect();
        prop_assert_eq!(&exposed, &ops);
        for op in Operation::ALL {
            prop_assert_eq!(resource.supports(op), ops.contains(&op));
        }
    }

    /// Only enabled operations reach the transport, with the right verb and url
    #[test]
    fn only_enabled_operations_dispatch(
        path in arb_path(),
        ops in arb_operations(),
        id in "[a-z]{3}_[A-Za-z0-9]{1,12}"
    ) {
        let (resource, transport) = expand(&path, &ops);

        for op in Operation::ALL {
            let before = transport.last_request();
            let result = tokio_test::block_on(resource.call(op, Some(&id), None));

            if ops.contains(&op) {
                prop_assert!(result.is_ok());
                let request = transport.last_request().unwrap();
                prop_assert_eq!(request.method, op.method());
                let expected = if op.targets_member() {
                    format!("/v1/{}/{}", path, id)
                } else {
                    format!("/v1/{}", path)
                };
                prop_assert_eq!(request.url, expected);
            } else {
                prop_assert!(result.is_err());
                prop_assert_eq!(transport.last_request(), before);
            }
        }
    }

    /// Descriptor names outside the operation set never produce operations
    #[test]
    fn unknown_names_are_ignored(
        ops in arb_operations(),
        unknown in prop::collection::vec("[a-z]{1,10}", 0..5)
    ) {
        let mut names: Vec<String> = ops.iter().map(|op| op.name().to_string()).collect();
        names.extend(unknown.into_iter().filter(|n| Operation::from_name(n).is_none()));

        let json = serde_json::json!({"path": "widgets", "includeBasic": names});
        let descriptor: ResourceDescriptor = serde_json::from_value(json).unwrap();
        prop_assert_eq!(descriptor.operations, ops);
    }
}
