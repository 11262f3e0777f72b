#![forbid(unsafe_code)]

//! Property tests for navigation message helpers.
//!
//! Validates:
//! - Qualified names survive display then parse.
//! - Flag builders never touch the payload or its type tag.
//! - The static resolver only returns ids for names it knows.

use proptest::prelude::*;

use codetrail_core::{Id, MessageType, NameHierarchy, NavMessage, NavPayload};

// ============================================================================
// Strategy helpers
// ============================================================================

fn element() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,11}"
}

fn name() -> impl Strategy<Value = NameHierarchy> {
    prop::collection::vec(element(), 1..6).prop_map(|elements| NameHierarchy::new("::", elements))
}

fn payload() -> impl Strategy<Value = NavPayload> {
    prop_oneof![
        Just(NavPayload::ActivateAll),
        any::<i32>().prop_map(|value| NavPayload::ScrollCode { value }),
        (any::<i32>(), any::<i32>()).prop_map(|(x, y)| NavPayload::ScrollGraph { x, y }),
        any::<u64>().prop_map(|id| NavPayload::ShowErrors { error_id: Id::new(id) }),
        (".{0,16}", any::<bool>()).prop_map(|(search_term, case_sensitive)| {
            NavPayload::SearchFullText {
                search_term,
                case_sensitive,
            }
        }),
        (any::<u64>(), any::<bool>()).prop_map(|(id, expand)| NavPayload::GraphNodeExpand {
            node_id: Id::new(id),
            expand,
        }),
    ]
}

// ============================================================================
// Names
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn qualified_name_parses_back(name in name()) {
        let parsed = NameHierarchy::parse(&name.to_string(), "::");
        prop_assert_eq!(parsed, name);
    }
}

// ============================================================================
// Flags
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn flags_leave_payload_alone(
        payload in payload(),
        keep in any::<bool>(),
        last in any::<bool>(),
        cleared in any::<bool>(),
    ) {
        let tag = payload.message_type();
        let mut msg = NavMessage::new(payload.clone()).with_keep_content(keep).replayed();
        msg.set_last(last);
        msg.set_replay_cleared(cleared);

        prop_assert_eq!(&msg.payload, &payload);
        prop_assert_eq!(msg.message_type(), tag);
        prop_assert!(MessageType::ALL.contains(&tag));
        prop_assert!(msg.is_replayed());
        prop_assert_eq!(msg.keeps_content(), keep);
    }
}

// ============================================================================
// Static resolver
// ============================================================================

#[cfg(feature = "test-helpers")]
mod resolver {
    use super::*;
    use codetrail_core::NameResolver;
    use codetrail_core::testing::StaticResolver;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn unknown_names_are_skipped(
            known in prop::collection::vec(name(), 0..8),
            unknown in prop::collection::vec(name(), 0..8),
        ) {
            let mut resolver = StaticResolver::new();
            for (index, name) in known.iter().enumerate() {
                resolver.insert(name.clone(), Id::new(index as u64));
            }

            let unknown: Vec<NameHierarchy> =
                unknown.into_iter().filter(|n| !known.contains(n)).collect();
            prop_assert!(resolver.resolve(&unknown).is_empty());
            prop_assert_eq!(resolver.resolve(&known).len(), known.len());
        }
    }
}
