#![forbid(unsafe_code)]

//! Property tests for [`UndoRedoSequencer`] invariants.
//!
//! Validates:
//! - The cursor stays within `0..=len` under any event sequence.
//! - Distinct activations produce one command each, cursor at the end.
//! - Every undo/redo that moves the cursor flushes exactly once.
//! - Replayed messages never change the log.
//! - The redo control tracks whether the cursor is at the end.
//! - A depth limit is never exceeded and never leaves a view at the head.

use proptest::prelude::*;

use codetrail_core::testing::{RecordingSink, StaticResolver};
use codetrail_core::{ActivateTokens, Id, NameHierarchy, NavMessage, NavPayload};
use codetrail_runtime::{SequencerConfig, UndoRedoSequencer};

type Sequencer = UndoRedoSequencer<RecordingSink, StaticResolver>;

// ============================================================================
// Strategy helpers
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Activate(u8),
    Search(u8),
    Edge(u8),
    Split(u8),
    Scroll(i16),
    Expand(u8),
    Undo,
    Redo,
    Refresh,
    DeactivateEdge,
    FinishedParsing,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<u8>().prop_map(Op::Activate),
        2 => (0u8..4).prop_map(Op::Search),
        2 => any::<u8>().prop_map(Op::Edge),
        1 => any::<u8>().prop_map(Op::Split),
        3 => any::<i16>().prop_map(Op::Scroll),
        2 => any::<u8>().prop_map(Op::Expand),
        3 => Just(Op::Undo),
        3 => Just(Op::Redo),
        1 => Just(Op::Refresh),
        1 => Just(Op::DeactivateEdge),
        1 => Just(Op::FinishedParsing),
    ]
}

fn ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 1..=max_len)
}

fn tokens(id: u8) -> ActivateTokens {
    ActivateTokens::new(
        vec![Id::new(u64::from(id))],
        vec![NameHierarchy::parse(&format!("mod::item{id}"), "::")],
    )
}

fn message(op: &Op) -> Option<NavMessage> {
    let payload = match op {
        Op::Activate(id) => NavPayload::ActivateTokens(tokens(*id)),
        Op::Search(term) => NavPayload::SearchFullText {
            search_term: format!("term{term}"),
            case_sensitive: false,
        },
        Op::Edge(id) => NavPayload::ActivateTokens(tokens(*id).edge()),
        Op::Split(id) => NavPayload::GraphNodeBundleSplit {
            bundle_id: Id::new(u64::from(*id)),
            remove_other_nodes: false,
        },
        Op::Scroll(value) => NavPayload::ScrollCode {
            value: i32::from(*value),
        },
        Op::Expand(id) => NavPayload::GraphNodeExpand {
            node_id: Id::new(u64::from(*id)),
            expand: true,
        },
        _ => return None,
    };
    Some(NavMessage::new(payload))
}

fn apply(seq: &mut Sequencer, op: &Op) {
    if let Some(message) = message(op) {
        let _ = seq.record(message);
        return;
    }
    match op {
        Op::Undo => {
            let _ = seq.undo();
        }
        Op::Redo => {
            let _ = seq.redo();
        }
        Op::Refresh => seq.refresh(true),
        Op::DeactivateEdge => seq.deactivate_edge(),
        Op::FinishedParsing => {
            let _ = seq.finished_parsing();
        }
        _ => {}
    }
}

fn sequencer() -> Sequencer {
    UndoRedoSequencer::new(RecordingSink::new(), StaticResolver::new())
}

// ============================================================================
// Invariant 1: Cursor bounds and redo control
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn cursor_stays_in_bounds(ops in ops_strategy(80)) {
        let mut seq = sequencer();
        for op in &ops {
            apply(&mut seq, op);
            prop_assert!(seq.cursor() <= seq.len(), "cursor {} > len {}", seq.cursor(), seq.len());
        }
    }

    #[test]
    fn redo_control_tracks_cursor_position(ops in ops_strategy(80)) {
        let mut seq = sequencer();
        for op in &ops {
            apply(&mut seq, op);
            prop_assert_eq!(
                seq.controls().redo_enabled,
                !seq.log().at_end(),
                "after {:?}\n{}",
                op,
                seq.dump()
            );
        }
    }
}

// ============================================================================
// Invariant 2: Activation-only sequences
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn distinct_activations_append_one_command_each(
        ids in prop::collection::vec(any::<u8>(), 1..60)
    ) {
        let mut seq = sequencer();
        let mut expected = 0usize;
        let mut previous = None;

        for id in ids {
            let _ = seq.record(tokens(id).into());
            // Back-to-back activations of the same ids are dropped.
            if previous != Some(id) {
                expected += 1;
            }
            previous = Some(id);
            prop_assert_eq!(seq.len(), expected);
            prop_assert!(seq.log().at_end());
        }
    }
}

// ============================================================================
// Invariant 3: One flush per replay
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn moving_undo_redo_flushes_once(ops in ops_strategy(60)) {
        let mut seq = sequencer();
        for op in &ops {
            let before_cursor = seq.cursor();
            let before_flushes = seq.sink().flushes().len();
            apply(&mut seq, op);
            let flushes = seq.sink().flushes().len() - before_flushes;

            match op {
                Op::Undo | Op::Redo => {
                    let moved = seq.cursor() != before_cursor;
                    prop_assert_eq!(flushes, usize::from(moved), "after {:?}", op);
                }
                Op::Refresh => {
                    prop_assert_eq!(flushes, usize::from(!seq.log().at_start()));
                }
                _ => prop_assert_eq!(flushes, 0, "after {:?}", op),
            }
        }
    }
}

// ============================================================================
// Invariant 4: Replayed messages are inert
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn replayed_messages_never_change_the_log(
        ops in ops_strategy(40),
        replays in prop::collection::vec(op_strategy(), 1..20),
    ) {
        let mut seq = sequencer();
        for op in &ops {
            apply(&mut seq, op);
        }
        let before = seq.log().clone();
        let controls = seq.controls();

        for op in &replays {
            if let Some(message) = message(op) {
                let delta = seq.record(message.replayed());
                prop_assert!(delta.is_empty());
            }
        }

        prop_assert_eq!(seq.log(), &before);
        prop_assert_eq!(seq.controls(), controls);
    }
}

// ============================================================================
// Invariant 5: Depth limit
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn depth_limit_never_exceeded(
        max_depth in 2usize..12,
        ops in ops_strategy(80),
    ) {
        let config = SequencerConfig::default().with_max_depth(max_depth);
        let mut seq = UndoRedoSequencer::with_config(
            RecordingSink::new(),
            StaticResolver::new(),
            config,
        );
        for op in &ops {
            apply(&mut seq, op);
            prop_assert!(seq.len() <= max_depth);
            prop_assert!(seq.cursor() <= seq.len());
            prop_assert!(
                seq.log().get(0).is_none_or(|c| !c.is_view()),
                "view at head after {:?}\n{}",
                op,
                seq.dump()
            );
        }
    }
}
