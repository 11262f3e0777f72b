#![forbid(unsafe_code)]

//! Navigation messages emitted by the UI.
//!
//! A [`NavMessage`] is a [`NavPayload`] (what the user did) plus
//! [`MessageFlags`] (how the message relates to replay). The payload is a
//! closed sum type, and per-variant behavior dispatches on [`MessageType`].
//!
//! # Invariants
//!
//! 1. [`NavPayload::message_type`] is total and stable: two payloads of the
//!    same variant always report the same tag.
//! 2. Flags never influence equality of the payload itself; dedup compares
//!    payload fields only.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::search::SearchMatch;

/// Identifier of a symbol, token, error, or source location in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Id(pub u64);

impl Id {
    /// Create a new id from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Fully qualified symbol name, e.g. `["std", "vec", "Vec"]` joined by `::`.
///
/// Token ids are only valid for one parse of the codebase. Names survive
/// re-indexing, so recorded activations keep them to re-resolve on replay.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NameHierarchy {
    pub delimiter: String,
    pub elements: Vec<String>,
}

impl NameHierarchy {
    /// Create a name hierarchy from its elements.
    #[must_use]
    pub fn new<I, T>(delimiter: impl Into<String>, elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            delimiter: delimiter.into(),
            elements: elements.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a qualified name by splitting on `delimiter`.
    #[must_use]
    pub fn parse(qualified: &str, delimiter: &str) -> Self {
        let elements = if qualified.is_empty() {
            Vec::new()
        } else {
            qualified.split(delimiter).map(str::to_owned).collect()
        };
        Self {
            delimiter: delimiter.to_owned(),
            elements,
        }
    }
}

impl fmt::Display for NameHierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.elements.join(&self.delimiter))
    }
}

/// Display state requested for a file in the code view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FileView {
    Minimized,
    #[default]
    Snippets,
    Maximized,
}

/// Payload of an ActivateTokens message.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActivateTokens {
    /// Resolved token ids. Only valid for the parse they were resolved in.
    pub token_ids: Vec<Id>,
    /// Names the ids were resolved from.
    pub token_names: Vec<NameHierarchy>,
    /// Search matches that led to this activation, if any.
    pub search_matches: Vec<SearchMatch>,
    /// Activation of an edge rather than a node.
    pub is_edge: bool,
    /// Activation of an aggregation edge bundle.
    pub is_aggregation: bool,
    /// Triggered from the search box.
    pub is_from_search: bool,
}

impl ActivateTokens {
    /// Activate a set of tokens by id, remembering their names.
    #[must_use]
    pub fn new(token_ids: Vec<Id>, token_names: Vec<NameHierarchy>) -> Self {
        Self {
            token_ids,
            token_names,
            ..Self::default()
        }
    }

    /// Mark this activation as an edge activation.
    #[must_use]
    pub fn edge(mut self) -> Self {
        self.is_edge = true;
        self
    }

    /// Mark this activation as an aggregation activation.
    #[must_use]
    pub fn aggregation(mut self) -> Self {
        self.is_aggregation = true;
        self
    }

    /// Attach the search matches this activation came from.
    #[must_use]
    pub fn from_search(mut self, matches: Vec<SearchMatch>) -> Self {
        self.search_matches = matches;
        self.is_from_search = true;
        self
    }
}

/// What the user did.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NavPayload {
    /// Show the overview of everything in the project.
    ActivateAll,
    /// Highlight local symbols in the code view.
    ActivateLocalSymbols { symbol_ids: Vec<Id> },
    /// Activate one or more tokens (nodes or edges).
    ActivateTokens(ActivateTokens),
    /// Minimize, expand to snippets, or maximize a file.
    ChangeFileView { file_path: String, view: FileView },
    /// Split a bundled group of graph nodes.
    GraphNodeBundleSplit {
        bundle_id: Id,
        remove_other_nodes: bool,
    },
    /// Expand or collapse a graph node.
    GraphNodeExpand { node_id: Id, expand: bool },
    /// Drag a graph node by `delta` (x, y).
    GraphNodeMove { node_id: Id, delta: (i32, i32) },
    /// Vertical scroll position of the code view.
    ScrollCode { value: i32 },
    /// Scroll position of the graph view.
    ScrollGraph { x: i32, y: i32 },
    /// Full-text search over the source files.
    SearchFullText {
        search_term: String,
        case_sensitive: bool,
    },
    /// Show the error list, focused on one error.
    ShowErrors { error_id: Id },
    /// Jump to the reference at `ref_index` of the active token.
    ShowReference {
        ref_index: usize,
        token_id: Id,
        location_id: Id,
    },
    /// Show the scope around a location.
    ShowScope {
        scope_location_id: Id,
        show_errors: bool,
    },
}

impl NavPayload {
    /// Stable type tag of this payload.
    #[must_use]
    pub const fn message_type(&self) -> MessageType {
        match self {
            Self::ActivateAll => MessageType::ActivateAll,
            Self::ActivateLocalSymbols { .. } => MessageType::ActivateLocalSymbols,
            Self::ActivateTokens(_) => MessageType::ActivateTokens,
            Self::ChangeFileView { .. } => MessageType::ChangeFileView,
            Self::GraphNodeBundleSplit { .. } => MessageType::GraphNodeBundleSplit,
            Self::GraphNodeExpand { .. } => MessageType::GraphNodeExpand,
            Self::GraphNodeMove { .. } => MessageType::GraphNodeMove,
            Self::ScrollCode { .. } => MessageType::ScrollCode,
            Self::ScrollGraph { .. } => MessageType::ScrollGraph,
            Self::SearchFullText { .. } => MessageType::SearchFullText,
            Self::ShowErrors { .. } => MessageType::ShowErrors,
            Self::ShowReference { .. } => MessageType::ShowReference,
            Self::ShowScope { .. } => MessageType::ShowScope,
        }
    }
}

/// Type tag of a [`NavPayload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MessageType {
    ActivateAll,
    ActivateLocalSymbols,
    ActivateTokens,
    ChangeFileView,
    GraphNodeBundleSplit,
    GraphNodeExpand,
    GraphNodeMove,
    ScrollCode,
    ScrollGraph,
    SearchFullText,
    ShowErrors,
    ShowReference,
    ShowScope,
}

impl MessageType {
    /// Every message type, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::ActivateAll,
        Self::ActivateLocalSymbols,
        Self::ActivateTokens,
        Self::ChangeFileView,
        Self::GraphNodeBundleSplit,
        Self::GraphNodeExpand,
        Self::GraphNodeMove,
        Self::ScrollCode,
        Self::ScrollGraph,
        Self::SearchFullText,
        Self::ShowErrors,
        Self::ShowReference,
        Self::ShowScope,
    ];

    /// Stable name used in logs and the history dump.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ActivateAll => "ActivateAll",
            Self::ActivateLocalSymbols => "ActivateLocalSymbols",
            Self::ActivateTokens => "ActivateTokens",
            Self::ChangeFileView => "ChangeFileView",
            Self::GraphNodeBundleSplit => "GraphNodeBundleSplit",
            Self::GraphNodeExpand => "GraphNodeExpand",
            Self::GraphNodeMove => "GraphNodeMove",
            Self::ScrollCode => "ScrollCode",
            Self::ScrollGraph => "ScrollGraph",
            Self::SearchFullText => "SearchFullText",
            Self::ShowErrors => "ShowErrors",
            Self::ShowReference => "ShowReference",
            Self::ShowScope => "ShowScope",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replay-state flags carried by every message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MessageFlags {
    /// The message is being re-sent from history, not issued by the user.
    pub replayed: bool,
    /// The message is the final one of a replay pass.
    pub last: bool,
    /// History was rewritten after a re-parse; receivers drop cached state.
    pub replay_cleared: bool,
    /// Handling the message keeps the currently displayed content.
    pub keep_content: bool,
}

/// A navigation message: payload plus replay-state flags.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavMessage {
    pub payload: NavPayload,
    pub flags: MessageFlags,
}

impl NavMessage {
    /// Wrap a payload with default flags.
    #[must_use]
    pub fn new(payload: NavPayload) -> Self {
        Self {
            payload,
            flags: MessageFlags::default(),
        }
    }

    /// Set whether handling this message keeps the displayed content.
    #[must_use]
    pub fn with_keep_content(mut self, keep_content: bool) -> Self {
        self.flags.keep_content = keep_content;
        self
    }

    /// Mark this message as replayed.
    #[must_use]
    pub fn replayed(mut self) -> Self {
        self.flags.replayed = true;
        self
    }

    #[must_use]
    pub const fn message_type(&self) -> MessageType {
        self.payload.message_type()
    }

    #[must_use]
    pub const fn keeps_content(&self) -> bool {
        self.flags.keep_content
    }

    pub fn set_keep_content(&mut self, keep_content: bool) {
        self.flags.keep_content = keep_content;
    }

    #[must_use]
    pub const fn is_replayed(&self) -> bool {
        self.flags.replayed
    }

    pub fn set_replayed(&mut self, replayed: bool) {
        self.flags.replayed = replayed;
    }

    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.flags.last
    }

    pub fn set_last(&mut self, last: bool) {
        self.flags.last = last;
    }

    #[must_use]
    pub const fn is_replay_cleared(&self) -> bool {
        self.flags.replay_cleared
    }

    pub fn set_replay_cleared(&mut self, replay_cleared: bool) {
        self.flags.replay_cleared = replay_cleared;
    }

    /// The ActivateTokens payload, if this is one.
    #[must_use]
    pub fn as_activate_tokens(&self) -> Option<&ActivateTokens> {
        match &self.payload {
            NavPayload::ActivateTokens(tokens) => Some(tokens),
            _ => None,
        }
    }

    /// Mutable ActivateTokens payload, if this is one.
    pub fn as_activate_tokens_mut(&mut self) -> Option<&mut ActivateTokens> {
        match &mut self.payload {
            NavPayload::ActivateTokens(tokens) => Some(tokens),
            _ => None,
        }
    }
}

impl From<NavPayload> for NavMessage {
    fn from(payload: NavPayload) -> Self {
        Self::new(payload)
    }
}

impl From<ActivateTokens> for NavMessage {
    fn from(tokens: ActivateTokens) -> Self {
        Self::new(NavPayload::ActivateTokens(tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_type_matches_variant() {
        let msg = NavMessage::new(NavPayload::ScrollGraph { x: 1, y: 2 });
        assert_eq!(msg.message_type(), MessageType::ScrollGraph);
        assert_eq!(msg.message_type().as_str(), "ScrollGraph");
    }

    #[test]
    fn message_type_names_are_unique() {
        let mut names: Vec<_> = MessageType::ALL.iter().map(|t| t.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), MessageType::ALL.len());
    }

    #[test]
    fn flags_default_to_false() {
        let msg = NavMessage::new(NavPayload::ActivateAll);
        assert!(!msg.is_replayed());
        assert!(!msg.is_last());
        assert!(!msg.is_replay_cleared());
        assert!(!msg.keeps_content());
    }

    #[test]
    fn flag_setters_round_trip() {
        let mut msg = NavMessage::new(NavPayload::ActivateAll).with_keep_content(true);
        assert!(msg.keeps_content());
        msg.set_replayed(true);
        msg.set_last(true);
        msg.set_replay_cleared(true);
        assert!(msg.is_replayed() && msg.is_last() && msg.is_replay_cleared());
        msg.set_keep_content(false);
        assert!(!msg.keeps_content());
    }

    #[test]
    fn activate_tokens_builders() {
        let tokens = ActivateTokens::new(vec![Id::new(3)], vec![NameHierarchy::parse("a::b", "::")])
            .edge()
            .aggregation();
        assert!(tokens.is_edge);
        assert!(tokens.is_aggregation);
        assert!(!tokens.is_from_search);

        let msg = NavMessage::from(tokens);
        assert_eq!(msg.message_type(), MessageType::ActivateTokens);
        assert_eq!(msg.as_activate_tokens().map(|t| t.token_ids.len()), Some(1));
    }

    #[test]
    fn name_hierarchy_display_joins_elements() {
        let name = NameHierarchy::new("::", ["std", "vec", "Vec"]);
        assert_eq!(name.to_string(), "std::vec::Vec");
        assert_eq!(NameHierarchy::parse("std::vec::Vec", "::"), name);
        assert!(NameHierarchy::parse("", "::").elements.is_empty());
    }

    #[test]
    fn id_raw_round_trip() {
        assert_eq!(Id::new(42).raw(), 42);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serialized_message_keeps_flags() {
        let mut msg = NavMessage::new(NavPayload::ShowErrors { error_id: Id::new(7) });
        msg.set_replay_cleared(true);

        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("ShowErrors"));

        let back: NavMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
        assert!(back.is_replay_cleared());
    }
}
