#![forbid(unsafe_code)]

//! Core: navigation messages and the collaborators they flow through.
//!
//! # Role in Codetrail
//! `codetrail-core` is the vocabulary layer. The UI emits [`NavMessage`]
//! values whenever the user navigates the indexed codebase (activating a
//! symbol, scrolling, expanding a graph node, ...). The runtime records
//! those messages, and later re-sends them through a [`MessageSink`] when the
//! user steps backward or forward through history.
//!
//! # Primary responsibilities
//! - **NavMessage**: tagged payload plus replay-state flags.
//! - **MessageType**: stable type tag used for coalescing and dedup.
//! - **MessageSink / NameResolver**: the outbound interfaces the runtime
//!   depends on, so it never touches the UI or the index directly.

pub mod dispatch;
pub mod message;
pub mod search;

#[cfg(feature = "test-helpers")]
pub mod testing;

pub use dispatch::{MessageSink, NameResolver};
pub use message::{
    ActivateTokens, FileView, Id, MessageFlags, MessageType, NameHierarchy, NavMessage, NavPayload,
};
pub use search::{SearchCommand, SearchMatch, SearchMatchKind};
