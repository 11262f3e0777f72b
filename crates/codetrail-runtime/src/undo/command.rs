#![forbid(unsafe_code)]

//! Recorded navigation commands.
//!
//! A [`Command`] wraps a [`NavMessage`] with the two properties the
//! sequencer needs to decide how it is logged and replayed:
//!
//! - [`CommandOrder`]: how much of the displayed state the command changes.
//!   It scopes history truncation on append and orders replay.
//! - `replay_last_only`: only the most recent command of this type in a run
//!   of view commands matters (scroll positions, local symbol highlights).
//!
//! # Classification
//!
//! | Message                     | Order    | Replay last only |
//! |-----------------------------|----------|------------------|
//! | ActivateAll                 | Activate | no               |
//! | ActivateLocalSymbols        | View     | yes              |
//! | ActivateTokens (edge)       | Adapt    | no               |
//! | ActivateTokens (non-edge)   | Activate | no               |
//! | ChangeFileView              | View     | no               |
//! | GraphNodeBundleSplit        | Adapt    | no               |
//! | GraphNodeExpand / Move      | View     | no               |
//! | SearchFullText              | Activate | no               |
//! | ShowErrors                  | Activate | no               |
//! | ShowReference / ShowScope   | View     | no               |
//! | ScrollCode / ScrollGraph    | View     | yes              |

use std::fmt;

use codetrail_core::{MessageType, NavMessage, NavPayload};

/// Semantic weight of a command.
///
/// Ordered from heaviest to lightest: `Activate < Adapt < View`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandOrder {
    /// Replaces the primary displayed content.
    Activate,
    /// Refines the active content without replacing it.
    Adapt,
    /// Viewport or selection state only.
    View,
}

impl CommandOrder {
    /// Indentation depth used by the history dump.
    #[must_use]
    pub const fn indent(self) -> usize {
        match self {
            Self::Activate => 0,
            Self::Adapt => 1,
            Self::View => 2,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Activate => "activate",
            Self::Adapt => "adapt",
            Self::View => "view",
        }
    }
}

impl fmt::Display for CommandOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logged, replayable navigation action.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub message: NavMessage,
    pub order: CommandOrder,
    pub replay_last_only: bool,
}

impl Command {
    /// Wrap a message with an explicit classification.
    #[must_use]
    pub fn new(message: NavMessage, order: CommandOrder, replay_last_only: bool) -> Self {
        Self {
            message,
            order,
            replay_last_only,
        }
    }

    /// Wrap a message using the standard classification table.
    #[must_use]
    pub fn classify(message: NavMessage) -> Self {
        let (order, replay_last_only) = match &message.payload {
            NavPayload::ActivateAll
            | NavPayload::SearchFullText { .. }
            | NavPayload::ShowErrors { .. } => (CommandOrder::Activate, false),
            NavPayload::ActivateTokens(tokens) if tokens.is_edge => (CommandOrder::Adapt, false),
            NavPayload::ActivateTokens(_) => (CommandOrder::Activate, false),
            NavPayload::GraphNodeBundleSplit { .. } => (CommandOrder::Adapt, false),
            NavPayload::ActivateLocalSymbols { .. }
            | NavPayload::ScrollCode { .. }
            | NavPayload::ScrollGraph { .. } => (CommandOrder::View, true),
            NavPayload::ChangeFileView { .. }
            | NavPayload::GraphNodeExpand { .. }
            | NavPayload::GraphNodeMove { .. }
            | NavPayload::ShowReference { .. }
            | NavPayload::ShowScope { .. } => (CommandOrder::View, false),
        };
        Self::new(message, order, replay_last_only)
    }

    #[must_use]
    pub fn message_type(&self) -> MessageType {
        self.message.message_type()
    }

    #[must_use]
    pub fn is_view(&self) -> bool {
        self.order == CommandOrder::View
    }

    #[must_use]
    pub fn is_activate(&self) -> bool {
        self.order == CommandOrder::Activate
    }

    /// Replayed on its own rather than buffered with its view run.
    #[must_use]
    pub fn replays_immediately(&self) -> bool {
        !self.is_view() || !self.replay_last_only
    }
}
