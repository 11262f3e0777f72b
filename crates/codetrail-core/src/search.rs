#![forbid(unsafe_code)]

//! Search matches attached to activations and refresh requests.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::message::Id;

/// Built-in search commands that are not symbol lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SearchCommand {
    /// Show everything in the project.
    All,
}

impl SearchCommand {
    /// Text shown in the search box for this command.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "overview",
        }
    }
}

/// What a [`SearchMatch`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SearchMatchKind {
    Symbol,
    FullText,
    Command(SearchCommand),
}

/// One entry of the search box.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchMatch {
    pub name: String,
    pub token_ids: Vec<Id>,
    pub kind: SearchMatchKind,
}

impl SearchMatch {
    /// Match for a built-in search command.
    #[must_use]
    pub fn command(command: SearchCommand) -> Self {
        Self {
            name: command.as_str().to_owned(),
            token_ids: Vec::new(),
            kind: SearchMatchKind::Command(command),
        }
    }
}
