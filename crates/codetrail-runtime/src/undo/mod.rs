#![forbid(unsafe_code)]

//! Undo/redo history for navigation commands.
//!
//! Unlike an edit history, navigation commands are not independently
//! reversible. Undo moves a cursor back through the log and rebuilds the
//! displayed state by re-sending commands forward from the nearest content
//! change, with lighter commands coalesced or dropped along the way.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     UndoRedoSequencer                         │
//! │                                                               │
//! │  NavMessage ─► gateway ─► CommandLog [A0 V1 A2 │ V3 A4]       │
//! │               (ignore/      applied ◄──┘ └──► redo-able       │
//! │                coalesce/                                      │
//! │                append)      undo/redo ─► replay ─► MessageSink │
//! │                                             └──► flush        │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Structure
//!
//! - [`command`]: `Command`, `CommandOrder`, message classification
//! - [`log`]: `CommandLog` and its bounds-checked scans
//! - [`sequencer`]: recording, undo/redo, replay
//! - [`config`]: `SequencerConfig` and loaders

pub mod command;
pub mod config;
pub mod log;
pub mod sequencer;

pub use command::{Command, CommandOrder};
pub use config::{ConfigError, SequencerConfig};
pub use log::CommandLog;
pub use sequencer::{ControlDelta, HistoryControls, SequencerEvent, UndoRedoSequencer};
