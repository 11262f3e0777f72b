#![forbid(unsafe_code)]

//! Codetrail Runtime
//!
//! This crate records the navigation history of a code-comprehension
//! session and replays it on undo/redo.
//!
//! # Key Components
//!
//! - [`UndoRedoSequencer`] - Records navigation messages and replays them
//! - [`CommandLog`] - Ordered commands with an applied/redo-able cursor
//! - [`Command`] / [`CommandOrder`] - A logged message and its semantic weight
//! - [`SequencerConfig`] - History depth and diagnostics settings
//!
//! # How it fits in the system
//! The UI sends every navigation message to the sequencer. The sequencer
//! talks back only through the [`codetrail_core::MessageSink`] and
//! [`codetrail_core::NameResolver`] it was built with, and reports the state
//! of the undo/redo controls as a [`ControlDelta`] instead of touching UI
//! objects.

pub mod undo;

pub use undo::{
    Command, CommandLog, CommandOrder, ConfigError, ControlDelta, HistoryControls,
    SequencerConfig, SequencerEvent, UndoRedoSequencer,
};
