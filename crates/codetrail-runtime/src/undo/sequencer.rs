#![forbid(unsafe_code)]

//! Undo/redo sequencing of navigation commands.
//!
//! [`UndoRedoSequencer`] records every navigation message as a [`Command`],
//! and rebuilds the displayed state by replaying a minimal, ordered slice of
//! the log when the user steps backward or forward.
//!
//! # Recording
//!
//! ```text
//! message ──► replayed? ──yes──► ignore
//!                │no
//!                ▼
//!        same type as the command left of the cursor?
//!                │yes                       │no
//!                ▼                          ▼
//!        merge in place / drop dup     classify + append
//! ```
//!
//! Appending truncates redo history by order: an activate command drops
//! everything right of the cursor, an adapt command drops up to the next
//! activate command, a view command drops nothing.
//!
//! # Replay
//!
//! Commands between the replay start and the cursor are re-sent in order.
//! Last-only view commands (scrolls, local symbol highlights) are buffered;
//! a later non-view command discards the buffer, and at the end only the
//! most recent buffered command of each type is sent. One flush follows
//! every pass.
//!
//! # Invariants
//!
//! 1. Replayed messages are flagged before dispatch, so a sink that loops
//!    them back into [`UndoRedoSequencer::record`] never grows the log.
//! 2. Every replay pass ends with exactly one `flush_updates` call.
//! 3. The cursor never leaves `0..=len`.

use std::collections::HashSet;
use std::fmt;

use codetrail_core::{MessageSink, NameResolver, NavMessage, NavPayload, SearchCommand, SearchMatch};

use super::command::{Command, CommandOrder};
use super::config::SequencerConfig;
use super::log::CommandLog;

const TARGET: &str = "codetrail.undo";

/// Enabled state of the undo and redo controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryControls {
    pub undo_enabled: bool,
    pub redo_enabled: bool,
}

/// Change to the undo/redo controls produced by one sequencer call.
///
/// `None` leaves the control as it was. Callers apply the delta to their
/// own UI; the sequencer has already folded it into
/// [`UndoRedoSequencer::controls`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[must_use]
pub struct ControlDelta {
    pub undo_enabled: Option<bool>,
    pub redo_enabled: Option<bool>,
}

impl ControlDelta {
    /// No change.
    pub const NONE: Self = Self {
        undo_enabled: None,
        redo_enabled: None,
    };

    /// Both controls disabled.
    pub const DISABLE_ALL: Self = Self {
        undo_enabled: Some(false),
        redo_enabled: Some(false),
    };

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.undo_enabled.is_none() && self.redo_enabled.is_none()
    }

    /// Write the changed controls into `controls`.
    pub fn apply_to(&self, controls: &mut HistoryControls) {
        if let Some(enabled) = self.undo_enabled {
            controls.undo_enabled = enabled;
        }
        if let Some(enabled) = self.redo_enabled {
            controls.redo_enabled = enabled;
        }
    }
}

/// Inbound events handled by the sequencer.
#[derive(Debug, Clone, PartialEq)]
pub enum SequencerEvent {
    /// A navigation message from the UI.
    Navigate(NavMessage),
    /// The user left an edge; preview the last activation without moving.
    DeactivateEdge,
    /// Background parsing finished; token ids are stale.
    FinishedParsing,
    Undo,
    Redo,
    /// Redraw request. Only `ui_only` refreshes are handled here.
    Refresh { ui_only: bool },
}

impl From<NavMessage> for SequencerEvent {
    fn from(message: NavMessage) -> Self {
        Self::Navigate(message)
    }
}

/// What the gateway decided for an incoming message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coalesce {
    /// Previous command has a different type, or there is none.
    NoMatch,
    /// Previous command was updated in place.
    Merged,
    /// Previous command already says the same thing.
    Duplicate,
}

/// Records navigation commands and replays them on undo/redo.
pub struct UndoRedoSequencer<S, R> {
    log: CommandLog,
    sink: S,
    resolver: R,
    config: SequencerConfig,
    controls: HistoryControls,
}

impl<S, R> fmt::Debug for UndoRedoSequencer<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoRedoSequencer")
            .field("len", &self.log.len())
            .field("cursor", &self.log.cursor())
            .field("controls", &self.controls)
            .field("config", &self.config)
            .finish()
    }
}

impl<S: MessageSink, R: NameResolver> UndoRedoSequencer<S, R> {
    /// Create a sequencer with the default configuration.
    #[must_use]
    pub fn new(sink: S, resolver: R) -> Self {
        Self::with_config(sink, resolver, SequencerConfig::default())
    }

    /// Create a sequencer with the given configuration.
    #[must_use]
    pub fn with_config(sink: S, resolver: R, config: SequencerConfig) -> Self {
        Self {
            log: CommandLog::new(),
            sink,
            resolver,
            config,
            controls: HistoryControls::default(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn log(&self) -> &CommandLog {
        &self.log
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.log.cursor()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.log.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Current state of the undo/redo controls.
    #[must_use]
    pub fn controls(&self) -> HistoryControls {
        self.controls
    }

    #[must_use]
    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    #[must_use]
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut R {
        &mut self.resolver
    }

    /// Human-readable listing of the log with the cursor marked.
    #[must_use]
    pub fn dump(&self) -> String {
        self.log.to_string()
    }

    // ========================================================================
    // Inbound events
    // ========================================================================

    /// Route an inbound event to its handler.
    pub fn handle(&mut self, event: SequencerEvent) -> ControlDelta {
        match event {
            SequencerEvent::Navigate(message) => self.record(message),
            SequencerEvent::DeactivateEdge => {
                self.deactivate_edge();
                ControlDelta::NONE
            }
            SequencerEvent::FinishedParsing => self.finished_parsing(),
            SequencerEvent::Undo => self.undo(),
            SequencerEvent::Redo => self.redo(),
            SequencerEvent::Refresh { ui_only } => {
                self.refresh(ui_only);
                ControlDelta::NONE
            }
        }
    }

    /// Record a navigation message: ignore, coalesce, or append.
    pub fn record(&mut self, message: NavMessage) -> ControlDelta {
        let message_type = message.message_type();

        if message.is_replayed() {
            tracing::trace!(target: TARGET, message_type = %message_type, "replayed message ignored");
            return ControlDelta::NONE;
        }

        match self.coalesce(&message) {
            Coalesce::Merged => {
                tracing::debug!(
                    target: TARGET,
                    message_type = %message_type,
                    cursor = self.log.cursor(),
                    "message merged into previous command"
                );
                self.trace_dump();
                ControlDelta::NONE
            }
            Coalesce::Duplicate => {
                tracing::debug!(
                    target: TARGET,
                    message_type = %message_type,
                    "duplicate message dropped"
                );
                ControlDelta::NONE
            }
            Coalesce::NoMatch => self.append(Command::classify(message)),
        }
    }

    /// Preview the nearest activation before the cursor without moving it.
    ///
    /// Falls back to the first command when no activation precedes the
    /// cursor. Does nothing on an empty history or with the cursor at start.
    pub fn deactivate_edge(&mut self) {
        if self.log.at_start() {
            return;
        }

        let index = self.log.activate_start(self.log.cursor());
        let Some(command) = self.log.get_mut(index) else {
            return;
        };

        let keep_content = command.message.keeps_content();
        command.message.set_replayed(false);
        command.message.set_keep_content(true);

        tracing::debug!(
            target: TARGET,
            index,
            message_type = %command.message.message_type(),
            "edge deactivated, previewing activation"
        );
        self.sink.dispatch(&command.message);

        command.message.set_keep_content(keep_content);
    }

    /// Collapse history after a re-parse.
    ///
    /// Only activate commands survive, minus aggregation activations whose
    /// targets no longer exist. Survivors are flagged replay-cleared and
    /// the cursor moves to the end.
    pub fn finished_parsing(&mut self) -> ControlDelta {
        let dropped = self.log.retain_and_reset(|command| {
            if !command.is_activate() {
                return false;
            }
            if let Some(tokens) = command.message.as_activate_tokens_mut() {
                if tokens.is_aggregation {
                    return false;
                }
                tokens.is_from_search = false;
            }
            command.message.set_replay_cleared(true);
            true
        });

        tracing::debug!(
            target: TARGET,
            dropped,
            len = self.log.len(),
            "history rewritten after parsing"
        );

        self.apply(ControlDelta {
            undo_enabled: Some(self.undo_available()),
            redo_enabled: Some(false),
        })
    }

    /// Step back to before the last non-view command and replay.
    ///
    /// The first non-view command of the log is never undone: with nothing
    /// before it the display would be empty.
    pub fn undo(&mut self) -> ControlDelta {
        if self.log.is_empty() {
            return ControlDelta::NONE;
        }

        let target = match self.log.rfind_non_view(self.log.cursor()) {
            Some(target) if target > 0 => target,
            _ => {
                tracing::debug!(
                    target: TARGET,
                    cursor = self.log.cursor(),
                    "undo at first command"
                );
                return self.apply(ControlDelta {
                    undo_enabled: Some(false),
                    redo_enabled: None,
                });
            }
        };

        let further = self.log.rfind_non_view(target).is_some_and(|index| index > 0);
        let delta = ControlDelta {
            undo_enabled: (!further).then_some(false),
            redo_enabled: Some(true),
        };

        tracing::debug!(
            target: TARGET,
            from = self.log.cursor(),
            to = target,
            "undo"
        );
        self.log.set_cursor(target);
        self.replay(None);

        self.apply(delta)
    }

    /// Step forward past the next command and any view commands after it.
    pub fn redo(&mut self) -> ControlDelta {
        if self.log.at_end() {
            return ControlDelta::NONE;
        }

        let from = self.log.cursor();
        let to = self.log.set_cursor(self.log.find_non_view(from + 1));

        tracing::debug!(target: TARGET, from, to, "redo");

        let delta = ControlDelta {
            undo_enabled: Some(true),
            redo_enabled: self.log.at_end().then_some(false),
        };
        self.replay(Some(from));

        self.apply(delta)
    }

    /// Redraw the current state.
    ///
    /// With nothing applied, the overview search is issued instead of a
    /// replay. Refreshes that are not UI-only belong to other components.
    pub fn refresh(&mut self, ui_only: bool) {
        if !ui_only {
            return;
        }

        if self.log.at_start() {
            tracing::debug!(target: TARGET, "refresh with empty history, searching all");
            self.sink.search(&[SearchMatch::command(SearchCommand::All)]);
        } else {
            self.replay(None);
        }
    }

    /// Forget all history, e.g. when the project is closed or reloaded.
    pub fn clear(&mut self) -> ControlDelta {
        self.log.clear();
        tracing::debug!(target: TARGET, "history cleared");
        self.apply(ControlDelta::DISABLE_ALL)
    }

    // ========================================================================
    // Recording internals
    // ========================================================================

    /// Merge `incoming` into the command left of the cursor if they share
    /// a type and the type supports it.
    fn coalesce(&mut self, incoming: &NavMessage) -> Coalesce {
        let Some(previous) = self.log.previous_mut() else {
            return Coalesce::NoMatch;
        };
        if previous.message_type() != incoming.message_type() {
            return Coalesce::NoMatch;
        }

        match (&mut previous.message.payload, &incoming.payload) {
            (NavPayload::ActivateAll, NavPayload::ActivateAll) => Coalesce::Duplicate,
            (
                NavPayload::ActivateLocalSymbols { symbol_ids: prev },
                NavPayload::ActivateLocalSymbols { symbol_ids },
            ) => {
                prev.clone_from(symbol_ids);
                Coalesce::Merged
            }
            (NavPayload::ScrollCode { value: prev }, NavPayload::ScrollCode { value }) => {
                *prev = *value;
                Coalesce::Merged
            }
            (NavPayload::ScrollGraph { x: px, y: py }, NavPayload::ScrollGraph { x, y }) => {
                *px = *x;
                *py = *y;
                Coalesce::Merged
            }
            (NavPayload::ActivateTokens(prev), NavPayload::ActivateTokens(next))
                if prev.token_ids == next.token_ids =>
            {
                Coalesce::Duplicate
            }
            (
                NavPayload::SearchFullText {
                    search_term: prev_term,
                    case_sensitive: prev_case,
                },
                NavPayload::SearchFullText {
                    search_term,
                    case_sensitive,
                },
            ) if *prev_term == *search_term && *prev_case == *case_sensitive => Coalesce::Duplicate,
            (NavPayload::ShowErrors { error_id: prev }, NavPayload::ShowErrors { error_id })
                if *prev == *error_id =>
            {
                Coalesce::Duplicate
            }
            (
                NavPayload::ShowReference { ref_index: prev, .. },
                NavPayload::ShowReference { ref_index, .. },
            ) if *prev == *ref_index => Coalesce::Duplicate,
            _ => Coalesce::NoMatch,
        }
    }

    /// Insert a classified command at the cursor, truncating redo history
    /// according to its order.
    fn append(&mut self, mut command: Command) -> ControlDelta {
        if !command.is_activate() && self.log.at_start() {
            tracing::debug!(
                target: TARGET,
                message_type = %command.message_type(),
                order = %command.order,
                "nothing to refine yet, command discarded"
            );
            return ControlDelta::NONE;
        }

        if command.is_activate() && command.message.keeps_content() {
            command.order = CommandOrder::Adapt;
        }

        let dropped = match command.order {
            CommandOrder::Activate => self.log.truncate_after_cursor(),
            CommandOrder::Adapt => self.log.truncate_until_activate(),
            CommandOrder::View => 0,
        };

        let order = command.order;
        let message_type = command.message_type();
        self.log.insert_at_cursor(command);

        let mut delta = ControlDelta::NONE;
        if order != CommandOrder::View {
            if self.log.cursor() > 1 {
                delta.undo_enabled = Some(true);
            }
            if self.log.at_end() {
                delta.redo_enabled = Some(false);
            }
        }

        let evicted = self.log.enforce_depth(self.config.max_depth);
        if evicted > 0 {
            delta.undo_enabled = Some(self.undo_available());
            delta.redo_enabled = Some(!self.log.at_end());
        }

        tracing::debug!(
            target: TARGET,
            message_type = %message_type,
            order = %order,
            dropped,
            evicted,
            cursor = self.log.cursor(),
            len = self.log.len(),
            "command appended"
        );

        self.apply(delta)
    }

    /// Whether [`undo`](Self::undo) would move the cursor.
    fn undo_available(&self) -> bool {
        self.log
            .rfind_non_view(self.log.cursor())
            .is_some_and(|index| index > 0)
    }

    fn apply(&mut self, delta: ControlDelta) -> ControlDelta {
        delta.apply_to(&mut self.controls);
        self.trace_dump();
        delta
    }

    fn trace_dump(&self) {
        if self.config.trace_dump {
            tracing::trace!(target: TARGET, dump = %self.log, "history");
        }
    }

    // ========================================================================
    // Replay
    // ========================================================================

    /// Re-send commands from `start` up to the cursor, then flush.
    ///
    /// Without an explicit start, replay begins at the nearest activate
    /// command before the cursor (or the log start).
    fn replay(&mut self, start: Option<usize>) {
        let end = self.log.cursor();
        let start = start
            .unwrap_or_else(|| self.log.activate_start(end))
            .min(end);

        let _span = tracing::debug_span!(target: TARGET, "undo.replay", start, end).entered();

        let mut buffered: Vec<usize> = Vec::new();
        let mut keeps_content = true;

        for index in start..end {
            let Some(command) = self.log.get(index) else {
                break;
            };

            if command.replays_immediately() {
                let is_view = command.is_view();
                keeps_content &= self.replay_command(index);
                if !is_view {
                    // Views before a content change no longer apply to it.
                    buffered.clear();
                }
            } else {
                buffered.push(index);
            }
        }

        let mut seen = HashSet::new();
        let latest: Vec<usize> = buffered
            .iter()
            .rev()
            .copied()
            .filter(|&index| {
                self.log
                    .get(index)
                    .is_some_and(|command| seen.insert(command.message_type()))
            })
            .collect();

        for index in latest.into_iter().rev() {
            keeps_content &= self.replay_command(index);
        }

        tracing::debug!(target: TARGET, start, end, keeps_content, "replay flushed");
        self.sink.flush_updates(keeps_content);
    }

    /// Re-send one command. Returns whether its message keeps content.
    fn replay_command(&mut self, index: usize) -> bool {
        let is_last = index + 1 == self.log.cursor();
        let Some(command) = self.log.get_mut(index) else {
            return true;
        };

        let message = &mut command.message;
        message.set_replayed(true);
        message.set_last(is_last);

        // Ids are only valid for one parse; names survive re-indexing.
        if let Some(tokens) = message.as_activate_tokens_mut() {
            if !tokens.is_edge && !tokens.is_aggregation {
                tokens.token_ids = self.resolver.resolve(&tokens.token_names);
                tokens.search_matches.clear();
            }
        }

        tracing::trace!(
            target: TARGET,
            index,
            message_type = %message.message_type(),
            is_last,
            "replay command"
        );
        self.sink.dispatch(message);
        message.set_replay_cleared(false);

        message.keeps_content()
    }
}
