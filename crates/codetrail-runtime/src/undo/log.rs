#![forbid(unsafe_code)]

//! Ordered command log with a cursor.
//!
//! The cursor is a position *between* commands, in `0..=len`:
//!
//! ```text
//!   [ A0 | V1 | A2 | V3 ]
//!   0    1    2    3    4
//!             ^ cursor = 2: A0, V1 applied; A2, V3 redo-able
//! ```
//!
//! # Invariants
//!
//! 1. `cursor <= commands.len()` after every operation.
//! 2. Commands left of the cursor are applied, commands right of it are
//!    redo-able history.
//! 3. Backward and forward scans stop at the log boundaries; no scan reads
//!    past either end.

use std::fmt;

use super::command::{Command, CommandOrder};

/// Commands plus the applied/redo-able boundary.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandLog {
    commands: Vec<Command>,
    cursor: usize,
}

impl CommandLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn at_start(&self) -> bool {
        self.cursor == 0
    }

    #[must_use]
    pub fn at_end(&self) -> bool {
        self.cursor == self.commands.len()
    }

    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Command> {
        self.commands.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Command> {
        self.commands.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }

    /// The command just left of the cursor.
    #[must_use]
    pub fn previous(&self) -> Option<&Command> {
        self.cursor.checked_sub(1).and_then(|i| self.commands.get(i))
    }

    pub fn previous_mut(&mut self) -> Option<&mut Command> {
        self.cursor.checked_sub(1).and_then(|i| self.commands.get_mut(i))
    }

    /// Move the cursor, clamped to the log bounds. Returns the new cursor.
    pub fn set_cursor(&mut self, cursor: usize) -> usize {
        self.cursor = cursor.min(self.commands.len());
        self.cursor
    }

    /// Drop everything right of the cursor. Returns the number dropped.
    pub fn truncate_after_cursor(&mut self) -> usize {
        let dropped = self.commands.len() - self.cursor;
        self.commands.truncate(self.cursor);
        dropped
    }

    /// Drop commands right of the cursor up to, not including, the next
    /// activate command. Returns the number dropped.
    pub fn truncate_until_activate(&mut self) -> usize {
        let end = self.commands[self.cursor..]
            .iter()
            .position(Command::is_activate)
            .map_or(self.commands.len(), |offset| self.cursor + offset);
        self.commands.drain(self.cursor..end);
        end - self.cursor
    }

    /// Insert at the cursor; the cursor ends up just after the new command.
    pub fn insert_at_cursor(&mut self, command: Command) {
        self.commands.insert(self.cursor, command);
        self.cursor += 1;
    }

    /// Index of the last non-view command strictly before `before`.
    #[must_use]
    pub fn rfind_non_view(&self, before: usize) -> Option<usize> {
        let end = before.min(self.commands.len());
        self.commands[..end].iter().rposition(|c| !c.is_view())
    }

    /// Index of the last activate command strictly before `before`, or the
    /// log start when there is none.
    ///
    /// At least one step back is taken, so a replay starting here always
    /// covers the command just before `before`.
    #[must_use]
    pub fn activate_start(&self, before: usize) -> usize {
        let end = before.min(self.commands.len());
        self.commands[..end]
            .iter()
            .rposition(Command::is_activate)
            .unwrap_or(0)
    }

    /// Index of the first non-view command at or after `from`, or the log
    /// length when there is none.
    #[must_use]
    pub fn find_non_view(&self, from: usize) -> usize {
        let start = from.min(self.commands.len());
        self.commands[start..]
            .iter()
            .position(|c| !c.is_view())
            .map_or(self.commands.len(), |offset| start + offset)
    }

    /// Rebuild the log with the commands `keep` accepts, cursor at the end.
    pub fn retain_and_reset<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&mut Command) -> bool,
    {
        let before = self.commands.len();
        self.commands.retain_mut(keep);
        self.cursor = self.commands.len();
        before - self.commands.len()
    }

    /// Evict commands until at most `max_depth` remain (0 = unlimited).
    ///
    /// Applied commands go first, one activation group at a time: the head
    /// command and everything up to the next activate command, as long as
    /// that activate command is left of the cursor. Otherwise the tail is
    /// dropped from the end. The log never starts with a view command left
    /// behind by its activation. Returns the number evicted.
    pub fn enforce_depth(&mut self, max_depth: usize) -> usize {
        if max_depth == 0 {
            return 0;
        }
        let mut evicted = 0;
        while self.commands.len() > max_depth {
            match self.next_activate_after_head() {
                Some(group_end) if group_end < self.cursor => {
                    self.commands.drain(..group_end);
                    self.cursor -= group_end;
                    evicted += group_end;
                }
                _ => {
                    self.commands.pop();
                    self.cursor = self.cursor.min(self.commands.len());
                    evicted += 1;
                }
            }
        }
        evicted
    }

    /// Index of the first activate command after the head.
    fn next_activate_after_head(&self) -> Option<usize> {
        self.commands
            .iter()
            .skip(1)
            .position(Command::is_activate)
            .map(|offset| offset + 1)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.cursor = 0;
    }
}

/// Human-readable dump for debugging. Not a stable format.
///
/// Lighter orders are indented further; ` <-` marks the first command right
/// of the cursor, a lone `<-` marks a cursor at the end.
impl fmt::Display for CommandLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Undo Redo Stack:")?;
        writeln!(f, "----------")?;
        for (index, command) in self.commands.iter().enumerate() {
            for _ in 0..command.order.indent() {
                f.write_str("\t")?;
            }
            f.write_str(command.message_type().as_str())?;
            if index == self.cursor {
                f.write_str(" <-")?;
            }
            writeln!(f)?;
        }
        if self.at_end() {
            writeln!(f, "<-")?;
        }
        write!(f, "----------")
    }
}

impl<'a> IntoIterator for &'a CommandLog {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
