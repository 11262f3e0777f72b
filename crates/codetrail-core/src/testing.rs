#![forbid(unsafe_code)]

//! Test doubles for the collaborator interfaces.
//!
//! Enabled with the `test-helpers` feature.

use std::collections::HashMap;

use crate::dispatch::{MessageSink, NameResolver};
use crate::message::{Id, MessageType, NameHierarchy, NavMessage};
use crate::search::SearchMatch;

/// One thing a [`RecordingSink`] received.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Dispatch(NavMessage),
    Search(Vec<SearchMatch>),
    Flush { keeps_content: bool },
}

/// Sink that records everything sent to it, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Vec<Outbound>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far.
    #[must_use]
    pub fn entries(&self) -> &[Outbound] {
        &self.entries
    }

    /// Dispatched messages only.
    pub fn dispatched(&self) -> impl Iterator<Item = &NavMessage> {
        self.entries.iter().filter_map(|entry| match entry {
            Outbound::Dispatch(message) => Some(message),
            _ => None,
        })
    }

    /// Types of the dispatched messages, in order.
    #[must_use]
    pub fn dispatched_types(&self) -> Vec<MessageType> {
        self.dispatched().map(NavMessage::message_type).collect()
    }

    /// `keeps_content` of every flush, in order.
    #[must_use]
    pub fn flushes(&self) -> Vec<bool> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                Outbound::Flush { keeps_content } => Some(*keeps_content),
                _ => None,
            })
            .collect()
    }

    /// Drain and return everything received so far.
    pub fn take(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.entries)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl MessageSink for RecordingSink {
    fn dispatch(&mut self, message: &NavMessage) {
        self.entries.push(Outbound::Dispatch(message.clone()));
    }

    fn search(&mut self, matches: &[SearchMatch]) {
        self.entries.push(Outbound::Search(matches.to_vec()));
    }

    fn flush_updates(&mut self, keeps_content: bool) {
        self.entries.push(Outbound::Flush { keeps_content });
    }
}

/// Resolver backed by a fixed name table.
///
/// Unknown names are skipped, mirroring an index that no longer contains
/// the symbol.
#[derive(Debug, Default, Clone)]
pub struct StaticResolver {
    table: HashMap<NameHierarchy, Id>,
}

impl StaticResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: NameHierarchy, id: Id) -> Self {
        self.insert(name, id);
        self
    }

    pub fn insert(&mut self, name: NameHierarchy, id: Id) {
        self.table.insert(name, id);
    }

    pub fn remove(&mut self, name: &NameHierarchy) {
        self.table.remove(name);
    }
}

impl NameResolver for StaticResolver {
    fn resolve(&self, names: &[NameHierarchy]) -> Vec<Id> {
        names
            .iter()
            .filter_map(|name| self.table.get(name).copied())
            .collect()
    }
}
