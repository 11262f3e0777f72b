#![forbid(unsafe_code)]

//! Outbound collaborator interfaces.
//!
//! The runtime never talks to the UI or the index directly. It sends
//! messages through a [`MessageSink`] and asks a [`NameResolver`] for fresh
//! token ids when a recorded activation is replayed.

use crate::message::{Id, NameHierarchy, NavMessage};
use crate::search::SearchMatch;

/// Receiver of everything the runtime sends back to the rest of the system.
pub trait MessageSink {
    /// Deliver a navigation message.
    fn dispatch(&mut self, message: &NavMessage);

    /// Run a search with the given matches.
    fn search(&mut self, matches: &[SearchMatch]);

    /// End of a replay pass. `keeps_content` is false if any replayed
    /// message replaced the displayed content.
    fn flush_updates(&mut self, keeps_content: bool);
}

impl<S: MessageSink + ?Sized> MessageSink for &mut S {
    fn dispatch(&mut self, message: &NavMessage) {
        (**self).dispatch(message);
    }

    fn search(&mut self, matches: &[SearchMatch]) {
        (**self).search(matches);
    }

    fn flush_updates(&mut self, keeps_content: bool) {
        (**self).flush_updates(keeps_content);
    }
}

impl<S: MessageSink + ?Sized> MessageSink for Box<S> {
    fn dispatch(&mut self, message: &NavMessage) {
        (**self).dispatch(message);
    }

    fn search(&mut self, matches: &[SearchMatch]) {
        (**self).search(matches);
    }

    fn flush_updates(&mut self, keeps_content: bool) {
        (**self).flush_updates(keeps_content);
    }
}

/// Maps qualified names to the token ids of the current parse.
///
/// Names that no longer exist resolve to nothing; an empty result is a
/// valid answer, not an error.
pub trait NameResolver {
    fn resolve(&self, names: &[NameHierarchy]) -> Vec<Id>;
}

impl<R: NameResolver + ?Sized> NameResolver for &R {
    fn resolve(&self, names: &[NameHierarchy]) -> Vec<Id> {
        (**self).resolve(names)
    }
}

impl<R: NameResolver + ?Sized> NameResolver for Box<R> {
    fn resolve(&self, names: &[NameHierarchy]) -> Vec<Id> {
        (**self).resolve(names)
    }
}
