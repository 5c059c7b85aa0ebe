use std::collections::HashMap;
use std::fmt;

use crate::dom::ElementId;
use crate::options::ClickCallback;

/// Events a host can deliver to notifier-owned elements.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Event {
    Click,
    MouseEnter,
    MouseLeave,
    TransitionEnd,
}

impl Event {
    /// Enter and leave fire on the target only; the others bubble.
    #[must_use]
    pub const fn bubbles(self) -> bool {
        matches!(self, Self::Click | Self::TransitionEnd)
    }
}

/// Work a registered listener performs. Each variant names the toast it acts
/// on, which is not always the element it is registered on.
#[derive(Clone)]
pub(super) enum Listener {
    /// Close-button click: removes the toast and stops propagation.
    Close(ElementId),
    CancelAutoClose(ElementId),
    PauseAutoClose(ElementId),
    RestartAutoClose(ElementId),
    FinishRemoval(ElementId),
    Callback(ElementId, ClickCallback),
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Close(el) => f.debug_tuple("Close").field(el).finish(),
            Self::CancelAutoClose(el) => f.debug_tuple("CancelAutoClose").field(el).finish(),
            Self::PauseAutoClose(el) => f.debug_tuple("PauseAutoClose").field(el).finish(),
            Self::RestartAutoClose(el) => f.debug_tuple("RestartAutoClose").field(el).finish(),
            Self::FinishRemoval(el) => f.debug_tuple("FinishRemoval").field(el).finish(),
            Self::Callback(el, _) => f.debug_tuple("Callback").field(el).finish(),
        }
    }
}

/// Listener registry keyed by element and event, preserving registration
/// order per key.
#[derive(Debug, Default)]
pub(super) struct Listeners {
    by_target: HashMap<(ElementId, Event), Vec<Listener>>,
}

impl Listeners {
    pub(super) fn add(&mut self, target: ElementId, event: Event, listener: Listener) {
        self.by_target
            .entry((target, event))
            .or_default()
            .push(listener);
    }

    /// Snapshot of the listeners for `target`, so running them may mutate the
    /// registry.
    pub(super) fn matching(&self, target: ElementId, event: Event) -> Vec<Listener> {
        self.by_target
            .get(&(target, event))
            .cloned()
            .unwrap_or_default()
    }

    pub(super) fn forget(&mut self, target: ElementId) {
        self.by_target.retain(|(el, _), _| *el != target);
    }

    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.by_target.values().map(Vec::len).sum()
    }
}
