#![forbid(unsafe_code)]

//! Named groups of actions that undo and redo as one unit.

use std::fmt;

use crate::action::UndoableAction;

/// A user-visible undo entry, e.g. "Remove Control".
///
/// Actions are kept in the order they were originally performed. Undo walks
/// them back to front, redo front to back.
pub struct Command<A> {
    code: u32,
    name: String,
    actions: Vec<A>,
}

impl<A> fmt::Debug for Command<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("code", &self.code)
            .field("name", &self.name)
            .field("actions", &self.actions.len())
            .finish()
    }
}

impl<A> Command<A> {
    /// Start an empty command.
    #[must_use]
    pub fn new(code: u32, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
            actions: Vec::new(),
        }
    }

    /// Code passed to `begin_command`; used to pair it with `end_command`.
    #[must_use]
    pub fn code(&self) -> u32 {
        self.code
    }

    /// Display name for menus ("Undo Add Course").
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of recorded actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Recorded actions, oldest first.
    pub fn actions(&self) -> impl Iterator<Item = &A> {
        self.actions.iter()
    }

    pub(crate) fn push(&mut self, action: A) {
        self.actions.push(action);
    }

    /// Append every action of `other` after this command's own.
    pub(crate) fn absorb(&mut self, other: Command<A>) {
        self.actions.extend(other.actions);
    }
}

impl<A: UndoableAction> Command<A> {
    /// A command is nonpersistent when every action in it is. Empty commands
    /// count as nonpersistent.
    #[must_use]
    pub fn is_nonpersistent(&self) -> bool {
        self.actions.iter().all(UndoableAction::is_nonpersistent)
    }

    /// Undo every action, newest first.
    pub fn undo(&mut self, target: &mut A::Target) {
        for action in self.actions.iter_mut().rev() {
            action.undo(target);
        }
    }

    /// Redo every action, oldest first.
    pub fn redo(&mut self, target: &mut A::Target) {
        for action in &mut self.actions {
            action.redo(target);
        }
    }
}
