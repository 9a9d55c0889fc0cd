#![forbid(unsafe_code)]

//! Command-grouped undo/redo history.
//!
//! [`UndoManager`] keeps two stacks of [`Command`]s plus a *clean mark*: the
//! undo depth at which the document matches what was last saved.
//!
//! ```text
//! end_command(c4)              capacity 3
//! ┌───────────────────────────────────────────────┐
//! │ Undo Stack: [c2, c3, c4]   (c1 evicted)       │
//! │ Redo Stack: []                                │
//! │ Clean mark: unreachable (was depth 0)         │
//! └───────────────────────────────────────────────┘
//!
//! undo() x2
//! ┌───────────────────────────────────────────────┐
//! │ Undo Stack: [c2]                              │
//! │ Redo Stack: [c4, c3]                          │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. `undo_stack.len() <= config.max_commands` after every operation.
//! 2. The redo stack is cleared whenever a persistent command is pushed.
//! 3. `is_dirty()` is true exactly when the undo depth differs from the clean
//!    mark. An evicted or discarded clean mark is unreachable, so the
//!    document stays dirty until the next `mark_clean()`.
//! 4. Commands made only of nonpersistent actions never become entries of
//!    their own; they are folded into the command on top of the undo stack.
//!
//! # Contract violations
//!
//! Nesting `begin_command`, ending or rolling back with no command open,
//! mismatched codes, and recording a persistent action outside a command are
//! caller bugs and panic. `undo`/`redo` with nothing to do return `false`.

use std::collections::VecDeque;
use std::fmt;

use crate::action::UndoableAction;
use crate::command::Command;
use crate::config::UndoConfig;

/// Undo/redo history for one document.
pub struct UndoManager<A> {
    /// Commands available for undo (newest at back).
    undo_stack: VecDeque<Command<A>>,
    /// Commands available for redo (most recently undone at back).
    redo_stack: Vec<Command<A>>,
    /// Undo depth matching the saved document; `None` once unreachable.
    clean_depth: Option<usize>,
    /// Command between `begin_command` and `end_command`.
    in_progress: Option<Command<A>>,
    config: UndoConfig,
}

impl<A> fmt::Debug for UndoManager<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoManager")
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("clean_depth", &self.clean_depth)
            .field(
                "in_progress",
                &self.in_progress.as_ref().map(Command::name),
            )
            .field("config", &self.config)
            .finish()
    }
}

impl<A: UndoableAction> Default for UndoManager<A> {
    fn default() -> Self {
        Self::new(UndoConfig::default())
    }
}

impl<A: UndoableAction> UndoManager<A> {
    /// Create an empty, clean history.
    #[must_use]
    pub fn new(config: UndoConfig) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            clean_depth: Some(0),
            in_progress: None,
            config,
        }
    }

    /// Create a history keeping at most `max_commands` undo entries.
    #[must_use]
    pub fn with_capacity(max_commands: usize) -> Self {
        Self::new(UndoConfig::new(max_commands))
    }

    // ========================================================================
    // Command building
    // ========================================================================

    /// Open a command. `code` must be passed again to [`end_command`].
    ///
    /// # Panics
    ///
    /// If a command is already in progress.
    ///
    /// [`end_command`]: Self::end_command
    pub fn begin_command(&mut self, code: u32, name: impl Into<String>) {
        if let Some(open) = &self.in_progress {
            panic!(
                "command with code {} is already in progress ({:?})",
                open.code(),
                open.name()
            );
        }
        let command = Command::new(code, name);
        tracing::debug!(target: "pen.undo", code, name = command.name(), "begin command");
        self.in_progress = Some(command);
    }

    /// Record an action whose effect has already been applied.
    ///
    /// Inside a command the action joins it. Outside a command only
    /// nonpersistent actions are accepted; they are appended to the command
    /// on top of the undo stack, or dropped if there is none.
    ///
    /// # Panics
    ///
    /// If a persistent action is recorded with no command in progress.
    pub fn record_action(&mut self, action: A) {
        if let Some(command) = self.in_progress.as_mut() {
            command.push(action);
            return;
        }

        assert!(
            action.is_nonpersistent(),
            "cannot record a persistent action outside of a command"
        );

        match self.undo_stack.back_mut() {
            Some(top) => {
                tracing::trace!(
                    target: "pen.undo",
                    command = top.name(),
                    "nonpersistent action joins last command"
                );
                top.push(action);
            }
            None => {
                tracing::trace!(
                    target: "pen.undo",
                    "nonpersistent action dropped: nothing to attach to"
                );
            }
        }
    }

    /// Close the command opened with the same `code`.
    ///
    /// Empty commands vanish. Commands holding only nonpersistent actions are
    /// folded into the previous command. Anything else becomes the newest
    /// undo entry, clearing the redo stack and evicting the oldest entry if
    /// the history is full.
    ///
    /// # Panics
    ///
    /// If no command is in progress or `code` does not match.
    pub fn end_command(&mut self, code: u32) {
        let open_code = match &self.in_progress {
            Some(command) => command.code(),
            None => panic!("end_command({code}) called while no command is in progress"),
        };
        assert!(
            open_code == code,
            "wrong code {code}: command with code {open_code} is in progress"
        );
        let Some(command) = self.in_progress.take() else {
            return;
        };

        if command.is_empty() {
            tracing::debug!(
                target: "pen.undo",
                code,
                name = command.name(),
                "empty command discarded"
            );
            return;
        }

        if command.is_nonpersistent() {
            match self.undo_stack.back_mut() {
                Some(top) => {
                    tracing::trace!(
                        target: "pen.undo",
                        code,
                        into = top.name(),
                        actions = command.len(),
                        "nonpersistent command merged"
                    );
                    top.absorb(command);
                }
                None => {
                    tracing::trace!(target: "pen.undo", code, "nonpersistent command dropped");
                }
            }
            return;
        }

        tracing::debug!(
            target: "pen.undo",
            code,
            name = command.name(),
            actions = command.len(),
            "end command"
        );
        self.push(command);
    }

    /// Abandon the open command, undoing its actions newest first.
    ///
    /// # Panics
    ///
    /// If no command is in progress.
    pub fn rollback(&mut self, target: &mut A::Target) {
        let Some(mut command) = self.in_progress.take() else {
            panic!("rollback called while no command is in progress");
        };
        tracing::debug!(
            target: "pen.undo",
            code = command.code(),
            name = command.name(),
            actions = command.len(),
            "rollback"
        );
        command.undo(target);
    }

    /// Run `f` inside a command.
    ///
    /// The command is ended when `f` returns `Ok` and rolled back when it
    /// returns `Err`; the closure's result is passed through either way.
    pub fn run_command<T, E, F>(
        &mut self,
        code: u32,
        name: impl Into<String>,
        target: &mut A::Target,
        f: F,
    ) -> Result<T, E>
    where
        F: FnOnce(&mut Self, &mut A::Target) -> Result<T, E>,
    {
        self.begin_command(code, name);
        match f(self, target) {
            Ok(value) => {
                self.end_command(code);
                Ok(value)
            }
            Err(err) => {
                self.rollback(target);
                Err(err)
            }
        }
    }

    // ========================================================================
    // Undo / Redo
    // ========================================================================

    /// Undo the newest command. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self, target: &mut A::Target) -> bool {
        if !self.can_undo() {
            return false;
        }
        let Some(mut command) = self.undo_stack.pop_back() else {
            return false;
        };
        tracing::debug!(target: "pen.undo", name = command.name(), actions = command.len(), "undo");
        command.undo(target);
        self.redo_stack.push(command);
        true
    }

    /// Redo the most recently undone command. Returns `false` if there was
    /// nothing to redo.
    pub fn redo(&mut self, target: &mut A::Target) -> bool {
        if !self.can_redo() {
            return false;
        }
        let Some(mut command) = self.redo_stack.pop() else {
            return false;
        };
        tracing::debug!(target: "pen.undo", name = command.name(), actions = command.len(), "redo");
        command.redo(target);
        self.undo_stack.push_back(command);
        self.enforce_limit();
        true
    }

    /// Is an undo possible? Always false while a command is in progress.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.in_progress.is_none() && !self.undo_stack.is_empty()
    }

    /// Is a redo possible? Always false while a command is in progress.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.in_progress.is_none() && !self.redo_stack.is_empty()
    }

    /// Name of the command [`undo`](Self::undo) would revert.
    #[must_use]
    pub fn undo_name(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.undo_stack.back().map(Command::name)
    }

    /// Name of the command [`redo`](Self::redo) would replay.
    #[must_use]
    pub fn redo_name(&self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        self.redo_stack.last().map(Command::name)
    }

    // ========================================================================
    // Dirty tracking
    // ========================================================================

    /// Does the document differ from the last saved (or initial) state?
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.clean_depth != Some(self.undo_stack.len())
    }

    /// Record the current state as saved.
    ///
    /// # Panics
    ///
    /// If a command is in progress.
    pub fn mark_clean(&mut self) {
        assert!(
            self.in_progress.is_none(),
            "cannot mark clean while a command is in progress"
        );
        tracing::debug!(target: "pen.undo", depth = self.undo_stack.len(), "mark clean");
        self.clean_depth = Some(self.undo_stack.len());
    }

    /// Drop all history; the current state becomes the clean state. Used
    /// when a document is created or loaded.
    ///
    /// # Panics
    ///
    /// If a command is in progress.
    pub fn clear(&mut self) {
        if let Some(open) = &self.in_progress {
            panic!("command with code {} is already in progress", open.code());
        }
        tracing::debug!(
            target: "pen.undo",
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "clear history"
        );
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.clean_depth = Some(0);
    }

    // ========================================================================
    // Info
    // ========================================================================

    /// Is a command open?
    #[must_use]
    pub fn command_in_progress(&self) -> bool {
        self.in_progress.is_some()
    }

    /// Name of the open command, if any.
    #[must_use]
    pub fn command_in_progress_name(&self) -> Option<&str> {
        self.in_progress.as_ref().map(Command::name)
    }

    /// Number of commands that can be undone.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of commands that can be redone.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Names of undoable commands, most recent first.
    pub fn undo_names(&self, limit: usize) -> Vec<&str> {
        self.undo_stack
            .iter()
            .rev()
            .take(limit)
            .map(Command::name)
            .collect()
    }

    /// Names of redoable commands, most recent first.
    pub fn redo_names(&self, limit: usize) -> Vec<&str> {
        self.redo_stack
            .iter()
            .rev()
            .take(limit)
            .map(Command::name)
            .collect()
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &UndoConfig {
        &self.config
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    fn push(&mut self, command: Command<A>) {
        // The saved state sits in the redo region and is about to be discarded.
        if self.clean_depth.is_some_and(|depth| depth > self.undo_stack.len()) {
            self.clean_depth = None;
        }
        self.redo_stack.clear();
        self.undo_stack.push_back(command);
        self.enforce_limit();
    }

    /// Evict the oldest commands beyond `max_commands`. Evicted commands stay
    /// applied; they just can no longer be undone.
    fn enforce_limit(&mut self) {
        while self.undo_stack.len() > self.config.max_commands {
            let Some(evicted) = self.undo_stack.pop_front() else {
                break;
            };
            self.clean_depth = self.clean_depth.and_then(|depth| depth.checked_sub(1));
            tracing::debug!(target: "pen.undo", name = evicted.name(), "evicted oldest command");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
