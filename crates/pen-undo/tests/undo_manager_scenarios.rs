#![forbid(unsafe_code)]

//! Scripted begin/record/end/undo/redo/rollback sequences.
//!
//! Every action writes a line to a shared log when executed, undone and
//! redone, so each scenario can assert the exact replay order alongside the
//! manager's queries.

use pen_undo::{UndoManager, UndoableAction};

// ============================================================================
// Logging action
// ============================================================================

#[derive(Debug)]
struct LoggedAction {
    name: &'static str,
    nonpersistent: bool,
}

impl UndoableAction for LoggedAction {
    type Target = Vec<String>;

    fn undo(&mut self, log: &mut Vec<String>) {
        if self.nonpersistent {
            log.push(format!("Undoing   non-persistent action '{}'", self.name));
        } else {
            log.push(format!("Undoing   action '{}'", self.name));
        }
    }

    fn redo(&mut self, log: &mut Vec<String>) {
        if self.nonpersistent {
            log.push(format!("Redoing   non-persistent action '{}'", self.name));
        } else {
            log.push(format!("Redoing   action '{}'", self.name));
        }
    }

    fn is_nonpersistent(&self) -> bool {
        self.nonpersistent
    }
}

/// Executes an action (logging it) and records it with the manager.
struct Script {
    mgr: UndoManager<LoggedAction>,
    log: Vec<String>,
}

impl Script {
    fn new(capacity: usize) -> Self {
        Self {
            mgr: UndoManager::with_capacity(capacity),
            log: Vec::new(),
        }
    }

    fn act(&mut self, name: &'static str) {
        self.log.push(format!("Executing action '{name}'"));
        self.mgr.record_action(LoggedAction {
            name,
            nonpersistent: false,
        });
    }

    fn act_nonpersistent(&mut self, name: &'static str) {
        self.log
            .push(format!("Executing non-persistent action '{name}'"));
        self.mgr.record_action(LoggedAction {
            name,
            nonpersistent: true,
        });
    }

    fn command(&mut self, code: u32, name: &str, actions: &[&'static str]) {
        self.mgr.begin_command(code, name);
        for a in actions {
            self.act(a);
        }
        self.mgr.end_command(code);
    }

    fn undo(&mut self) {
        self.log.push("Undo".into());
        assert!(self.mgr.undo(&mut self.log), "undo should have applied");
    }

    fn redo(&mut self) {
        self.log.push("Redo".into());
        assert!(self.mgr.redo(&mut self.log), "redo should have applied");
    }

    fn rollback(&mut self) {
        self.log.push("Rollback".into());
        self.mgr.rollback(&mut self.log);
    }

    /// (dirty, can_undo, undo_name, can_redo, redo_name)
    fn state(&self) -> (bool, bool, Option<&str>, bool, Option<&str>) {
        (
            self.mgr.is_dirty(),
            self.mgr.can_undo(),
            self.mgr.undo_name(),
            self.mgr.can_redo(),
            self.mgr.redo_name(),
        )
    }

    fn assert_log(&self, expected: &[&str]) {
        assert_eq!(self.log, expected);
    }
}

// ============================================================================
// Basic undo
// ============================================================================

#[test]
fn initial_state() {
    let s = Script::new(5);
    assert_eq!(s.state(), (false, false, None, false, None));
    assert!(!s.mgr.command_in_progress());
}

#[test]
fn clear_after_edits() {
    let mut s = Script::new(5);
    s.command(123, "command1", &["action1", "action2"]);
    s.command(124, "command2", &["action3"]);
    s.undo();
    s.mgr.clear();

    assert_eq!(s.state(), (false, false, None, false, None));
    assert!(!s.mgr.command_in_progress());
}

#[test]
fn undo_persistent_commands() {
    let mut s = Script::new(5);

    s.command(23, "My first command", &["action1"]);
    assert_eq!(
        s.state(),
        (true, true, Some("My first command"), false, None)
    );

    s.undo();
    assert_eq!(
        s.state(),
        (false, false, None, true, Some("My first command"))
    );

    s.command(27, "My second command", &["action2", "action3"]);
    s.command(28, "My third command", &["action4", "action5", "action6"]);
    assert_eq!(
        s.state(),
        (true, true, Some("My third command"), false, None)
    );

    s.undo();
    assert_eq!(
        s.state(),
        (
            true,
            true,
            Some("My second command"),
            true,
            Some("My third command")
        )
    );

    s.undo();
    assert_eq!(
        s.state(),
        (false, false, None, true, Some("My second command"))
    );

    s.assert_log(&[
        "Executing action 'action1'",
        "Undo",
        "Undoing   action 'action1'",
        "Executing action 'action2'",
        "Executing action 'action3'",
        "Executing action 'action4'",
        "Executing action 'action5'",
        "Executing action 'action6'",
        "Undo",
        "Undoing   action 'action6'",
        "Undoing   action 'action5'",
        "Undoing   action 'action4'",
        "Undo",
        "Undoing   action 'action3'",
        "Undoing   action 'action2'",
    ]);
}

// ============================================================================
// Redo
// ============================================================================

#[test]
fn redo_persistent_commands() {
    let mut s = Script::new(5);
    s.command(23, "My first command", &["action1"]);
    s.command(27, "My second command", &["action2", "action3"]);
    s.command(28, "My third command", &["action4", "action5", "action6"]);

    s.undo();
    s.undo();
    assert_eq!(
        s.state(),
        (
            true,
            true,
            Some("My first command"),
            true,
            Some("My second command")
        )
    );

    s.redo();
    assert_eq!(
        s.state(),
        (
            true,
            true,
            Some("My second command"),
            true,
            Some("My third command")
        )
    );

    s.redo();
    assert_eq!(
        s.state(),
        (true, true, Some("My third command"), false, None)
    );

    s.undo();
    s.command(28, "My fourth command", &["action7"]);
    assert_eq!(
        s.state(),
        (true, true, Some("My fourth command"), false, None)
    );

    s.undo();
    assert_eq!(
        s.state(),
        (
            true,
            true,
            Some("My second command"),
            true,
            Some("My fourth command")
        )
    );

    s.redo();
    assert_eq!(
        s.state(),
        (true, true, Some("My fourth command"), false, None)
    );

    s.assert_log(&[
        "Executing action 'action1'",
        "Executing action 'action2'",
        "Executing action 'action3'",
        "Executing action 'action4'",
        "Executing action 'action5'",
        "Executing action 'action6'",
        "Undo",
        "Undoing   action 'action6'",
        "Undoing   action 'action5'",
        "Undoing   action 'action4'",
        "Undo",
        "Undoing   action 'action3'",
        "Undoing   action 'action2'",
        "Redo",
        "Redoing   action 'action2'",
        "Redoing   action 'action3'",
        "Redo",
        "Redoing   action 'action4'",
        "Redoing   action 'action5'",
        "Redoing   action 'action6'",
        "Undo",
        "Undoing   action 'action6'",
        "Undoing   action 'action5'",
        "Undoing   action 'action4'",
        "Executing action 'action7'",
        "Undo",
        "Undoing   action 'action7'",
        "Redo",
        "Redoing   action 'action7'",
    ]);
}

// ============================================================================
// Rollback
// ============================================================================

#[test]
fn rollback_open_commands() {
    let mut s = Script::new(5);

    s.mgr.begin_command(23, "My first command");
    s.act("action1");
    assert!(!s.mgr.can_undo());
    assert!(!s.mgr.can_redo());
    assert!(s.mgr.command_in_progress());
    assert_eq!(s.mgr.command_in_progress_name(), Some("My first command"));

    s.rollback();
    assert_eq!(s.state(), (false, false, None, false, None));
    assert!(!s.mgr.command_in_progress());

    s.command(27, "My second command", &["action2", "action3"]);
    s.command(28, "My third command", &["action4", "action5", "action6"]);
    s.undo();

    s.mgr.begin_command(29, "My fourth command");
    s.act("action7");
    s.act("action8");
    s.rollback();

    assert_eq!(
        s.state(),
        (
            true,
            true,
            Some("My second command"),
            true,
            Some("My third command")
        )
    );

    s.undo();
    assert_eq!(
        s.state(),
        (false, false, None, true, Some("My second command"))
    );

    s.redo();
    s.redo();
    assert_eq!(
        s.state(),
        (true, true, Some("My third command"), false, None)
    );

    s.assert_log(&[
        "Executing action 'action1'",
        "Rollback",
        "Undoing   action 'action1'",
        "Executing action 'action2'",
        "Executing action 'action3'",
        "Executing action 'action4'",
        "Executing action 'action5'",
        "Executing action 'action6'",
        "Undo",
        "Undoing   action 'action6'",
        "Undoing   action 'action5'",
        "Undoing   action 'action4'",
        "Executing action 'action7'",
        "Executing action 'action8'",
        "Rollback",
        "Undoing   action 'action8'",
        "Undoing   action 'action7'",
        "Undo",
        "Undoing   action 'action3'",
        "Undoing   action 'action2'",
        "Redo",
        "Redoing   action 'action2'",
        "Redoing   action 'action3'",
        "Redo",
        "Redoing   action 'action4'",
        "Redoing   action 'action5'",
        "Redoing   action 'action6'",
    ]);
}

// ============================================================================
// Clean mark
// ============================================================================

#[test]
fn mark_clean_tracks_saved_depth() {
    let mut s = Script::new(5);
    assert!(!s.mgr.is_dirty());

    s.command(99, "command #1", &["action1", "action2"]);
    s.command(98, "command #2", &["action3", "action4"]);
    assert!(s.mgr.is_dirty());
    assert!(s.mgr.can_undo());
    assert!(!s.mgr.can_redo());

    s.mgr.mark_clean();
    assert!(!s.mgr.is_dirty());
    assert!(s.mgr.can_undo());

    s.command(97, "command #3", &["action5", "action6"]);
    assert!(s.mgr.is_dirty());

    s.undo();
    assert!(!s.mgr.is_dirty());
    assert!(s.mgr.can_undo());
    assert!(s.mgr.can_redo());

    s.undo();
    assert!(s.mgr.is_dirty());
    s.undo();
    assert!(s.mgr.is_dirty());
    assert!(!s.mgr.can_undo());

    s.redo();
    assert!(s.mgr.is_dirty());
    s.redo();
    assert!(!s.mgr.is_dirty());

    s.undo();
    assert!(s.mgr.is_dirty());

    s.mgr.mark_clean();
    assert!(!s.mgr.is_dirty());

    s.redo();
    assert!(s.mgr.is_dirty());
    s.redo();
    assert!(s.mgr.is_dirty());
}

// ============================================================================
// Empty commands and capacity
// ============================================================================

#[test]
fn empty_commands_are_elided() {
    let mut s = Script::new(5);

    s.command(123, "command1", &[]);
    assert_eq!(s.state(), (false, false, None, false, None));
    assert!(!s.mgr.command_in_progress());

    s.command(124, "command2", &["action3", "action4"]);
    s.command(125, "command3", &["action5", "action6"]);
    s.undo();
    let before = (
        true,
        true,
        Some("command2"),
        true,
        Some("command3"),
    );
    assert_eq!(s.state(), before);

    s.command(126, "command4", &[]);
    assert_eq!(s.state(), before);
    assert!(!s.mgr.command_in_progress());
}

#[test]
fn full_queue_drops_oldest_command() {
    let mut s = Script::new(3);
    s.command(124, "command1", &["action1", "action2"]);
    s.command(125, "command2", &["action3", "action4"]);
    s.command(126, "command3", &["action5", "action6"]);
    s.command(127, "command4", &["action7", "action8"]);

    s.undo();
    s.undo();
    s.undo();

    assert!(s.mgr.is_dirty());
    assert!(!s.mgr.can_undo());
    assert!(s.mgr.can_redo());
    assert_eq!(s.mgr.redo_name(), Some("command2"));

    // The fourth undo finds nothing: command1 is no longer in history.
    assert!(!s.mgr.undo(&mut s.log));

    s.redo();
    s.redo();
    s.redo();

    assert_eq!(s.mgr.undo_name(), Some("command4"));
    assert!(s.mgr.is_dirty());
    assert!(s.mgr.can_undo());
    assert!(!s.mgr.can_redo());

    s.assert_log(&[
        "Executing action 'action1'",
        "Executing action 'action2'",
        "Executing action 'action3'",
        "Executing action 'action4'",
        "Executing action 'action5'",
        "Executing action 'action6'",
        "Executing action 'action7'",
        "Executing action 'action8'",
        "Undo",
        "Undoing   action 'action8'",
        "Undoing   action 'action7'",
        "Undo",
        "Undoing   action 'action6'",
        "Undoing   action 'action5'",
        "Undo",
        "Undoing   action 'action4'",
        "Undoing   action 'action3'",
        "Redo",
        "Redoing   action 'action3'",
        "Redoing   action 'action4'",
        "Redo",
        "Redoing   action 'action5'",
        "Redoing   action 'action6'",
        "Redo",
        "Redoing   action 'action7'",
        "Redoing   action 'action8'",
    ]);
}

// ============================================================================
// Nonpersistent actions
// ============================================================================

#[test]
fn nonpersistent_only_keeps_initial_state() {
    let mut s = Script::new(5);

    s.act_nonpersistent("foo");
    assert_eq!(s.state(), (false, false, None, false, None));
    assert!(!s.mgr.command_in_progress());

    s.mgr.begin_command(17, "My command");
    s.act_nonpersistent("foo");
    s.act_nonpersistent("bar");
    assert!(!s.mgr.is_dirty());
    assert!(!s.mgr.can_undo());
    assert!(!s.mgr.can_redo());
    assert!(s.mgr.command_in_progress());
    s.mgr.end_command(17);

    assert_eq!(s.state(), (false, false, None, false, None));
    assert!(!s.mgr.command_in_progress());

    s.assert_log(&[
        "Executing non-persistent action 'foo'",
        "Executing non-persistent action 'foo'",
        "Executing non-persistent action 'bar'",
    ]);
}

#[test]
fn nonpersistent_actions_ride_with_commands() {
    let mut s = Script::new(5);

    s.mgr.begin_command(17, "Command1");
    s.act_nonpersistent("action1");
    s.act("action2");
    s.act_nonpersistent("action3");
    s.mgr.end_command(17);
    s.act_nonpersistent("action4");
    s.act_nonpersistent("action5");

    s.undo();
    s.redo();
    s.undo();
    s.redo();

    s.act_nonpersistent("action6");

    s.mgr.begin_command(18, "Command2");
    s.act_nonpersistent("action7");
    s.act("action8");
    s.act_nonpersistent("action9");
    s.mgr.end_command(18);

    s.undo();
    s.redo();

    let round = [
        "Undo",
        "Undoing   non-persistent action 'action5'",
        "Undoing   non-persistent action 'action4'",
        "Undoing   non-persistent action 'action3'",
        "Undoing   action 'action2'",
        "Undoing   non-persistent action 'action1'",
        "Redo",
        "Redoing   non-persistent action 'action1'",
        "Redoing   action 'action2'",
        "Redoing   non-persistent action 'action3'",
        "Redoing   non-persistent action 'action4'",
        "Redoing   non-persistent action 'action5'",
    ];

    let mut expected = vec![
        "Executing non-persistent action 'action1'",
        "Executing action 'action2'",
        "Executing non-persistent action 'action3'",
        "Executing non-persistent action 'action4'",
        "Executing non-persistent action 'action5'",
    ];
    expected.extend(round);
    expected.extend(round);
    expected.extend([
        "Executing non-persistent action 'action6'",
        "Executing non-persistent action 'action7'",
        "Executing action 'action8'",
        "Executing non-persistent action 'action9'",
        "Undo",
        "Undoing   non-persistent action 'action9'",
        "Undoing   action 'action8'",
        "Undoing   non-persistent action 'action7'",
        "Redo",
        "Redoing   non-persistent action 'action7'",
        "Redoing   action 'action8'",
        "Redoing   non-persistent action 'action9'",
    ]);
    s.assert_log(&expected);
}

#[test]
fn mixed_command_counts_as_persistent() {
    let mut s = Script::new(5);
    s.mgr.begin_command(1, "Mixed");
    s.act_nonpersistent("select");
    s.act("edit");
    s.mgr.end_command(1);

    assert_eq!(s.state(), (true, true, Some("Mixed"), false, None));
    s.undo();
    assert!(!s.mgr.is_dirty());
}
