#![forbid(unsafe_code)]

//! Undo/redo history for document editing.
//!
//! Every edit to a document is an [`UndoableAction`] recorded between
//! [`UndoManager::begin_command`] and [`UndoManager::end_command`]. The
//! actions recorded in between form one [`Command`]: a single entry in the
//! undo menu, undone and redone as a unit.
//!
//! ```text
//! begin_command(7, "Delete Control")
//!     store.remove(..)      -> record_action(Removed { .. })
//!     store.replace(..)     -> record_action(Replaced { .. })
//! end_command(7)            -> undo stack: [.., "Delete Control"]
//! ```
//!
//! The manager also answers whether the document needs saving:
//! [`UndoManager::mark_clean`] after a save, [`UndoManager::is_dirty`] for
//! the title bar. Actions flagged nonpersistent (selection, view state) ride
//! the timeline without dirtying the document.
//!
//! # Quick Start
//!
//! ```
//! use pen_undo::{UndoManager, UndoableAction};
//!
//! struct SetValue { before: i32, after: i32 }
//!
//! impl UndoableAction for SetValue {
//!     type Target = i32;
//!     fn undo(&mut self, value: &mut i32) { *value = self.before; }
//!     fn redo(&mut self, value: &mut i32) { *value = self.after; }
//! }
//!
//! let mut value = 1;
//! let mut undo = UndoManager::with_capacity(10);
//!
//! undo.begin_command(1, "Set value");
//! value = 5;
//! undo.record_action(SetValue { before: 1, after: 5 });
//! undo.end_command(1);
//!
//! assert!(undo.is_dirty());
//! undo.undo(&mut value);
//! assert_eq!(value, 1);
//! assert!(!undo.is_dirty());
//! ```

pub mod action;
pub mod command;
pub mod config;
pub mod history;

pub use action::UndoableAction;
pub use command::Command;
pub use config::{ConfigError, DEFAULT_MAX_COMMANDS, UndoConfig};
pub use history::UndoManager;
