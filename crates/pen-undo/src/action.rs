#![forbid(unsafe_code)]

//! The atomic unit of change recorded by the [`UndoManager`](crate::UndoManager).
//!
//! An action describes a mutation that has *already been applied* by the
//! caller. It captures enough state to reverse itself ([`undo`]) and to
//! replay itself ([`redo`]) against a target it does not own. The target is
//! handed in by the caller on every undo/redo, so actions stay plain owned
//! values and history never borrows the document it edits.
//!
//! # Invariants
//!
//! - `undo()` after the original mutation restores the prior target state.
//! - `redo()` after `undo()` restores the state produced by the mutation.
//!
//! [`undo`]: UndoableAction::undo
//! [`redo`]: UndoableAction::redo

/// A reversible change applied to some `Target`.
///
/// Implement this on a closed enum when the set of changes is known (one
/// variant per store or per kind of edit). A single history can only hold
/// one action type, so documents made of several stores wrap each store's
/// change type in one enum whose `Target` is the whole document.
pub trait UndoableAction {
    /// What the action mutates when undone or redone.
    type Target: ?Sized;

    /// Revert the change.
    fn undo(&mut self, target: &mut Self::Target);

    /// Re-apply the change after it was undone.
    fn redo(&mut self, target: &mut Self::Target);

    /// Whether the action only touches ephemeral state (selection, current
    /// tab, view) that does not affect whether the document needs saving.
    ///
    /// Nonpersistent actions ride the same undo timeline but never become a
    /// history entry on their own.
    fn is_nonpersistent(&self) -> bool {
        false
    }
}

impl<A: UndoableAction + ?Sized> UndoableAction for Box<A> {
    type Target = A::Target;

    fn undo(&mut self, target: &mut Self::Target) {
        (**self).undo(target);
    }

    fn redo(&mut self, target: &mut Self::Target) {
        (**self).redo(target);
    }

    fn is_nonpersistent(&self) -> bool {
        (**self).is_nonpersistent()
    }
}
