#![forbid(unsafe_code)]

//! Undo records for object store mutations.
//!
//! Every `add`, `remove` and `replace` on an [`ObjectStore`] produces one
//! [`StoreChange`] describing the entry before and after. Reverting and
//! reapplying a change reinstates the exact value under the same id.
//!
//! A document with several stores wraps the per-type changes in its own
//! action enum and dispatches to [`StoreChange::revert`] and
//! [`StoreChange::reapply`] with the matching store:
//!
//! ```
//! use pen_store::{ObjectStore, PersistError, Storable, StoreChange, XmlElement};
//! use pen_undo::{UndoManager, UndoableAction};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Course(String);
//!
//! impl Storable for Course {
//!     fn element_name() -> &'static str { "course" }
//!     fn read(el: &XmlElement) -> Result<Self, PersistError> {
//!         Ok(Self(el.text().to_owned()))
//!     }
//!     fn write(&self, el: &mut XmlElement) { el.set_text(&self.0) }
//! }
//!
//! #[derive(Default)]
//! struct Event {
//!     courses: ObjectStore<Course>,
//! }
//!
//! enum EventChange {
//!     Course(StoreChange<Course>),
//! }
//!
//! impl From<StoreChange<Course>> for EventChange {
//!     fn from(change: StoreChange<Course>) -> Self { Self::Course(change) }
//! }
//!
//! impl UndoableAction for EventChange {
//!     type Target = Event;
//!     fn undo(&mut self, event: &mut Event) {
//!         match self { Self::Course(c) => c.revert(&mut event.courses) }
//!     }
//!     fn redo(&mut self, event: &mut Event) {
//!         match self { Self::Course(c) => c.reapply(&mut event.courses) }
//!     }
//! }
//!
//! let mut event = Event::default();
//! let mut undo = UndoManager::<EventChange>::with_capacity(10);
//!
//! undo.begin_command(1, "Add course");
//! let id = event.courses.add(&mut undo, Course("Blue".into()));
//! undo.end_command(1);
//!
//! assert!(undo.undo(&mut event));
//! assert!(!event.courses.is_present(id));
//! assert!(undo.redo(&mut event));
//! assert_eq!(event.courses.get(id).unwrap(), &Course("Blue".into()));
//! ```

use std::fmt;

use pen_undo::UndoableAction;

use crate::id::Id;
use crate::store::ObjectStore;

/// One mutation of an [`ObjectStore<T>`].
#[derive(Clone, PartialEq)]
pub enum StoreChange<T> {
    /// `value` was inserted under `id`.
    Added { id: Id<T>, value: T },
    /// `value` was removed from under `id`.
    Removed { id: Id<T>, value: T },
    /// The value under `id` changed from `before` to `after`.
    Replaced { id: Id<T>, before: T, after: T },
}

impl<T> StoreChange<T> {
    /// Id of the affected entry.
    #[must_use]
    pub fn id(&self) -> Id<T> {
        match self {
            Self::Added { id, .. } | Self::Removed { id, .. } | Self::Replaced { id, .. } => *id,
        }
    }

    /// Value under the id before the change (`None` for an insert).
    #[must_use]
    pub fn before(&self) -> Option<&T> {
        match self {
            Self::Added { .. } => None,
            Self::Removed { value, .. } => Some(value),
            Self::Replaced { before, .. } => Some(before),
        }
    }

    /// Value under the id after the change (`None` for a removal).
    #[must_use]
    pub fn after(&self) -> Option<&T> {
        match self {
            Self::Added { value, .. } => Some(value),
            Self::Removed { .. } => None,
            Self::Replaced { after, .. } => Some(after),
        }
    }
}

impl<T: Clone> StoreChange<T> {
    /// Put `store` back into the state before this change.
    pub fn revert(&self, store: &mut ObjectStore<T>) {
        store.restore(self.id(), self.before().cloned());
    }

    /// Apply this change to `store` again.
    pub fn reapply(&self, store: &mut ObjectStore<T>) {
        store.restore(self.id(), self.after().cloned());
    }
}

impl<T: Clone> UndoableAction for StoreChange<T> {
    type Target = ObjectStore<T>;

    fn undo(&mut self, store: &mut ObjectStore<T>) {
        self.revert(store);
    }

    fn redo(&mut self, store: &mut ObjectStore<T>) {
        self.reapply(store);
    }
}

impl<T> fmt::Debug for StoreChange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Added { .. } => "Added",
            Self::Removed { .. } => "Removed",
            Self::Replaced { .. } => "Replaced",
        };
        f.debug_struct(kind).field("id", &self.id()).finish_non_exhaustive()
    }
}
