#![forbid(unsafe_code)]

//! Id-keyed entity tables.
//!
//! An [`ObjectStore<T>`] owns every `T` of one document, keyed by [`Id<T>`].
//! Ids come from a counter that only moves forward, so an id is never handed
//! out twice by the same store, even after removal, undo or reload.
//!
//! Mutations report what they did to a [`ChangeRecorder`]. Passing the
//! document's [`UndoManager`] makes the mutation undoable; passing
//! [`NoHistory`] does not.
//!
//! # Invariants
//!
//! 1. `next_id()` is greater than every id ever present in the store.
//! 2. `change_num()` increases on every `add`, `remove`, `replace`, `load`,
//!    and on every undo or redo of one of those.
//! 3. `save` writes entries in ascending id order.

use std::any::type_name;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::Write;

use pen_undo::{UndoManager, UndoableAction};

use crate::change::StoreChange;
use crate::error::{PersistError, StoreError};
use crate::id::Id;
use crate::storable::Storable;
use crate::xml::{XmlElement, XmlInput, XmlOutput};

// ============================================================================
// Change recording
// ============================================================================

/// Receiver for the changes a store makes.
pub trait ChangeRecorder<T> {
    fn record(&mut self, change: StoreChange<T>);
}

/// Records nothing. Use for loading, importing and scratch stores.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl<T> ChangeRecorder<T> for NoHistory {
    fn record(&mut self, _change: StoreChange<T>) {}
}

/// Store changes become actions of the command in progress.
///
/// Recording panics when no command is open (see
/// [`UndoManager::record_action`]).
impl<T, A> ChangeRecorder<T> for UndoManager<A>
where
    A: UndoableAction + From<StoreChange<T>>,
{
    fn record(&mut self, change: StoreChange<T>) {
        self.record_action(A::from(change));
    }
}

// ============================================================================
// ObjectStore
// ============================================================================

/// Table of `T` values keyed by [`Id<T>`].
#[derive(Clone)]
pub struct ObjectStore<T> {
    entries: HashMap<Id<T>, T>,
    /// Raw value of the next id to hand out.
    next: u32,
    change_num: u64,
}

impl<T> Default for ObjectStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ObjectStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStore")
            .field("entries", &self.entries.len())
            .field("next", &self.next)
            .field("change_num", &self.change_num)
            .finish()
    }
}

/// Short type name used in error messages.
fn kind<T>() -> &'static str {
    let full = type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

impl<T> ObjectStore<T> {
    /// An empty store. The first id handed out is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            next: 1,
            change_num: 0,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Is `id` in the store? False for `Id::none()` and ids never issued.
    #[must_use]
    pub fn is_present(&self, id: Id<T>) -> bool {
        self.entries.contains_key(&id)
    }

    /// Fail with [`StoreError::NotPresent`] unless `id` is in the store.
    pub fn check_present(&self, id: Id<T>) -> Result<(), StoreError> {
        if self.is_present(id) {
            Ok(())
        } else {
            Err(self.not_present(id))
        }
    }

    /// The value stored under `id`.
    pub fn get(&self, id: Id<T>) -> Result<&T, StoreError> {
        self.entries.get(&id).ok_or_else(|| self.not_present(id))
    }

    /// All values, in no particular order.
    pub fn all(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.values()
    }

    /// All ids, in no particular order.
    pub fn all_ids(&self) -> impl Iterator<Item = Id<T>> + '_ {
        self.entries.keys().copied()
    }

    /// All `(id, value)` pairs, in no particular order.
    pub fn all_pairs(&self) -> impl Iterator<Item = (Id<T>, &T)> + '_ {
        self.entries.iter().map(|(id, value)| (*id, value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The id the next `add` will return.
    #[must_use]
    pub fn next_id(&self) -> Id<T> {
        Id::new(self.next)
    }

    /// Counter that moves on every change to the contents.
    #[must_use]
    pub fn change_num(&self) -> u64 {
        self.change_num
    }

    fn not_present(&self, id: Id<T>) -> StoreError {
        StoreError::NotPresent {
            kind: kind::<T>(),
            id: id.raw(),
        }
    }

    /// Set or clear the entry under `id` while undoing or redoing.
    pub(crate) fn restore(&mut self, id: Id<T>, value: Option<T>) {
        match value {
            Some(value) => {
                self.entries.insert(id, value);
            }
            None => {
                self.entries.remove(&id);
            }
        }
        self.change_num += 1;
        tracing::trace!(target: "pen.store", kind = kind::<T>(), id = id.raw(), "restore");
    }
}

impl<T: Clone> ObjectStore<T> {
    // ========================================================================
    // Mutation
    // ========================================================================

    /// Insert `value` under a fresh id and return the id.
    pub fn add<R>(&mut self, history: &mut R, value: T) -> Id<T>
    where
        R: ChangeRecorder<T> + ?Sized,
    {
        let id = Id::new(self.next);
        self.next += 1;
        self.entries.insert(id, value.clone());
        self.change_num += 1;
        tracing::trace!(target: "pen.store", kind = kind::<T>(), id = id.raw(), "add");
        history.record(StoreChange::Added { id, value });
        id
    }

    /// Remove the entry under `id`, returning its value. The id is not reused.
    pub fn remove<R>(&mut self, history: &mut R, id: Id<T>) -> Result<T, StoreError>
    where
        R: ChangeRecorder<T> + ?Sized,
    {
        let value = self.entries.remove(&id).ok_or_else(|| self.not_present(id))?;
        self.change_num += 1;
        tracing::trace!(target: "pen.store", kind = kind::<T>(), id = id.raw(), "remove");
        history.record(StoreChange::Removed {
            id,
            value: value.clone(),
        });
        Ok(value)
    }

    /// Overwrite the value under `id`, returning the previous value.
    pub fn replace<R>(&mut self, history: &mut R, id: Id<T>, value: T) -> Result<T, StoreError>
    where
        R: ChangeRecorder<T> + ?Sized,
    {
        let Some(slot) = self.entries.get_mut(&id) else {
            return Err(self.not_present(id));
        };
        let before = std::mem::replace(slot, value.clone());
        self.change_num += 1;
        tracing::trace!(target: "pen.store", kind = kind::<T>(), id = id.raw(), "replace");
        history.record(StoreChange::Replaced {
            id,
            before: before.clone(),
            after: value,
        });
        Ok(before)
    }
}

// ============================================================================
// Persistence
// ============================================================================

impl<T: Storable> ObjectStore<T> {
    /// The persisted element for one entry: `id` first, then the entity's own
    /// attributes and content.
    fn element_for(id: Id<T>, value: &T) -> XmlElement {
        let mut el = XmlElement::new(T::element_name());
        el.set_attr("id", id.raw());
        value.write(&mut el);
        el
    }

    /// Write every entry as one element, in ascending id order.
    pub fn save<W: Write>(&self, out: &mut XmlOutput<W>) -> Result<(), PersistError> {
        let mut pairs: Vec<_> = self.all_pairs().collect();
        pairs.sort_unstable_by_key(|(id, _)| *id);
        for (id, value) in &pairs {
            out.write_element(&Self::element_for(*id, value))?;
        }
        tracing::debug!(
            target: "pen.store",
            element = T::element_name(),
            count = pairs.len(),
            "save"
        );
        Ok(())
    }

    /// Append every entry, in ascending id order, as a child of `parent`.
    pub fn save_into(&self, parent: &mut XmlElement) {
        let mut pairs: Vec<_> = self.all_pairs().collect();
        pairs.sort_unstable_by_key(|(id, _)| *id);
        for (id, value) in pairs {
            parent.push_child(Self::element_for(id, value));
        }
    }

    /// Read consecutive elements named `T::element_name()` from `input`.
    ///
    /// Stops at the first element with another name and leaves `input` on
    /// it. Entries go straight into the table without recording history.
    /// Either every element is loaded or, on error, the store is unchanged
    /// (the cursor still moves past the elements examined). Returns the
    /// number of entries loaded.
    pub fn load(&mut self, input: &mut XmlInput<'_>) -> Result<usize, PersistError> {
        let name = T::element_name();
        let mut loaded: Vec<(Id<T>, T)> = Vec::new();
        let mut seen = HashSet::new();

        while let Some(el) = input.peek() {
            if el.name() != name {
                break;
            }
            input.next_element();

            let raw: u32 = el.parse_attr("id")?;
            // 0 is the none sentinel; u32::MAX would leave no id to hand out next.
            if raw == 0 || raw == u32::MAX {
                return Err(PersistError::BadAttribute {
                    element: name.to_owned(),
                    attribute: "id".to_owned(),
                    value: raw.to_string(),
                });
            }
            let id = Id::new(raw);
            if self.is_present(id) || !seen.insert(raw) {
                return Err(PersistError::DuplicateId {
                    element: name.to_owned(),
                    id: raw,
                });
            }
            loaded.push((id, T::read(el)?));
        }

        let count = loaded.len();
        for (id, value) in loaded {
            if id.raw() >= self.next {
                self.next = id.raw() + 1;
            }
            self.entries.insert(id, value);
        }
        self.change_num += 1;
        tracing::debug!(target: "pen.store", element = name, count, next = self.next, "load");
        Ok(count)
    }
}
