#![forbid(unsafe_code)]

//! Typed identifiers.
//!
//! An [`Id<T>`] names one entity in an `ObjectStore<T>`. The type parameter
//! only exists at compile time: an `Id<Course>` cannot be passed where an
//! `Id<Control>` is expected, but both are a plain `u32` at runtime.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Opaque handle for an entity of type `T`. Zero is the "no entity" value.
pub struct Id<T> {
    raw: u32,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// The sentinel naming no entity.
    pub const NONE: Self = Self::new(0);

    /// Wrap a raw integer. Stores only hand out ids they issued themselves;
    /// this constructor exists for persistence and tests.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self {
            raw,
            _kind: PhantomData,
        }
    }

    /// The sentinel naming no entity.
    #[must_use]
    pub const fn none() -> Self {
        Self::NONE
    }

    /// The wrapped integer.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.raw
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.raw == 0
    }

    #[must_use]
    pub const fn is_some(self) -> bool {
        self.raw != 0
    }
}

// Manual impls: derives would demand the same traits of `T`.

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::NONE
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.raw)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
