#![forbid(unsafe_code)]

//! Public facade for undoable, persistent event documents.
//!
//! This crate re-exports the history types from `pen-undo` and the store
//! types from `pen-store`, adds one error type covering both, and offers a
//! prelude for day-to-day use.
//!
//! ```
//! use pen::prelude::*;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Leg { from: u32, to: u32 }
//!
//! impl Storable for Leg {
//!     fn element_name() -> &'static str { "leg" }
//!     fn read(el: &XmlElement) -> std::result::Result<Self, PersistError> {
//!         Ok(Self { from: el.parse_attr("from")?, to: el.parse_attr("to")? })
//!     }
//!     fn write(&self, el: &mut XmlElement) {
//!         el.set_attr("from", self.from);
//!         el.set_attr("to", self.to);
//!     }
//! }
//!
//! fn run() -> pen::Result<()> {
//!     let mut legs = ObjectStore::new();
//!     let mut undo = UndoManager::<StoreChange<Leg>>::new(UndoConfig::default());
//!
//!     undo.begin_command(1, "Add leg");
//!     let id = legs.add(&mut undo, Leg { from: 1, to: 2 });
//!     undo.end_command(1);
//!
//!     legs.replace(&mut NoHistory, id, Leg { from: 1, to: 3 })?;
//!     assert_eq!(legs.get(id)?.to, 3);
//!     Ok(())
//! }
//! # run().unwrap();
//! ```

use std::fmt;

// --- History re-exports ----------------------------------------------------

pub use pen_undo::{
    Command, ConfigError, DEFAULT_MAX_COMMANDS, UndoConfig, UndoManager, UndoableAction,
};

// --- Store re-exports ------------------------------------------------------

pub use pen_store::{
    ChangeRecorder, Id, NoHistory, ObjectStore, PersistError, Storable, StoreChange, StoreError,
    XmlElement, XmlInput, XmlOutput, parse_document, read_document,
};

// --- Errors ---------------------------------------------------------------

/// Any failure surfaced by the store, persistence or configuration layers.
#[derive(Debug)]
pub enum Error {
    /// A referenced entity is not in its store.
    Store(StoreError),
    /// Reading or writing a document failed.
    Persist(PersistError),
    /// History configuration could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Persist(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Persist(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<PersistError> for Error {
    fn from(err: PersistError) -> Self {
        Self::Persist(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Persist(PersistError::Io(err))
    }
}

/// Standard result type for pen APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ChangeRecorder, Error, Id, NoHistory, ObjectStore, PersistError, Result, Storable,
        StoreChange, StoreError, UndoConfig, UndoManager, UndoableAction, XmlElement, XmlInput,
        XmlOutput,
    };

    pub use crate::{store, undo};
}

pub use pen_store as store;
pub use pen_undo as undo;
