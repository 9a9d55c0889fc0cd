#![forbid(unsafe_code)]

//! Typed object stores for event documents.
//!
//! # Key Components
//!
//! - [`Id`] - Typed handle naming one entity; `Id<Course>` and `Id<Control>`
//!   never mix
//! - [`Storable`] - Contract an entity implements to be stored and persisted
//! - [`ObjectStore`] - Id-keyed table with a monotonic id counter and a
//!   change number
//! - [`StoreChange`] - Undo record for one store mutation
//! - [`ChangeRecorder`] / [`NoHistory`] - Where mutations report their changes
//! - [`XmlElement`], [`XmlInput`], [`XmlOutput`] - Element tree, sibling
//!   cursor and writer used for persistence
//!
//! # How it fits
//!
//! A document owns one store per entity type and one
//! [`UndoManager`](pen_undo::UndoManager). Edits pass the manager to the
//! store so each mutation lands in the open command; undo hands the document
//! back to the recorded changes, which restore each store directly.

pub mod change;
pub mod error;
pub mod id;
pub mod storable;
pub mod store;
pub mod xml;

pub use change::StoreChange;
pub use error::{PersistError, StoreError};
pub use id::Id;
pub use storable::Storable;
pub use store::{ChangeRecorder, NoHistory, ObjectStore};
pub use xml::{XmlElement, XmlInput, XmlOutput, parse_document, read_document};
