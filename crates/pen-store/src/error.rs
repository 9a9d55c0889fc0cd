#![forbid(unsafe_code)]

//! Store and persistence errors.

use std::fmt;

/// Failure of a data operation on an [`ObjectStore`](crate::ObjectStore).
///
/// A missing id is always a caller bug or a stale reference (e.g. a selection
/// that survived an undo). Callers that consider it impossible can `expect`;
/// validation paths should test [`is_present`](crate::ObjectStore::is_present)
/// first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No entity with this id is in the store.
    NotPresent {
        /// Short type name of the store's entity, e.g. `Control`.
        kind: &'static str,
        /// Raw id that was looked up.
        id: u32,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPresent { kind, id } => {
                write!(f, "object of type {kind} with id {id} is not present")
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Failure reading or writing the XML form of a store.
#[derive(Debug)]
pub enum PersistError {
    /// I/O error on the underlying reader or writer.
    Io(std::io::Error),
    /// Malformed XML.
    Xml(quick_xml::Error),
    /// Element or attribute text was not valid UTF-8.
    Utf8(std::str::Utf8Error),
    /// A required attribute is absent.
    MissingAttribute {
        element: String,
        attribute: String,
    },
    /// An attribute value could not be parsed.
    BadAttribute {
        element: String,
        attribute: String,
        value: String,
    },
    /// Two elements of the same kind share an id.
    DuplicateId {
        element: String,
        id: u32,
    },
    /// An element other than the one expected was found.
    UnexpectedElement {
        expected: String,
        found: String,
    },
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Xml(e) => write!(f, "XML error: {e}"),
            Self::Utf8(e) => write!(f, "invalid UTF-8: {e}"),
            Self::MissingAttribute { element, attribute } => {
                write!(f, "<{element}> is missing attribute '{attribute}'")
            }
            Self::BadAttribute {
                element,
                attribute,
                value,
            } => write!(
                f,
                "<{element}> has bad value '{value}' for attribute '{attribute}'"
            ),
            Self::DuplicateId { element, id } => write!(f, "duplicate id '{id}' on <{element}>"),
            Self::UnexpectedElement { expected, found } => {
                write!(f, "expected <{expected}>, found <{found}>")
            }
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Xml(e) => Some(e),
            Self::Utf8(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<quick_xml::Error> for PersistError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err)
    }
}

impl From<quick_xml::events::attributes::AttrError> for PersistError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(err.into())
    }
}

impl From<std::str::Utf8Error> for PersistError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::Utf8(err)
    }
}
