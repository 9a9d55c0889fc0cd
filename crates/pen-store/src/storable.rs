#![forbid(unsafe_code)]

//! The contract an entity fulfils to live in an [`ObjectStore`](crate::ObjectStore).

use crate::error::PersistError;
use crate::xml::XmlElement;

/// An entity that can be stored, cloned out, and persisted.
///
/// `read` and `write` handle only the entity's own attributes, text and
/// children. The `id` attribute belongs to the store and is written before
/// `write` is called; `read` may ignore it.
///
/// # Example
///
/// ```
/// use pen_store::{PersistError, Storable, XmlElement};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Control {
///     code: String,
///     x: f32,
/// }
///
/// impl Storable for Control {
///     fn element_name() -> &'static str {
///         "control"
///     }
///
///     fn read(el: &XmlElement) -> Result<Self, PersistError> {
///         Ok(Self {
///             code: el.required_attr("code")?.to_owned(),
///             x: el.parse_attr_or("x", 0.0)?,
///         })
///     }
///
///     fn write(&self, el: &mut XmlElement) {
///         el.set_attr("code", &self.code);
///         el.set_attr("x", self.x);
///     }
/// }
///
/// let mut el = XmlElement::new(Control::element_name());
/// let control = Control { code: "31".into(), x: 2.5 };
/// control.write(&mut el);
/// assert_eq!(Control::read(&el).unwrap(), control);
/// ```
pub trait Storable: Clone {
    /// Element name used for every persisted instance. Must be stable.
    fn element_name() -> &'static str;

    /// Build a value from its persisted element.
    fn read(el: &XmlElement) -> Result<Self, PersistError>;

    /// Add this value's attributes, text and children to `el`.
    fn write(&self, el: &mut XmlElement);
}
