#![forbid(unsafe_code)]

//! Structured text form of stored entities.
//!
//! Entities never see the XML parser. They read from and write into an
//! [`XmlElement`]: an element name, ordered attributes, text content and
//! child elements. [`parse_document`] builds that tree with `quick-xml`;
//! [`XmlOutput`] writes it back with two-space indentation.
//!
//! ```text
//! <event>                                   <- XmlElement (root)
//!   <control id="2" x="8">goodbye</control> <- child: name, attributes, text
//!   <control id="3" x="9">bat</control>
//! </event>
//! ```

use std::borrow::Cow;
use std::fmt::Display;
use std::io::{Read, Write};
use std::str::FromStr;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::PersistError;

// ============================================================================
// Element tree
// ============================================================================

/// One element with its attributes, text and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// An empty element.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fail unless this element is named `expected`.
    pub fn expect_name(&self, expected: &str) -> Result<(), PersistError> {
        if self.name == expected {
            Ok(())
        } else {
            Err(PersistError::UnexpectedElement {
                expected: expected.to_owned(),
                found: self.name.clone(),
            })
        }
    }

    // ------------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------------

    /// Attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Raw value of an attribute.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Raw value of an attribute that must be present.
    pub fn required_attr(&self, name: &str) -> Result<&str, PersistError> {
        self.attr(name)
            .ok_or_else(|| PersistError::MissingAttribute {
                element: self.name.clone(),
                attribute: name.to_owned(),
            })
    }

    /// Parse a required attribute.
    pub fn parse_attr<T: FromStr>(&self, name: &str) -> Result<T, PersistError> {
        let raw = self.required_attr(name)?;
        self.parse_value(name, raw)
    }

    /// Parse an optional attribute, falling back to `default` when absent.
    pub fn parse_attr_or<T: FromStr>(&self, name: &str, default: T) -> Result<T, PersistError> {
        match self.attr(name) {
            Some(raw) => self.parse_value(name, raw),
            None => Ok(default),
        }
    }

    fn parse_value<T: FromStr>(&self, name: &str, raw: &str) -> Result<T, PersistError> {
        raw.trim().parse().map_err(|_| PersistError::BadAttribute {
            element: self.name.clone(),
            attribute: name.to_owned(),
            value: raw.to_owned(),
        })
    }

    /// Set an attribute, replacing an earlier value but keeping its position.
    pub fn set_attr(&mut self, name: &str, value: impl Display) {
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, slot)) => *slot = value,
            None => self.attributes.push((name.to_owned(), value)),
        }
    }

    // ------------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------------

    /// Text content (unescaped).
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    #[must_use]
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// First child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given name, in order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Cursor over this element's children.
    #[must_use]
    pub fn input(&self) -> XmlInput<'_> {
        XmlInput::new(&self.children)
    }
}

// ============================================================================
// Reading
// ============================================================================

/// Cursor over a run of sibling elements.
///
/// Loaders consume the elements they recognise and leave the cursor on the
/// first one they don't, so several stores can load from one parent in turn.
#[derive(Debug, Clone)]
pub struct XmlInput<'a> {
    siblings: &'a [XmlElement],
    pos: usize,
}

impl<'a> XmlInput<'a> {
    #[must_use]
    pub fn new(siblings: &'a [XmlElement]) -> Self {
        Self { siblings, pos: 0 }
    }

    /// The element under the cursor, without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<&'a XmlElement> {
        self.siblings.get(self.pos)
    }

    /// Consume and return the element under the cursor.
    pub fn next_element(&mut self) -> Option<&'a XmlElement> {
        let element = self.siblings.get(self.pos)?;
        self.pos += 1;
        Some(element)
    }

    /// Elements not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.siblings.len() - self.pos
    }

    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.siblings.len()
    }
}

/// Parse a complete document and return its root element.
///
/// Declarations, comments and processing instructions are skipped. Text
/// that is only whitespace is dropped from elements that have children.
pub fn parse_document(text: &str) -> Result<XmlElement, PersistError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(element_from_start(&start)?),
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                if let Some(mut element) = stack.pop() {
                    if !element.children.is_empty() && element.text.trim().is_empty() {
                        element.text.clear();
                    }
                    attach(&mut stack, &mut root, element)?;
                }
            }
            Event::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(std::str::from_utf8(&data)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(PersistError::UnexpectedElement {
            expected: format!("</{}>", open.name),
            found: "end of input".into(),
        });
    }

    root.ok_or_else(|| PersistError::UnexpectedElement {
        expected: "document element".into(),
        found: "end of input".into(),
    })
}

/// Read everything from `reader` and parse it as a document.
pub fn read_document<R: Read>(mut reader: R) -> Result<XmlElement, PersistError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_document(&text)
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, PersistError> {
    let name = std::str::from_utf8(start.name().into_inner())?;
    let mut element = XmlElement::new(name);
    for attr in start.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_owned();
        let value: Cow<'_, str> = attr.unescape_value()?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), PersistError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    match root {
        Some(existing) => Err(PersistError::UnexpectedElement {
            expected: format!("end of document after </{}>", existing.name),
            found: element.name,
        }),
        None => {
            *root = Some(element);
            Ok(())
        }
    }
}

// ============================================================================
// Writing
// ============================================================================

/// Indented XML writer for element trees.
pub struct XmlOutput<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> XmlOutput<W> {
    /// Writer indenting nested elements by two spaces.
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', 2),
        }
    }

    /// `<?xml version="1.0" encoding="utf-8"?>`
    pub fn write_declaration(&mut self) -> Result<(), PersistError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        Ok(())
    }

    /// Open an element with no attributes; pair with [`end_element`](Self::end_element).
    pub fn start_element(&mut self, name: &str) -> Result<(), PersistError> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(())
    }

    pub fn end_element(&mut self, name: &str) -> Result<(), PersistError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Write a whole element tree. Elements with neither text nor children
    /// become empty tags.
    pub fn write_element(&mut self, element: &XmlElement) -> Result<(), PersistError> {
        let mut start = BytesStart::new(element.name.as_str());
        for (key, value) in &element.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if element.text.is_empty() && element.children.is_empty() {
            self.writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        self.writer.write_event(Event::Start(start))?;
        if !element.text.is_empty() {
            self.writer
                .write_event(Event::Text(BytesText::new(&element.text)))?;
        }
        for child in &element.children {
            self.write_element(child)?;
        }
        self.writer
            .write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
        Ok(())
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}
