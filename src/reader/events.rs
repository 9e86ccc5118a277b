//! XML Element Types
//!
//! Element types produced by the pull reader. Start and end elements own
//! reusable buffers and are recycled through the element pool; text is a
//! borrowed view into the reader's text buffer.

use crate::core::attributes::Attrs;
use crate::core::scanner::Scanner;
use crate::error::Result;
use std::fmt;
use std::io::{self, Read, Write};

/// Start of an element: `<name attrs...>` or `<name attrs.../>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartElement {
    name: Vec<u8>,
    attrs: Attrs,
    has_end: bool,
}

impl StartElement {
    /// Create a new start element
    pub fn new(name: impl AsRef<[u8]>, has_end: bool) -> Self {
        StartElement {
            name: name.as_ref().to_vec(),
            attrs: Attrs::new(),
            has_end,
        }
    }

    /// Copy `attrs` into this element
    pub fn with_attrs(mut self, attrs: &Attrs) -> Self {
        attrs.copy_to(&mut self.attrs);
        self
    }

    /// Full element name (prefix included verbatim)
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Get the name as a string
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.name).ok()
    }

    /// Replace the name, keeping the buffer
    pub fn set_name(&mut self, name: &[u8]) {
        self.name.clear();
        self.name.extend_from_slice(name);
    }

    /// Attributes in source order
    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    /// Mutable access to the attributes
    pub fn attrs_mut(&mut self) -> &mut Attrs {
        &mut self.attrs
    }

    /// True for self-closing tags; no end element follows them.
    pub fn has_end(&self) -> bool {
        self.has_end
    }

    /// Mark the tag as self-closing or not
    pub fn set_has_end(&mut self, has_end: bool) {
        self.has_end = has_end;
    }

    /// Empty the element, keeping its buffers
    pub fn reset(&mut self) {
        self.name.clear();
        self.attrs.clear();
        self.has_end = false;
    }

    /// Parse the tag after its `<`
    pub(crate) fn parse<R: Read>(&mut self, scanner: &mut Scanner<R>) -> Result<()> {
        self.reset();

        let first = scanner.skip_ws()?.ok_or_else(|| scanner.eof("element name"))?;
        self.name.push(first);

        let terminator = loop {
            let c = scanner
                .next_byte()?
                .ok_or_else(|| scanner.eof("'>' closing start tag"))?;
            match c {
                b'>' => break c,
                _ if c <= b' ' => break c,
                b'/' => self.has_end = true,
                // `<a/b>`: everything after the slash is dropped
                _ if self.has_end => {}
                _ => self.name.push(c),
            }
        };

        if terminator != b'>' {
            self.parse_attrs(scanner)?;
        }
        Ok(())
    }

    fn parse_attrs<R: Read>(&mut self, scanner: &mut Scanner<R>) -> Result<()> {
        loop {
            match scanner.skip_ws()? {
                Some(b'>') => return Ok(()),
                Some(b'/') => self.has_end = true,
                Some(_) => {
                    scanner.push_back();
                    self.attrs.parse_next(scanner)?;
                }
                None => return Err(scanner.eof("'>' closing start tag")),
            }
        }
    }

    /// Write the canonical tag text
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"<")?;
        w.write_all(&self.name)?;
        for kv in &self.attrs {
            w.write_all(b" ")?;
            kv.write_to(w)?;
        }
        w.write_all(if self.has_end { &b"/>"[..] } else { &b">"[..] })
    }
}

impl fmt::Display for StartElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", String::from_utf8_lossy(&self.name))?;
        for kv in &self.attrs {
            write!(f, " {kv}")?;
        }
        f.write_str(if self.has_end { "/>" } else { ">" })
    }
}

/// End of an element: `</name>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndElement {
    name: Vec<u8>,
}

impl EndElement {
    /// Create a new end element
    pub fn new(name: impl AsRef<[u8]>) -> Self {
        EndElement {
            name: name.as_ref().to_vec(),
        }
    }

    /// Name of the closed element
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Get the name as a string
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.name).ok()
    }

    /// Replace the name, keeping the buffer
    pub fn set_name(&mut self, name: &[u8]) {
        self.name.clear();
        self.name.extend_from_slice(name);
    }

    /// Parse the tag after its `</`. Whitespace inside the tag is dropped.
    pub(crate) fn parse<R: Read>(&mut self, scanner: &mut Scanner<R>) -> Result<()> {
        self.name.clear();
        let mut c = scanner.skip_ws()?.ok_or_else(|| scanner.eof("end tag name"))?;
        loop {
            match c {
                b'>' => return Ok(()),
                _ if c <= b' ' => {}
                _ => self.name.push(c),
            }
            c = scanner
                .next_byte()?
                .ok_or_else(|| scanner.eof("'>' closing end tag"))?;
        }
    }

    /// Write `</name>`
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"</")?;
        w.write_all(&self.name)?;
        w.write_all(b">")
    }
}

impl fmt::Display for EndElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "</{}>", String::from_utf8_lossy(&self.name))
    }
}

/// Raw text between two tags. No entity decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextElement<'a> {
    bytes: &'a [u8],
}

impl<'a> TextElement<'a> {
    /// Wrap raw text bytes
    pub fn new(bytes: &'a [u8]) -> Self {
        TextElement { bytes }
    }

    /// Raw text bytes
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Get the text as a string if it is valid UTF-8
    pub fn as_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.bytes).ok()
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for zero-length text
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Display for TextElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.bytes))
    }
}

/// An element borrowed from the reader (or built by the caller for
/// the writer)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element<'a> {
    /// `<name attrs...>`, or self-closing when `has_end()` is set
    Start(&'a StartElement),
    /// `</name>`
    End(&'a EndElement),
    /// Text content between tags
    Text(TextElement<'a>),
}

impl<'a> Element<'a> {
    /// Element name; text has none
    pub fn name(&self) -> Option<&'a [u8]> {
        match *self {
            Element::Start(s) => Some(s.name()),
            Element::End(e) => Some(e.name()),
            Element::Text(_) => None,
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, Element::Start(_))
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Element::End(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Element::Text(_))
    }

    /// The start element, if this is one
    pub fn as_start(&self) -> Option<&'a StartElement> {
        match *self {
            Element::Start(s) => Some(s),
            _ => None,
        }
    }

    /// The end element, if this is one
    pub fn as_end(&self) -> Option<&'a EndElement> {
        match *self {
            Element::End(e) => Some(e),
            _ => None,
        }
    }

    /// The text bytes, if this is text
    pub fn as_text(&self) -> Option<&'a [u8]> {
        match *self {
            Element::Text(t) => Some(t.as_bytes()),
            _ => None,
        }
    }

    /// Write the canonical text form, unescaped
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        match self {
            Element::Start(s) => s.write_to(w),
            Element::End(e) => e.write_to(w),
            Element::Text(t) => w.write_all(t.as_bytes()),
        }
    }

    /// Copy into an element that outlives the reader
    pub fn to_owned_element(&self) -> OwnedElement {
        match *self {
            Element::Start(s) => OwnedElement::Start(s.clone()),
            Element::End(e) => OwnedElement::End(e.clone()),
            Element::Text(t) => OwnedElement::Text(t.as_bytes().to_vec()),
        }
    }
}

impl fmt::Display for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Start(s) => fmt::Display::fmt(s, f),
            Element::End(e) => fmt::Display::fmt(e, f),
            Element::Text(t) => fmt::Display::fmt(t, f),
        }
    }
}

/// Owned version of Element for storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnedElement {
    Start(StartElement),
    End(EndElement),
    Text(Vec<u8>),
}

impl OwnedElement {
    /// Borrow as an `Element` for the writer
    pub fn as_element(&self) -> Element<'_> {
        match self {
            OwnedElement::Start(s) => Element::Start(s),
            OwnedElement::End(e) => Element::End(e),
            OwnedElement::Text(t) => Element::Text(TextElement::new(t)),
        }
    }
}

impl From<StartElement> for OwnedElement {
    fn from(start: StartElement) -> Self {
        OwnedElement::Start(start)
    }
}

impl From<EndElement> for OwnedElement {
    fn from(end: EndElement) -> Self {
        OwnedElement::End(end)
    }
}

impl From<TextElement<'_>> for OwnedElement {
    fn from(text: TextElement<'_>) -> Self {
        OwnedElement::Text(text.as_bytes().to_vec())
    }
}
