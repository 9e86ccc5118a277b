//! XML Attribute Parsing
//!
//! Parses `key = "value"` pairs straight from the scanner into reusable
//! buffers. Values are taken verbatim: no entity decoding, and a `"`
//! always ends the value.

use super::scanner::Scanner;
use crate::error::Result;
use std::fmt;
use std::io::{self, Read, Write};

/// A parsed XML attribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KV {
    key: Vec<u8>,
    value: Vec<u8>,
}

impl KV {
    /// Create a new attribute
    pub fn new(key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Self {
        KV {
            key: key.as_ref().to_vec(),
            value: value.as_ref().to_vec(),
        }
    }

    /// Attribute name (may include namespace prefix)
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Attribute value, raw
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Get the key as a string
    pub fn key_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.key).ok()
    }

    /// Get the value as a string
    pub fn value_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.value).ok()
    }

    /// Overwrite both buffers, keeping their capacity
    pub fn set(&mut self, key: &[u8], value: &[u8]) {
        self.key.clear();
        self.key.extend_from_slice(key);
        self.value.clear();
        self.value.extend_from_slice(value);
    }

    /// Parse one `key = "value"` pair
    pub(crate) fn parse<R: Read>(&mut self, scanner: &mut Scanner<R>) -> Result<()> {
        self.key.clear();
        if !scanner.read_until(b'=', &mut self.key)? {
            return Err(scanner.eof("'=' after attribute name"));
        }
        let trimmed = self.key.iter().rposition(|&b| b > b' ').map_or(0, |i| i + 1);
        self.key.truncate(trimmed);

        // Anything between '=' and the opening quote is ignored
        loop {
            match scanner.skip_ws()? {
                Some(b'"') => break,
                Some(_) => {}
                None => return Err(scanner.eof("opening '\"' of attribute value")),
            }
        }

        self.value.clear();
        if !scanner.read_until(b'"', &mut self.value)? {
            return Err(scanner.eof("closing '\"' of attribute value"));
        }
        Ok(())
    }

    /// Write as `key="value"`
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.key)?;
        w.write_all(b"=\"")?;
        w.write_all(&self.value)?;
        w.write_all(b"\"")
    }
}

impl fmt::Display for KV {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}=\"{}\"",
            String::from_utf8_lossy(&self.key),
            String::from_utf8_lossy(&self.value)
        )
    }
}

/// Ordered attribute list of a start element.
///
/// Slots past `len` keep their buffers, so a list refilled by a later
/// parse reuses the storage of earlier attributes. `Clone` and `Debug`
/// only see the live attributes.
#[derive(Default)]
pub struct Attrs {
    kvs: Vec<KV>,
    len: usize,
}

impl Attrs {
    /// Create an empty attribute list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a flat `key, value, key, value, ...` list.
    ///
    /// A trailing key without a value gets an empty value.
    pub fn from_pairs<S: AsRef<[u8]>>(pairs: &[S]) -> Self {
        let mut attrs = Attrs::new();
        for pair in pairs.chunks(2) {
            let value = pair.get(1).map_or(&b""[..], |v| v.as_ref());
            attrs.push(pair[0].as_ref(), value);
        }
        attrs
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if there are no attributes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live attributes in source order
    pub fn as_slice(&self) -> &[KV] {
        &self.kvs[..self.len]
    }

    /// Iterate over the attributes in source order
    pub fn iter(&self) -> std::slice::Iter<'_, KV> {
        self.as_slice().iter()
    }

    /// First attribute whose key equals `key`
    pub fn get(&self, key: &[u8]) -> Option<&KV> {
        self.iter().find(|kv| kv.key() == key)
    }

    /// Value of the first attribute named `key`, as a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key.as_bytes()).and_then(KV::value_str)
    }

    /// Append an attribute
    pub fn push(&mut self, key: &[u8], value: &[u8]) {
        self.next_slot().set(key, value);
    }

    /// Drop all attributes, keeping their storage
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Overwrite `other` with these attributes, reusing its storage
    pub fn copy_to(&self, other: &mut Attrs) {
        other.clear();
        for kv in self.iter() {
            other.push(kv.key(), kv.value());
        }
    }

    fn next_slot(&mut self) -> &mut KV {
        if self.len == self.kvs.len() {
            self.kvs.push(KV::default());
        }
        self.len += 1;
        &mut self.kvs[self.len - 1]
    }

    /// Parse one attribute into the next slot
    pub(crate) fn parse_next<R: Read>(&mut self, scanner: &mut Scanner<R>) -> Result<()> {
        let idx = self.len;
        if idx == self.kvs.len() {
            self.kvs.push(KV::default());
        }
        self.kvs[idx].parse(scanner)?;
        self.len = idx + 1;
        Ok(())
    }

    /// Slots allocated, including ones past `len`
    pub(crate) fn slots(&self) -> usize {
        self.kvs.len()
    }
}

impl Clone for Attrs {
    fn clone(&self) -> Self {
        Attrs {
            kvs: self.as_slice().to_vec(),
            len: self.len,
        }
    }
}

impl fmt::Debug for Attrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl PartialEq for Attrs {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for Attrs {}

impl<'a> IntoIterator for &'a Attrs {
    type Item = &'a KV;
    type IntoIter = std::slice::Iter<'a, KV>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
