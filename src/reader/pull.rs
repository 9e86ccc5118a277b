//! Pull Reader
//!
//! Tokenizes XML from any `Read` source one element per `next()` call.
//! The returned element borrows the reader and stays valid until the
//! reader is advanced or the element is released.
//!
//! Declarations, comments and processing instructions (`<?...>`,
//! `<!...>`) are skipped up to the next `>` and never show up as
//! elements. Tag balance is not checked.

use super::events::{Element, EndElement, StartElement, TextElement};
use super::pool::{ElementPool, PoolHandle};
use crate::config::ReaderConfig;
use crate::core::scanner::Scanner;
use crate::error::{Error, Result};
use std::io::Read;

/// Destination for [`Reader::assign_next`]
pub trait TextSink {
    /// Replace the current contents with `text`
    fn assign(&mut self, text: &[u8]);
}

impl TextSink for Vec<u8> {
    fn assign(&mut self, text: &[u8]) {
        self.clear();
        self.extend_from_slice(text);
    }
}

/// Invalid UTF-8 is replaced with U+FFFD.
impl TextSink for String {
    fn assign(&mut self, text: &[u8]) {
        self.clear();
        self.push_str(&String::from_utf8_lossy(text));
    }
}

/// Element currently lent out by the reader
#[derive(Debug)]
enum Current {
    None,
    Start(StartElement),
    End(EndElement),
    /// Lives in `Reader::text`
    Text,
}

/// Streaming pull-style XML reader
pub struct Reader<R> {
    scanner: Scanner<R>,
    pool: PoolHandle,
    current: Current,
    text: Vec<u8>,
    /// Buffer for assign_next, kept apart from `text`
    scratch: Vec<u8>,
    error: Option<Error>,
    /// `<` already consumed by assign_next; the tag body comes next
    pending_tag: bool,
    done: bool,
    strict: bool,
}

impl<R: Read> Reader<R> {
    /// Create a new reader (lenient mode, own element pool)
    pub fn new(source: R) -> Self {
        Self::with_config(source, ReaderConfig::default())
    }

    /// Create a new reader with the specified read buffer capacity
    pub fn with_capacity(source: R, capacity: usize) -> Self {
        Self::with_config(source, ReaderConfig::new().with_buffer_capacity(capacity))
    }

    /// Create a new reader in strict mode
    pub fn new_strict(source: R) -> Self {
        Self::with_config(source, ReaderConfig::new().with_strict(true))
    }

    /// Create a reader from a [`ReaderConfig`]
    pub fn with_config(source: R, config: ReaderConfig) -> Self {
        let pool = match config.pool {
            Some(shared) => PoolHandle::Shared(shared),
            None => PoolHandle::Local(ElementPool::new()),
        };
        Reader {
            scanner: Scanner::with_capacity(source, config.buffer_capacity),
            pool,
            current: Current::None,
            text: Vec::new(),
            scratch: Vec::new(),
            error: None,
            pending_tag: false,
            done: false,
            strict: config.strict,
        }
    }

    /// Advance to the next element.
    ///
    /// Returns false at the end of input or on error; `error()` tells
    /// the two apart. Once false has been returned the reader stays
    /// finished.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        self.release();
        if self.done {
            return false;
        }
        match self.advance() {
            Ok(true) => true,
            Ok(false) => {
                self.done = true;
                false
            }
            Err(err) => {
                self.fail(err);
                false
            }
        }
    }

    /// Element produced by the last `next()` call
    pub fn element(&self) -> Option<Element<'_>> {
        match &self.current {
            Current::None => None,
            Current::Start(start) => Some(Element::Start(start)),
            Current::End(end) => Some(Element::End(end)),
            Current::Text => Some(Element::Text(TextElement::new(&self.text))),
        }
    }

    /// Error that stopped the reader, if any. `None` after a clean end.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Take the recorded error, leaving `None`
    pub fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }

    /// `next()` and `element()` in one call, with the error as `Err`
    pub fn read_element(&mut self) -> Result<Option<Element<'_>>> {
        if self.next() {
            return Ok(self.element());
        }
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(None),
        }
    }

    /// Copy the next text run straight into `target`.
    ///
    /// Typically called right after the start element whose content is
    /// wanted. Comments and declarations in front of the text are
    /// skipped. If a start or end tag comes before any text, `target` is
    /// left untouched and that tag is the next element. Either way no
    /// text element is produced for the run. Returns whether text was
    /// assigned.
    pub fn assign_next<T: TextSink + ?Sized>(&mut self, target: &mut T) -> bool {
        if self.done {
            return false;
        }
        match self.scan_text_ahead() {
            Ok(true) => {
                target.assign(&self.scratch);
                true
            }
            Ok(false) => false,
            Err(err) => {
                self.fail(err);
                false
            }
        }
    }

    /// Return the current start/end element to the pool now
    pub fn release(&mut self) {
        match std::mem::replace(&mut self.current, Current::None) {
            Current::Start(start) => self.pool.release_start(start),
            Current::End(end) => self.pool.release_end(end),
            Current::None | Current::Text => {}
        }
    }

    /// Detach the current start element; it will not go back to the pool
    /// unless handed to [`recycle_start`](Self::recycle_start).
    pub fn take_start(&mut self) -> Option<StartElement> {
        match std::mem::replace(&mut self.current, Current::None) {
            Current::Start(start) => Some(start),
            other => {
                self.current = other;
                None
            }
        }
    }

    /// Detach the current end element
    pub fn take_end(&mut self) -> Option<EndElement> {
        match std::mem::replace(&mut self.current, Current::None) {
            Current::End(end) => Some(end),
            other => {
                self.current = other;
                None
            }
        }
    }

    /// Hand a detached start element back to the pool
    pub fn recycle_start(&mut self, start: StartElement) {
        self.pool.release_start(start);
    }

    /// Hand a detached end element back to the pool
    pub fn recycle_end(&mut self, end: EndElement) {
        self.pool.release_end(end);
    }

    /// Idle (start, end) elements in the reader's pool
    pub fn idle_elements(&self) -> (usize, usize) {
        self.pool.idle()
    }

    /// Bytes consumed from the source so far
    pub fn position(&self) -> u64 {
        self.scanner.position()
    }

    /// Get a reference to the underlying source
    pub fn get_ref(&self) -> &R {
        self.scanner.get_ref()
    }

    /// Unwrap the source. Buffered, unread bytes are lost.
    pub fn into_inner(self) -> R {
        self.scanner.into_inner()
    }

    fn fail(&mut self, err: Error) {
        self.done = true;
        if err.is_eof() && !self.strict {
            log::debug!("input ended inside a token: {err}");
            return;
        }
        log::debug!("reader stopped: {err}");
        self.error = Some(err);
    }

    /// Scan until one element is produced
    fn advance(&mut self) -> Result<bool> {
        if std::mem::take(&mut self.pending_tag) && self.resolve_tag()? {
            return Ok(true);
        }
        loop {
            match self.scanner.skip_ws()? {
                None => return Ok(false),
                Some(b'<') => {
                    if self.resolve_tag()? {
                        return Ok(true);
                    }
                }
                Some(_) => {
                    self.scanner.push_back();
                    self.text.clear();
                    read_text(&mut self.scanner, &mut self.text)?;
                    self.current = Current::Text;
                    return Ok(true);
                }
            }
        }
    }

    /// Dispatch on the byte after `<`. Returns false for skipped
    /// declarations.
    fn resolve_tag(&mut self) -> Result<bool> {
        let c = self
            .scanner
            .skip_ws()?
            .ok_or_else(|| self.scanner.eof("tag after '<'"))?;
        match c {
            b'/' => {
                let mut end = self.pool.checkout_end();
                if let Err(err) = end.parse(&mut self.scanner) {
                    self.pool.release_end(end);
                    return Err(err);
                }
                self.current = Current::End(end);
                Ok(true)
            }
            b'!' | b'?' => {
                self.skip_declaration(c)?;
                Ok(false)
            }
            _ => {
                self.scanner.push_back();
                let mut start = self.pool.checkout_start();
                if let Err(err) = start.parse(&mut self.scanner) {
                    self.pool.release_start(start);
                    return Err(err);
                }
                self.current = Current::Start(start);
                Ok(true)
            }
        }
    }

    /// Read the next text run into `scratch`, skipping declarations.
    /// Returns false if a start or end tag comes first.
    fn scan_text_ahead(&mut self) -> Result<bool> {
        if self.pending_tag {
            return Ok(false);
        }
        loop {
            match self.scanner.skip_ws()? {
                None => return Ok(false),
                Some(b'<') => {
                    let c = self
                        .scanner
                        .skip_ws()?
                        .ok_or_else(|| self.scanner.eof("tag after '<'"))?;
                    if c == b'!' || c == b'?' {
                        self.skip_declaration(c)?;
                        continue;
                    }
                    // Leave the tag for the next advance()
                    self.scanner.push_back();
                    self.pending_tag = true;
                    return Ok(false);
                }
                Some(_) => {
                    self.scanner.push_back();
                    self.scratch.clear();
                    read_text(&mut self.scanner, &mut self.scratch)?;
                    return Ok(true);
                }
            }
        }
    }

    /// Skip `<!...>` or `<?...>` after its first byte `c`
    fn skip_declaration(&mut self, c: u8) -> Result<()> {
        log::trace!(
            "skipping <{} at byte {}",
            c as char,
            self.scanner.position() - 1
        );
        if !self.scanner.skip_until(b'>')? {
            return Err(self.scanner.eof("'>' closing declaration"));
        }
        Ok(())
    }
}

/// Read text up to the next `<`, leaving the `<` unconsumed
fn read_text<R: Read>(scanner: &mut Scanner<R>, out: &mut Vec<u8>) -> Result<()> {
    if !scanner.read_until(b'<', out)? {
        return Err(scanner.eof("'<' after text"));
    }
    scanner.push_back();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_element() {
        let mut reader = Reader::new(&b"<root>hello</root>"[..]);

        assert!(reader.next());
        assert!(matches!(reader.element(), Some(Element::Start(s)) if s.name() == b"root"));
        assert!(reader.next());
        assert_eq!(reader.element().and_then(|e| e.as_text()), Some(&b"hello"[..]));
        assert!(reader.next());
        assert!(matches!(reader.element(), Some(Element::End(e)) if e.name() == b"root"));
        assert!(!reader.next());
        assert!(reader.error().is_none());
        assert!(reader.element().is_none());
    }

    #[test]
    fn test_declarations_skipped() {
        let input = b"<?xml version=\"1.0\"?>\n<!DOCTYPE note>\n<!-- note -->\n<note/>";
        let mut reader = Reader::new(&input[..]);
        assert!(reader.next());
        let start = reader.element().and_then(|e| e.as_start()).unwrap();
        assert_eq!(start.name(), b"note");
        assert!(start.has_end());
        assert!(!reader.next());
    }

    #[test]
    fn test_text_keeps_trailing_whitespace() {
        let mut reader = Reader::new(&b"<a>\n   two words \n</a>"[..]);
        reader.next();
        reader.next();
        assert_eq!(
            reader.element().and_then(|e| e.as_text()),
            Some(&b"two words \n"[..])
        );
    }

    #[test]
    fn test_whitespace_only_text_skipped() {
        let mut reader = Reader::new(&b"<a>  \n\t </a>"[..]);
        assert!(reader.next());
        assert!(reader.next());
        assert!(reader.element().unwrap().is_end());
    }

    #[test]
    fn test_advance_returns_elements_to_pool() {
        let mut reader = Reader::new(&b"<a><b/></a>"[..]);
        assert!(reader.next());
        assert_eq!(reader.idle_elements(), (0, 0));
        assert!(reader.next());
        // `a` went back before `b` was checked out, so `b` reused it
        assert_eq!(reader.idle_elements(), (0, 0));
        assert!(reader.next());
        assert_eq!(reader.idle_elements(), (1, 0));
        assert!(!reader.next());
        assert_eq!(reader.idle_elements(), (1, 1));
    }

    #[test]
    fn test_release_clears_element() {
        let mut reader = Reader::new(&b"<a>"[..]);
        assert!(reader.next());
        reader.release();
        assert!(reader.element().is_none());
        assert_eq!(reader.idle_elements(), (1, 0));
    }

    #[test]
    fn test_take_and_recycle() {
        let mut reader = Reader::new(&b"<keep k=\"v\"></keep>"[..]);
        assert!(reader.next());
        assert!(reader.take_end().is_none());
        let kept = reader.take_start().unwrap();
        assert!(reader.element().is_none());
        assert!(reader.next());
        assert_eq!(kept.attrs().get_str("k"), Some("v"));
        reader.recycle_start(kept);
        assert_eq!(reader.idle_elements(), (1, 0));
    }

    #[test]
    fn test_assign_next() {
        let mut reader = Reader::new(&b"<title lang=\"en\">  Everyday Italian</title><year>2005</year>"[..]);
        let mut title = String::new();
        assert!(reader.next());
        assert!(reader.assign_next(&mut title));
        assert_eq!(title, "Everyday Italian");
        // the start element is still readable
        assert_eq!(
            reader.element().and_then(|e| e.as_start()).and_then(|s| s.attrs().get_str("lang")),
            Some("en")
        );
        assert!(reader.next());
        assert!(reader.element().unwrap().is_end());

        let mut year = Vec::new();
        assert!(reader.next());
        assert!(reader.assign_next(&mut year));
        assert_eq!(year, b"2005");
    }

    #[test]
    fn test_assign_next_before_tag_leaves_target() {
        let mut reader = Reader::new(&b"<a> <b>text</b></a>"[..]);
        let mut target = String::from("untouched");
        assert!(reader.next());
        assert!(!reader.assign_next(&mut target));
        assert_eq!(target, "untouched");
        assert!(reader.next());
        assert_eq!(reader.element().and_then(|e| e.name()), Some(&b"b"[..]));
        assert!(reader.next());
        assert_eq!(reader.element().and_then(|e| e.as_text()), Some(&b"text"[..]));
    }

    #[test]
    fn test_assign_next_skips_comment_before_tag() {
        let mut reader = Reader::new(&b"<a><!-- c --> <b k=\"v\"/></a>"[..]);
        let mut target = Vec::new();
        assert!(reader.next());
        assert!(!reader.assign_next(&mut target));
        // a second call sees the same pending tag
        assert!(!reader.assign_next(&mut target));
        assert!(target.is_empty());
        assert!(reader.next());
        let b = reader.element().and_then(|e| e.as_start()).unwrap();
        assert_eq!(b.name(), b"b");
        assert_eq!(b.attrs().get_str("k"), Some("v"));
        assert!(b.has_end());
        assert!(reader.next());
        assert_eq!(reader.element().and_then(|e| e.name()), Some(&b"a"[..]));
        assert!(!reader.next());
        assert!(reader.error().is_none());
    }

    #[test]
    fn test_truncated_input_is_plain_end() {
        let mut reader = Reader::new(&b"<a><b k=\"v"[..]);
        assert!(reader.next());
        assert!(!reader.next());
        assert!(reader.error().is_none());
        assert!(!reader.next());
    }

    #[test]
    fn test_truncated_input_strict() {
        let mut reader = Reader::new_strict(&b"<a><b k=\"v"[..]);
        assert!(reader.next());
        assert!(!reader.next());
        assert!(matches!(reader.error(), Some(Error::UnexpectedEof { .. })));
        // terminal
        assert!(!reader.next());
        // the half-parsed element went back to the pool
        assert_eq!(reader.idle_elements(), (1, 0));
    }

    #[test]
    fn test_trailing_text_dropped() {
        let mut reader = Reader::new(&b"<a/>tail"[..]);
        assert!(reader.next());
        assert!(!reader.next());
        assert!(reader.error().is_none());

        let mut strict = Reader::new_strict(&b"<a/>tail"[..]);
        assert!(strict.next());
        assert!(!strict.next());
        assert!(strict.error().is_some());
    }

    #[test]
    fn test_read_element() {
        let mut reader = Reader::new(&b"<a>x</a>"[..]);
        let mut names = Vec::new();
        while let Some(element) = reader.read_element().unwrap() {
            names.push(element.to_string());
        }
        assert_eq!(names, vec!["<a>", "x", "</a>"]);
    }

    #[test]
    fn test_small_buffer() {
        let input = b"<bookstore><book category=\"COOKING\"><title>Everyday Italian</title></book></bookstore>";
        let mut reader = Reader::with_capacity(&input[..], 1);
        let mut out = Vec::new();
        while reader.next() {
            reader.element().unwrap().write_to(&mut out).unwrap();
        }
        assert!(reader.error().is_none());
        assert_eq!(out, &input[..]);
    }
}
