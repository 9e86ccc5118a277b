//! Buffered byte scanner using memchr
//!
//! Reads XML from any source implementing the Read trait through a
//! compacting buffer. Delimiter searches run over the buffered window
//! with memchr (SIMD when available):
//! - SSE2 (default x86_64)
//! - AVX2 (runtime detection)
//! - NEON (aarch64)
//!
//! Compaction always keeps the most recently consumed byte, so a single
//! `push_back` is valid at any point after a byte has been consumed.

use crate::error::Error;
use memchr::memchr;
use std::io::{self, Read};

/// Buffer size for reading chunks
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Smallest buffer the scanner accepts
pub const MIN_BUFFER_SIZE: usize = 16;

/// Scanner over a buffered byte source
pub struct Scanner<R> {
    reader: R,
    buffer: Vec<u8>,
    pos: usize,
    end: usize,
    /// Bytes dropped from the front of the buffer by compaction
    base: u64,
    eof: bool,
}

impl<R: Read> Scanner<R> {
    /// Create a new scanner with the default buffer size
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_BUFFER_SIZE)
    }

    /// Create a new scanner with the specified buffer capacity
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Scanner {
            reader,
            buffer: vec![0u8; capacity.max(MIN_BUFFER_SIZE)],
            pos: 0,
            end: 0,
            base: 0,
            eof: false,
        }
    }

    /// Refill the buffer once the window is drained.
    ///
    /// Returns false when the source is exhausted.
    fn fill_buffer(&mut self) -> io::Result<bool> {
        debug_assert_eq!(self.pos, self.end);
        if self.eof {
            return Ok(false);
        }

        // Compact, keeping one byte of lookbehind for push_back
        let keep_from = self.pos.saturating_sub(1);
        if keep_from > 0 {
            self.buffer.copy_within(keep_from..self.end, 0);
            self.end -= keep_from;
            self.pos -= keep_from;
            self.base += keep_from as u64;
        }

        loop {
            match self.reader.read(&mut self.buffer[self.end..]) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(false);
                }
                Ok(read) => {
                    self.end += read;
                    return Ok(true);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Make sure at least one unconsumed byte is buffered
    #[inline]
    fn available(&mut self) -> io::Result<bool> {
        if self.pos < self.end {
            return Ok(true);
        }
        self.fill_buffer()
    }

    /// Consume and return the next byte
    #[inline]
    pub fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if !self.available()? {
            return Ok(None);
        }
        let b = self.buffer[self.pos];
        self.pos += 1;
        Ok(Some(b))
    }

    /// Skip bytes <= 32 and return (consuming) the first byte above it
    pub fn skip_ws(&mut self) -> io::Result<Option<u8>> {
        loop {
            if !self.available()? {
                return Ok(None);
            }
            let window = &self.buffer[self.pos..self.end];
            match window.iter().position(|&b| b > b' ') {
                Some(i) => {
                    let b = window[i];
                    self.pos += i + 1;
                    return Ok(Some(b));
                }
                None => self.pos = self.end,
            }
        }
    }

    /// Un-consume the last consumed byte
    #[inline]
    pub fn push_back(&mut self) {
        debug_assert!(self.pos > 0, "push_back without a consumed byte");
        self.pos = self.pos.saturating_sub(1);
    }

    /// Append bytes up to `delimiter` to `out`, consuming the delimiter.
    ///
    /// Returns false if the input ended first; whatever was read is
    /// still appended.
    pub fn read_until(&mut self, delimiter: u8, out: &mut Vec<u8>) -> io::Result<bool> {
        loop {
            if !self.available()? {
                return Ok(false);
            }
            let window = &self.buffer[self.pos..self.end];
            match memchr(delimiter, window) {
                Some(i) => {
                    out.extend_from_slice(&window[..i]);
                    self.pos += i + 1;
                    return Ok(true);
                }
                None => {
                    out.extend_from_slice(window);
                    self.pos = self.end;
                }
            }
        }
    }

    /// Discard bytes up to and including `delimiter`
    pub fn skip_until(&mut self, delimiter: u8) -> io::Result<bool> {
        loop {
            if !self.available()? {
                return Ok(false);
            }
            match memchr(delimiter, &self.buffer[self.pos..self.end]) {
                Some(i) => {
                    self.pos += i + 1;
                    return Ok(true);
                }
                None => self.pos = self.end,
            }
        }
    }

    /// Total bytes consumed so far
    #[inline]
    pub fn position(&self) -> u64 {
        self.base + self.pos as u64
    }

    /// Build the truncated-input error for the current position
    pub fn eof(&self, expected: &'static str) -> Error {
        Error::UnexpectedEof {
            expected,
            position: self.position(),
        }
    }

    /// Get a reference to the underlying source
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Unwrap the underlying source. Buffered bytes are lost.
    pub fn into_inner(self) -> R {
        self.reader
    }
}
