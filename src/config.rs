//! Reader configuration

use crate::core::scanner::DEFAULT_BUFFER_SIZE;
use crate::reader::pool::SharedPool;

/// Options for constructing a [`Reader`](crate::Reader)
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Size of the read buffer in bytes (clamped to a small minimum)
    pub buffer_capacity: usize,
    /// Report input that ends inside a token as
    /// [`Error::UnexpectedEof`](crate::Error::UnexpectedEof) instead of
    /// treating it as a plain end of input
    pub strict: bool,
    /// Element pool to draw from; `None` gives the reader its own
    pub pool: Option<SharedPool>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            buffer_capacity: DEFAULT_BUFFER_SIZE,
            strict: false,
            pool: None,
        }
    }
}

impl ReaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the read buffer size
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Report truncated input as an error
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Draw elements from `pool`, e.g. [`SharedPool::global`]
    pub fn with_pool(mut self, pool: SharedPool) -> Self {
        self.pool = Some(pool);
        self
    }
}
