//! Error types for reading and writing XML streams.

/// Errors that can occur while tokenizing or serializing
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error from the underlying source or sink
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input ended before a required delimiter was found.
    ///
    /// Only strict readers report this; lenient readers treat it as
    /// a plain end of input.
    #[error("unexpected end of input at byte {position}: expected {expected}")]
    UnexpectedEof {
        /// What the tokenizer was looking for
        expected: &'static str,
        /// Bytes consumed when the input ran out
        position: u64,
    },
}

impl Error {
    /// True if this error only reports truncated input
    pub fn is_eof(&self) -> bool {
        matches!(self, Error::UnexpectedEof { .. })
    }
}

/// Result type alias for pullxml operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::UnexpectedEof {
            expected: "'>'",
            position: 12,
        };
        assert_eq!(
            err.to_string(),
            "unexpected end of input at byte 12: expected '>'"
        );
        assert!(err.is_eof());
    }

    #[test]
    fn test_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_eof());
    }
}
