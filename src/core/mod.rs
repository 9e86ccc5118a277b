//! Core XML parsing primitives
//!
//! - Scanner: buffered byte cursor with memchr delimiter search and
//!   one byte of push-back
//! - Attributes: `key="value"` parsing into reusable buffers

pub mod attributes;
pub mod scanner;
