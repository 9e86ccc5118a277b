//! XML Reader Module
//!
//! - Events: element types handed out by the reader
//! - Pool: free lists recycling start/end elements between reads
//! - Pull: the streaming pull reader

pub mod events;
pub mod pool;
pub mod pull;
