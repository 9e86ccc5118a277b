//! pullxml - Streaming pull-style XML tokenizer
//!
//! Turns a byte stream into start, end and text elements without building
//! a tree. Start and end elements are recycled through a pool, text is a
//! view into the reader's buffer, and `assign_next` copies a text run
//! straight into a caller's field.
//!
//! Not a validating parser: no entity decoding, no namespaces, no CDATA,
//! no tag balance checks. `<?...>` and `<!...>` are skipped to the next
//! `>`.
//!
//! ```
//! use pullxml::{Element, Reader};
//!
//! let xml = r#"<book category="WEB"><title lang="en">Learning XML</title></book>"#;
//! let mut reader = Reader::new(xml.as_bytes());
//! let mut category = String::new();
//! let mut title = String::new();
//!
//! while reader.next() {
//!     let wants_title = match reader.element() {
//!         Some(Element::Start(start)) if start.name() == b"book" => {
//!             category = start.attrs().get_str("category").unwrap_or_default().to_owned();
//!             false
//!         }
//!         Some(Element::Start(start)) => start.name() == b"title",
//!         _ => false,
//!     };
//!     if wants_title {
//!         reader.assign_next(&mut title);
//!     }
//! }
//!
//! assert!(reader.error().is_none());
//! assert_eq!(category, "WEB");
//! assert_eq!(title, "Learning XML");
//! ```

pub mod config;
mod core;
pub mod error;
pub mod reader;
pub mod writer;

pub use config::ReaderConfig;
pub use crate::core::attributes::{Attrs, KV};
pub use error::{Error, Result};
pub use reader::events::{Element, EndElement, OwnedElement, StartElement, TextElement};
pub use reader::pool::{ElementPool, SharedPool};
pub use reader::pull::{Reader, TextSink};
pub use writer::Writer;
