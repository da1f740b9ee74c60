//! # htmlpatch
//!
//! Path-addressed patching of HTML-shaped configuration documents.
//!
//! A document is parsed once by a lenient, lossless parser, then patched with
//! path strings such as `html/connectionStrings/add[@name='Db']/@value`:
//! values are set (creating any missing elements on the way) or elements and
//! attributes are deleted. Serializing the document reproduces everything
//! that was not touched byte for byte.
//!
//! ## Quick Start
//!
//! ```
//! use htmlpatch::HtmlDocument;
//!
//! let mut doc = HtmlDocument::parse(
//!     "<html>\n  <e><item key=\"item1\">1</item><item key=\"item2\">2</item></e>\n</html>",
//! )
//! .unwrap();
//! doc.set_value(&["html", "e", "item[@key='item2']"], "5").unwrap();
//! doc.delete_key(&["html", "e", "item[@key='item1']", "@key"]).unwrap();
//! assert_eq!(
//!     doc.to_string(),
//!     "<html>\n  <e><item>1</item><item key=\"item2\">5</item></e>\n</html>"
//! );
//! ```

pub mod encoding;
pub mod error;
pub mod html;
pub(crate) mod parser;
pub mod patch;
pub mod serial;
pub mod tree;
pub mod util;

// Re-export primary types at the crate root for convenience.
pub use error::{PatchError, PatchResult};
pub use patch::{ContentMode, HtmlDocument, PatchOptions, Segment};
pub use tree::{Attribute, Document, NodeId};
