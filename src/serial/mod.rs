//! Markup serialization.
//!
//! Serializes a `Document` tree back to text. Nodes that came from the
//! parser are written exactly as they were read; nodes created or modified
//! afterwards are rendered in a canonical form.

pub mod html;

pub use html::{inner_html, serialize_html};
