//! Path-addressed patching of HTML documents.
//!
//! A path is a sequence of items. The first names the root element; each
//! following item is one of:
//!
//! - a plain element name (`connectionStrings`), matched case-insensitively
//! - a filter, `add[@key='Mode']`, matching an element by name and the exact
//!   value of one attribute
//! - an attribute reference, `@value`, allowed only as the last item
//!
//! [`HtmlDocument::set_value`] creates every element the path names but the
//! document lacks. [`HtmlDocument::delete_key`] never creates anything.
//!
//! # Examples
//!
//! ```
//! use htmlpatch::HtmlDocument;
//!
//! let mut doc = HtmlDocument::parse("<html><b>2</b></html>").unwrap();
//! doc.set_value(&["html", "b"], "5").unwrap();
//! doc.set_value(&["html", "c", "@id"], "main").unwrap();
//! assert_eq!(doc.to_string(), "<html><b>5</b><c id=\"main\"></c></html>");
//! ```

mod path;
mod resolve;
mod segment;
mod store;

pub use path::{split_path, DEFAULT_SEPARATOR};
pub use segment::Segment;
pub use store::MarkupStore;

use std::fmt;

use encoding_rs::{Encoding, UTF_8};
use tracing::debug;

use crate::encoding;
use crate::error::{ParseDiagnostic, PatchError, PatchResult};
use crate::html::{parse_html_with_options, HtmlParseOptions};
use crate::serial::html::serialize_html;
use crate::tree::{Document, NodeKind};
use crate::util::names_match;

use resolve::ResolvedPath;

/// How a value set on an element becomes its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentMode {
    /// The value is parsed as markup, so embedded tags become elements.
    #[default]
    Markup,
    /// The value is literal text and is escaped on output.
    Text,
}

/// Options for [`HtmlDocument`].
///
/// ```
/// use htmlpatch::{ContentMode, PatchOptions};
///
/// let opts = PatchOptions::default().content_mode(ContentMode::Text);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PatchOptions {
    /// How element values are installed.
    pub content_mode: ContentMode,
    /// Options for parsing the document and markup values.
    pub parse: HtmlParseOptions,
}

impl PatchOptions {
    /// Sets the content mode.
    #[must_use]
    pub fn content_mode(mut self, mode: ContentMode) -> Self {
        self.content_mode = mode;
        self
    }

    /// Sets the parser options.
    #[must_use]
    pub fn parse_options(mut self, parse: HtmlParseOptions) -> Self {
        self.parse = parse;
        self
    }
}

/// A parsed HTML document that can be patched by path.
#[derive(Debug)]
pub struct HtmlDocument {
    doc: Document,
    options: PatchOptions,
    /// Source encoding and BOM, when built from bytes.
    encoding: &'static Encoding,
    had_bom: bool,
}

impl HtmlDocument {
    /// Parses `source` with default options.
    ///
    /// # Errors
    ///
    /// Returns `PatchError::MalformedDocument` if the source cannot be
    /// parsed or its root element is not `html`.
    pub fn parse(source: &str) -> PatchResult<Self> {
        Self::parse_with_options(source, PatchOptions::default())
    }

    /// Parses `source` with the given options.
    ///
    /// # Errors
    ///
    /// Same as [`HtmlDocument::parse`].
    pub fn parse_with_options(source: &str, options: PatchOptions) -> PatchResult<Self> {
        let doc = parse_html_with_options(source, &options.parse).map_err(|e| {
            PatchError::MalformedDocument {
                message: "markup could not be parsed".to_string(),
                source: Some(e),
            }
        })?;
        check_root(&doc)?;
        debug!(
            nodes = doc.node_count(),
            warnings = doc.diagnostics.len(),
            "parsed document"
        );

        Ok(Self {
            doc,
            options,
            encoding: UTF_8,
            had_bom: false,
        })
    }

    /// Decodes raw bytes (see [`encoding::decode`]) and parses them.
    /// [`HtmlDocument::to_bytes`] writes the result back in the same
    /// encoding.
    ///
    /// # Errors
    ///
    /// Returns `PatchError::Encoding` if the bytes cannot be decoded, and
    /// otherwise the same errors as [`HtmlDocument::parse`].
    pub fn from_bytes(
        bytes: &[u8],
        encoding_label: Option<&str>,
        options: PatchOptions,
    ) -> PatchResult<Self> {
        let decoded = encoding::decode(bytes, encoding_label)?;
        debug!(encoding = decoded.encoding.name(), bom = decoded.had_bom, "decoded input");
        let mut document = Self::parse_with_options(&decoded.text, options)?;
        document.encoding = decoded.encoding;
        document.had_bom = decoded.had_bom;
        Ok(document)
    }

    /// Sets the value at `path`.
    ///
    /// The items between the root and the last one are resolved, and
    /// created when missing. The last item is then applied:
    ///
    /// - `@name` creates or overwrites that attribute. `&quot;`, `&lt;` and
    ///   `&gt;` in `value` are turned into the characters they stand for, so
    ///   pre-escaped values are escaped exactly once on output.
    /// - an element or filter item is found or created, and its content is
    ///   replaced by `value` according to the [`ContentMode`].
    ///
    /// # Errors
    ///
    /// - `InvalidPath` if the path is empty, has a blank item, has only a
    ///   root item, or has an `@` item before the last position
    /// - `RootMismatch` if the first item does not name the root element
    /// - `MalformedDocument` if `value` cannot be parsed as markup
    ///
    /// Path errors are detected before the document is modified.
    pub fn set_value<S: AsRef<str>>(&mut self, path: &[S], value: &str) -> PatchResult<()> {
        let path = ResolvedPath::new(path)?;
        resolve::set_value(&mut self.doc, &path, value, &self.options)
    }

    /// Deletes the element or attribute at `path`.
    ///
    /// Deleting an attribute that does not exist does nothing.
    ///
    /// # Errors
    ///
    /// - `InvalidPath` and `RootMismatch` as for [`HtmlDocument::set_value`]
    /// - `NotFound` if an element named by the path does not exist
    pub fn delete_key<S: AsRef<str>>(&mut self, path: &[S]) -> PatchResult<()> {
        let path = ResolvedPath::new(path)?;
        resolve::delete_key(&mut self.doc, &path)
    }

    /// Reads the value at `path`: an attribute's value or an element's inner
    /// markup. Returns `Ok(None)` if nothing exists there.
    ///
    /// # Errors
    ///
    /// `InvalidPath` and `RootMismatch` as for [`HtmlDocument::set_value`].
    pub fn value<S: AsRef<str>>(&self, path: &[S]) -> PatchResult<Option<String>> {
        let path = ResolvedPath::new(path)?;
        resolve::value(&self.doc, &path)
    }

    /// Returns the underlying tree.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Returns the warnings collected while parsing.
    #[must_use]
    pub fn diagnostics(&self) -> &[ParseDiagnostic] {
        &self.doc.diagnostics
    }

    /// Returns the encoding the document was read in.
    #[must_use]
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Serializes the document and encodes it in its source encoding.
    ///
    /// # Errors
    ///
    /// Returns `PatchError::Encoding` if a new value contains characters the
    /// source encoding cannot represent.
    pub fn to_bytes(&self) -> PatchResult<Vec<u8>> {
        encoding::encode(&serialize_html(&self.doc), self.encoding, self.had_bom)
    }
}

impl fmt::Display for HtmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize_html(&self.doc))
    }
}

/// Requires the first significant top-level node to be an `html` element.
/// Whitespace, comments, declarations and processing instructions before it
/// are allowed.
fn check_root(doc: &Document) -> PatchResult<()> {
    let first = doc.children(doc.root()).find(|&id| match &doc.node(id).kind {
        NodeKind::Text { content } => !content.trim().is_empty(),
        NodeKind::Element { .. } => true,
        _ => false,
    });

    let malformed = |message: String| PatchError::MalformedDocument {
        message,
        source: None,
    };
    match first.map(|id| &doc.node(id).kind) {
        Some(NodeKind::Element { name, .. }) if names_match(name, "html") => Ok(()),
        Some(NodeKind::Element { name, .. }) => Err(malformed(format!(
            "only html documents are supported, found root element <{name}>"
        ))),
        Some(_) => Err(malformed(
            "only html documents are supported, found text before the root element".to_string(),
        )),
        None => Err(malformed("document has no root element".to_string())),
    }
}
