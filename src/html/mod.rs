//! Error-tolerant, lossless HTML parser.
//!
//! Configuration documents are HTML-shaped but written by hand, so the
//! parser accepts the usual HTML shortcuts:
//!
//! - Missing closing tags (auto-closed based on HTML content model rules)
//! - Unquoted attribute values (`<div class=main>`)
//! - Void elements that never need closing (`<br>`, `<meta>`, ...)
//! - Case-insensitive end-tag matching
//! - Boolean attributes without values (`<input disabled>`)
//!
//! Unlike a browser-style parser it never invents structure (no implied
//! `html`/`head`/`body`) and never rewrites what it keeps: tag and attribute
//! names retain their casing, text keeps its entities and whitespace, and
//! every start tag remembers how it was closed. Serializing an untouched
//! tree gives back the input.
//!
//! # Examples
//!
//! ```
//! use htmlpatch::html::parse_html;
//!
//! let doc = parse_html("<html><BODY class=x>Hi</BODY></html>").unwrap();
//! let html = doc.root_element().unwrap();
//! let body = doc.first_child(html).unwrap();
//! assert_eq!(doc.node_name(body), Some("BODY"));
//! assert_eq!(doc.attribute(body, "class"), Some("x"));
//! ```

pub mod entities;

use crate::error::{ErrorSeverity, ParseError};
use crate::parser::input::{ParserInput, DEFAULT_MAX_DEPTH};
use crate::tree::{Attribute, AttributeQuote, Document, NodeId, NodeKind, TagClose};
use crate::util::names_match;

/// Options controlling HTML parser behavior.
///
/// Use the builder pattern to configure options:
///
/// ```
/// use htmlpatch::html::HtmlParseOptions;
///
/// let opts = HtmlParseOptions::default()
///     .recover(false)
///     .max_depth(64);
/// ```
#[derive(Debug, Clone)]
pub struct HtmlParseOptions {
    /// If true, malformed markup is repaired and reported as a warning.
    /// If false, the first such problem fails the parse.
    pub recover: bool,
    /// If true, suppress warning diagnostics.
    pub no_warnings: bool,
    /// Maximum element nesting depth.
    pub max_depth: u32,
}

impl Default for HtmlParseOptions {
    fn default() -> Self {
        Self {
            recover: true,
            no_warnings: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl HtmlParseOptions {
    /// Enables or disables error recovery mode.
    #[must_use]
    pub fn recover(mut self, yes: bool) -> Self {
        self.recover = yes;
        self
    }

    /// Enables or disables warning suppression.
    #[must_use]
    pub fn no_warnings(mut self, yes: bool) -> Self {
        self.no_warnings = yes;
        self
    }

    /// Sets the maximum element nesting depth.
    #[must_use]
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Parses an HTML string into a `Document` with default options.
///
/// # Errors
///
/// Returns `ParseError` only when the nesting depth limit is exceeded.
pub fn parse_html(input: &str) -> Result<Document, ParseError> {
    parse_html_with_options(input, &HtmlParseOptions::default())
}

/// Parses an HTML string into a `Document` with the given options.
///
/// The same entry point parses whole documents and inner-content fragments;
/// a fragment's top-level nodes become children of the document node.
///
/// # Errors
///
/// Returns `ParseError` if the depth limit is exceeded, or on the first
/// malformed construct when recovery is disabled.
pub fn parse_html_with_options(
    input: &str,
    options: &HtmlParseOptions,
) -> Result<Document, ParseError> {
    HtmlParser::new(input, options).parse()
}

/// Parses inner content (element children) such as `<b>bold</b> tail`.
///
/// The fragment's top-level nodes become children of the returned
/// document's document node, ready for [`Document::append_document`].
///
/// # Errors
///
/// Same as [`parse_html_with_options`].
pub fn parse_fragment(input: &str, options: &HtmlParseOptions) -> Result<Document, ParseError> {
    parse_html_with_options(input, options)
}

// --- Element categories ---

/// Returns true if the given tag name (lowercase) is a void element that
/// must not have content.
pub(crate) fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
            | "basefont"
            | "frame"
            | "isindex"
    )
}

/// Returns true if `tag` is an element whose opening auto-closes `open_tag`.
///
/// See the HTML 4.01 DTD for the optional end tag rules.
pub(crate) fn auto_closes(open_tag: &str, tag: &str) -> bool {
    match open_tag {
        "p" => matches!(
            tag,
            "p" | "div"
                | "ul"
                | "ol"
                | "dl"
                | "pre"
                | "table"
                | "blockquote"
                | "address"
                | "h1"
                | "h2"
                | "h3"
                | "h4"
                | "h5"
                | "h6"
                | "hr"
                | "form"
                | "fieldset"
                | "section"
                | "article"
                | "aside"
                | "header"
                | "footer"
                | "nav"
                | "figure"
                | "main"
                | "details"
        ),
        "li" => tag == "li",
        "dt" => matches!(tag, "dt" | "dd"),
        "dd" => tag == "dt",
        "tr" => tag == "tr",
        "td" | "th" => matches!(tag, "td" | "th" | "tr"),
        "thead" | "tbody" => matches!(tag, "tbody" | "tfoot"),
        "tfoot" => tag == "tbody",
        "option" => matches!(tag, "option" | "optgroup"),
        "optgroup" => tag == "optgroup",
        "head" => matches!(tag, "body" | "frameset"),
        _ => false,
    }
}

/// Returns true if `tag` is a raw text element whose content is not parsed
/// as markup.
pub(crate) fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

// --- The HTML Parser ---

/// The parser state machine.
struct HtmlParser<'a> {
    /// Low-level input cursor.
    input: ParserInput<'a>,
    /// The document being built.
    doc: Document,
    /// Parser options.
    options: HtmlParseOptions,
    /// Stack of open element node IDs and their lowercase tag names.
    open_elements: Vec<(NodeId, String)>,
    /// Set when a fatal error occurs; stops parsing.
    fatal_error: Option<ParseError>,
}

impl<'a> HtmlParser<'a> {
    fn new(input: &'a str, options: &HtmlParseOptions) -> Self {
        let mut pi = ParserInput::new(input);
        pi.set_max_depth(options.max_depth);

        Self {
            input: pi,
            doc: Document::new(),
            options: options.clone(),
            open_elements: Vec::new(),
            fatal_error: None,
        }
    }

    fn parse(mut self) -> Result<Document, ParseError> {
        self.parse_content();

        // Elements still open at end of input keep `TagClose::Implicit`.
        while let Some((_, tag)) = self.open_elements.pop() {
            self.push_warning(format!("unclosed element <{tag}> at end of document"));
        }

        if let Some(mut err) = self.fatal_error.take() {
            err.diagnostics = std::mem::take(&mut self.doc.diagnostics);
            return Err(err);
        }

        Ok(self.doc)
    }

    /// Returns the current insertion point (the innermost open element, or
    /// the document node).
    fn current_parent(&self) -> NodeId {
        self.open_elements
            .last()
            .map_or_else(|| self.doc.root(), |&(id, _)| id)
    }

    fn append(&mut self, kind: NodeKind) -> NodeId {
        let parent = self.current_parent();
        let id = self.doc.create_node(kind);
        self.doc.append_child(parent, id);
        id
    }

    /// Returns true if the cursor sits on something that starts markup
    /// rather than text.
    fn at_markup(&self) -> bool {
        if self.input.peek() != Some(b'<') {
            return false;
        }
        match self.input.peek_at(1) {
            Some(b'!' | b'?') => true,
            Some(b'/') => self.input.peek_at(2).is_some_and(|b| b.is_ascii_alphabetic()),
            Some(b) => b.is_ascii_alphabetic(),
            None => false,
        }
    }

    fn parse_content(&mut self) {
        while !self.input.at_end() && self.fatal_error.is_none() {
            if !self.at_markup() {
                self.parse_text();
            } else if self.input.looking_at(b"<!--") {
                self.parse_comment();
            } else if self.input.looking_at(b"<!") {
                self.parse_declaration();
            } else if self.input.looking_at(b"<?") {
                self.parse_processing_instruction();
            } else if self.input.looking_at(b"</") {
                self.parse_end_tag();
            } else {
                self.parse_start_tag();
            }
        }
    }

    // --- Text ---

    fn parse_text(&mut self) {
        let start = self.input.pos();
        // The first character is text even if it is a lone '<'.
        self.input.advance_char();
        loop {
            match self.input.find("<") {
                Some(next) => {
                    self.input.advance_to(next);
                    if self.at_markup() {
                        break;
                    }
                    self.input.advance_char();
                }
                None => {
                    self.input.advance_to(usize::MAX);
                    break;
                }
            }
        }
        let content = self.input.slice(start, self.input.pos()).to_string();
        self.append(NodeKind::Text { content });
    }

    /// Reads raw content of `script`/`style` up to its end tag.
    fn parse_raw_text(&mut self, tag: &str) {
        let start = self.input.pos();
        let end_tag = format!("</{tag}");
        loop {
            match self.input.find("</") {
                Some(next) => {
                    self.input.advance_to(next);
                    if self.input.looking_at_ci(end_tag.as_bytes()) {
                        break;
                    }
                    self.input.advance(2);
                }
                None => {
                    self.input.advance_to(usize::MAX);
                    break;
                }
            }
        }
        if self.input.pos() > start {
            let content = self.input.slice(start, self.input.pos()).to_string();
            self.append(NodeKind::Text { content });
        }
    }

    // --- Comments, declarations, processing instructions ---

    fn parse_comment(&mut self) {
        let start = self.input.pos();
        self.input.advance(4); // consume '<!--'
        match self.input.find("-->") {
            Some(end) => {
                let content = self.input.slice(start + 4, end).to_string();
                self.input.advance_to(end + 3);
                self.append(NodeKind::Comment { content });
            }
            None => self.keep_unterminated(start, "unterminated comment"),
        }
    }

    fn parse_declaration(&mut self) {
        let start = self.input.pos();
        self.input.advance(2); // consume '<!'
        let end = if self.input.looking_at(b"[CDATA[") {
            self.input.find("]]>").map(|p| p + 2)
        } else {
            self.input.find(">")
        };
        match end {
            Some(end) => {
                let content = self.input.slice(start + 2, end).to_string();
                self.input.advance_to(end + 1);
                self.append(NodeKind::Declaration { content });
            }
            None => self.keep_unterminated(start, "unterminated markup declaration"),
        }
    }

    fn parse_processing_instruction(&mut self) {
        let start = self.input.pos();
        self.input.advance(2); // consume '<?'
        match self.input.find(">") {
            Some(end) => {
                let content = self.input.slice(start + 2, end).to_string();
                self.input.advance_to(end + 1);
                self.append(NodeKind::ProcessingInstruction { content });
            }
            None => self.keep_unterminated(start, "unterminated processing instruction"),
        }
    }

    /// Keeps the rest of the input as text when a construct never ends.
    fn keep_unterminated(&mut self, start: usize, message: &str) {
        self.push_warning(message.to_string());
        self.input.advance_to(usize::MAX);
        let content = self.input.slice(start, self.input.pos()).to_string();
        self.append(NodeKind::Text { content });
    }

    // --- Start Tag ---

    fn parse_start_tag(&mut self) {
        self.input.advance(1); // consume '<'
        let tag = self.parse_tag_name().to_string();
        let lower_tag = tag.to_ascii_lowercase();

        let (attributes, trailing_space) = self.parse_attributes();

        let self_closing = self.input.looking_at(b"/>");
        if self_closing {
            self.input.advance(1);
        }

        if self.input.peek() == Some(b'>') {
            self.input.advance(1);
        } else if !self.input.at_end() {
            self.push_warning(format!("expected '>' after tag <{tag}>"));
            self.skip_to_gt();
        }

        self.handle_auto_close(&lower_tag);

        let elem_id = self.append(NodeKind::Element {
            name: tag,
            attributes,
            close: if self_closing {
                TagClose::SelfClosing
            } else {
                TagClose::Implicit
            },
            end_name: None,
            trailing_space: trailing_space.to_string(),
        });

        if self_closing || is_void_element(&lower_tag) {
            return;
        }

        if let Err(e) = self.input.increment_depth() {
            self.fatal_error = Some(e);
            return;
        }
        self.open_elements.push((elem_id, lower_tag.clone()));

        if is_raw_text_element(&lower_tag) {
            self.parse_raw_text(&lower_tag);
        }
    }

    /// Pops open elements that the new element implicitly closes.
    fn handle_auto_close(&mut self, new_tag: &str) {
        while self
            .open_elements
            .last()
            .is_some_and(|(_, open_tag)| auto_closes(open_tag, new_tag))
        {
            self.open_elements.pop();
            self.input.decrement_depth();
        }
    }

    // --- End Tag ---

    fn parse_end_tag(&mut self) {
        self.input.advance(2); // consume '</'
        let tag = self.parse_tag_name().to_string();
        let lower_tag = tag.to_ascii_lowercase();

        self.input.skip_whitespace();
        if self.input.peek() == Some(b'>') {
            self.input.advance(1);
        } else if !self.input.at_end() {
            self.push_warning(format!("expected '>' after end tag </{tag}>"));
            self.skip_to_gt();
        }

        let found = self
            .open_elements
            .iter()
            .rposition(|(_, name)| *name == lower_tag);

        if let Some(idx) = found {
            let closed: Vec<String> = self.open_elements[idx + 1..]
                .iter()
                .map(|(_, name)| name.clone())
                .collect();
            for name in closed {
                self.push_warning(format!("implicitly closing <{name}> before </{tag}>"));
            }
            let (elem_id, _) = self.open_elements[idx];
            self.mark_end_tag(elem_id, &tag);
            for _ in idx..self.open_elements.len() {
                self.input.decrement_depth();
            }
            self.open_elements.truncate(idx);
        } else if let Some(void_id) = self.preceding_void_element(&lower_tag) {
            // `<link ...></link>`: keep the explicit end tag.
            self.mark_end_tag(void_id, &tag);
        } else {
            self.push_warning(format!("stray end tag </{tag}>"));
        }
    }

    /// Returns the void element named `lower_tag` that directly precedes the
    /// cursor, if its start tag is still waiting for an end tag.
    fn preceding_void_element(&self, lower_tag: &str) -> Option<NodeId> {
        if !is_void_element(lower_tag) {
            return None;
        }
        let last = self.doc.last_child(self.current_parent())?;
        match &self.doc.node(last).kind {
            NodeKind::Element { name, close, .. }
                if *close == TagClose::Implicit && name.eq_ignore_ascii_case(lower_tag) =>
            {
                Some(last)
            }
            _ => None,
        }
    }

    fn mark_end_tag(&mut self, elem_id: NodeId, written: &str) {
        if let NodeKind::Element {
            name,
            close,
            end_name,
            ..
        } = &mut self.doc.node_mut(elem_id).kind
        {
            *close = TagClose::EndTag;
            if name.as_str() != written {
                *end_name = Some(written.to_string());
            }
        }
    }

    // --- Attributes ---

    /// Parses the attributes of a start tag. Also returns the whitespace
    /// that follows the last attribute.
    fn parse_attributes(&mut self) -> (Vec<Attribute>, &'a str) {
        let mut attributes: Vec<Attribute> = Vec::new();

        loop {
            let space_start = self.input.pos();
            self.input.skip_whitespace();
            let space_before = self.input.slice(space_start, self.input.pos());

            if self.input.at_end()
                || self.input.peek() == Some(b'>')
                || self.input.looking_at(b"/>")
            {
                return (attributes, space_before);
            }

            let name = self.parse_attr_name();
            if name.is_empty() {
                // Skip the bad character and continue
                self.input.advance_char();
                continue;
            }

            // Whitespace after a bare attribute belongs to the next one.
            let has_value = self
                .input
                .remaining()
                .trim_start_matches([' ', '\t', '\r', '\n', '\x0C'])
                .starts_with('=');

            let (value, raw_value, quote) = if has_value {
                self.input.skip_whitespace();
                self.input.advance(1);
                self.input.skip_whitespace();
                self.parse_attr_value()
            } else {
                (String::new(), None, AttributeQuote::Bare)
            };

            if attributes.iter().any(|a| names_match(&a.name, name)) {
                self.push_warning(format!("duplicate attribute {name} dropped"));
                continue;
            }

            attributes.push(Attribute {
                name: name.to_string(),
                value,
                raw_value,
                quote,
                space_before: space_before.to_string(),
            });
        }
    }

    /// Parses an attribute name (sequence of non-whitespace, non-special chars).
    fn parse_attr_name(&mut self) -> &'a str {
        let start = self.input.pos();
        while let Some(b) = self.input.peek() {
            if matches!(
                b,
                b' ' | b'\t' | b'\r' | b'\n' | b'\x0C' | b'=' | b'>' | b'/' | b'<' | b'"' | b'\''
            ) {
                break;
            }
            self.input.advance_char();
        }
        self.input.slice(start, self.input.pos())
    }

    /// Parses a quoted or unquoted attribute value. Returns the decoded
    /// value, the raw source text and the quoting style.
    fn parse_attr_value(&mut self) -> (String, Option<String>, AttributeQuote) {
        let quote = match self.input.peek() {
            Some(b'"') => Some((b'"', AttributeQuote::Double)),
            Some(b'\'') => Some((b'\'', AttributeQuote::Single)),
            _ => None,
        };

        if let Some((q, style)) = quote {
            self.input.advance(1); // consume opening quote
            let start = self.input.pos();
            let delimiter = if q == b'"' { "\"" } else { "'" };
            let raw = match self.input.find(delimiter) {
                Some(end) => {
                    let raw = self.input.slice(start, end);
                    self.input.advance_to(end + 1);
                    raw
                }
                None => {
                    self.push_warning("unterminated attribute value".to_string());
                    self.input.advance_to(usize::MAX);
                    self.input.slice(start, self.input.pos())
                }
            };
            return (entities::decode_references(raw), Some(raw.to_string()), style);
        }

        let start = self.input.pos();
        while let Some(b) = self.input.peek() {
            if matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b'\x0C' | b'>' | b'<' | b'`') {
                break;
            }
            self.input.advance_char();
        }
        let raw = self.input.slice(start, self.input.pos());
        (
            entities::decode_references(raw),
            Some(raw.to_string()),
            AttributeQuote::Unquoted,
        )
    }

    // --- Helpers ---

    /// Parses a tag name: letters, digits, `-`, `_`, `:` and `.`.
    fn parse_tag_name(&mut self) -> &'a str {
        self.input
            .take_while_ascii(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.'))
    }

    /// Skips forward to and past the next `>` character.
    fn skip_to_gt(&mut self) {
        match self.input.find(">") {
            Some(end) => self.input.advance_to(end + 1),
            None => self.input.advance_to(usize::MAX),
        }
    }

    /// Records a warning, or fails the parse when recovery is disabled.
    fn push_warning(&mut self, message: String) {
        if !self.options.recover {
            if self.fatal_error.is_none() {
                self.fatal_error = Some(self.input.fatal(message));
            }
            return;
        }
        if self.options.no_warnings {
            return;
        }
        let diagnostic = self.input.diagnostic(ErrorSeverity::Warning, message);
        self.doc.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> Document {
        parse_html(input).unwrap_or_else(|e| panic!("parse failed: {e}"))
    }

    fn element_close(doc: &Document, id: NodeId) -> TagClose {
        match &doc.node(id).kind {
            NodeKind::Element { close, .. } => *close,
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_simple_document() {
        let doc = parse("<html><b>2</b></html>");
        let html = doc.root_element().unwrap();
        assert_eq!(doc.node_name(html), Some("html"));
        let b = doc.first_child(html).unwrap();
        assert_eq!(doc.node_name(b), Some("b"));
        assert_eq!(doc.node_text(doc.first_child(b).unwrap()), Some("2"));
        assert_eq!(element_close(&doc, b), TagClose::EndTag);
    }

    #[test]
    fn test_no_implied_structure() {
        let doc = parse("<p>Hello</p>");
        let first = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.node_name(first), Some("p"));
    }

    #[test]
    fn test_names_keep_casing() {
        let doc = parse("<connectionStrings><Add Name=\"x\"/></connectionStrings>");
        let cs = doc.root_element().unwrap();
        assert_eq!(doc.node_name(cs), Some("connectionStrings"));
        let add = doc.first_child(cs).unwrap();
        assert_eq!(doc.node_name(add), Some("Add"));
        assert_eq!(doc.attributes(add)[0].name, "Name");
        assert_eq!(element_close(&doc, add), TagClose::SelfClosing);
    }

    #[test]
    fn test_whitespace_text_is_kept() {
        let doc = parse("<html>\n  <a>1</a>\n</html>");
        let html = doc.root_element().unwrap();
        let children: Vec<_> = doc.children(html).collect();
        assert_eq!(children.len(), 3);
        assert_eq!(doc.node_text(children[0]), Some("\n  "));
        assert_eq!(doc.node_text(children[2]), Some("\n"));
    }

    #[test]
    fn test_text_entities_are_not_decoded() {
        let doc = parse("<p>a &amp; b &lt; c</p>");
        let p = doc.root_element().unwrap();
        assert_eq!(doc.node_text(doc.first_child(p).unwrap()), Some("a &amp; b &lt; c"));
    }

    #[test]
    fn test_lone_angle_bracket_is_text() {
        let doc = parse("<p>1 < 2</p>");
        let p = doc.root_element().unwrap();
        let children: Vec<_> = doc.children(p).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(doc.node_text(children[0]), Some("1 < 2"));
    }

    #[test]
    fn test_void_elements() {
        let doc = parse("<p>line1<br>line2</p>");
        let p = doc.root_element().unwrap();
        let children: Vec<_> = doc.children(p).collect();
        assert_eq!(children.len(), 3);
        assert_eq!(doc.node_name(children[1]), Some("br"));
        assert_eq!(element_close(&doc, children[1]), TagClose::Implicit);
    }

    #[test]
    fn test_void_element_with_end_tag_is_kept() {
        let doc = parse("<head><link href=a></link></head>");
        let head = doc.root_element().unwrap();
        let link = doc.first_child(head).unwrap();
        assert_eq!(element_close(&doc, link), TagClose::EndTag);
        assert!(doc.diagnostics.is_empty());
    }

    #[test]
    fn test_attribute_forms() {
        let doc = parse("<div class=main id='c' title=\"a&amp;b\" hidden>t</div>");
        let div = doc.root_element().unwrap();
        let attrs = doc.attributes(div);
        assert_eq!(attrs.len(), 4);
        assert_eq!(attrs[0].quote, AttributeQuote::Unquoted);
        assert_eq!(attrs[0].value, "main");
        assert_eq!(attrs[1].quote, AttributeQuote::Single);
        assert_eq!(attrs[2].value, "a&b");
        assert_eq!(attrs[2].raw_value.as_deref(), Some("a&amp;b"));
        assert_eq!(attrs[3].quote, AttributeQuote::Bare);
        assert_eq!(attrs[3].value, "");
    }

    #[test]
    fn test_duplicate_attribute_dropped() {
        let doc = parse("<a key=1 KEY=2></a>");
        let a = doc.root_element().unwrap();
        assert_eq!(doc.attributes(a).len(), 1);
        assert_eq!(doc.attribute(a, "key"), Some("1"));
        assert_eq!(doc.diagnostics.len(), 1);
    }

    #[test]
    fn test_case_insensitive_end_tag() {
        let doc = parse("<Div><P>Hello</p></DIV>");
        let div = doc.root_element().unwrap();
        assert_eq!(element_close(&doc, div), TagClose::EndTag);
        match &doc.node(div).kind {
            NodeKind::Element { end_name, .. } => assert_eq!(end_name.as_deref(), Some("DIV")),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_li_auto_closes_li() {
        let doc = parse("<ul><li>A<li>B<li>C</ul>");
        let ul = doc.root_element().unwrap();
        let items: Vec<_> = doc.children(ul).collect();
        assert_eq!(items.len(), 3);
        for item in items {
            assert_eq!(element_close(&doc, item), TagClose::Implicit);
        }
    }

    #[test]
    fn test_p_auto_closes_p() {
        let doc = parse("<body><p>First<p>Second</body>");
        let body = doc.root_element().unwrap();
        let children: Vec<_> = doc.children(body).collect();
        assert_eq!(children.len(), 2);
        assert_eq!(doc.node_name(children[1]), Some("p"));
    }

    #[test]
    fn test_missing_closing_tags() {
        let doc = parse("<div><p>Hello");
        let div = doc.root_element().unwrap();
        let p = doc.first_child(div).unwrap();
        assert_eq!(doc.node_name(p), Some("p"));
        assert_eq!(element_close(&doc, div), TagClose::Implicit);
        assert_eq!(doc.diagnostics.len(), 2);
    }

    #[test]
    fn test_comment_and_doctype() {
        let doc = parse("<!DOCTYPE html><!-- note --><html></html>");
        let children: Vec<_> = doc.children(doc.root()).collect();
        assert_eq!(children.len(), 3);
        assert!(matches!(
            &doc.node(children[0]).kind,
            NodeKind::Declaration { content } if content == "DOCTYPE html"
        ));
        assert_eq!(doc.node_text(children[1]), Some(" note "));
    }

    #[test]
    fn test_cdata_section() {
        let doc = parse("<x><![CDATA[a > b]]></x>");
        let x = doc.root_element().unwrap();
        let child = doc.first_child(x).unwrap();
        assert_eq!(doc.node_text(child), Some("[CDATA[a > b]]"));
    }

    #[test]
    fn test_processing_instruction() {
        let doc = parse("<?xml version=\"1.0\"?><html/>");
        let first = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.node_text(first), Some("xml version=\"1.0\"?"));
    }

    #[test]
    fn test_unterminated_comment_kept_as_text() {
        let doc = parse("<html><!-- open");
        let html = doc.root_element().unwrap();
        let child = doc.first_child(html).unwrap();
        assert_eq!(doc.node_text(child), Some("<!-- open"));
    }

    #[test]
    fn test_script_raw_text() {
        let doc = parse("<script>if (a < b && c) { x = '</p>'; }</script>");
        let script = doc.root_element().unwrap();
        let children: Vec<_> = doc.children(script).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(
            doc.node_text(children[0]),
            Some("if (a < b && c) { x = '</p>'; }")
        );
        assert_eq!(element_close(&doc, script), TagClose::EndTag);
    }

    #[test]
    fn test_stray_end_tag() {
        let doc = parse("</div><p>text</p>");
        let p = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.node_name(p), Some("p"));
        assert!(!doc.diagnostics.is_empty());
    }

    #[test]
    fn test_no_warnings_option() {
        let opts = HtmlParseOptions::default().no_warnings(true);
        let doc = parse_html_with_options("</div><p>text", &opts).unwrap();
        assert!(doc.diagnostics.is_empty());
    }

    #[test]
    fn test_strict_mode_fails_on_malformed_markup() {
        let opts = HtmlParseOptions::default().recover(false);
        let err = parse_html_with_options("<html><b>x</html>", &opts).unwrap_err();
        assert_eq!(err.message, "implicitly closing <b> before </html>");
    }

    #[test]
    fn test_depth_limit() {
        let opts = HtmlParseOptions::default().max_depth(3);
        let err = parse_html_with_options("<a><b><c><d></d></c></b></a>", &opts).unwrap_err();
        assert_eq!(err.message, "maximum nesting depth exceeded (3)");
    }
}
