//! HTML serializer.
//!
//! Serializes a `Document` tree into an HTML string. The parser keeps
//! everything the serializer needs to reproduce its input:
//!
//! - Text, comments, declarations and processing instructions are written
//!   verbatim (text is stored with its entities undecoded)
//! - Attributes reuse their raw source text and quote style until a value
//!   is replaced, after which the value is escaped for its quote
//! - Each element is closed the way its start tag was closed in the source;
//!   elements created by patching get an explicit end tag
//! - An implicitly closed element gets an end tag once it is followed by a
//!   sibling that would not close it on reparse

use crate::html::entities::escape_attribute;
use crate::html::{auto_closes, is_void_element};
use crate::tree::{Attribute, AttributeQuote, Document, NodeId, NodeKind, TagClose};

/// Serializes a document to an HTML string.
///
/// # Examples
///
/// ```
/// use htmlpatch::html::parse_html;
/// use htmlpatch::serial::html::serialize_html;
///
/// let input = "<html>\n  <Add key='a' />\n</html>";
/// let doc = parse_html(input).unwrap();
/// assert_eq!(serialize_html(&doc), input);
/// ```
#[must_use]
pub fn serialize_html(doc: &Document) -> String {
    let mut output = String::new();
    for child in doc.children(doc.root()) {
        serialize_html_node(doc, child, &mut output);
    }
    output
}

/// Serializes the children of a node (its inner markup).
#[must_use]
pub fn inner_html(doc: &Document, id: NodeId) -> String {
    let mut output = String::new();
    for child in doc.children(id) {
        serialize_html_node(doc, child, &mut output);
    }
    output
}

fn serialize_html_node(doc: &Document, id: NodeId, out: &mut String) {
    match &doc.node(id).kind {
        NodeKind::Element {
            name,
            attributes,
            close,
            end_name,
            trailing_space,
        } => {
            let has_children = doc.first_child(id).is_some();

            out.push('<');
            out.push_str(name);
            for attr in attributes {
                write_attribute(out, attr);
            }
            out.push_str(trailing_space);

            if *close == TagClose::SelfClosing && !has_children {
                out.push_str("/>");
                return;
            }
            out.push('>');

            for child in doc.children(id) {
                serialize_html_node(doc, child, out);
            }

            let needs_end_tag = match close {
                TagClose::EndTag | TagClose::SelfClosing => true,
                TagClose::Implicit => {
                    let lower = name.to_ascii_lowercase();
                    if is_void_element(&lower) {
                        has_children
                    } else {
                        doc.next_sibling(id)
                            .is_some_and(|next| !closes_implicitly(doc, &lower, next))
                    }
                }
            };
            if needs_end_tag {
                out.push_str("</");
                out.push_str(end_name.as_deref().unwrap_or(name));
                out.push('>');
            }
        }
        NodeKind::Text { content } => out.push_str(content),
        NodeKind::Comment { content } => {
            out.push_str("<!--");
            out.push_str(content);
            out.push_str("-->");
        }
        NodeKind::Declaration { content } => {
            out.push_str("<!");
            out.push_str(content);
            out.push('>');
        }
        NodeKind::ProcessingInstruction { content } => {
            out.push_str("<?");
            out.push_str(content);
            out.push('>');
        }
        NodeKind::Document => {
            for child in doc.children(id) {
                serialize_html_node(doc, child, out);
            }
        }
    }
}

/// Returns true if `next` starts an element whose start tag closes an open
/// `open_tag` element.
fn closes_implicitly(doc: &Document, open_tag: &str, next: NodeId) -> bool {
    match &doc.node(next).kind {
        NodeKind::Element { name, .. } => auto_closes(open_tag, &name.to_ascii_lowercase()),
        _ => false,
    }
}

fn write_attribute(out: &mut String, attr: &Attribute) {
    out.push_str(&attr.space_before);
    out.push_str(&attr.name);

    let quote = match attr.quote {
        AttributeQuote::Bare => return,
        AttributeQuote::Unquoted => {
            out.push('=');
            match &attr.raw_value {
                Some(raw) => out.push_str(raw),
                None => {
                    out.push('"');
                    escape_attribute(&attr.value, '"', out);
                    out.push('"');
                }
            }
            return;
        }
        AttributeQuote::Double => '"',
        AttributeQuote::Single => '\'',
    };

    out.push('=');
    out.push(quote);
    match &attr.raw_value {
        Some(raw) => out.push_str(raw),
        None => escape_attribute(&attr.value, quote, out),
    }
    out.push(quote);
}
