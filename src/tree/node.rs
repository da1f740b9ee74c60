//! Node type definitions.
//!
//! The `NodeKind` enum carries the payload for every node in a markup tree.
//! Navigation links (parent, children, siblings) live in `NodeData`.
//!
//! Payloads keep source text verbatim wherever the serializer needs it to
//! reproduce an untouched document exactly: text is never entity-decoded,
//! declarations and processing instructions are stored as written.

use super::Attribute;

/// How an element's start tag was closed in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClose {
    /// Closed by a matching end tag, e.g. `<b>..</b>`.
    EndTag,
    /// Written as `<add ... />`.
    SelfClosing,
    /// No end tag: a void element, an element auto-closed by a sibling,
    /// or one left open at end of input.
    Implicit,
}

/// The kind of a markup node and its associated data.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// The document node. There is exactly one per `Document`.
    Document,

    /// An element node, e.g. `<div class="x">`.
    Element {
        /// The tag name with its original casing.
        name: String,
        /// Attributes in source order.
        attributes: Vec<Attribute>,
        /// How the start tag was closed.
        close: TagClose,
        /// The end tag name when it was written with different casing
        /// (`<Div></DIV>`).
        end_name: Option<String>,
        /// Whitespace between the last attribute and `>` or `/>`.
        trailing_space: String,
    },

    /// Character data, kept exactly as written (entities not decoded).
    Text {
        /// The raw text.
        content: String,
    },

    /// A comment, e.g. `<!-- ... -->`.
    Comment {
        /// The comment text (without the `<!--` and `-->` delimiters).
        content: String,
    },

    /// A markup declaration such as `<!DOCTYPE html>`.
    Declaration {
        /// Everything between `<!` and `>`.
        content: String,
    },

    /// A processing instruction, e.g. `<?xml version="1.0"?>`.
    ProcessingInstruction {
        /// Everything between `<?` and `>`.
        content: String,
    },
}
