//! The tree operations path resolution needs.
//!
//! [`MarkupStore`] is the seam between the resolver and a concrete tree.
//! The crate's own arena [`Document`] implements it; any other tree that
//! can name elements, look up children and attributes, and replace inner
//! content can be patched by the same resolver.

use crate::error::{PatchError, PatchResult};
use crate::html::entities::escape_text;
use crate::html::{parse_fragment, HtmlParseOptions};
use crate::serial::html::inner_html;
use crate::tree::{Document, NodeId, NodeKind};

/// A mutable markup tree that paths can be resolved against.
pub trait MarkupStore {
    /// Handle to a node of the tree.
    type Node: Copy + Eq + std::fmt::Debug;

    /// Returns the root element.
    fn root_element(&self) -> Option<Self::Node>;

    /// Returns the name of an element.
    fn element_name(&self, node: Self::Node) -> &str;

    /// Returns the element children of `node`, in order.
    fn element_children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Returns an attribute value, matching the name case-insensitively.
    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;

    /// Creates an empty element named `name` and appends it to `parent`.
    fn append_element(&mut self, parent: Self::Node, name: &str) -> Self::Node;

    /// Creates or overwrites an attribute.
    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str);

    /// Removes an attribute. Returns `true` if it existed.
    fn remove_attribute(&mut self, node: Self::Node, name: &str) -> bool;

    /// Detaches a node, with its subtree, from the tree.
    fn remove_node(&mut self, node: Self::Node);

    /// Removes all content of an element.
    fn clear_content(&mut self, node: Self::Node);

    /// Replaces the content of an element with parsed markup.
    ///
    /// # Errors
    ///
    /// Returns `PatchError::MalformedDocument` if the markup cannot be parsed.
    fn set_inner_markup(
        &mut self,
        node: Self::Node,
        markup: &str,
        options: &HtmlParseOptions,
    ) -> PatchResult<()>;

    /// Replaces the content of an element with literal text.
    fn set_inner_text(&mut self, node: Self::Node, text: &str);

    /// Serializes the content of an element.
    fn inner_content(&self, node: Self::Node) -> String;

    /// Returns `true` if `node` has at least one element child.
    fn has_element_children(&self, node: Self::Node) -> bool {
        !self.element_children(node).is_empty()
    }
}

impl MarkupStore for Document {
    type Node = NodeId;

    fn root_element(&self) -> Option<NodeId> {
        Document::root_element(self)
    }

    fn element_name(&self, node: NodeId) -> &str {
        self.node_name(node).unwrap_or_default()
    }

    fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node).filter(|&c| self.is_element(c)).collect()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        Document::attribute(self, node, name)
    }

    fn append_element(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = self.create_element(name);
        self.append_child(parent, id);
        id
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        Document::set_attribute(self, node, name, value);
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> bool {
        Document::remove_attribute(self, node, name)
    }

    fn remove_node(&mut self, node: NodeId) {
        Document::remove_node(self, node);
    }

    fn clear_content(&mut self, node: NodeId) {
        self.clear_children(node);
    }

    fn set_inner_markup(
        &mut self,
        node: NodeId,
        markup: &str,
        options: &HtmlParseOptions,
    ) -> PatchResult<()> {
        let fragment = parse_fragment(markup, options).map_err(|e| PatchError::MalformedDocument {
            message: format!("cannot parse value `{markup}` as markup"),
            source: Some(e),
        })?;
        self.clear_children(node);
        self.append_document(node, &fragment);
        Ok(())
    }

    fn set_inner_text(&mut self, node: NodeId, text: &str) {
        self.clear_children(node);
        if !text.is_empty() {
            let id = self.create_node(NodeKind::Text {
                content: escape_text(text),
            });
            self.append_child(node, id);
        }
    }

    fn inner_content(&self, node: NodeId) -> String {
        inner_html(self, node)
    }

    fn has_element_children(&self, node: NodeId) -> bool {
        Document::has_element_children(self, node)
    }
}
