//! Path resolution and the terminal set/delete operations.
//!
//! A path is validated as a whole before the tree is touched: it must be
//! non-empty, have no blank items, address something below the root, carry
//! `@attribute` items only in last position, name elements and attributes
//! with writable names, and start with the root element's name. The items between the root and the last one are then
//! walked, creating missing elements for writes, and the last item is
//! applied to the element the walk ended on.

use tracing::{debug, trace};

use super::segment::Segment;
use super::store::MarkupStore;
use super::{ContentMode, PatchOptions};
use crate::error::{PatchError, PatchResult};
use crate::html::entities::unescape_markup;
use crate::util::names_match;

/// A validated path, split into its root name and parsed items.
pub(crate) struct ResolvedPath<'p> {
    /// The path joined with `/`, for error messages.
    display: String,
    root: &'p str,
    /// Items between the root and the last item.
    walk: Vec<Segment<'p>>,
    last: Segment<'p>,
}

impl<'p> ResolvedPath<'p> {
    /// Validates `path` without looking at any document.
    pub(crate) fn new<S: AsRef<str>>(path: &'p [S]) -> PatchResult<Self> {
        let items: Vec<&'p str> = path.iter().map(AsRef::as_ref).collect();
        let display = items.join("/");
        let invalid = |reason: &str| PatchError::InvalidPath {
            path: display.clone(),
            reason: reason.to_string(),
        };

        if items.is_empty() {
            return Err(invalid("path is not specified"));
        }
        if items.iter().any(|item| item.trim().is_empty()) {
            return Err(invalid("there are empty items in the path"));
        }
        if items.len() < 2 {
            return Err(invalid("path must name an element or attribute below the root"));
        }

        let root = items[0];
        let walk: Vec<Segment<'p>> = items[1..items.len() - 1]
            .iter()
            .map(|&item| Segment::parse(item))
            .collect();
        if walk.iter().any(|s| matches!(s, Segment::Attribute(_))) {
            return Err(invalid("attribute items may only appear at the end of the path"));
        }
        let last = Segment::parse(items[items.len() - 1]);

        if !is_valid_name(root) || !walk.iter().chain([&last]).all(has_valid_names) {
            return Err(invalid("names must be non-empty and free of whitespace and markup characters"));
        }

        Ok(Self {
            display,
            root,
            walk,
            last,
        })
    }

    fn not_found(&self, segment: &Segment<'_>) -> PatchError {
        PatchError::NotFound {
            path: self.display.clone(),
            segment: segment.to_string(),
        }
    }

    /// Returns the root element after checking its name against the path.
    fn root_of<T: MarkupStore>(&self, store: &T) -> PatchResult<T::Node> {
        let root = store
            .root_element()
            .ok_or_else(|| PatchError::MalformedDocument {
                message: "root element is not present".to_string(),
                source: None,
            })?;
        let found = store.element_name(root);
        if !names_match(found, self.root) {
            return Err(PatchError::RootMismatch {
                expected: self.root.to_string(),
                found: found.to_string(),
            });
        }
        Ok(root)
    }
}

/// Returns true if `name` can be written as a tag or attribute name.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '/' | '=' | '"' | '\''))
}

fn has_valid_names(segment: &Segment<'_>) -> bool {
    match *segment {
        Segment::Element(name) | Segment::Attribute(name) => is_valid_name(name),
        Segment::Filtered {
            element, attribute, ..
        } => is_valid_name(element) && is_valid_name(attribute),
    }
}

// --- Matching ---

/// Finds the first element child whose name matches.
fn find_child<T: MarkupStore>(store: &T, parent: T::Node, name: &str) -> Option<T::Node> {
    store
        .element_children(parent)
        .into_iter()
        .find(|&c| names_match(store.element_name(c), name))
}

/// Finds the first element child with a matching name whose `attribute`
/// equals `value` exactly.
fn find_filtered<T: MarkupStore>(
    store: &T,
    parent: T::Node,
    element: &str,
    attribute: &str,
    value: &str,
) -> Option<T::Node> {
    store.element_children(parent).into_iter().find(|&c| {
        names_match(store.element_name(c), element) && store.attribute(c, attribute) == Some(value)
    })
}

/// Finds the element a segment selects without creating anything.
fn find_segment<T: MarkupStore>(store: &T, parent: T::Node, segment: &Segment<'_>) -> Option<T::Node> {
    match *segment {
        Segment::Element(name) => find_child(store, parent, name),
        Segment::Filtered {
            element,
            attribute,
            value,
        } => find_filtered(store, parent, element, attribute, value),
        Segment::Attribute(_) => None,
    }
}

/// Finds the element a segment selects, creating it if missing.
///
/// Existing content of `parent` is left in place; the new element is
/// appended after it.
fn find_or_create<T: MarkupStore>(store: &mut T, parent: T::Node, segment: &Segment<'_>) -> T::Node {
    if let Some(found) = find_segment(store, parent, segment) {
        return found;
    }

    match *segment {
        Segment::Filtered {
            element,
            attribute,
            value,
        } => {
            let created = store.append_element(parent, element);
            store.set_attribute(created, attribute, value);
            debug!(element, attribute, value, "created filtered element");
            created
        }
        Segment::Element(name) => {
            debug!(element = name, "created element");
            store.append_element(parent, name)
        }
        // Attribute items select no element.
        Segment::Attribute(_) => parent,
    }
}

/// Like [`find_or_create`], but a missing plain element replaces the text
/// of a parent that has no element children.
fn find_or_replace_text<T: MarkupStore>(
    store: &mut T,
    parent: T::Node,
    segment: &Segment<'_>,
) -> T::Node {
    if matches!(segment, Segment::Element(_))
        && find_segment(store, parent, segment).is_none()
        && !store.has_element_children(parent)
    {
        store.clear_content(parent);
    }
    find_or_create(store, parent, segment)
}

// --- Operations ---

/// Sets the value addressed by `path`, creating missing elements.
pub(crate) fn set_value<T: MarkupStore>(
    store: &mut T,
    path: &ResolvedPath<'_>,
    value: &str,
    options: &PatchOptions,
) -> PatchResult<()> {
    let mut current = path.root_of(store)?;
    for segment in &path.walk {
        trace!(%segment, "walk");
        current = find_or_create(store, current, segment);
    }

    match path.last {
        Segment::Attribute(name) => {
            trace!(attribute = name, "set attribute");
            store.set_attribute(current, name, &unescape_markup(value));
        }
        ref segment => {
            let target = find_or_replace_text(store, current, segment);
            trace!(%segment, "set content");
            match options.content_mode {
                ContentMode::Markup => store.set_inner_markup(target, value, &options.parse)?,
                ContentMode::Text => store.set_inner_text(target, value),
            }
        }
    }
    Ok(())
}

/// Walks `path` without creating anything.
fn walk_existing<T: MarkupStore>(store: &T, path: &ResolvedPath<'_>) -> PatchResult<T::Node> {
    let mut current = path.root_of(store)?;
    for segment in &path.walk {
        trace!(%segment, "walk");
        current = find_segment(store, current, segment).ok_or_else(|| path.not_found(segment))?;
    }
    Ok(current)
}

/// Deletes the element or attribute addressed by `path`.
///
/// A missing attribute is not an error; a missing element is.
pub(crate) fn delete_key<T: MarkupStore>(store: &mut T, path: &ResolvedPath<'_>) -> PatchResult<()> {
    let current = walk_existing(store, path)?;

    match path.last {
        Segment::Attribute(name) => {
            if store.remove_attribute(current, name) {
                debug!(attribute = name, "removed attribute");
            } else {
                trace!(attribute = name, "attribute not present");
            }
        }
        ref segment => {
            let target =
                find_segment(store, current, segment).ok_or_else(|| path.not_found(segment))?;
            store.remove_node(target);
            debug!(%segment, "removed element");
        }
    }
    Ok(())
}

/// Reads the value addressed by `path`: an attribute's value or an
/// element's inner content. Returns `None` if nothing is there.
pub(crate) fn value<T: MarkupStore>(store: &T, path: &ResolvedPath<'_>) -> PatchResult<Option<String>> {
    let current = match walk_existing(store, path) {
        Ok(current) => current,
        Err(PatchError::NotFound { .. }) => return Ok(None),
        Err(e) => return Err(e),
    };

    Ok(match path.last {
        Segment::Attribute(name) => store.attribute(current, name).map(str::to_string),
        ref segment => find_segment(store, current, segment).map(|node| store.inner_content(node)),
    })
}
