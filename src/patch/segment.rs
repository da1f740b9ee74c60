//! Path segment shapes.

use std::fmt;
use std::sync::OnceLock;

use regex_lite::Regex;

/// `name[@attr = 'value']`, with optional whitespace around `=` and
/// optional single or double quotes around the value.
///
/// regex-lite's `\w` is ASCII only, so the attribute name is matched by
/// exclusion to accept letters from any script.
const FILTER_PATTERN: &str =
    r#"(?is)^(?P<element>.+?)\[\s*@(?P<key>[^\s=\[\]'"<>/]+)\s*=\s*['"]?(?P<value>.+?)['"]?\s*\]$"#;

#[allow(clippy::expect_used)]
fn filter_regex() -> &'static Regex {
    static FILTER: OnceLock<Regex> = OnceLock::new();
    FILTER.get_or_init(|| Regex::new(FILTER_PATTERN).expect("filter pattern is valid"))
}

/// One item of a path, parsed once.
///
/// # Examples
///
/// ```
/// use htmlpatch::Segment;
///
/// assert_eq!(Segment::parse("body"), Segment::Element("body"));
/// assert_eq!(Segment::parse("@class"), Segment::Attribute("class"));
/// assert_eq!(
///     Segment::parse("add[@key = 'Mode']"),
///     Segment::Filtered { element: "add", attribute: "key", value: "Mode" }
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A child element matched by name.
    Element(&'a str),
    /// An attribute of the current element (`@name`). Only valid last.
    Attribute(&'a str),
    /// A child element matched by name and one attribute value.
    Filtered {
        /// The element name.
        element: &'a str,
        /// The attribute the element must carry.
        attribute: &'a str,
        /// The exact attribute value to match.
        value: &'a str,
    },
}

impl<'a> Segment<'a> {
    /// Classifies a raw path item.
    ///
    /// Anything that is neither `@name` nor a well-formed filter is a plain
    /// element name.
    #[must_use]
    pub fn parse(raw: &'a str) -> Self {
        if let Some(name) = raw.strip_prefix('@') {
            return Segment::Attribute(name);
        }

        match filter_regex().captures(raw) {
            Some(caps) => match (caps.name("element"), caps.name("key"), caps.name("value")) {
                (Some(element), Some(key), Some(value)) => Segment::Filtered {
                    element: element.as_str(),
                    attribute: key.as_str(),
                    value: value.as_str(),
                },
                _ => Segment::Element(raw),
            },
            None => Segment::Element(raw),
        }
    }
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Element(name) => write!(f, "{name}"),
            Segment::Attribute(name) => write!(f, "@{name}"),
            Segment::Filtered {
                element,
                attribute,
                value,
            } => write!(f, "{element}[@{attribute}='{value}']"),
        }
    }
}
