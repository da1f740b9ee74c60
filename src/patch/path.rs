//! Splitting human-authored path strings into items.

/// The default path separator.
pub const DEFAULT_SEPARATOR: char = '/';

/// Splits `path` on `separator`.
///
/// Separators inside a filter's brackets, including inside its quoted
/// value, do not split: `html/add[@path='a/b']/@value` has three items.
/// Empty items are kept so that validation can reject them, but an empty
/// string yields no items at all.
///
/// # Examples
///
/// ```
/// use htmlpatch::patch::split_path;
///
/// assert_eq!(
///     split_path("html/e/item[@key='a/b']/@value", '/'),
///     vec!["html", "e", "item[@key='a/b']", "@value"]
/// );
/// ```
#[must_use]
pub fn split_path(path: &str, separator: char) -> Vec<&str> {
    if path.is_empty() {
        return Vec::new();
    }

    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, ch) in path.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') if depth > 0 => quote = Some(ch),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, c) if c == separator && depth == 0 => {
                items.push(&path[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    items.push(&path[start..]);
    items
}
