//! Small shared helpers.

/// Compares two markup names case-insensitively.
///
/// Used for element names and for attribute names in selectors and on
/// set/remove. Each character is lowercased with the Unicode default
/// mapping, independent of locale.
///
/// # Examples
///
/// ```
/// use htmlpatch::util::names_match;
///
/// assert!(names_match("connectionStrings", "CONNECTIONSTRINGS"));
/// assert!(!names_match("item", "items"));
/// ```
#[must_use]
pub fn names_match(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
