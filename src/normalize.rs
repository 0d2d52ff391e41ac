//! Whitespace normalization applied to every field before it reaches a table.

/// Collapses every whitespace run (spaces, tabs, CR, LF) into a single space
/// and trims both ends.
///
/// ```rust
/// use ryde_rs::normalize::standardize;
///
/// assert_eq!(standardize("  hello  world  "), "hello world");
/// assert_eq!(standardize("\tfoo\tbar\t"), "foo bar");
/// ```
pub fn standardize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for word in s.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Normalizes every field of a row in place.
pub fn standardize_row(row: &mut [String]) {
    for field in row.iter_mut() {
        *field = standardize(field);
    }
}
