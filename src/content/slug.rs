//! Slug helpers: display titles and URL-escaped directory names

use percent_encoding::percent_decode_str;
use std::borrow::Cow;

/// Derive a display title from a filesystem slug.
///
/// Each `-` separated word gets its first character upper-cased; the rest
/// of the word is kept as written.
///
/// ```
/// use lectern::content::format_title;
/// assert_eq!(format_title("javascript-basics"), "Javascript Basics");
/// ```
pub fn format_title(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reverse percent-escaping in a slug (`C%23` -> `C#`).
///
/// Input without escape sequences comes back unchanged. Sequences that do
/// not decode to valid UTF-8 leave the slug as given.
pub fn decode_slug(slug: &str) -> Cow<'_, str> {
    match percent_decode_str(slug).decode_utf8() {
        Ok(decoded) => decoded,
        Err(_) => Cow::Borrowed(slug),
    }
}

/// Whether a decoded slug names a single directory entry.
///
/// Rejects empty names, `.` and `..`, and anything containing a path
/// separator or NUL.
pub fn is_path_segment(slug: &str) -> bool {
    !slug.is_empty() && slug != "." && slug != ".." && !slug.contains(['/', '\\', '\0'])
}
