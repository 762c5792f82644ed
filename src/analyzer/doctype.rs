//! HTML version classification from doctype signatures
//!
//! The signature table is an explicitly ordered list evaluated top to bottom;
//! the first case-insensitive substring match wins. Ordering matters because
//! the alternative (iterating an unordered map) makes the result depend on
//! iteration order when a line happens to match more than one pattern.

/// Label returned when no known doctype signature matches
pub const UNKNOWN_VERSION: &str = "UNKNOWN";

/// Ordered doctype signature table: `(label, lowercase substring pattern)`
///
/// Static and process-wide; loaded once, read-only thereafter.
pub const DOCTYPE_SIGNATURES: &[(&str, &str)] = &[
    ("HTML 4.01 Strict", r#""-//w3c//dtd html 4.01//en""#),
    (
        "HTML 4.01 Transitional",
        r#""-//w3c//dtd html 4.01 transitional//en""#,
    ),
    (
        "HTML 4.01 Frameset",
        r#""-//w3c//dtd html 4.01 frameset//en""#,
    ),
    ("XHTML 1.0 Strict", r#""-//w3c//dtd xhtml 1.0 strict//en""#),
    (
        "XHTML 1.0 Transitional",
        r#""-//w3c//dtd xhtml 1.0 transitional//en""#,
    ),
    (
        "XHTML 1.0 Frameset",
        r#""-//w3c//dtd xhtml 1.0 frameset//en""#,
    ),
    ("XHTML 1.1", r#""-//w3c//dtd xhtml 1.1//en""#),
    ("HTML 5", "<!doctype html>"),
];

/// Classifies the leading line of a document into an HTML version label
///
/// Pure and deterministic: identical input always yields the same label.
/// The first matching signature in [`DOCTYPE_SIGNATURES`] wins; if nothing
/// matches, [`UNKNOWN_VERSION`] is returned.
///
/// # Arguments
///
/// * `first_line` - The first line of the raw response body
pub fn classify(first_line: &str) -> &'static str {
    let haystack = first_line.to_lowercase();

    for (label, pattern) in DOCTYPE_SIGNATURES {
        if haystack.contains(pattern) {
            return label;
        }
    }

    UNKNOWN_VERSION
}
