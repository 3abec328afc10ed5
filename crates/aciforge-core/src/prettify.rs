//! Cosmetic post-processing of serialized manifests.
//!
//! Operates on the final text only; the structured encoder never sees it.

use regex::Regex;
use std::sync::LazyLock;

/// A two-member object whose first member is `"name"`, laid out over four lines.
static NAME_PAIR_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\s*("name":[^\n]*),\n\s*([^\n]+)\n\s*\}"#).expect("invalid name pair pattern")
});

/// Collapse `{"name": .., <member>}` objects onto a single line.
///
/// ```text
/// {
///   "name": "os",          =>   {"name": "os", "value": "linux"}
///   "value": "linux"
/// }
/// ```
pub fn prettify_json(content: &str) -> String {
    NAME_PAIR_OBJECT
        .replace_all(content, "{${1}, ${2}}")
        .into_owned()
}
