use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static NUMERIC_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\d+$").expect("numeric suffix pattern is valid"));

/// Removes a trailing `.<digits>` duplicate-disambiguation suffix from a label.
///
/// `"Owner.1"` becomes `"Owner"`; labels without such a suffix are returned
/// unchanged.
pub fn strip_numeric_suffix(label: &str) -> Cow<'_, str> {
    NUMERIC_SUFFIX.replace(label, "")
}

/// Strips numeric suffixes from every label, keeping length and order.
///
/// Labels that collide after stripping are kept as duplicates.
pub fn normalize_labels<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    labels
        .iter()
        .map(|label| strip_numeric_suffix(label.as_ref()).into_owned())
        .collect()
}
