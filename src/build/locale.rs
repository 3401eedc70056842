use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static SEGMENT_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[./\\]+").unwrap());

/// Infers the locale of a template from its relative path.
///
/// Segments are scanned from the right, so both `greeting/fr.json` and
/// `fr/greeting.json` resolve to `fr`. Paths without a known locale segment
/// use `fallback`.
pub fn infer_locale(path: &Path, is_known_locale: impl Fn(&str) -> bool, fallback: &str) -> String {
    let path = path.to_string_lossy();
    SEGMENT_SEPARATOR
        .split(&path)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .find(|segment| !segment.is_empty() && is_known_locale(segment))
        .unwrap_or(fallback)
        .to_string()
}
