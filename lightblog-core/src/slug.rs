//! Slug generation and normalization.

use deunicode::deunicode;
use regex::Regex;
use std::sync::OnceLock;

static UNSAFE_RUN: OnceLock<Regex> = OnceLock::new();
static UNDERSCORE_RUN: OnceLock<Regex> = OnceLock::new();

fn unsafe_run() -> &'static Regex {
    UNSAFE_RUN.get_or_init(|| Regex::new(r"[^A-Za-z0-9_-]+").unwrap())
}

fn underscore_run() -> &'static Regex {
    UNDERSCORE_RUN.get_or_init(|| Regex::new(r"_{2,}").unwrap())
}

/// Convert a relative article path (without extension) to a URL-safe slug
///
/// Rules:
/// - Transliterate to ASCII ("ação" becomes "acao")
/// - Replace every run of characters outside `[A-Za-z0-9_-]` with `_`
/// - Collapse repeated underscores
/// - Trim leading/trailing underscores
///
/// With `preserve_path_structure`, each `/`-separated segment is sanitized on
/// its own and the non-empty ones are rejoined with `/`. Otherwise separators
/// are flattened into `_` like any other unsafe character.
///
/// # Examples
///
/// ```
/// use lightblog_core::slug::normalize;
///
/// assert_eq!(normalize("Ação rápida", false), "Acao_rapida");
/// assert_eq!(normalize("2022/my post", false), "2022_my_post");
/// assert_eq!(normalize("2022/my post", true), "2022/my_post");
/// ```
pub fn normalize(path: &str, preserve_path_structure: bool) -> String {
    let path = path.replace('\\', "/");

    if preserve_path_structure {
        path.split('/')
            .map(sanitize_segment)
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    } else {
        sanitize_segment(&path)
    }
}

/// Sanitize a single segment; never contains `/`.
pub fn sanitize_segment(segment: &str) -> String {
    let ascii = deunicode(segment);
    let replaced = unsafe_run().replace_all(&ascii, "_");
    let collapsed = underscore_run().replace_all(&replaced, "_");
    collapsed.trim_matches('_').to_string()
}
