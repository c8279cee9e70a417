//! Filename hint sanitization.

/// Turn an untrusted filename hint into a name that is safe to create inside
/// a chosen directory.
///
/// Only the final path component survives (both `/` and `\` count as
/// separators) and control characters are removed. Returns `None` when
/// nothing usable remains, e.g. for `""`, `"."`, `".."` or `"dir/"`.
pub fn sanitize_filename(hint: &str) -> Option<String> {
    let last = hint
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();

    let cleaned: String = last.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();

    match cleaned {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}
