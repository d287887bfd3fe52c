//! Parsing of the loosely formatted bundle path list.
//!
//! CI inputs arrive as a single string. Entries may be separated by real
//! newlines, by a literal `\n` (when the CI system did not interpret the
//! escape) or by `|`, in any combination.

/// Separators applied in order; each pass splits every fragment of the previous one.
const SEPARATORS: [&str; 3] = ["\n", "\\n", "|"];

/// Splits a raw path list into trimmed, non-empty entries.
///
/// Order follows the input. Duplicates are kept since the same bundle may
/// legitimately be listed twice. Blank or separator-only input yields an
/// empty list.
///
/// # Examples
///
/// ```
/// use universal_apk_exporter::exporter::parse_path_list;
///
/// assert_eq!(
///     parse_path_list("a.aab|b.aab\nc.aab"),
///     vec!["a.aab", "b.aab", "c.aab"]
/// );
/// assert!(parse_path_list("|||").is_empty());
/// ```
pub fn parse_path_list(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    let mut fragments = vec![raw];
    for separator in SEPARATORS {
        fragments = fragments
            .into_iter()
            .flat_map(|fragment| fragment.split(separator))
            .collect();
    }

    fragments
        .into_iter()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
