//! Section splitting for free-text character descriptions.
//!
//! Descriptions are written as labelled sections ("Appearance:", "## 性格",
//! "[Clothing]"). Header matching is case-insensitive and accepts the
//! multilingual aliases below; everything between two headers is that
//! section's body, verbatim.

/// Canonical section keys and the header aliases that map to them.
const SECTION_ALIASES: &[(&str, &[&str])] = &[
    ("appearance", &["appearance", "looks", "外見", "容姿"]),
    ("personality", &["personality", "character", "性格"]),
    ("clothing", &["clothing", "outfit", "attire", "服装", "衣装"]),
];

/// Map a header text (already stripped of decoration) to its canonical key.
fn canonical_key(header: &str) -> Option<&'static str> {
    let needle = header.trim().to_lowercase();
    SECTION_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|a| *a == needle))
        .map(|(key, _)| *key)
}

/// Recognize a header line, tolerating markdown hashes, brackets, and
/// trailing (half- or full-width) colons.
fn header_key(line: &str) -> Option<&'static str> {
    let t = line.trim().trim_start_matches('#').trim();
    let t = t.trim_end_matches(':').trim_end_matches('：');
    let t = t.strip_prefix('[').unwrap_or(t);
    let t = t.strip_suffix(']').unwrap_or(t);
    canonical_key(t)
}

/// Split a description into `(canonical key, body)` pairs in document
/// order. Text before the first header belongs to no section and is
/// dropped.
pub fn split_sections(description: &str) -> Vec<(&'static str, String)> {
    let mut result = Vec::new();
    let mut current: Option<(&'static str, Vec<&str>)> = None;

    for line in description.lines() {
        match header_key(line) {
            Some(key) => {
                if let Some((k, body)) = current.take() {
                    result.push((k, body.join("\n")));
                }
                current = Some((key, Vec::new()));
            }
            None => {
                if let Some((_, body)) = current.as_mut() {
                    body.push(line);
                }
            }
        }
    }
    if let Some((k, body)) = current {
        result.push((k, body.join("\n")));
    }
    result
}

/// Body of the section matching `key`, trimmed of surrounding blank
/// space. `None` when the description has no such section.
pub fn extract_section(description: &str, key: &str) -> Option<String> {
    split_sections(description)
        .into_iter()
        .find(|(k, _)| *k == key)
        .map(|(_, body)| body.trim().to_string())
}
