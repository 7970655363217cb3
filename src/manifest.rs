//! Manifest directive scanning.
//!
//! Extracts declared dependency identifiers from one project manifest's
//! text. This is a text scan for a single directive pattern, not a manifest
//! evaluator: arbitrary surrounding build logic is tolerated and ignored.
//! A missing manifest is handled by the caller as zero dependencies.

use regex_lite::Regex;

use crate::types::ProjectId;

/// Extract the dependency targets declared in a manifest.
///
/// Matches every call-like `project('<id>')` directive (single or double
/// quotes, optional leading `:` on the identifier), anywhere in the text.
/// Occurrences are returned in textual order with duplicates preserved.
/// Text with no matching directive yields an empty sequence.
pub fn scan_dependencies(text: &str) -> Vec<ProjectId> {
    let directive = Regex::new(r#"\bproject\s*\(\s*['"]:?([^'"]+)['"]\s*\)"#)
        .expect("dependency directive pattern is valid");

    directive
        .captures_iter(text)
        .map(|cap| ProjectId::new(cap[1].trim()))
        .collect()
}

/// Extract the project identifiers declared by a settings file.
///
/// Scans `include` statements for quoted identifiers (optional leading `:`
/// stripped), in textual order. Duplicate declarations are returned as-is;
/// the registry collapses them keeping the first occurrence.
pub fn scan_includes(text: &str) -> Vec<ProjectId> {
    let quoted = Regex::new(r#"['"]:?([^'",]+)['"]"#)
        .expect("include token pattern is valid");

    let mut ids = Vec::new();
    for line in text.lines() {
        let line = line.trim_start();
        if !line.starts_with("include") {
            continue;
        }
        for cap in quoted.captures_iter(line) {
            ids.push(ProjectId::new(cap[1].trim()));
        }
    }
    ids
}
