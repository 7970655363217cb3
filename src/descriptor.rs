//! IDE exclusion descriptor.
//!
//! Renders the project-descriptor document the IDE consumes: one
//! `excludeFolder` entry per excluded project, written to a fixed path.
//! The descriptor consumes the included/excluded sets only; it carries no
//! graph or focus semantics of its own.

use std::path::{Path, PathBuf};

use crate::types::ProjectId;

/// Error type for descriptor writes.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    /// Writing the descriptor file failed.
    #[error("failed to write module descriptor {}: {source}", path.display())]
    WriteFailed {
        /// Path of the descriptor file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Write the exclusion descriptor, overwriting the file in full.
pub fn write_exclusions(path: &Path, excluded: &[ProjectId]) -> Result<(), DescriptorError> {
    std::fs::write(path, render_exclusions(excluded)).map_err(|source| {
        DescriptorError::WriteFailed {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Render the descriptor document with one exclusion entry per excluded
/// project, sorted for deterministic output.
pub fn render_exclusions(excluded: &[ProjectId]) -> String {
    let mut entries: Vec<&ProjectId> = excluded.iter().collect();
    entries.sort();
    entries.dedup();

    let mut doc = String::new();
    doc.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    doc.push_str("<module type=\"JAVA_MODULE\" version=\"4\">\n");
    doc.push_str("  <component name=\"NewModuleRootManager\">\n");
    doc.push_str("    <content url=\"file://$MODULE_DIR$\">\n");
    for id in entries {
        doc.push_str(&format!(
            "      <excludeFolder url=\"file://$MODULE_DIR$/{}\" />\n",
            id
        ));
    }
    doc.push_str("    </content>\n");
    doc.push_str("  </component>\n");
    doc.push_str("</module>\n");
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_sorted_entries() {
        let doc = render_exclusions(&[ProjectId::new("zeta"), ProjectId::new("alpha")]);

        let alpha = doc.find("$MODULE_DIR$/alpha").unwrap();
        let zeta = doc.find("$MODULE_DIR$/zeta").unwrap();
        assert!(alpha < zeta);
        assert_eq!(doc.matches("<excludeFolder").count(), 2);
    }

    #[test]
    fn test_render_no_exclusions() {
        let doc = render_exclusions(&[]);
        assert!(!doc.contains("excludeFolder"));
        assert!(doc.starts_with("<?xml"));
        assert!(doc.ends_with("</module>\n"));
    }

    #[test]
    fn test_write_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("focus.iml");

        write_exclusions(&path, &[ProjectId::new("a"), ProjectId::new("b")]).unwrap();
        write_exclusions(&path, &[ProjectId::new("a")]).unwrap();

        let doc = std::fs::read_to_string(&path).unwrap();
        assert_eq!(doc.matches("<excludeFolder").count(), 1);
    }

    #[test]
    fn test_write_failure_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        // Target is a directory, so the write must fail
        let err = write_exclusions(dir.path(), &[]);
        assert!(matches!(err, Err(DescriptorError::WriteFailed { .. })));
    }
}
