//! Persisted focus configuration.
//!
//! The focus selection lives in a two-statement text file:
//!
//! ```text
//! ext.focusedProjects = ['id1', 'id2']
//! ext.downstreamHops = 1
//! ```
//!
//! Loading is tolerant: an absent file, a malformed focused-list literal,
//! or a malformed hop literal each fall back to the documented default for
//! that field and are never surfaced as errors. Saving overwrites the file
//! in full and is the only operation with an error channel. There is no
//! locking discipline on the file; a save racing a load or another save is
//! last-write-wins.

use std::path::PathBuf;

use regex_lite::Regex;

use crate::types::{FocusConfig, ProjectId, DEFAULT_DOWNSTREAM_HOPS};
use crate::workspace::Workspace;

/// Error type for config persistence.
#[derive(Debug, thiserror::Error)]
pub enum ConfigStoreError {
    /// Writing the config file failed.
    #[error("failed to write focus config {}: {source}", path.display())]
    WriteFailed {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Reads and writes the persisted focus selection.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Create a store over the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store over the workspace's config path.
    pub fn for_workspace(workspace: &Workspace) -> Self {
        Self::new(workspace.config_path())
    }

    /// Load the persisted selection, defaulting each field that is absent
    /// or malformed. Never an error.
    pub fn load(&self) -> FocusConfig {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => parse_config(&text),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!(
                        path = %self.path.display(),
                        error = %e,
                        "focus config unreadable, using defaults"
                    );
                }
                FocusConfig::default()
            }
        }
    }

    /// Persist the selection, overwriting the file in full.
    pub fn save(&self, config: &FocusConfig) -> Result<(), ConfigStoreError> {
        std::fs::write(&self.path, render_config(config)).map_err(|source| {
            ConfigStoreError::WriteFailed {
                path: self.path.clone(),
                source,
            }
        })
    }
}

/// Parse the two-statement config text, defaulting malformed fields.
pub fn parse_config(text: &str) -> FocusConfig {
    let focused_literal = Regex::new(r"ext\.focusedProjects\s*=\s*\[([^\]]*)\]")
        .expect("focused-list pattern is valid");
    let hops_literal = Regex::new(r"ext\.downstreamHops\s*=\s*(\d+)")
        .expect("hop pattern is valid");

    let focused: Vec<ProjectId> = focused_literal
        .captures(text)
        .map(|cap| {
            cap[1]
                .split(',')
                .filter_map(unquote)
                .map(ProjectId::new)
                .collect()
        })
        .unwrap_or_default();

    let hops = hops_literal
        .captures(text)
        .and_then(|cap| cap[1].parse::<u32>().ok())
        .unwrap_or(DEFAULT_DOWNSTREAM_HOPS);

    FocusConfig::new(focused, hops)
}

/// Render the exact two-statement form, focused members single-quoted in
/// caller order.
pub fn render_config(config: &FocusConfig) -> String {
    let members = config
        .focused_projects
        .iter()
        .map(|id| format!("'{}'", id))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "ext.focusedProjects = [{}]\next.downstreamHops = {}",
        members, config.downstream_hops
    )
}

/// Strip matching surrounding quotes from a list member.
///
/// Unquoted or empty members are dropped rather than guessed at.
fn unquote(token: &str) -> Option<String> {
    let token = token.trim();
    let inner = token
        .strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .or_else(|| token.strip_prefix('"').and_then(|t| t.strip_suffix('"')))?;
    let inner = inner.trim();
    if inner.is_empty() {
        None
    } else {
        Some(inner.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_absent_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("focus.gradle"));

        let cfg = store.load();
        assert_eq!(cfg, FocusConfig::default());
    }

    #[test]
    fn test_render_exact_form() {
        let cfg = FocusConfig::new(["A", "C"], 2);
        assert_eq!(
            render_config(&cfg),
            "ext.focusedProjects = ['A', 'C']\next.downstreamHops = 2"
        );
    }

    #[test]
    fn test_render_empty_set() {
        let cfg = FocusConfig::new(Vec::<ProjectId>::new(), 1);
        assert_eq!(
            render_config(&cfg),
            "ext.focusedProjects = []\next.downstreamHops = 1"
        );
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("focus.gradle"));

        let cfg = FocusConfig::new(["app", "analytics"], 3);
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn test_parse_double_quotes_and_whitespace() {
        let cfg = parse_config("ext.focusedProjects = [ \"a\" ,  'b' ]\next.downstreamHops = 4\n");
        assert_eq!(cfg, FocusConfig::new(["a", "b"], 4));
    }

    #[test]
    fn test_malformed_list_defaults_to_empty() {
        let cfg = parse_config("ext.focusedProjects = oops\next.downstreamHops = 2");
        assert!(cfg.focused_projects.is_empty());
        assert_eq!(cfg.downstream_hops, 2);
    }

    #[test]
    fn test_malformed_hops_defaults_to_one() {
        let cfg = parse_config("ext.focusedProjects = ['a']\next.downstreamHops = soon");
        assert_eq!(cfg, FocusConfig::new(["a"], 1));
    }

    #[test]
    fn test_unquoted_members_dropped() {
        let cfg = parse_config("ext.focusedProjects = ['a', b, \"c\"]\next.downstreamHops = 1");
        assert_eq!(cfg, FocusConfig::new(["a", "c"], 1));
    }

    #[test]
    fn test_save_failure_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        // Target is a directory, so the write must fail
        let store = ConfigStore::new(dir.path());
        let err = store.save(&FocusConfig::default());
        assert!(matches!(err, Err(ConfigStoreError::WriteFailed { .. })));
    }
}
