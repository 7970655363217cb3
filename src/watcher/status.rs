//! Version-control status queries.
//!
//! The watcher talks to version control through the [`ChangeQuery`] seam;
//! the production implementation shells out to `git status --porcelain`
//! with a clean environment. Tests script the seam instead of spawning
//! processes.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;

/// One working-tree entry reported by a status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Two-character status code (index and worktree columns).
    pub code: String,
    /// Path relative to the workspace root.
    pub path: String,
}

impl StatusEntry {
    /// Create an entry.
    pub fn new(code: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            path: path.into(),
        }
    }

    /// Whether the entry represents a pending change (non-blank code).
    pub fn is_dirty(&self) -> bool {
        self.code.chars().any(|c| c != ' ')
    }
}

/// Error type for status queries.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Spawning or waiting on the status command failed.
    #[error("failed to run status command: {0}")]
    Io(#[from] std::io::Error),
    /// The status command exited with failure.
    #[error("status command failed: {stderr}")]
    CommandFailed {
        /// Captured standard error of the command.
        stderr: String,
    },
}

/// Seam for querying the working tree for pending changes.
#[async_trait]
pub trait ChangeQuery: Send + Sync {
    /// Yield the (status-code, path) pairs for the working tree.
    async fn status(&self) -> Result<Vec<StatusEntry>, QueryError>;
}

/// `git status --porcelain` over a workspace root.
#[derive(Debug, Clone)]
pub struct GitStatusQuery {
    root: PathBuf,
}

impl GitStatusQuery {
    /// Create a query over the given repository root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ChangeQuery for GitStatusQuery {
    async fn status(&self) -> Result<Vec<StatusEntry>, QueryError> {
        // Ignore system and user git configuration for consistent behavior,
        // and never prompt on a terminal.
        let output = Command::new("git")
            .args(["status", "--porcelain"])
            .current_dir(&self.root)
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env("GIT_CONFIG_GLOBAL", "/dev/null")
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .await?;

        if !output.status.success() {
            return Err(QueryError::CommandFailed {
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        Ok(parse_porcelain(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parse porcelain status output into entries.
///
/// Renames report `old -> new`; the new path is the one pending. Quoted
/// paths are unquoted naively (enough for paths with spaces).
pub fn parse_porcelain(output: &str) -> Vec<StatusEntry> {
    output
        .lines()
        .filter_map(|line| {
            let code = line.get(..2)?;
            let path = line.get(3..)?.trim();
            if path.is_empty() {
                return None;
            }
            let path = path.rsplit(" -> ").next().unwrap_or(path);
            let path = path.trim_matches('"');
            Some(StatusEntry::new(code, path))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_porcelain_codes_and_paths() {
        let entries = parse_porcelain(" M app/src/Main.java\n?? lib/new.txt\nA  core/added.rs\n");
        assert_eq!(
            entries,
            vec![
                StatusEntry::new(" M", "app/src/Main.java"),
                StatusEntry::new("??", "lib/new.txt"),
                StatusEntry::new("A ", "core/added.rs"),
            ]
        );
        assert!(entries.iter().all(StatusEntry::is_dirty));
    }

    #[test]
    fn test_parse_rename_reports_new_path() {
        let entries = parse_porcelain("R  app/Old.java -> app/New.java\n");
        assert_eq!(entries, vec![StatusEntry::new("R ", "app/New.java")]);
    }

    #[test]
    fn test_parse_quoted_path() {
        let entries = parse_porcelain(" M \"app/with space.txt\"\n");
        assert_eq!(entries[0].path, "app/with space.txt");
    }

    #[test]
    fn test_parse_skips_short_lines() {
        assert!(parse_porcelain("\nM\n  \n").is_empty());
    }

    #[test]
    fn test_blank_code_is_not_dirty() {
        assert!(!StatusEntry::new("  ", "a/b").is_dirty());
    }
}
