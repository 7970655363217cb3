//! Workspace layout and polling configuration.
//!
//! A [`Workspace`] names the root of the multi-project working tree and the
//! file conventions the kernel reads and writes: the settings file that
//! enumerates the project universe, the per-project manifest name, the
//! persisted focus-config file, and the IDE descriptor path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::types::ProjectId;

/// Default settings file enumerating the project universe.
const DEFAULT_SETTINGS_FILE: &str = "settings.gradle";

/// Default per-project manifest file name.
const DEFAULT_MANIFEST_FILE: &str = "build.gradle";

/// Default persisted focus-config file name.
const DEFAULT_CONFIG_FILE: &str = "focus.gradle";

/// Default IDE exclusion-descriptor file name.
const DEFAULT_DESCRIPTOR_FILE: &str = "focus.iml";

/// Default interval between watcher poll ticks.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Workspace layout for one multi-project working tree.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    settings_file: String,
    manifest_file: String,
    config_file: String,
    descriptor_file: String,
    poll_interval: Duration,
}

impl Workspace {
    /// Create a workspace rooted at `root` with the default file
    /// conventions and poll interval.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            settings_file: DEFAULT_SETTINGS_FILE.to_string(),
            manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
            config_file: DEFAULT_CONFIG_FILE.to_string(),
            descriptor_file: DEFAULT_DESCRIPTOR_FILE.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }

    /// Create a workspace from environment variables.
    ///
    /// Reads `FOCUS_WORKSPACE_ROOT` (default: current directory) and
    /// `FOCUS_POLL_INTERVAL_SECS` (default: 5).
    pub fn from_env() -> Self {
        let root = std::env::var("FOCUS_WORKSPACE_ROOT").unwrap_or_else(|_| {
            tracing::warn!("FOCUS_WORKSPACE_ROOT not set, using current directory");
            ".".to_string()
        });

        let poll_secs = std::env::var("FOCUS_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

        Self::new(root).with_poll_interval(Duration::from_secs(poll_secs))
    }

    /// Override the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Override the focus-config file name.
    pub fn with_config_file(mut self, name: impl Into<String>) -> Self {
        self.config_file = name.into();
        self
    }

    /// Override the IDE descriptor file name.
    pub fn with_descriptor_file(mut self, name: impl Into<String>) -> Self {
        self.descriptor_file = name.into();
        self
    }

    /// The workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the settings file enumerating the universe.
    pub fn settings_path(&self) -> PathBuf {
        self.root.join(&self.settings_file)
    }

    /// Path of one project's manifest.
    pub fn manifest_path(&self, project: &ProjectId) -> PathBuf {
        self.root.join(project.as_str()).join(&self.manifest_file)
    }

    /// Path of the persisted focus configuration.
    pub fn config_path(&self) -> PathBuf {
        self.root.join(&self.config_file)
    }

    /// Path of the IDE exclusion descriptor.
    pub fn descriptor_path(&self) -> PathBuf {
        self.root.join(&self.descriptor_file)
    }

    /// Interval between watcher poll ticks.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let ws = Workspace::new("/tmp/tree");
        assert_eq!(ws.settings_path(), PathBuf::from("/tmp/tree/settings.gradle"));
        assert_eq!(
            ws.manifest_path(&ProjectId::new("app")),
            PathBuf::from("/tmp/tree/app/build.gradle")
        );
        assert_eq!(ws.config_path(), PathBuf::from("/tmp/tree/focus.gradle"));
        assert_eq!(ws.descriptor_path(), PathBuf::from("/tmp/tree/focus.iml"));
    }

    #[test]
    fn test_default_poll_interval() {
        let ws = Workspace::new(".");
        assert_eq!(ws.poll_interval(), Duration::from_secs(5));
    }
}
