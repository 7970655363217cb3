//! Focus configuration.

use serde::{Deserialize, Serialize};

use super::project::ProjectId;

/// Default downstream hop bound applied when none is persisted.
pub const DEFAULT_DOWNSTREAM_HOPS: u32 = 1;

/// The persisted focus selection.
///
/// `focused_projects` keeps the caller's insertion order with duplicates
/// collapsed; membership is what matters for reachability, order only for
/// serialization. Loaded from storage at request time and never cached
/// across requests.
///
/// Serializes with the wire field names (`focusedProjects`,
/// `downstreamHops`), so the struct doubles as the config payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusConfig {
    /// The user-selected seed projects that must always build.
    pub focused_projects: Vec<ProjectId>,
    /// Reverse-dependency expansion bound (edges, >= 0).
    pub downstream_hops: u32,
}

impl FocusConfig {
    /// Create a config, collapsing duplicate focused identifiers while
    /// keeping first-occurrence order.
    pub fn new<I>(focused: I, downstream_hops: u32) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ProjectId>,
    {
        let mut seen = std::collections::BTreeSet::new();
        let focused_projects = focused
            .into_iter()
            .map(Into::into)
            .filter(|id| seen.insert(id.clone()))
            .collect();
        Self {
            focused_projects,
            downstream_hops,
        }
    }

    /// Whether any project is focused.
    pub fn has_focus(&self) -> bool {
        !self.focused_projects.is_empty()
    }

    /// Whether the given project is in the focused set.
    pub fn is_focused(&self, id: &ProjectId) -> bool {
        self.focused_projects.iter().any(|f| f == id)
    }
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            focused_projects: Vec::new(),
            downstream_hops: DEFAULT_DOWNSTREAM_HOPS,
        }
    }
}
