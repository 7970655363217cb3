//! Dependency edges.

use serde::{Deserialize, Serialize};

use super::project::ProjectId;

/// Directed dependency edge: `from` declares a build-time dependency on `to`.
///
/// Edges are derived from manifests on each graph build, never stored.
/// Implements `Ord` for canonical ordering: (from, to).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// The declaring project.
    pub from: ProjectId,
    /// The dependency target.
    pub to: ProjectId,
}

impl DependencyEdge {
    /// Create a new edge.
    pub fn new(from: impl Into<ProjectId>, to: impl Into<ProjectId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

// Canonical ordering: from, then to
impl PartialOrd for DependencyEdge {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DependencyEdge {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.from.cmp(&other.from) {
            std::cmp::Ordering::Equal => self.to.cmp(&other.to),
            ord => ord,
        }
    }
}
