//! Change notification events.

use serde::{Deserialize, Serialize};

use super::project::ProjectId;

/// Event published when the working tree changes outside the focused set.
///
/// Immutable value constructed by the watcher and fanned out through the
/// notification bus; it has no independent storage. Member lists are
/// sorted for deterministic payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNotification {
    /// Projects with newly dirty files, outside the focused set.
    #[serde(rename = "changedProjects")]
    pub changed_projects: Vec<ProjectId>,
    /// The included set at the time of the event.
    pub included: Vec<ProjectId>,
    /// The excluded set (universe minus included) at the time of the event.
    pub excluded: Vec<ProjectId>,
}

impl ChangeNotification {
    /// Create a notification, sorting each member list.
    pub fn new(
        mut changed_projects: Vec<ProjectId>,
        mut included: Vec<ProjectId>,
        mut excluded: Vec<ProjectId>,
    ) -> Self {
        changed_projects.sort();
        included.sort();
        excluded.sort();
        Self {
            changed_projects,
            included,
            excluded,
        }
    }
}
