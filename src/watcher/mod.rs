//! Working-tree change watching.
//!
//! On a fixed interval the watcher queries version control, diffs the
//! dirty-path set against the previous tick, and publishes a change event
//! when files outside the focused set start changing. A path that stays
//! dirty across ticks is reported once, on the tick where it first
//! appeared: the watcher reports *new* edits, not a running total.

pub mod status;

use std::collections::BTreeSet;

use crate::bus::NotificationBus;
use crate::config_store::ConfigStore;
use crate::graph::GraphBuilder;
use crate::reach;
use crate::types::{ChangeNotification, ProjectId};
use crate::workspace::Workspace;

use status::ChangeQuery;

/// Polls version control and publishes change events through the bus.
///
/// The watcher owns its dirty-path snapshot; nothing else reads or writes
/// it. Focus configuration is loaded fresh on every tick that needs it and
/// the graph is rebuilt from scratch, so the watcher never holds stale
/// derived state.
pub struct ChangeWatcher<Q: ChangeQuery> {
    workspace: Workspace,
    query: Q,
    config_store: ConfigStore,
    bus: NotificationBus,
    seen: BTreeSet<String>,
}

impl<Q: ChangeQuery> ChangeWatcher<Q> {
    /// Create a watcher over the given workspace, publishing to `bus`.
    pub fn new(workspace: Workspace, query: Q, bus: NotificationBus) -> Self {
        let config_store = ConfigStore::for_workspace(&workspace);
        Self {
            workspace,
            query,
            config_store,
            bus,
            seen: BTreeSet::new(),
        }
    }

    /// Run the polling loop until the owning task is dropped.
    ///
    /// Ticks are awaited inline on a single task and missed ticks are
    /// skipped, so two ticks can never overlap: if one tick's status query
    /// stalls past the next due time, the due tick is dropped entirely
    /// rather than queued.
    pub async fn run(mut self) {
        let mut interval = tokio::time::interval(self.workspace.poll_interval());
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        tracing::info!(
            root = %self.workspace.root().display(),
            interval_secs = self.workspace.poll_interval().as_secs(),
            "change watcher started"
        );

        loop {
            interval.tick().await;
            self.tick().await;
        }
    }

    /// One poll tick.
    pub async fn tick(&mut self) {
        let entries = match self.query.status().await {
            Ok(entries) => entries,
            Err(e) => {
                // Snapshot retained unchanged; the schedule is never
                // interrupted by a failing query.
                tracing::warn!(error = %e, "status query failed, skipping tick");
                return;
            }
        };

        let current: BTreeSet<String> = entries
            .into_iter()
            .filter(status::StatusEntry::is_dirty)
            .map(|e| e.path)
            .collect();

        let new_paths: Vec<String> = current.difference(&self.seen).cloned().collect();
        if !new_paths.is_empty() {
            self.notify_new_paths(&new_paths);
        }

        self.seen = current;
    }

    /// Map newly dirty paths to projects and publish if any fall outside
    /// the focused set.
    fn notify_new_paths(&self, new_paths: &[String]) {
        let graph = match GraphBuilder::new(&self.workspace).build() {
            Ok(graph) => graph,
            Err(e) => {
                tracing::warn!(error = %e, "graph build failed, skipping notification");
                return;
            }
        };

        let mut changed: BTreeSet<ProjectId> = BTreeSet::new();
        for path in new_paths {
            // The first path segment names the owning project; paths with
            // no matching segment are dropped.
            if let Some(project) = graph.registry().project_for_path(path) {
                changed.insert(project.clone());
            }
        }
        if changed.is_empty() {
            return;
        }

        let config = self.config_store.load();
        let non_focused: Vec<ProjectId> = changed
            .into_iter()
            .filter(|id| !config.is_focused(id))
            .collect();
        if non_focused.is_empty() {
            tracing::debug!("only focused projects changed, nothing to report");
            return;
        }

        let included = reach::included_set(&graph, &config);
        let excluded = reach::excluded_set(&graph, &included);
        let notification = ChangeNotification::new(
            non_focused,
            included.into_iter().collect(),
            excluded,
        );

        let delivered = self.bus.publish(&notification);
        tracing::info!(
            changed = ?notification.changed_projects,
            delivered,
            "published change notification"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::status::{QueryError, StatusEntry};
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::fs;

    /// Scripted query: pops one response per tick, empty tree after.
    struct ScriptedQuery {
        responses: Mutex<VecDeque<Result<Vec<StatusEntry>, QueryError>>>,
    }

    impl ScriptedQuery {
        fn new(responses: Vec<Result<Vec<StatusEntry>, QueryError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl ChangeQuery for ScriptedQuery {
        async fn status(&self) -> Result<Vec<StatusEntry>, QueryError> {
            self.responses.lock().pop_front().unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn workspace_with_projects(ids: &[&str]) -> (tempfile::TempDir, Workspace) {
        let dir = tempfile::tempdir().unwrap();
        let includes = ids
            .iter()
            .map(|id| format!("':{}'", id))
            .collect::<Vec<_>>()
            .join(", ");
        fs::write(dir.path().join("settings.gradle"), format!("include {}\n", includes)).unwrap();
        let workspace = Workspace::new(dir.path());
        (dir, workspace)
    }

    fn dirty(path: &str) -> StatusEntry {
        StatusEntry::new(" M", path)
    }

    #[tokio::test]
    async fn test_new_dirty_path_outside_focus_publishes() {
        let (_dir, workspace) = workspace_with_projects(&["a", "b"]);
        ConfigStore::for_workspace(&workspace)
            .save(&crate::types::FocusConfig::new(["a"], 1))
            .unwrap();

        let bus = NotificationBus::new();
        let mut subscriber = bus.subscribe();
        let query = ScriptedQuery::new(vec![Ok(vec![dirty("b/file.txt")])]);
        let mut watcher = ChangeWatcher::new(workspace, query, bus);

        watcher.tick().await;

        let event = subscriber.receiver.try_recv().unwrap();
        assert_eq!(event.changed_projects, vec![ProjectId::new("b")]);
        assert_eq!(event.included, vec![ProjectId::new("a")]);
        assert_eq!(event.excluded, vec![ProjectId::new("b")]);
    }

    #[tokio::test]
    async fn test_focused_project_changes_are_not_reported() {
        let (_dir, workspace) = workspace_with_projects(&["a", "b"]);
        ConfigStore::for_workspace(&workspace)
            .save(&crate::types::FocusConfig::new(["a"], 1))
            .unwrap();

        let bus = NotificationBus::new();
        let mut subscriber = bus.subscribe();
        let query = ScriptedQuery::new(vec![Ok(vec![dirty("a/file.txt")])]);
        let mut watcher = ChangeWatcher::new(workspace, query, bus);

        watcher.tick().await;
        assert!(subscriber.receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_paths_outside_any_project_are_dropped() {
        let (_dir, workspace) = workspace_with_projects(&["a"]);

        let bus = NotificationBus::new();
        let mut subscriber = bus.subscribe();
        let query = ScriptedQuery::new(vec![Ok(vec![dirty("docs/readme.md")])]);
        let mut watcher = ChangeWatcher::new(workspace, query, bus);

        watcher.tick().await;
        assert!(subscriber.receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_query_failure_retains_snapshot() {
        let (_dir, workspace) = workspace_with_projects(&["a", "b"]);

        let bus = NotificationBus::new();
        let mut subscriber = bus.subscribe();
        let query = ScriptedQuery::new(vec![
            Ok(vec![dirty("a/x.txt")]),
            Err(QueryError::CommandFailed {
                stderr: "boom".to_string(),
            }),
            // a/x.txt is still only reported once even after the failure
            Ok(vec![dirty("a/x.txt"), dirty("b/y.txt")]),
        ]);
        let mut watcher = ChangeWatcher::new(workspace, query, bus);

        watcher.tick().await;
        let first = subscriber.receiver.try_recv().unwrap();
        assert_eq!(first.changed_projects, vec![ProjectId::new("a")]);

        watcher.tick().await;
        assert!(subscriber.receiver.try_recv().is_err());

        watcher.tick().await;
        let third = subscriber.receiver.try_recv().unwrap();
        assert_eq!(third.changed_projects, vec![ProjectId::new("b")]);
    }

    #[tokio::test]
    async fn test_path_cleared_then_dirty_again_is_re_reported() {
        let (_dir, workspace) = workspace_with_projects(&["a"]);

        let bus = NotificationBus::new();
        let mut subscriber = bus.subscribe();
        let query = ScriptedQuery::new(vec![
            Ok(vec![dirty("a/x.txt")]),
            Ok(vec![]),
            Ok(vec![dirty("a/x.txt")]),
        ]);
        let mut watcher = ChangeWatcher::new(workspace, query, bus);

        watcher.tick().await;
        assert!(subscriber.receiver.try_recv().is_ok());

        watcher.tick().await;
        assert!(subscriber.receiver.try_recv().is_err());

        // The path left the snapshot on tick 2, so it is new again
        watcher.tick().await;
        assert!(subscriber.receiver.try_recv().is_ok());
    }
}
