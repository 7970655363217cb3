//! Service state management.

use std::sync::Arc;

use crate::bus::NotificationBus;
use crate::config_store::ConfigStore;
use crate::workspace::Workspace;

/// Shared service state.
///
/// Holds the workspace layout, the focus-config store, and the bus that
/// feeds connected event subscribers. Graphs are not held here: they are
/// rebuilt from the working tree on every request that needs one.
#[derive(Clone)]
pub struct ServiceState {
    /// Workspace layout for graph builds and descriptor writes.
    pub workspace: Arc<Workspace>,
    /// Store for the persisted focus selection.
    pub config_store: Arc<ConfigStore>,
    /// Bus delivering change events to subscribers.
    pub bus: NotificationBus,
}

impl ServiceState {
    /// Create service state over a workspace with a fresh bus.
    pub fn new(workspace: Workspace) -> Self {
        Self::with_bus(workspace, NotificationBus::new())
    }

    /// Create service state sharing an existing bus (the watcher publishes
    /// to the same bus the event route subscribes to).
    pub fn with_bus(workspace: Workspace, bus: NotificationBus) -> Self {
        let config_store = ConfigStore::for_workspace(&workspace);
        Self {
            workspace: Arc::new(workspace),
            config_store: Arc::new(config_store),
            bus,
        }
    }
}
