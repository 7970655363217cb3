//! # focus-kernel
//!
//! Focused-build selection for multi-project workspaces.
//!
//! The kernel answers one question:
//!
//! > Given a focus selection, which projects **must remain part of the
//! > active build**?
//!
//! ## Core Contract
//!
//! 1. Build a directed dependency graph from per-project manifests
//! 2. Compute the included set: the focus plus everything that depends on
//!    it, within a bounded hop count
//! 3. Round-trip the persisted focus selection, tolerating malformed input
//! 4. Watch the working tree and notify subscribers when files outside the
//!    focused set start changing
//!
//! ## Architecture
//!
//! ```text
//! settings + manifests → GraphBuilder → DependencyGraph
//!                                            ↓
//! ConfigStore (FocusConfig) ───────→ reach::included_set
//!                                            ↓
//! git status → ChangeWatcher ───────→ NotificationBus → subscribers
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Fixed manifest contents → identical graph (same edges, same
//!   multiplicities, same fingerprint) between builds
//! - Included-set membership is independent of seed iteration order
//! - Raising the hop bound never removes a project from the included set

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bus;
pub mod canonical;
pub mod config_store;
pub mod descriptor;
pub mod graph;
pub mod manifest;
pub mod reach;
pub mod types;
pub mod watcher;
pub mod workspace;

#[cfg(feature = "service")]
pub mod service;

// Re-exports
pub use bus::{NotificationBus, Subscriber, SubscriberId};
pub use canonical::{canonical_hash, canonical_hash_hex, to_canonical_bytes};
pub use config_store::{parse_config, render_config, ConfigStore, ConfigStoreError};
pub use descriptor::{render_exclusions, write_exclusions, DescriptorError};
pub use graph::{DependencyGraph, GraphBuilder, GraphError};
pub use reach::{bounded_dependents, excluded_set, included_set, IncludedSet};
pub use types::{
    ChangeNotification, DependencyEdge, FocusConfig, ProjectId, ProjectRegistry,
    DEFAULT_DOWNSTREAM_HOPS,
};
pub use watcher::status::{ChangeQuery, GitStatusQuery, QueryError, StatusEntry};
pub use watcher::ChangeWatcher;
pub use workspace::Workspace;

// Service re-exports (when the service feature is enabled)
#[cfg(feature = "service")]
pub use service::{create_router, ServiceState};

/// Schema version for wire payloads.
/// Increment on breaking changes to any payload shape.
pub const FOCUS_KERNEL_SCHEMA_VERSION: &str = "1.0.0";
