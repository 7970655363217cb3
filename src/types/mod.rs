//! Core types for the focus kernel.

pub mod config;
pub mod edge;
pub mod notification;
pub mod project;

pub use config::{FocusConfig, DEFAULT_DOWNSTREAM_HOPS};
pub use edge::DependencyEdge;
pub use notification::ChangeNotification;
pub use project::{ProjectId, ProjectRegistry};
