//! Project identity types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Unique identifier for a project in the build universe.
///
/// Wraps the identifier string and implements `Ord` for deterministic
/// ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Create a new ProjectId from an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The fixed, ordered project universe.
///
/// Registry order is the enumeration order of the settings file; duplicate
/// declarations collapse keeping the first occurrence. Immutable for the
/// lifetime of one graph build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectRegistry {
    ids: Vec<ProjectId>,
    index: BTreeSet<ProjectId>,
}

impl ProjectRegistry {
    /// Build a registry from an ordered sequence of identifiers.
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ProjectId>,
    {
        let mut registry = Self::default();
        for id in ids {
            let id = id.into();
            if registry.index.insert(id.clone()) {
                registry.ids.push(id);
            }
        }
        registry
    }

    /// Whether the identifier belongs to the universe.
    pub fn contains(&self, id: &ProjectId) -> bool {
        self.index.contains(id)
    }

    /// The identifiers in registry order.
    pub fn ids(&self) -> &[ProjectId] {
        &self.ids
    }

    /// Iterate the identifiers in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectId> {
        self.ids.iter()
    }

    /// Number of projects in the universe.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the universe is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Map a working-tree path to the project that owns it.
    ///
    /// The path's first segment names its owning project; a path whose first
    /// segment is not a registry member maps to nothing.
    pub fn project_for_path(&self, path: &str) -> Option<&ProjectId> {
        let first = path.split('/').next()?;
        self.index.get(&ProjectId::new(first))
    }
}
