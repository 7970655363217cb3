//! Dependency graph construction.
//!
//! The graph is rebuilt wholesale on every build request: it holds no
//! cross-build state, so "updated" means "replaced". For fixed manifest
//! contents the result is byte-for-byte identical between runs — adjacency
//! lists keep discovery order, not set semantics, and duplicate edges are
//! legal and preserved.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::canonical::canonical_hash_hex;
use crate::manifest;
use crate::types::{DependencyEdge, ProjectId, ProjectRegistry};
use crate::workspace::Workspace;

/// Error type for graph builds.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The settings file enumerating the universe could not be read.
    #[error("failed to read settings file {}: {source}", path.display())]
    SettingsUnreadable {
        /// Path of the unreadable settings file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// The project universe plus forward and reverse adjacency.
///
/// Invariant: every identifier appearing in an edge belongs to the
/// universe. A project with no manifest or no matched dependency directive
/// has an empty forward adjacency; that is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    registry: ProjectRegistry,
    forward: BTreeMap<ProjectId, Vec<ProjectId>>,
    reverse: BTreeMap<ProjectId, Vec<ProjectId>>,
}

impl DependencyGraph {
    /// Create an edgeless graph over the given universe.
    pub fn new(registry: ProjectRegistry) -> Self {
        Self {
            registry,
            forward: BTreeMap::new(),
            reverse: BTreeMap::new(),
        }
    }

    /// The project universe.
    pub fn registry(&self) -> &ProjectRegistry {
        &self.registry
    }

    /// Record a dependency edge, appending to both adjacency directions.
    ///
    /// Callers are expected to pass universe members only; the builder
    /// enforces this by dropping directives that name unknown projects.
    pub fn insert_edge(&mut self, from: ProjectId, to: ProjectId) {
        self.forward.entry(from.clone()).or_default().push(to.clone());
        self.reverse.entry(to).or_default().push(from);
    }

    /// The projects `id` declares dependencies on, in discovery order.
    pub fn dependencies(&self, id: &ProjectId) -> &[ProjectId] {
        self.forward.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The projects that declare a dependency on `id`, in discovery order.
    pub fn dependents(&self, id: &ProjectId) -> &[ProjectId] {
        self.reverse.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All edges in discovery order (registry order, then directive order).
    pub fn edges(&self) -> Vec<DependencyEdge> {
        let mut edges = Vec::new();
        for from in self.registry.iter() {
            for to in self.dependencies(from) {
                edges.push(DependencyEdge::new(from.clone(), to.clone()));
            }
        }
        edges
    }

    /// Number of edges, counting multiplicity.
    pub fn edge_count(&self) -> usize {
        self.forward.values().map(Vec::len).sum()
    }

    /// Canonical fingerprint over the universe and edge list.
    ///
    /// Two builds over unchanged manifests produce the same fingerprint.
    pub fn fingerprint(&self) -> String {
        #[derive(Serialize)]
        struct GraphCanonical<'a> {
            projects: Vec<&'a str>,
            edges: Vec<[&'a str; 2]>,
        }

        let edges = self.edges();
        let canonical = GraphCanonical {
            projects: self.registry.iter().map(ProjectId::as_str).collect(),
            edges: edges
                .iter()
                .map(|e| [e.from.as_str(), e.to.as_str()])
                .collect(),
        };
        canonical_hash_hex(&canonical)
    }
}

/// Builds a [`DependencyGraph`] from the working tree.
///
/// Enumerates the universe from the settings file, then scans each
/// project's manifest if present. The only failure mode is an unreadable
/// settings file; absent manifests are leaves and unreadable manifests are
/// logged and treated as leaves so the build always completes.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    workspace: Workspace,
}

impl GraphBuilder {
    /// Create a builder over the given workspace.
    pub fn new(workspace: &Workspace) -> Self {
        Self {
            workspace: workspace.clone(),
        }
    }

    /// Build a fresh graph from the current working tree.
    pub fn build(&self) -> Result<DependencyGraph, GraphError> {
        let settings_path = self.workspace.settings_path();
        let settings = std::fs::read_to_string(&settings_path).map_err(|source| {
            GraphError::SettingsUnreadable {
                path: settings_path,
                source,
            }
        })?;

        let registry = ProjectRegistry::from_ids(manifest::scan_includes(&settings));
        let mut graph = DependencyGraph::new(registry);

        let projects: Vec<ProjectId> = graph.registry().ids().to_vec();
        for project in projects {
            let manifest_path = self.workspace.manifest_path(&project);
            let text = match std::fs::read_to_string(&manifest_path) {
                Ok(text) => text,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    tracing::warn!(
                        project = %project,
                        path = %manifest_path.display(),
                        error = %e,
                        "manifest unreadable, treating as leaf"
                    );
                    continue;
                }
            };

            for dep in manifest::scan_dependencies(&text) {
                if !graph.registry().contains(&dep) {
                    tracing::debug!(
                        project = %project,
                        dependency = %dep,
                        "dropping edge to project outside the universe"
                    );
                    continue;
                }
                graph.insert_edge(project.clone(), dep);
            }
        }

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_workspace(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        dir
    }

    #[test]
    fn test_insert_edge_maintains_both_directions() {
        let mut graph = DependencyGraph::new(ProjectRegistry::from_ids(["a", "b"]));
        graph.insert_edge(ProjectId::new("a"), ProjectId::new("b"));

        assert_eq!(graph.dependencies(&ProjectId::new("a")), &[ProjectId::new("b")]);
        assert_eq!(graph.dependents(&ProjectId::new("b")), &[ProjectId::new("a")]);
        assert!(graph.dependencies(&ProjectId::new("b")).is_empty());
    }

    #[test]
    fn test_build_from_manifests() {
        let dir = write_workspace(&[
            ("settings.gradle", "include ':app', ':lib', ':core'\n"),
            ("app/build.gradle", "compile project(':lib')\n"),
            ("lib/build.gradle", "compile project(':core')\n"),
            ("core/build.gradle", "apply plugin: 'java'\n"),
        ]);

        let graph = GraphBuilder::new(&Workspace::new(dir.path())).build().unwrap();

        assert_eq!(graph.registry().len(), 3);
        assert_eq!(graph.dependencies(&ProjectId::new("app")), &[ProjectId::new("lib")]);
        assert_eq!(graph.dependents(&ProjectId::new("lib")), &[ProjectId::new("app")]);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_absent_manifests_are_leaves() {
        let dir = write_workspace(&[("settings.gradle", "include ':a', ':b'\n")]);

        let graph = GraphBuilder::new(&Workspace::new(dir.path())).build().unwrap();

        assert_eq!(graph.registry().len(), 2);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_edges_outside_universe_dropped() {
        let dir = write_workspace(&[
            ("settings.gradle", "include ':app'\n"),
            ("app/build.gradle", "compile project(':vendored-elsewhere')\n"),
        ]);

        let graph = GraphBuilder::new(&Workspace::new(dir.path())).build().unwrap();
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_edges_preserved() {
        let dir = write_workspace(&[
            ("settings.gradle", "include ':app', ':lib'\n"),
            (
                "app/build.gradle",
                "compile project(':lib')\ntestCompile project(':lib')\n",
            ),
        ]);

        let graph = GraphBuilder::new(&Workspace::new(dir.path())).build().unwrap();
        assert_eq!(
            graph.dependencies(&ProjectId::new("app")),
            &[ProjectId::new("lib"), ProjectId::new("lib")]
        );
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_build_determinism() {
        let dir = write_workspace(&[
            ("settings.gradle", "include ':app', ':lib', ':core'\n"),
            ("app/build.gradle", "compile project(':lib')\ncompile project(':core')\n"),
            ("lib/build.gradle", "compile project(':core')\n"),
        ]);

        let builder = GraphBuilder::new(&Workspace::new(dir.path()));
        let g1 = builder.build().unwrap();
        let g2 = builder.build().unwrap();

        assert_eq!(g1, g2);
        assert_eq!(g1.fingerprint(), g2.fingerprint());
        assert_eq!(g1.edges(), g2.edges());
    }

    #[test]
    fn test_missing_settings_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GraphBuilder::new(&Workspace::new(dir.path())).build();
        assert!(matches!(err, Err(GraphError::SettingsUnreadable { .. })));
    }
}
