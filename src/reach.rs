//! Included-set computation.
//!
//! Answers one question: given a focus selection, which projects must
//! remain part of the active build? The focused projects themselves, plus
//! every project reachable within the hop bound along the *reverse*
//! adjacency — dependents, dependents of dependents, and so on. Expansion
//! never follows forward edges.
//!
//! ## Empty-focus policy
//!
//! An empty focused set includes the whole universe: no focus means the
//! full build, not an empty one. This crate implements only that behavior.
//!
//! ## Algorithm
//!
//! Multi-source bounded breadth-first expansion with an explicit frontier
//! queue and a global visited set. The visited set makes expansion
//! idempotent across overlapping seeds and guarantees termination on
//! cyclic graphs; the queue keeps the walk iterative regardless of hop
//! bound or graph density. Membership of the result is independent of
//! seed iteration order.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::graph::DependencyGraph;
use crate::types::{FocusConfig, ProjectId};

/// The set of projects that must remain part of the active build.
///
/// Derived and ephemeral: recomputed on demand, never persisted.
pub type IncludedSet = BTreeSet<ProjectId>;

/// Compute the included set for a focus selection.
pub fn included_set(graph: &DependencyGraph, config: &FocusConfig) -> IncludedSet {
    if !config.has_focus() {
        return graph.registry().iter().cloned().collect();
    }
    bounded_dependents(graph, &config.focused_projects, config.downstream_hops)
}

/// Bounded reverse-reachability from a set of seed projects.
///
/// Hop bound 0 yields exactly the seeds (no expansion); bound N adds every
/// project up to N reverse edges away from any seed. Seeds that are not
/// universe members stay in the result but have no adjacency to expand.
pub fn bounded_dependents(
    graph: &DependencyGraph,
    focused: &[ProjectId],
    hop_bound: u32,
) -> IncludedSet {
    let mut included = IncludedSet::new();
    let mut visited: HashSet<ProjectId> = HashSet::new();
    let mut frontier: VecDeque<(ProjectId, u32)> = VecDeque::new();

    for seed in focused {
        if visited.insert(seed.clone()) {
            included.insert(seed.clone());
            frontier.push_back((seed.clone(), 0));
        }
    }

    while let Some((project, distance)) = frontier.pop_front() {
        if distance >= hop_bound {
            continue;
        }
        for dependent in graph.dependents(&project) {
            if visited.insert(dependent.clone()) {
                included.insert(dependent.clone());
                frontier.push_back((dependent.clone(), distance + 1));
            }
        }
    }

    included
}

/// The complement of the included set: universe minus included, in
/// registry order.
pub fn excluded_set(graph: &DependencyGraph, included: &IncludedSet) -> Vec<ProjectId> {
    graph
        .registry()
        .iter()
        .filter(|id| !included.contains(*id))
        .cloned()
        .collect()
}
