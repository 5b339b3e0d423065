//! Dependency graph between cells.
//!
//! An edge `(dependee, dependent)` means the dependent's value is computed
//! from the dependee's value, so the dependee must be evaluated first.
//! The graph keeps the edge set twice, forward (`dependee -> dependents`)
//! and reverse (`dependent -> dependees`); every mutation goes through
//! [`DependencyGraph::link`] / [`DependencyGraph::unlink`] so the two
//! mirrors can never drift apart.
//!
//! Nodes are opaque: the graph performs no validation of names.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// One direction of the edge set. A node with no neighbours has no entry.
#[derive(Clone, Debug)]
struct Adjacency<N> {
    map: HashMap<N, HashSet<N>>,
}

impl<N> Default for Adjacency<N> {
    fn default() -> Self {
        Adjacency {
            map: HashMap::new(),
        }
    }
}

impl<N: Eq + Hash + Clone> Adjacency<N> {
    fn contains<Q>(&self, from: &Q, to: &Q) -> bool
    where
        N: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.map.get(from).is_some_and(|set| set.contains(to))
    }

    fn insert(&mut self, from: N, to: N) -> bool {
        self.map.entry(from).or_default().insert(to)
    }

    fn remove<Q>(&mut self, from: &Q, to: &Q) -> bool
    where
        N: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let Some(set) = self.map.get_mut(from) else {
            return false;
        };
        let removed = set.remove(to);
        if set.is_empty() {
            self.map.remove(from);
        }
        removed
    }

    fn neighbours<Q>(&self, node: &Q) -> Option<&HashSet<N>>
    where
        N: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.map.get(node)
    }
}

/// Mirrored dependee/dependent relation over nodes of type `N`.
#[derive(Clone, Debug)]
pub struct DependencyGraph<N = String> {
    /// dependee -> cells that depend on it
    dependents: Adjacency<N>,
    /// dependent -> cells it depends on
    dependees: Adjacency<N>,
    size: usize,
}

impl<N> Default for DependencyGraph<N> {
    fn default() -> Self {
        DependencyGraph {
            dependents: Adjacency::default(),
            dependees: Adjacency::default(),
            size: 0,
        }
    }
}

impl<N: Eq + Hash + Clone> DependencyGraph<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct edges.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// True if the edge `(dependee, dependent)` is present.
    pub fn contains<Q>(&self, dependee: &Q, dependent: &Q) -> bool
    where
        N: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.dependents.contains(dependee, dependent)
    }

    pub fn has_dependents<Q>(&self, node: &Q) -> bool
    where
        N: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.dependents.neighbours(node).is_some()
    }

    pub fn has_dependees<Q>(&self, node: &Q) -> bool
    where
        N: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.dependees.neighbours(node).is_some()
    }

    /// Cells that depend directly on `node`. Empty for unknown nodes.
    pub fn dependents<'a, Q>(&'a self, node: &Q) -> impl Iterator<Item = &'a N> + use<'a, N, Q>
    where
        N: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.dependents.neighbours(node).into_iter().flatten()
    }

    /// Cells `node` depends on directly. Empty for unknown nodes.
    pub fn dependees<'a, Q>(&'a self, node: &Q) -> impl Iterator<Item = &'a N> + use<'a, N, Q>
    where
        N: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.dependees.neighbours(node).into_iter().flatten()
    }

    /// Add the edge `(dependee, dependent)`. No-op if it already exists.
    pub fn add_dependency(&mut self, dependee: impl Into<N>, dependent: impl Into<N>) {
        self.link(dependee.into(), dependent.into());
    }

    /// Remove the edge `(dependee, dependent)`. No-op if it is absent.
    pub fn remove_dependency<Q>(&mut self, dependee: &Q, dependent: &Q)
    where
        N: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.unlink(dependee, dependent);
    }

    /// Replace every `(node, *)` edge with `(node, t)` for each `t`.
    pub fn replace_dependents<I>(&mut self, node: impl Into<N>, new_dependents: I)
    where
        I: IntoIterator,
        I::Item: Into<N>,
    {
        let node = node.into();
        let old: Vec<N> = self.dependents(&node).cloned().collect();
        for dependent in &old {
            self.unlink(&node, dependent);
        }
        for dependent in new_dependents {
            self.link(node.clone(), dependent.into());
        }
    }

    /// Replace every `(*, node)` edge with `(s, node)` for each `s`.
    pub fn replace_dependees<I>(&mut self, node: impl Into<N>, new_dependees: I)
    where
        I: IntoIterator,
        I::Item: Into<N>,
    {
        let node = node.into();
        let old: Vec<N> = self.dependees(&node).cloned().collect();
        for dependee in &old {
            self.unlink(dependee, &node);
        }
        for dependee in new_dependees {
            self.link(dependee.into(), node.clone());
        }
    }

    fn link(&mut self, dependee: N, dependent: N) {
        if self.dependents.contains(&dependee, &dependent) {
            return;
        }
        self.dependees.insert(dependent.clone(), dependee.clone());
        self.dependents.insert(dependee, dependent);
        self.size += 1;
    }

    fn unlink<Q>(&mut self, dependee: &Q, dependent: &Q)
    where
        N: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        if self.dependents.remove(dependee, dependent) {
            self.dependees.remove(dependent, dependee);
            self.size -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DependencyGraph;
    use std::collections::HashSet;

    fn set<'a>(items: impl Iterator<Item = &'a String>) -> HashSet<&'a str> {
        items.map(String::as_str).collect()
    }

    fn assert_mirrored(graph: &DependencyGraph) {
        let mut forward = 0;
        for (dependee, dependents) in &graph.dependents.map {
            assert!(!dependents.is_empty(), "empty forward set for {dependee}");
            for dependent in dependents {
                assert!(graph.dependees.contains(dependent.as_str(), dependee.as_str()));
                forward += 1;
            }
        }
        let backward: usize = graph.dependees.map.values().map(HashSet::len).sum();
        assert!(graph.dependees.map.values().all(|s| !s.is_empty()));
        assert_eq!(forward, graph.len());
        assert_eq!(backward, graph.len());
    }

    #[test]
    fn test_empty_graph() {
        let graph: DependencyGraph = DependencyGraph::new();
        assert!(graph.is_empty());
        assert!(!graph.has_dependents("a"));
        assert!(!graph.has_dependees("a"));
        assert_eq!(graph.dependents("a").count(), 0);
        assert_eq!(graph.dependees("a").count(), 0);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut graph: DependencyGraph = DependencyGraph::new();
        graph.add_dependency("a", "b");
        graph.add_dependency("a", "b");
        assert_eq!(graph.len(), 1);
        assert_eq!(set(graph.dependents("a")), HashSet::from(["b"]));
        assert_eq!(set(graph.dependees("b")), HashSet::from(["a"]));
        assert_mirrored(&graph);
    }

    #[test]
    fn test_add_then_remove_restores_state() {
        let mut graph: DependencyGraph = DependencyGraph::new();
        graph.add_dependency("x", "y");
        graph.add_dependency("a", "b");
        graph.remove_dependency("a", "b");
        assert_eq!(graph.len(), 1);
        assert!(!graph.has_dependents("a"));
        assert!(!graph.has_dependees("b"));
        assert!(!graph.dependents.map.contains_key("a"));
        assert!(!graph.dependees.map.contains_key("b"));
        assert_mirrored(&graph);
    }

    #[test]
    fn test_remove_missing_edge_is_noop() {
        let mut graph: DependencyGraph = DependencyGraph::new();
        graph.add_dependency("a", "b");
        graph.remove_dependency("b", "a");
        graph.remove_dependency("q", "r");
        assert_eq!(graph.len(), 1);
        assert!(graph.contains("a", "b"));
    }

    #[test]
    fn test_self_edge() {
        let mut graph: DependencyGraph = DependencyGraph::new();
        graph.add_dependency("a", "a");
        assert_eq!(graph.len(), 1);
        assert!(graph.has_dependents("a"));
        assert!(graph.has_dependees("a"));
        assert_mirrored(&graph);
        graph.remove_dependency("a", "a");
        assert!(graph.is_empty());
        assert_mirrored(&graph);
    }

    #[test]
    fn test_replace_dependents() {
        let mut graph: DependencyGraph = DependencyGraph::new();
        graph.add_dependency("a", "b");
        graph.add_dependency("a", "c");
        graph.add_dependency("d", "c");
        graph.replace_dependents("a", ["x", "y", "x", "a"]);
        assert_eq!(set(graph.dependents("a")), HashSet::from(["x", "y", "a"]));
        assert_eq!(set(graph.dependees("c")), HashSet::from(["d"]));
        assert!(!graph.has_dependees("b"));
        assert_eq!(graph.len(), 4);
        assert_mirrored(&graph);
    }

    #[test]
    fn test_replace_dependees() {
        let mut graph: DependencyGraph = DependencyGraph::new();
        graph.add_dependency("a", "b");
        graph.add_dependency("c", "b");
        graph.add_dependency("c", "d");
        graph.replace_dependees("b", ["e", "f"]);
        assert_eq!(set(graph.dependees("b")), HashSet::from(["e", "f"]));
        assert_eq!(set(graph.dependents("c")), HashSet::from(["d"]));
        assert!(!graph.has_dependents("a"));
        assert_eq!(graph.len(), 3);
        assert_mirrored(&graph);
    }

    #[test]
    fn test_replace_with_empty_prunes() {
        let mut graph: DependencyGraph = DependencyGraph::new();
        graph.add_dependency("a", "b");
        graph.replace_dependees("b", Vec::<String>::new());
        assert!(graph.is_empty());
        assert!(graph.dependents.map.is_empty());
        assert!(graph.dependees.map.is_empty());
    }

    #[test]
    fn test_many_edges_stay_mirrored() {
        let mut graph: DependencyGraph = DependencyGraph::new();
        for i in 0..100 {
            for j in (i + 1)..(i + 5) {
                graph.add_dependency(format!("n{i}"), format!("n{j}"));
            }
        }
        assert_eq!(graph.len(), 400);
        for i in (0..100).step_by(3) {
            graph.replace_dependents(format!("n{i}"), [format!("n{}", i + 1)]);
        }
        for i in (0..100).step_by(7) {
            graph.remove_dependency(format!("n{i}").as_str(), format!("n{}", i + 2).as_str());
        }
        assert_mirrored(&graph);
    }
}
