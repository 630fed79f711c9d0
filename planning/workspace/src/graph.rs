use hashbrown::HashSet;
use indexmap::IndexSet;
use std::fmt::{Display, Formatter};

/// A directed graph over string vertices.
///
/// Vertices are kept in the order in which they were first seen and edges in insertion order.
/// Duplicated edges are allowed and kept. For type hierarchies, an edge `child -> parent` states
/// that `child` inherits from `parent`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectionalGraph {
    vertices: IndexSet<String>,
    /// Edges as pairs of indices in `vertices`.
    edges: Vec<(usize, usize)>,
}

impl DirectionalGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a vertex (no-op if already present) and returns its index.
    pub fn add_vertex(&mut self, vertex: impl Into<String>) -> usize {
        self.vertices.insert_full(vertex.into()).0
    }

    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let from = self.add_vertex(from);
        let to = self.add_vertex(to);
        self.edges.push((from, to));
    }

    pub fn has_vertex(&self, vertex: &str) -> bool {
        self.vertices.contains(vertex)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &str> {
        self.vertices.iter().map(|v| v.as_str())
    }

    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges
            .iter()
            .map(|(from, to)| (self.vertices[*from].as_str(), self.vertices[*to].as_str()))
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Direct successors of `vertex`, in edge insertion order.
    pub fn vertices_with_edges_from(&self, vertex: &str) -> Vec<&str> {
        match self.vertices.get_index_of(vertex) {
            Some(v) => self.successors(v).map(|i| self.vertices[i].as_str()).collect(),
            None => Vec::new(),
        }
    }

    /// Direct predecessors of `vertex`, in edge insertion order.
    pub fn vertices_with_edges_to(&self, vertex: &str) -> Vec<&str> {
        match self.vertices.get_index_of(vertex) {
            Some(v) => self.predecessors(v).map(|i| self.vertices[i].as_str()).collect(),
            None => Vec::new(),
        }
    }

    /// All vertices from which `vertex` can be reached, excluding `vertex` itself.
    /// In a type hierarchy, these are all the (transitive) subtypes of `vertex`.
    pub fn subtree_pointing_to(&self, vertex: &str) -> Vec<&str> {
        self.reachable(vertex, |v| self.predecessors(v).collect())
    }

    /// All vertices reachable from `vertex`, excluding `vertex` itself.
    /// In a type hierarchy, these are all the (transitive) ancestors of `vertex`.
    pub fn subtree_pointing_from(&self, vertex: &str) -> Vec<&str> {
        self.reachable(vertex, |v| self.successors(v).collect())
    }

    /// True if there is a non-empty path from `from` to `to`.
    pub fn is_connected(&self, from: &str, to: &str) -> bool {
        self.subtree_pointing_from(from).contains(&to)
    }

    fn successors(&self, vertex: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges
            .iter()
            .filter(move |(from, _)| *from == vertex)
            .map(|(_, to)| *to)
    }

    fn predecessors(&self, vertex: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges
            .iter()
            .filter(move |(_, to)| *to == vertex)
            .map(|(from, _)| *from)
    }

    /// Breadth first traversal from `vertex`, each vertex being visited at most once.
    fn reachable(&self, vertex: &str, next: impl Fn(usize) -> Vec<usize>) -> Vec<&str> {
        let Some(origin) = self.vertices.get_index_of(vertex) else {
            return Vec::new();
        };
        let mut visited = HashSet::new();
        visited.insert(origin);
        let mut result = Vec::new();
        let mut queue = std::collections::VecDeque::from([origin]);
        while let Some(curr) = queue.pop_front() {
            for n in next(curr) {
                if visited.insert(n) {
                    result.push(self.vertices[n].as_str());
                    queue.push_back(n);
                }
            }
        }
        result
    }
}

impl Display for DirectionalGraph {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        crate::utils::disp_iter(f, self.edges().map(|(from, to)| format!("{from} -> {to}")), "\n")
    }
}
