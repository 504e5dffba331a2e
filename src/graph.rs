use algograph::graph::*;
use std::{collections::HashMap, hash::Hash};

/// A directed multigraph keyed by caller-supplied node identifiers.
///
/// Repeated edges are kept as distinct edges, so they count twice towards
/// the out-degree of their source and appear twice among the incoming
/// neighbours of their sink.
#[derive(Debug, Clone)]
pub struct GraphModel<K> {
    graph: directed::TreeBackedGraph,
    vertices: HashMap<K, VertexId, ahash::RandomState>,
    nodes: HashMap<VertexId, K, ahash::RandomState>,
}

impl<K: Clone + Eq + Hash> Default for GraphModel<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Eq + Hash> GraphModel<K> {
    pub fn new() -> Self {
        Self {
            graph: directed::TreeBackedGraph::new(),
            vertices: HashMap::with_hasher(ahash::RandomState::new()),
            nodes: HashMap::with_hasher(ahash::RandomState::new()),
        }
    }

    /// Adds `node` without any edge. Returns `false` if it was already known.
    pub fn add_node(&mut self, node: K) -> bool {
        let known = self.vertices.contains_key(&node);
        let _ = self.vertex_or_insert(node);
        !known
    }

    pub fn add_edge(&mut self, from: K, to: K) {
        let u = self.vertex_or_insert(from);
        let v = self.vertex_or_insert(to);
        self.graph.add_edge(u, v);
    }

    fn vertex_or_insert(&mut self, node: K) -> VertexId {
        if let Some(v) = self.vertices.get(&node) {
            return *v;
        }
        let v = self.graph.add_vertex();
        self.vertices.insert(node.clone(), v);
        self.nodes.insert(v, node);
        v
    }

    /// Appends every edge of `other`, in the order `other` received them.
    /// Isolated nodes of `other` are carried over as well.
    pub fn merge(&mut self, other: &GraphModel<K>) {
        for node in other.iter_nodes() {
            let _ = self.vertex_or_insert(node.clone());
        }
        for (from, to) in other.iter_edges() {
            self.add_edge(from.clone(), to.clone());
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.vertex_size()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_size()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    pub fn contains(&self, node: &K) -> bool {
        self.vertices.contains_key(node)
    }

    pub fn iter_nodes(&self) -> impl Iterator<Item = &K> + '_ {
        self.graph.iter_vertices().map(move |v| self.node(v))
    }

    pub fn iter_edges(&self) -> impl Iterator<Item = (&K, &K)> + '_ {
        self.graph
            .iter_edges()
            .map(move |e| (self.node(e.source), self.node(e.sink)))
    }

    /// Number of edges leaving `node`, or `None` for an unknown node.
    pub fn out_degree(&self, node: &K) -> Option<usize> {
        let v = self.vertex(node)?;
        Some(self.graph.out_edges(&v).count())
    }

    /// Sources of the edges entering `node`, one entry per edge, in the
    /// order the edges were added.
    pub fn incoming(&self, node: &K) -> Option<impl Iterator<Item = &K> + '_> {
        let v = self.vertex(node)?;
        Some(self.in_edges(v).into_iter().map(move |e| self.node(e.source)))
    }

    /// In-edges of `v` by edge id, i.e. by arrival. The backing store keeps
    /// them keyed by source vertex instead.
    pub(crate) fn in_edges(&self, v: VertexId) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self.graph.in_edges(&v).collect();
        edges.sort_by(|a, b| a.id.cmp(&b.id));
        edges
    }

    /// Nodes without outgoing edges.
    pub fn dangling(&self) -> impl Iterator<Item = &K> + '_ {
        self.graph
            .iter_vertices()
            .filter(move |v| self.graph.out_edges(v).next().is_none())
            .map(move |v| self.node(v))
    }

    pub(crate) fn graph(&self) -> &directed::TreeBackedGraph {
        &self.graph
    }

    pub(crate) fn vertex(&self, node: &K) -> Option<VertexId> {
        self.vertices.get(node).copied()
    }

    pub(crate) fn node(&self, v: VertexId) -> &K {
        self.nodes.get(&v).unwrap()
    }
}

impl<K: Clone + Eq + Hash> Extend<(K, K)> for GraphModel<K> {
    fn extend<I: IntoIterator<Item = (K, K)>>(&mut self, iter: I) {
        for (from, to) in iter {
            self.add_edge(from, to);
        }
    }
}

impl<K: Clone + Eq + Hash> FromIterator<(K, K)> for GraphModel<K> {
    fn from_iter<I: IntoIterator<Item = (K, K)>>(iter: I) -> Self {
        let mut g = Self::new();
        g.extend(iter);
        g
    }
}
