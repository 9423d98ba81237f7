// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Herd Market Simulation Suite - Undirected Graph

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt;

use crate::error::TopologyError;

// ─── Identifiers ────────────────────────────────────────────────────────────

/// Stable index of a vertex inside its graph's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub usize);

impl VertexId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vertex {
    pub label: String,
}

// ─── Edge ───────────────────────────────────────────────────────────────────

/// Unordered pair of two distinct vertices. Endpoints are stored low-first,
/// so `Edge::new(a, b) == Edge::new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    low: VertexId,
    high: VertexId,
}

impl Edge {
    /// Returns `None` for a self-loop.
    pub fn new(a: VertexId, b: VertexId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn endpoints(&self) -> (VertexId, VertexId) {
        (self.low, self.high)
    }

    /// The endpoint opposite `v`, if `v` is on this edge.
    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        if v == self.low {
            Some(self.high)
        } else if v == self.high {
            Some(self.low)
        } else {
            None
        }
    }
}

// ─── Graph ──────────────────────────────────────────────────────────────────

/// Undirected simple graph over an arena of labelled vertices.
///
/// Adjacency is a `BTreeMap` per vertex so that neighbour iteration order is
/// stable across runs; the simulation draws random numbers per neighbour and
/// relies on that order for reproducibility.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    vertices: Vec<Vertex>,
    adjacency: Vec<BTreeMap<VertexId, Edge>>,
    by_label: HashMap<String, VertexId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex with the given label. Labels are identities: adding an
    /// existing label returns the id already assigned to it.
    pub fn add_vertex(&mut self, label: impl Into<String>) -> VertexId {
        let label = label.into();
        if let Some(&id) = self.by_label.get(&label) {
            return id;
        }
        let id = VertexId(self.vertices.len());
        self.by_label.insert(label.clone(), id);
        self.vertices.push(Vertex { label });
        self.adjacency.push(BTreeMap::new());
        id
    }

    /// Inserts `e` in both adjacency entries, replacing any edge already
    /// joining the pair. Returns `false` if either endpoint is unknown.
    pub fn add_edge(&mut self, e: Edge) -> bool {
        let (a, b) = e.endpoints();
        if !self.contains(a) || !self.contains(b) {
            return false;
        }
        self.adjacency[a.0].insert(b, e);
        self.adjacency[b.0].insert(a, e);
        true
    }

    /// Convenience for `add_edge(Edge::new(a, b))`; self-loops are refused.
    pub fn connect(&mut self, a: VertexId, b: VertexId) -> bool {
        match Edge::new(a, b) {
            Some(e) => self.add_edge(e),
            None => false,
        }
    }

    pub fn get_edge(&self, a: VertexId, b: VertexId) -> Option<&Edge> {
        self.adjacency.get(a.0).and_then(|adj| adj.get(&b))
    }

    pub fn has_edge(&self, a: VertexId, b: VertexId) -> bool {
        self.get_edge(a, b).is_some()
    }

    /// Removes `e` from both endpoints. Missing edges are ignored.
    pub fn remove_edge(&mut self, e: Edge) {
        let (a, b) = e.endpoints();
        if let Some(adj) = self.adjacency.get_mut(a.0) {
            adj.remove(&b);
        }
        if let Some(adj) = self.adjacency.get_mut(b.0) {
            adj.remove(&a);
        }
    }

    pub fn contains(&self, v: VertexId) -> bool {
        v.0 < self.vertices.len()
    }

    pub fn vertices(&self) -> Vec<VertexId> {
        (0..self.vertices.len()).map(VertexId).collect()
    }

    pub fn vertex(&self, v: VertexId) -> Option<&Vertex> {
        self.vertices.get(v.0)
    }

    pub fn label(&self, v: VertexId) -> Option<&str> {
        self.vertices.get(v.0).map(|vx| vx.label.as_str())
    }

    pub fn find(&self, label: &str) -> Option<VertexId> {
        self.by_label.get(label).copied()
    }

    pub fn edges(&self) -> BTreeSet<Edge> {
        self.adjacency
            .iter()
            .flat_map(|adj| adj.values().copied())
            .collect()
    }

    pub fn out_vertices(&self, v: VertexId) -> Vec<VertexId> {
        self.adjacency
            .get(v.0)
            .map(|adj| adj.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn out_edges(&self, v: VertexId) -> Vec<Edge> {
        self.adjacency
            .get(v.0)
            .map(|adj| adj.values().copied().collect())
            .unwrap_or_default()
    }

    /// Neighbour iterator without allocation; empty for unknown vertices.
    pub fn neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.adjacency.get(v.0).into_iter().flat_map(|adj| adj.keys().copied())
    }

    pub fn degree(&self, v: VertexId) -> usize {
        self.adjacency.get(v.0).map_or(0, |adj| adj.len())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|adj| adj.len()).sum::<usize>() / 2
    }

    pub fn degree_sum(&self) -> usize {
        self.adjacency.iter().map(|adj| adj.len()).sum()
    }

    /// Breadth-first reachability from the first vertex.
    pub fn is_connected(&self) -> bool {
        if self.vertices.is_empty() {
            return true;
        }
        let mut visited = vec![false; self.vertices.len()];
        let mut queue = VecDeque::new();
        visited[0] = true;
        queue.push_back(VertexId(0));
        let mut reached = 1;
        while let Some(current) = queue.pop_front() {
            for next in self.neighbors(current) {
                if !visited[next.0] {
                    visited[next.0] = true;
                    reached += 1;
                    queue.push_back(next);
                }
            }
        }
        reached == self.vertices.len()
    }

    pub fn is_regular(&self) -> bool {
        let mut degrees = self.adjacency.iter().map(|adj| adj.len());
        match degrees.next() {
            Some(first) => degrees.all(|d| d == first),
            None => true,
        }
    }

    /// Connects every pair of vertices.
    pub fn add_all_edges(&mut self) {
        let n = self.vertices.len();
        for i in 0..n {
            for j in (i + 1)..n {
                self.connect(VertexId(i), VertexId(j));
            }
        }
    }

    /// Makes the graph `degree`-regular as a ring lattice over vertex index
    /// order: each vertex joins its `degree / 2` nearest neighbours on either
    /// side, and an odd degree adds the diametrically opposite vertex.
    pub fn add_regular_edges(&mut self, degree: usize) -> Result<(), TopologyError> {
        let n = self.vertices.len();
        if degree > n.saturating_sub(1) {
            return Err(TopologyError::DegreeTooHigh { degree, vertices: n });
        }
        if degree % 2 == 1 && n % 2 == 1 {
            return Err(TopologyError::OddDegreeOddSize { degree, vertices: n });
        }
        for i in 0..n {
            for offset in 1..=degree / 2 {
                self.connect(VertexId(i), VertexId((i + offset) % n));
            }
            if degree % 2 == 1 {
                self.connect(VertexId(i), VertexId((i + n / 2) % n));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
