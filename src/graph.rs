use crate::spot::SpotRef;
use std::collections::HashMap;

/// Undirected edge key, the smaller spot id first
///
pub type EdgeKey = (u64, u64);

fn edge_key(a: u64, b: u64) -> EdgeKey {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Undirected weighted graph of spots
///
/// Vertices are identified by the spot id; adding a vertex twice is a no-op.
/// At most one edge exists between two spots and self-loops are rejected.
///
#[derive(Debug, Clone, Default)]
pub struct TrackGraph {
    vertices: HashMap<u64, SpotRef>,
    edges: HashMap<EdgeKey, f64>,
}

impl TrackGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the spot, returns `false` if it was already present
    ///
    pub fn add_vertex(&mut self, spot: SpotRef) -> bool {
        let id = spot.id();
        if self.vertices.contains_key(&id) {
            false
        } else {
            self.vertices.insert(id, spot);
            true
        }
    }

    /// Adds a weighted edge between two spots, adding the spots as vertices when needed
    ///
    /// Returns `false` and keeps the existing weight when the edge already exists or
    /// both ends are the same spot.
    ///
    pub fn add_edge(&mut self, source: &SpotRef, target: &SpotRef, weight: f64) -> bool {
        if source.id() == target.id() {
            return false;
        }
        self.add_vertex(source.clone());
        self.add_vertex(target.clone());
        let key = edge_key(source.id(), target.id());
        if self.edges.contains_key(&key) {
            false
        } else {
            self.edges.insert(key, weight);
            true
        }
    }

    pub fn contains_vertex(&self, id: u64) -> bool {
        self.vertices.contains_key(&id)
    }

    pub fn vertex(&self, id: u64) -> Option<&SpotRef> {
        self.vertices.get(&id)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &SpotRef> {
        self.vertices.values()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Edge weight between the two spots, in any order
    ///
    pub fn edge_weight(&self, a: u64, b: u64) -> Option<f64> {
        self.edges.get(&edge_key(a, b)).copied()
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeKey, f64)> + '_ {
        self.edges.iter().map(|(k, w)| (*k, *w))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Spots connected to the spot with their edge weights
    ///
    pub fn neighbours(&self, id: u64) -> Vec<(&SpotRef, f64)> {
        self.edges
            .iter()
            .filter_map(|((a, b), w)| {
                let other = if *a == id {
                    *b
                } else if *b == id {
                    *a
                } else {
                    return None;
                };
                self.vertices.get(&other).map(|s| (s, *w))
            })
            .collect()
    }
}
