/*!
# Undirected simple graph

The mutable network state that a chain samples over. Vertices are identified by `1..=n` at the
public API; internally they are stored 0-based. Every vertex owns a hash set of neighbours so
that the operations the sampler needs on every step are all sub-linear in `n`:

- edge existence: O(1) expected,
- edge insertion/removal/toggle: O(1) expected,
- degree: O(1),
- common neighbours of a pair: O(min(deg u, deg v)).

The public methods validate their 1-based arguments and return [`ErgmError`]s. The
crate-internal methods used by the sampler take already validated 0-based indices.

# Examples

```rust
use ergm_mcmc::graph::Graph;

let mut g = Graph::from_edges(4, &[(1, 2), (2, 3), (3, 1), (3, 4)]).unwrap();
assert_eq!(g.n_edges(), 4);
assert_eq!(g.degree_of(3).unwrap(), 3);
assert_eq!(g.triangle_count(), 1);

g.add_edge(2, 4).unwrap();
assert_eq!(g.triangle_count(), 2);
```
*/

use std::collections::HashSet;

use crate::error::{ErgmError, Result};

/// An undirected graph without self-loops or multi-edges.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Graph {
    adj: Vec<HashSet<usize>>,
    n_edges: usize,
}

impl Graph {
    /// Creates an empty graph on `n` vertices.
    pub fn new(n: usize) -> Self {
        Self {
            adj: vec![HashSet::new(); n],
            n_edges: 0,
        }
    }

    /// Creates a graph on `n` vertices from a list of 1-based edges.
    ///
    /// Repeated edges are inserted once. Self-loops and out-of-range ids are rejected.
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Result<Self> {
        let mut graph = Self::new(n);
        for &(u, v) in edges {
            graph.add_edge(u, v)?;
        }
        Ok(graph)
    }

    /// Number of vertices.
    pub fn n_vertices(&self) -> usize {
        self.adj.len()
    }

    /// Number of edges.
    pub fn n_edges(&self) -> usize {
        self.n_edges
    }

    /// Adds the edge `{u, v}`. Returns `true` if it was not already present.
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<bool> {
        let (i, j) = self.pair(u, v)?;
        if self.has_edge(i, j) {
            return Ok(false);
        }
        self.toggle(i, j);
        Ok(true)
    }

    /// Removes the edge `{u, v}`. Returns `true` if it was present.
    pub fn remove_edge(&mut self, u: usize, v: usize) -> Result<bool> {
        let (i, j) = self.pair(u, v)?;
        if !self.has_edge(i, j) {
            return Ok(false);
        }
        self.toggle(i, j);
        Ok(true)
    }

    /// Toggles the edge `{u, v}`: adds it if absent, removes it if present.
    /// Returns `true` if the edge exists afterwards.
    pub fn toggle_edge(&mut self, u: usize, v: usize) -> Result<bool> {
        let (i, j) = self.pair(u, v)?;
        Ok(self.toggle(i, j))
    }

    /// Whether `{u, v}` is an edge.
    pub fn contains_edge(&self, u: usize, v: usize) -> Result<bool> {
        let (i, j) = self.pair(u, v)?;
        Ok(self.has_edge(i, j))
    }

    /// Degree of vertex `v`.
    pub fn degree_of(&self, v: usize) -> Result<usize> {
        let i = self.index(v)?;
        Ok(self.degree(i))
    }

    /// Degrees of all vertices, in vertex order.
    pub fn degrees(&self) -> Vec<usize> {
        self.adj.iter().map(HashSet::len).collect()
    }

    /// Sorted 1-based ids of the common neighbours of `u` and `v`.
    pub fn common_neighbors_of(&self, u: usize, v: usize) -> Result<Vec<usize>> {
        let (i, j) = self.pair(u, v)?;
        let mut out: Vec<usize> = self.common_neighbors(i, j).map(|w| w + 1).collect();
        out.sort_unstable();
        Ok(out)
    }

    /// Iterates over all edges as 1-based `(u, v)` pairs with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adj.iter().enumerate().flat_map(|(i, nbrs)| {
            nbrs.iter()
                .copied()
                .filter(move |&j| j > i)
                .map(move |j| (i + 1, j + 1))
        })
    }

    /// Counts triangles from scratch.
    ///
    /// Every triangle is seen once per edge, so the sum of common neighbours over all edges
    /// is divided by three.
    pub fn triangle_count(&self) -> usize {
        let mut total = 0;
        for (i, nbrs) in self.adj.iter().enumerate() {
            for &j in nbrs.iter().filter(|&&j| j > i) {
                total += self.count_common_neighbors(i, j);
            }
        }
        total / 3
    }

    /// Maps a 1-based id to an index, checking the range.
    fn index(&self, vertex: usize) -> Result<usize> {
        let n = self.n_vertices();
        if vertex == 0 || vertex > n {
            return Err(ErgmError::VertexOutOfRange { vertex, n });
        }
        Ok(vertex - 1)
    }

    fn pair(&self, u: usize, v: usize) -> Result<(usize, usize)> {
        let i = self.index(u)?;
        let j = self.index(v)?;
        if i == j {
            return Err(ErgmError::SelfLoop { vertex: u });
        }
        Ok((i, j))
    }

    #[inline]
    pub(crate) fn has_edge(&self, i: usize, j: usize) -> bool {
        self.adj[i].contains(&j)
    }

    #[inline]
    pub(crate) fn degree(&self, i: usize) -> usize {
        self.adj[i].len()
    }

    /// Flips the edge between two distinct indices. Returns `true` if it now exists.
    #[inline]
    pub(crate) fn toggle(&mut self, i: usize, j: usize) -> bool {
        debug_assert_ne!(i, j, "self-loops are not representable");
        if self.adj[i].remove(&j) {
            self.adj[j].remove(&i);
            self.n_edges -= 1;
            false
        } else {
            self.adj[i].insert(j);
            self.adj[j].insert(i);
            self.n_edges += 1;
            true
        }
    }

    /// Common neighbours of two indices, probing the larger set while walking the smaller.
    #[inline]
    pub(crate) fn common_neighbors(&self, i: usize, j: usize) -> impl Iterator<Item = usize> + '_ {
        let (small, large) = if self.adj[i].len() <= self.adj[j].len() {
            (&self.adj[i], &self.adj[j])
        } else {
            (&self.adj[j], &self.adj[i])
        };
        small.iter().copied().filter(move |w| large.contains(w))
    }

    #[inline]
    pub(crate) fn count_common_neighbors(&self, i: usize, j: usize) -> usize {
        self.common_neighbors(i, j).count()
    }
}
