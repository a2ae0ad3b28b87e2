/*!
# Change statistics

For a proposed toggle of the pair `{u, v}`, computes the exact signed change each term's
statistic would undergo, evaluated against the graph *before* the toggle. None of the rules
recompute a statistic globally:

| term        | add `{u, v}`                               | remove `{u, v}`                            |
|-------------|--------------------------------------------|--------------------------------------------|
| `Edges`     | `+1`                                       | `-1`                                       |
| `Degree(k)` | per endpoint: `+1` if deg = k-1, `-1` if deg = k | per endpoint: `+1` if deg = k+1, `-1` if deg = k |
| `Triangles` | `+|N(u) ∩ N(v)|`                           | `-|N(u) ∩ N(v)|`                           |

The two endpoints of a degree term are evaluated independently and both may fire.
*/

use crate::error::Result;
use crate::graph::Graph;
use crate::terms::Term;

/// Whether a toggle inserts or deletes its edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Add,
    Remove,
}

impl Direction {
    #[inline]
    fn sign(self) -> f64 {
        match self {
            Direction::Add => 1.0,
            Direction::Remove => -1.0,
        }
    }
}

/// A proposed edge toggle. The direction is read off the graph, never chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change {
    pub(crate) i: usize,
    pub(crate) j: usize,
    direction: Direction,
}

impl Change {
    /// Describes toggling the 1-based pair `{u, v}` on `graph`.
    pub fn new(graph: &Graph, u: usize, v: usize) -> Result<Self> {
        let present = graph.contains_edge(u, v)?;
        Ok(Self {
            i: u - 1,
            j: v - 1,
            direction: if present {
                Direction::Remove
            } else {
                Direction::Add
            },
        })
    }

    /// Same as [`Change::new`] for already validated 0-based indices.
    #[inline]
    pub(crate) fn between(graph: &Graph, i: usize, j: usize) -> Self {
        debug_assert_ne!(i, j);
        let direction = if graph.has_edge(i, j) {
            Direction::Remove
        } else {
            Direction::Add
        };
        Self { i, j, direction }
    }

    pub fn u(&self) -> usize {
        self.i + 1
    }

    pub fn v(&self) -> usize {
        self.j + 1
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// Change in `term` caused by applying `change` to `graph`.
#[inline]
pub fn term_delta(term: &Term, graph: &Graph, change: &Change) -> f64 {
    let sign = change.direction.sign();
    match *term {
        Term::Edges => sign,
        Term::Degree(k) => {
            degree_endpoint_delta(graph.degree(change.i), k, change.direction)
                + degree_endpoint_delta(graph.degree(change.j), k, change.direction)
        }
        Term::Triangles => sign * graph.count_common_neighbors(change.i, change.j) as f64,
    }
}

/// Contribution of one endpoint currently at `degree` to the degree-`k` count.
#[inline]
fn degree_endpoint_delta(degree: usize, k: usize, direction: Direction) -> f64 {
    if degree == k {
        return -1.0;
    }
    let entering = match direction {
        Direction::Add => degree + 1 == k,
        Direction::Remove => degree == k + 1,
    };
    if entering {
        1.0
    } else {
        0.0
    }
}

/// Writes the delta of every term into `out`, which must have one slot per term.
#[inline]
pub fn fill_deltas(terms: &[Term], graph: &Graph, change: &Change, out: &mut [f64]) {
    debug_assert_eq!(terms.len(), out.len());
    for (slot, term) in out.iter_mut().zip(terms) {
        *slot = term_delta(term, graph, change);
    }
}
