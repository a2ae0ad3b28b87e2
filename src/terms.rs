/*!
# Model terms

An ERGM assigns a graph `g` the unnormalised log-probability `θ · s(g)`, where `s(g)` is a vector
of structural statistics. This module defines the closed set of statistics ([`Term`]) and the
[`Model`] pairing each term with its parameter.

Each term comes with two rules:

- a from-scratch statistic ([`Term::statistic`]), used once at chain initialisation and for
  verification, and
- an incremental delta rule under an edge toggle, implemented in [`crate::change_stats`].

# Examples

```rust
use ergm_mcmc::graph::Graph;
use ergm_mcmc::terms::{Model, Term};

let g = Graph::from_edges(4, &[(1, 2), (2, 3), (3, 1), (3, 4)]).unwrap();
let model = Model::new(vec![Term::Edges, Term::Degree(1), Term::Triangles], vec![-1.0, 0.5, 0.2]).unwrap();
assert_eq!(model.compute_statistics(&g), vec![4.0, 1.0, 1.0]);
```
*/

use std::fmt;

use crate::error::{ErgmError, Result};
use crate::graph::Graph;

/// A sufficient statistic of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Term {
    /// Number of edges.
    Edges,
    /// Number of vertices with degree exactly `k`.
    Degree(usize),
    /// Number of triangles.
    Triangles,
}

impl Term {
    /// Computes the statistic on `graph` from scratch.
    pub fn statistic(&self, graph: &Graph) -> f64 {
        match *self {
            Term::Edges => graph.n_edges() as f64,
            Term::Degree(k) => (0..graph.n_vertices())
                .filter(|&i| graph.degree(i) == k)
                .count() as f64,
            Term::Triangles => graph.triangle_count() as f64,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Edges => write!(f, "edges"),
            Term::Degree(k) => write!(f, "degree{k}"),
            Term::Triangles => write!(f, "triangle"),
        }
    }
}

/// Terms together with their natural parameters.
///
/// Repeated terms are kept as given; each occurrence gets its own column in the statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    terms: Vec<Term>,
    params: Vec<f64>,
}

impl Model {
    /// Builds a model, checking that there is exactly one parameter per term.
    pub fn new(terms: Vec<Term>, params: Vec<f64>) -> Result<Self> {
        if terms.len() != params.len() {
            return Err(ErgmError::ParameterMismatch {
                terms: terms.len(),
                params: params.len(),
            });
        }
        Ok(Self { terms, params })
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The full statistics vector of `graph`, computed from scratch.
    pub fn compute_statistics(&self, graph: &Graph) -> Vec<f64> {
        self.terms.iter().map(|t| t.statistic(graph)).collect()
    }

    /// Change in unnormalised log-probability for a vector of statistic deltas.
    #[inline]
    pub fn log_ratio(&self, delta: &[f64]) -> f64 {
        self.params.iter().zip(delta).map(|(p, d)| p * d).sum()
    }

    /// Term names, e.g. `["edges", "degree3", "triangle"]`.
    pub fn term_names(&self) -> Vec<String> {
        self.terms.iter().map(Term::to_string).collect()
    }
}
