/*!
# Metropolis–Hastings edge-toggle sampler

One step of the chain picks an unordered vertex pair uniformly at random and proposes to toggle
it: add the edge if it is absent, remove it if present. Because a toggle is its own inverse the
proposal kernel is symmetric, so the Metropolis–Hastings correction is exactly 1 and the
log-acceptance ratio reduces to

\[
\log \alpha = \theta \cdot \Delta s
\]

where \(\Delta s\) is the vector of change statistics for the toggle (see
[`crate::change_stats`]). A proposal is accepted with probability \(\min(1, e^{\log\alpha})\).

The chain keeps a running statistics vector that is computed from scratch once, when the chain
is built, and afterwards only advanced by the deltas of accepted toggles. The graph mutation
and the statistics update always happen together, so the running vector always equals a fresh
recomputation on the current graph.

## Overview

- [`ErgmChain`]: a single chain. Owns its graph, running statistics, a reusable delta buffer and
  a seedable [`SmallRng`]. Implements [`MarkovChain`].
- [`ErgmSampler`]: several independent chains started from the same graph, run in parallel
  through [`crate::core::ChainRunner`]. Chain `i` is seeded with `seed + i`.

## Example Usage

```rust
use ergm_mcmc::core::ChainRunner;
use ergm_mcmc::graph::Graph;
use ergm_mcmc::metropolis_hastings::ErgmSampler;
use ergm_mcmc::terms::{Model, Term};

let model = Model::new(vec![Term::Edges, Term::Triangles], vec![-1.0, 0.1]).unwrap();
let mut sampler = ErgmSampler::new(&Graph::new(8), model, 2).unwrap().set_seed(42);
let samples = sampler.run(100, 50, 1).unwrap();
assert_eq!(samples.len(), 2);
assert_eq!(samples[0].shape(), &[100, 2]);
```
*/

use rand::prelude::*;
use rand_distr::Uniform;

use crate::change_stats::{fill_deltas, Change};
use crate::core::{HasChains, MarkovChain};
use crate::error::{ErgmError, Result};
use crate::graph::Graph;
use crate::stats::AcceptanceTracker;
use crate::terms::Model;

/// `min(1, exp(log_ratio))`, without evaluating `exp` on non-negative input.
#[inline]
pub fn acceptance_probability(log_ratio: f64) -> f64 {
    if log_ratio >= 0.0 {
        1.0
    } else {
        log_ratio.exp()
    }
}

/// Accepts or rejects a fixed toggle given a uniform draw in `[0, 1)`.
///
/// `delta` is overwritten with the change statistics of `change`. On acceptance the edge is
/// toggled and `delta` is added into `stats`; on rejection neither is touched.
pub fn apply_proposal(
    graph: &mut Graph,
    model: &Model,
    stats: &mut [f64],
    delta: &mut [f64],
    change: &Change,
    uniform: f64,
) -> bool {
    fill_deltas(model.terms(), graph, change, delta);
    let p_accept = acceptance_probability(model.log_ratio(delta));
    if uniform < p_accept {
        graph.toggle(change.i, change.j);
        stats.iter_mut().zip(delta.iter()).for_each(|(s, d)| *s += d);
        true
    } else {
        false
    }
}

/// Draws two distinct vertex indices.
///
/// The second draw is repeated while it hits the first. With `n >= 2` vertices each retry
/// succeeds with probability `(n - 1) / n >= 1/2`, so this terminates almost surely after
/// O(1) expected draws. Callers must not pass a distribution over fewer than two vertices.
#[inline]
fn propose_pair<R: Rng + ?Sized>(rng: &mut R, vertices: &Uniform<usize>) -> (usize, usize) {
    let u = vertices.sample(rng);
    loop {
        let v = vertices.sample(rng);
        if v != u {
            return (u, v);
        }
    }
}

/// One random-toggle Metropolis–Hastings step. Returns whether the proposal was accepted.
#[inline]
pub(crate) fn mh_step<R: Rng + ?Sized>(
    graph: &mut Graph,
    model: &Model,
    stats: &mut [f64],
    delta: &mut [f64],
    vertices: &Uniform<usize>,
    rng: &mut R,
) -> bool {
    let (i, j) = propose_pair(rng, vertices);
    let change = Change::between(graph, i, j);
    let uniform: f64 = rng.gen();
    apply_proposal(graph, model, stats, delta, &change, uniform)
}

/// A single ERGM chain.
///
/// The chain owns its graph for its whole lifetime. The graph can be read through
/// [`ErgmChain::graph`] but only mutated by the chain itself, which keeps the running
/// statistics in sync with it.
#[derive(Debug, Clone)]
pub struct ErgmChain {
    graph: Graph,
    model: Model,
    current_state: Vec<f64>,
    delta: Vec<f64>,
    vertices: Uniform<usize>,
    tracker: AcceptanceTracker,
    /// The chain-specific random seed.
    pub seed: u64,
    /// The random number generator for this chain.
    pub rng: SmallRng,
}

impl ErgmChain {
    /**
    Creates a chain over `graph`, computing the initial statistics from scratch.

    Fails with [`ErgmError::TooFewVertices`] if the graph has fewer than two vertices, since
    no edge can be proposed.

    # Examples

    ```rust
    use ergm_mcmc::graph::Graph;
    use ergm_mcmc::metropolis_hastings::ErgmChain;
    use ergm_mcmc::terms::{Model, Term};

    let g = Graph::from_edges(3, &[(1, 2), (2, 3), (1, 3)]).unwrap();
    let model = Model::new(vec![Term::Edges, Term::Triangles], vec![0.0, 0.0]).unwrap();
    let chain = ErgmChain::new(g, model).unwrap();
    assert_eq!(chain.statistics(), &[3.0, 1.0]);
    ```
    */
    pub fn new(graph: Graph, model: Model) -> Result<Self> {
        let n = graph.n_vertices();
        if n < 2 {
            return Err(ErgmError::TooFewVertices { n });
        }
        let current_state = model.compute_statistics(&graph);
        let seed = thread_rng().gen::<u64>();
        Ok(Self {
            delta: vec![0.0; model.len()],
            vertices: Uniform::new(0, n),
            graph,
            model,
            current_state,
            tracker: AcceptanceTracker::new(),
            seed,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// Reseeds the chain's generator.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Performs one Metropolis–Hastings step and reports whether it was accepted.
    pub fn propose(&mut self) -> bool {
        let accepted = mh_step(
            &mut self.graph,
            &self.model,
            &mut self.current_state,
            &mut self.delta,
            &self.vertices,
            &mut self.rng,
        );
        self.tracker.record(accepted);
        accepted
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The running statistics vector.
    pub fn statistics(&self) -> &[f64] {
        &self.current_state
    }

    /// The statistics recomputed from scratch on the current graph.
    ///
    /// Always equal to [`ErgmChain::statistics`]; useful to check that invariant.
    pub fn recompute_statistics(&self) -> Vec<f64> {
        self.model.compute_statistics(&self.graph)
    }

    pub fn acceptance(&self) -> &AcceptanceTracker {
        &self.tracker
    }

    /// Gives the (mutated) graph back.
    pub fn into_graph(self) -> Graph {
        self.graph
    }
}

impl MarkovChain<f64> for ErgmChain {
    fn step(&mut self) -> &[f64] {
        self.propose();
        &self.current_state
    }

    fn current_state(&self) -> &[f64] {
        &self.current_state
    }
}

/// Independent ERGM chains sharing a model and a starting graph.
#[derive(Debug, Clone)]
pub struct ErgmSampler {
    /// The model every chain samples from.
    pub model: Model,
    /// The vector of independent Markov chains.
    pub chains: Vec<ErgmChain>,
    /// The global random seed.
    pub seed: u64,
}

impl ErgmSampler {
    /// Creates `n_chains` chains, each starting from its own copy of `initial`.
    pub fn new(initial: &Graph, model: Model, n_chains: usize) -> Result<Self> {
        let chains = (0..n_chains)
            .map(|_| ErgmChain::new(initial.clone(), model.clone()))
            .collect::<Result<Vec<_>>>()?;
        let seed = thread_rng().gen::<u64>();
        Ok(Self {
            model,
            chains,
            seed,
        })
    }

    /// Sets a new global seed; chain `i` is reseeded with `seed + i`.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        for (i, chain) in self.chains.iter_mut().enumerate() {
            let chain_seed = seed.wrapping_add(i as u64);
            chain.seed = chain_seed;
            chain.rng = SmallRng::seed_from_u64(chain_seed);
        }
        self
    }
}

impl HasChains<f64> for ErgmSampler {
    type Chain = ErgmChain;

    fn chains_mut(&mut self) -> &mut Vec<Self::Chain> {
        &mut self.chains
    }
}
