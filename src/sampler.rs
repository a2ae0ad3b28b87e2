/*!
# Sampler driver

[`run_sampler`] runs a single chain over a caller-owned graph:

1. `burn_in` raw Metropolis–Hastings steps; nothing is recorded and thinning does not apply.
2. For each of `n_samples` samples, `thinning` steps followed by recording the running
   statistics as one row (whether or not the last step was accepted) and, if
   `keep_graphs` is set, a copy of the graph.

The statistics are computed from scratch once, when the chain is created. Every recorded value
after that comes from adding accepted deltas, which keeps the per-step cost independent of the
graph size.

The graph is mutated in place and left in the chain's final state; clone it first if the
original is needed.

# Examples

```rust
use ergm_mcmc::graph::Graph;
use ergm_mcmc::sampler::{run_sampler, SamplerConfig};
use ergm_mcmc::terms::{Model, Term};

let mut g = Graph::new(10);
let model = Model::new(vec![Term::Edges], vec![-2.0]).unwrap();
let config = SamplerConfig::default().burn_in(500).seed(42);
let result = run_sampler(&mut g, &model, 200, &config).unwrap();
assert_eq!(result.stats.shape(), &[200, 1]);
assert!(result.graphs.is_empty());
assert_eq!(result.stats[[199, 0]], g.n_edges() as f64);
```
*/

use ndarray::{Array1, Array2, ArrayView1, Axis};
use tracing::{debug, info, warn};

use crate::core::check_thinning;
use crate::error::{ErgmError, Result};
use crate::graph::Graph;
use crate::metropolis_hastings::ErgmChain;
use crate::terms::{Model, Term};

/// Default number of discarded steps before recording.
pub const DEFAULT_BURN_IN: usize = 1000;

/// Conventional number of samples drawn by [`fit`].
pub const DEFAULT_FIT_STEPS: usize = 1000;

/// Settings for a single [`run_sampler`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Number of unrecorded steps before sampling starts.
    pub burn_in: usize,
    /// Steps performed between recorded samples. Must be at least 1.
    pub thinning: usize,
    /// Whether to store a copy of the graph with every sample.
    pub keep_graphs: bool,
    /// Seed for the chain's generator; `None` draws one from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            burn_in: DEFAULT_BURN_IN,
            thinning: 1,
            keep_graphs: false,
            seed: None,
        }
    }
}

impl SamplerConfig {
    pub fn burn_in(mut self, burn_in: usize) -> Self {
        self.burn_in = burn_in;
        self
    }

    pub fn thinning(mut self, thinning: usize) -> Self {
        self.thinning = thinning;
        self
    }

    pub fn keep_graphs(mut self, keep_graphs: bool) -> Self {
        self.keep_graphs = keep_graphs;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn validate(&self) -> Result<()> {
        check_thinning(self.thinning)
    }
}

/// Output of one sampler call.
#[derive(Debug, Clone, PartialEq)]
pub struct McmcResult {
    /// `n_samples x n_terms` statistics trajectory.
    pub stats: Array2<f64>,
    /// One graph per sample when `keep_graphs` was set, otherwise empty.
    pub graphs: Vec<Graph>,
    /// Fraction of accepted proposals over burn-in and sampling.
    pub acceptance_rate: f64,
    /// Column names of `stats`.
    pub term_names: Vec<String>,
}

impl McmcResult {
    pub fn n_samples(&self) -> usize {
        self.stats.nrows()
    }

    /// Column means of the statistics, `None` if no sample was drawn.
    pub fn mean(&self) -> Option<Array1<f64>> {
        self.stats.mean_axis(Axis(0))
    }
}

/// Samples `n_samples` statistics vectors from `model`, starting at and mutating `graph`.
///
/// Validation (vertex count, thinning) happens before anything is mutated, so on error
/// `graph` is left exactly as received.
pub fn run_sampler(
    graph: &mut Graph,
    model: &Model,
    n_samples: usize,
    config: &SamplerConfig,
) -> Result<McmcResult> {
    config.validate()?;
    let n = graph.n_vertices();
    if n < 2 {
        return Err(ErgmError::TooFewVertices { n });
    }

    let mut chain = ErgmChain::new(std::mem::take(graph), model.clone())?;
    if let Some(seed) = config.seed {
        chain = chain.set_seed(seed);
    }
    let result = drive(&mut chain, n_samples, config);
    *graph = chain.into_graph();
    Ok(result)
}

fn drive(chain: &mut ErgmChain, n_samples: usize, config: &SamplerConfig) -> McmcResult {
    let term_names = chain.model().term_names();
    debug!(
        vertices = chain.graph().n_vertices(),
        terms = ?term_names,
        burn_in = config.burn_in,
        thinning = config.thinning,
        n_samples,
        seed = chain.seed,
        "starting ERGM sampler"
    );

    for _ in 0..config.burn_in {
        chain.propose();
    }
    debug!(
        statistics = ?chain.statistics(),
        acceptance_rate = chain.acceptance().rate(),
        "burn-in finished"
    );

    let mut stats = Array2::<f64>::zeros((n_samples, chain.model().len()));
    let mut graphs = Vec::with_capacity(if config.keep_graphs { n_samples } else { 0 });
    for mut row in stats.axis_iter_mut(Axis(0)) {
        for _ in 0..config.thinning {
            chain.propose();
        }
        row.assign(&ArrayView1::from(chain.statistics()));
        if config.keep_graphs {
            graphs.push(chain.graph().clone());
        }
    }

    let tracker = chain.acceptance();
    let acceptance_rate = tracker.rate();
    if tracker.proposed() >= 100 && tracker.accepted() == 0 {
        warn!(
            proposed = tracker.proposed(),
            "no proposal was accepted, check the model parameters"
        );
    }
    info!(n_samples, acceptance_rate, "ERGM sampler finished");

    McmcResult {
        stats,
        graphs,
        acceptance_rate,
        term_names,
    }
}

/// **Not an estimator.** Simulates from `terms` with every parameter fixed at `1.0`.
///
/// This is a placeholder for a maximum-likelihood fit: it ignores the information in
/// `observed` beyond using a copy of it as the starting state, and returns the simulation
/// result. `observed` itself is not modified.
pub fn fit(
    terms: Vec<Term>,
    observed: &Graph,
    n_steps: usize,
    burn_in: usize,
) -> Result<McmcResult> {
    warn!("`fit` is a simulation placeholder with all parameters set to 1.0, not an estimator");
    let params = vec![1.0; terms.len()];
    let model = Model::new(terms, params)?;
    let mut graph = observed.clone();
    run_sampler(
        &mut graph,
        &model,
        n_steps,
        &SamplerConfig::default().burn_in(burn_in),
    )
}
