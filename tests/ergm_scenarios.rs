//! End-to-end checks of the ERGM sampler on small graphs with known answers.
//!
//! 1. `test_edge_model_converges_to_binomial_mean`: with only an edge term every dyad is an
//!    independent Bernoulli(sigmoid(θ)), so the mean edge count is known in closed form.
//! 2. `test_fit_placeholder_shape`: `fit` returns a (1000, 2) trajectory and no snapshots.
//! 3. `test_triangle_scenario`: hand-checked triangle counts before and after a toggle.

use approx::assert_abs_diff_eq;
use ergm_mcmc::change_stats::{term_delta, Change};
use ergm_mcmc::core::ChainRunner;
use ergm_mcmc::metropolis_hastings::ErgmSampler;
use ergm_mcmc::sampler::{DEFAULT_BURN_IN, DEFAULT_FIT_STEPS};
use ergm_mcmc::stats::max_rhat;
use ergm_mcmc::{fit, run_sampler, Graph, Model, SamplerConfig, Term};

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: u64 = 42;

    fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    #[test]
    fn test_edge_model_converges_to_binomial_mean() {
        const N: usize = 10;
        const THETA: f64 = -2.0;

        let mut g = Graph::new(N);
        let model = Model::new(vec![Term::Edges], vec![THETA]).unwrap();
        let config = SamplerConfig::default().burn_in(1000).seed(SEED);
        let result = run_sampler(&mut g, &model, 5000, &config).unwrap();

        let expected = (N * (N - 1) / 2) as f64 * sigmoid(THETA);
        let mean = result.mean().unwrap();
        assert_abs_diff_eq!(mean[0], expected, epsilon = 1.0);
        assert!(result.acceptance_rate > 0.0 && result.acceptance_rate < 1.0);
    }

    #[test]
    fn test_fit_placeholder_shape() {
        let observed = Graph::from_edges(6, &[(1, 2), (2, 3), (3, 1), (4, 5)]).unwrap();
        let result = fit(
            vec![Term::Edges, Term::Triangles],
            &observed,
            DEFAULT_FIT_STEPS,
            DEFAULT_BURN_IN,
        )
        .unwrap();
        assert_eq!(result.stats.shape(), &[1000, 2]);
        assert!(result.graphs.is_empty());
    }

    #[test]
    fn test_triangle_scenario() {
        let mut g = Graph::from_edges(4, &[(1, 2), (2, 3), (3, 1), (3, 4)]).unwrap();
        assert_eq!(Term::Triangles.statistic(&g), 1.0);

        let change = Change::new(&g, 2, 4).unwrap();
        assert_eq!(term_delta(&Term::Triangles, &g, &change), 1.0);

        g.add_edge(2, 4).unwrap();
        assert_eq!(Term::Triangles.statistic(&g), 2.0);
    }

    #[test]
    fn test_two_vertex_graph_flips_its_only_edge() {
        let mut g = Graph::new(2);
        // Zero parameters accept every toggle, so the single dyad alternates.
        let model = Model::new(vec![Term::Edges], vec![0.0]).unwrap();
        let config = SamplerConfig::default().burn_in(0).seed(SEED);
        let result = run_sampler(&mut g, &model, 6, &config).unwrap();
        assert_eq!(
            result.stats.column(0).to_vec(),
            vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0]
        );
        assert_eq!(result.acceptance_rate, 1.0);
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let model = Model::new(
            vec![Term::Edges, Term::Degree(2), Term::Triangles],
            vec![-1.5, 0.2, 0.3],
        )
        .unwrap();
        let config = SamplerConfig::default()
            .burn_in(200)
            .thinning(5)
            .keep_graphs(true)
            .seed(SEED);

        let mut a = Graph::new(15);
        let mut b = Graph::new(15);
        let ra = run_sampler(&mut a, &model, 300, &config).unwrap();
        let rb = run_sampler(&mut b, &model, 300, &config).unwrap();
        assert_eq!(ra, rb);
        assert_eq!(a, b);
    }

    #[test]
    fn test_parallel_chains_agree() {
        const N: usize = 10;
        const THETA: f64 = -1.0;

        let model = Model::new(vec![Term::Edges], vec![THETA]).unwrap();
        let mut sampler = ErgmSampler::new(&Graph::new(N), model, 4)
            .unwrap()
            .set_seed(SEED);
        let chains = sampler.run(5_000, 1_000, 5).unwrap();
        assert_eq!(chains.len(), 4);

        let expected = (N * (N - 1) / 2) as f64 * sigmoid(THETA);
        for chain in &chains {
            assert_eq!(chain.shape(), &[5_000, 1]);
            let mean = chain.mean_axis(ndarray::Axis(0)).unwrap();
            assert_abs_diff_eq!(mean[0], expected, epsilon = 1.0);
        }
        assert!(max_rhat(&chains).unwrap() < 1.1);

        for chain in &sampler.chains {
            assert_eq!(chain.statistics(), chain.recompute_statistics().as_slice());
        }
    }
}
