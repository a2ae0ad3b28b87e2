//! Chain abstractions shared by the samplers: a single [`MarkovChain`], generic runners that
//! record its state into an `ndarray` matrix, and [`ChainRunner`] for driving several
//! independent chains in parallel with rayon.

use std::time::{Duration, Instant};

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use ndarray::{Array2, ArrayView1};
use num_traits::Zero;
use rayon::prelude::*;

use crate::error::{ErgmError, Result};

const UPDATE_INTERVAL: Duration = Duration::from_millis(500);

pub trait MarkovChain<S> {
    /// Does one iteration of the chain, returning the new current state.
    fn step(&mut self) -> &[S];

    /// Get the current state without stepping.
    fn current_state(&self) -> &[S];
}

/// Rejects a thinning interval of zero, which would record the same state over and over.
pub(crate) fn check_thinning(thinning: usize) -> Result<()> {
    if thinning == 0 {
        return Err(ErgmError::InvalidConfig("thinning must be at least 1".to_string()));
    }
    Ok(())
}

/// Runs `burn_in` unrecorded steps, then records `n_samples` states, each taken after
/// `thinning` further steps.
///
/// Burn-in is never thinned. Fails with [`ErgmError::InvalidConfig`] if `thinning` is zero.
pub fn run_chain<S, M>(
    chain: &mut M,
    n_samples: usize,
    burn_in: usize,
    thinning: usize,
) -> Result<Array2<S>>
where
    M: MarkovChain<S>,
    S: Clone + Zero,
{
    check_thinning(thinning)?;
    let dim = chain.current_state().len();
    let mut out = Array2::<S>::zeros((n_samples, dim));

    for _ in 0..burn_in {
        chain.step();
    }
    for i in 0..n_samples {
        for _ in 0..thinning {
            chain.step();
        }
        out.row_mut(i).assign(&ArrayView1::from(chain.current_state()));
    }

    Ok(out)
}

/// Same as [`run_chain`], reporting progress on `pb` roughly every 500ms.
pub fn run_chain_with_progress<S, M>(
    chain: &mut M,
    n_samples: usize,
    burn_in: usize,
    thinning: usize,
    pb: &ProgressBar,
) -> Result<Array2<S>>
where
    M: MarkovChain<S>,
    S: Clone + Zero,
{
    check_thinning(thinning)?;
    let dim = chain.current_state().len();
    let mut out = Array2::<S>::zeros((n_samples, dim));
    let total = burn_in + n_samples * thinning;
    let mut done = 0_usize;
    let mut last_update = Instant::now();

    pb.set_length(total as u64);

    let mut tick = |done: usize, pb: &ProgressBar| {
        if last_update.elapsed() >= UPDATE_INTERVAL || done == total {
            pb.set_position(done as u64);
            last_update = Instant::now();
        }
    };

    for _ in 0..burn_in {
        chain.step();
        done += 1;
        tick(done, pb);
    }
    for i in 0..n_samples {
        for _ in 0..thinning {
            chain.step();
            done += 1;
            tick(done, pb);
        }
        out.row_mut(i).assign(&ArrayView1::from(chain.current_state()));
    }

    Ok(out)
}

/// A trait for "anything that owns multiple MarkovChains".
/// - `S` is the state element type (e.g. f64).
/// - `Chain` is the MarkovChain type stored by this struct.
pub trait HasChains<S> {
    type Chain: MarkovChain<S> + std::marker::Send;

    /// Returns a mutable reference to the vector of chains.
    fn chains_mut(&mut self) -> &mut Vec<Self::Chain>;
}

pub trait ChainRunner<S>: HasChains<S>
where
    S: Clone + Zero + Send,
{
    /// Runs the chains in parallel. Every chain owns its own state and RNG, so the result
    /// for a given seed does not depend on thread scheduling.
    ///
    /// Fails with [`ErgmError::InvalidConfig`] before any chain moves if `thinning` is zero.
    fn run(
        &mut self,
        n_samples: usize,
        burn_in: usize,
        thinning: usize,
    ) -> Result<Vec<Array2<S>>> {
        check_thinning(thinning)?;
        self.chains_mut()
            .par_iter_mut()
            .map(|chain| run_chain(chain, n_samples, burn_in, thinning))
            .collect()
    }

    /// Same as [`ChainRunner::run`] with one progress bar per chain.
    fn run_progress(
        &mut self,
        n_samples: usize,
        burn_in: usize,
        thinning: usize,
    ) -> Result<Vec<Array2<S>>> {
        check_thinning(thinning)?;
        let multi = MultiProgress::new();
        let pb_style = ProgressStyle::default_bar()
            .template("{prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-");

        self.chains_mut()
            .par_iter_mut()
            .enumerate()
            .map(|(i, chain)| {
                let pb = multi.add(ProgressBar::new(0));
                pb.set_prefix(format!("Chain {i}"));
                pb.set_style(pb_style.clone());

                let samples = run_chain_with_progress(chain, n_samples, burn_in, thinning, &pb);

                pb.finish_with_message("Done!");
                samples
            })
            .collect()
    }
}

impl<S: Clone + Zero + Send, T: HasChains<S>> ChainRunner<S> for T {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts its own steps.
    struct Counter {
        state: Vec<f64>,
    }

    impl MarkovChain<f64> for Counter {
        fn step(&mut self) -> &[f64] {
            self.state[0] += 1.0;
            &self.state
        }

        fn current_state(&self) -> &[f64] {
            &self.state
        }
    }

    struct Counters {
        chains: Vec<Counter>,
    }

    impl HasChains<f64> for Counters {
        type Chain = Counter;

        fn chains_mut(&mut self) -> &mut Vec<Counter> {
            &mut self.chains
        }
    }

    #[test]
    fn test_burn_in_and_thinning_schedule() {
        let mut chain = Counter { state: vec![0.0] };
        let out = run_chain(&mut chain, 3, 10, 2).unwrap();
        assert_eq!(out.shape(), &[3, 1]);
        assert_eq!(out.column(0).to_vec(), vec![12.0, 14.0, 16.0]);
    }

    #[test]
    fn test_progress_runner_matches_plain_runner() {
        let mut a = Counter { state: vec![0.0] };
        let mut b = Counter { state: vec![0.0] };
        let pb = ProgressBar::hidden();
        assert_eq!(
            run_chain(&mut a, 5, 3, 1).unwrap(),
            run_chain_with_progress(&mut b, 5, 3, 1, &pb).unwrap()
        );
    }

    #[test]
    fn test_zero_thinning_is_rejected_before_stepping() {
        let mut chain = Counter { state: vec![0.0] };
        let err = run_chain::<f64, _>(&mut chain, 5, 10, 0).unwrap_err();
        assert!(matches!(err, ErgmError::InvalidConfig(_)));
        assert!(run_chain_with_progress::<f64, _>(&mut chain, 5, 10, 0, &ProgressBar::hidden())
            .is_err());
        assert_eq!(chain.state, vec![0.0]);

        let mut counters = Counters {
            chains: (0..2).map(|_| Counter { state: vec![0.0] }).collect(),
        };
        assert!(counters.run(5, 10, 0).is_err());
        assert!(counters.run_progress(5, 10, 0).is_err());
        assert!(counters.chains.iter().all(|c| c.state == vec![0.0]));
    }

    #[test]
    fn test_runner_returns_one_matrix_per_chain() {
        let mut counters = Counters {
            chains: (0..3).map(|_| Counter { state: vec![0.0] }).collect(),
        };
        let out = counters.run(4, 0, 1).unwrap();
        assert_eq!(out.len(), 3);
        for m in out {
            assert_eq!(m.column(0).to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
        }
    }

    #[test]
    fn test_progress_runner_returns_one_matrix_per_chain() {
        let mut counters = Counters {
            chains: (0..3).map(|_| Counter { state: vec![0.0] }).collect(),
        };
        let out = counters.run_progress(2, 1, 3).unwrap();
        assert_eq!(out.len(), 3);
        for m in out {
            assert_eq!(m.column(0).to_vec(), vec![4.0, 7.0]);
        }
    }
}
