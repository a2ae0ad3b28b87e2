//! Provides functions for computing MCMC diagnostics on statistics trajectories.

use ndarray::prelude::*;
use ndarray_stats::QuantileExt;

use crate::error::{ErgmError, Result};

/// Counts proposals and acceptances of a chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcceptanceTracker {
    proposed: u64,
    accepted: u64,
}

impl AcceptanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record(&mut self, accepted: bool) {
        self.proposed += 1;
        self.accepted += accepted as u64;
    }

    pub fn proposed(&self) -> u64 {
        self.proposed
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Fraction of accepted proposals, `0.0` before the first proposal.
    pub fn rate(&self) -> f64 {
        if self.proposed == 0 {
            0.0
        } else {
            self.accepted as f64 / self.proposed as f64
        }
    }
}

/// Gelman-Rubin potential scale reduction factor for each column.
///
/// Every element of `chains` is one chain's `n_samples x n_terms` statistics matrix; all must
/// have the same shape with at least two rows, and there must be at least two chains. A
/// statistic that is constant within every chain has zero within-chain variance and yields
/// `NaN` or `inf`.
pub fn rhat(chains: &[Array2<f64>]) -> Result<Array1<f64>> {
    if chains.len() < 2 {
        return Err(ErgmError::Diagnostic(format!(
            "R-hat needs at least 2 chains, got {}",
            chains.len()
        )));
    }
    let shape = chains[0].dim();
    if let Some(bad) = chains.iter().find(|c| c.dim() != shape) {
        return Err(ErgmError::Diagnostic(format!(
            "chains have different shapes: {:?} and {:?}",
            shape,
            bad.dim()
        )));
    }
    let (n, n_params) = shape;
    if n < 2 {
        return Err(ErgmError::Diagnostic(format!(
            "R-hat needs at least 2 samples per chain, got {n}"
        )));
    }

    let n_chains = chains.len();
    let mut means = Array2::<f64>::zeros((n_chains, n_params));
    let mut variances = Array2::<f64>::zeros((n_chains, n_params));
    for (c, chain) in chains.iter().enumerate() {
        let mean = chain.mean_axis(Axis(0)).ok_or_else(|| {
            ErgmError::Diagnostic("mean reduction over an empty chain".to_string())
        })?;
        // Unbiased within-chain variance.
        let var = chain.var_axis(Axis(0), 1.0);
        means.row_mut(c).assign(&mean);
        variances.row_mut(c).assign(&var);
    }

    let n = n as f64;
    let grand_mean = means.mean_axis(Axis(0)).ok_or_else(|| {
        ErgmError::Diagnostic("mean reduction across chains failed".to_string())
    })?;
    let between = (&means - &grand_mean.insert_axis(Axis(0)))
        .pow2()
        .sum_axis(Axis(0))
        * (n / (n_chains as f64 - 1.0));
    let within = variances.mean_axis(Axis(0)).ok_or_else(|| {
        ErgmError::Diagnostic("mean reduction of variances failed".to_string())
    })?;
    let var = &within * ((n - 1.0) / n) + &between * (1.0 / n);
    Ok((var / within).sqrt())
}

/// Largest R-hat over all statistics.
pub fn max_rhat(chains: &[Array2<f64>]) -> Result<f64> {
    let all = rhat(chains)?;
    let max = all
        .max()
        .map_err(|e| ErgmError::Diagnostic(format!("R-hat maximum is undefined: {e}")))?;
    Ok(*max)
}
