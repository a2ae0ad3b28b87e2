//! Metropolis–Hastings sampling of Exponential Random Graph Models.
//!
//! A chain walks over simple undirected graphs by toggling one vertex pair per step and keeps
//! the model's sufficient statistics up to date incrementally. See [`sampler::run_sampler`]
//! for the single-chain entry point and [`metropolis_hastings::ErgmSampler`] for running
//! independent chains in parallel.

pub mod change_stats;
pub mod core;
pub mod error;
pub mod graph;
pub mod metropolis_hastings;
pub mod network;
pub mod sampler;
pub mod stats;
pub mod terms;

pub use error::{ErgmError, Result};
pub use graph::Graph;
pub use network::{AttrValue, Network};
pub use sampler::{fit, run_sampler, McmcResult, SamplerConfig};
pub use terms::{Model, Term};
