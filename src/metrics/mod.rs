//! Prometheus metrics for pipeline runs.
//!
//! Metrics are exported in the text exposition format, written to a file
//! after a batch. There is no HTTP endpoint.
//!
//! # Metrics Exposed
//!
//! - `rngne_runs_total` - Successful runs
//! - `rngne_failures_total` - Failed runs (decode error or zero bits)
//! - `rngne_bits_total` - Raw bits sampled across all runs
//! - `rngne_shannon_entropy_bits` - Shannon entropy of the last run
//! - `rngne_min_entropy_bits` - Min-entropy of the last run
//! - `rngne_collision_entropy_bits` - Collision entropy of the last run
//! - `rngne_block_size_bits` - Block size of the last run
//! - `rngne_seed_entropy_bound_bits` - Seed entropy upper bound of the last run

mod collector;

pub use collector::{MetricsError, MetricsRegistry};
