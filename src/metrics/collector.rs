//! Metrics collection and registry.

use crate::pipeline::EntropyReport;
use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Registry, TextEncoder};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Metric registration or encoding failed.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
    /// The metrics file could not be written.
    #[error("failed to write metrics file: {0}")]
    Io(#[from] std::io::Error),
}

/// Prometheus metrics registry for pipeline runs.
pub struct MetricsRegistry {
    registry: Registry,

    // Run counters
    runs_total: IntCounter,
    failures_total: IntCounter,
    bits_total: IntCounter,

    // Last successful run
    shannon: Gauge,
    min_entropy: Gauge,
    collision_entropy: Gauge,
    block_size: IntGauge,
    seed_entropy_bound: Gauge,
}

impl MetricsRegistry {
    /// Creates a new metrics registry with all pipeline metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let runs_total = IntCounter::new("rngne_runs_total", "Total successful pipeline runs")?;
        let failures_total = IntCounter::new(
            "rngne_failures_total",
            "Total pipeline runs that failed (decode error or zero bits)",
        )?;
        let bits_total = IntCounter::new(
            "rngne_bits_total",
            "Total raw bits sampled across all runs",
        )?;

        let shannon = Gauge::new(
            "rngne_shannon_entropy_bits",
            "Shannon entropy of the last run (bits/symbol)",
        )?;
        let min_entropy = Gauge::new(
            "rngne_min_entropy_bits",
            "Min-entropy of the last run (bits/block)",
        )?;
        let collision_entropy = Gauge::new(
            "rngne_collision_entropy_bits",
            "Collision entropy of the last run (bits/block)",
        )?;
        let block_size = IntGauge::new(
            "rngne_block_size_bits",
            "Block size used by the Renyi estimators",
        )?;
        let seed_entropy_bound = Gauge::new(
            "rngne_seed_entropy_bound_bits",
            "Upper bound on master seed entropy for the last run",
        )?;

        registry.register(Box::new(runs_total.clone()))?;
        registry.register(Box::new(failures_total.clone()))?;
        registry.register(Box::new(bits_total.clone()))?;
        registry.register(Box::new(shannon.clone()))?;
        registry.register(Box::new(min_entropy.clone()))?;
        registry.register(Box::new(collision_entropy.clone()))?;
        registry.register(Box::new(block_size.clone()))?;
        registry.register(Box::new(seed_entropy_bound.clone()))?;

        Ok(Self {
            registry,
            runs_total,
            failures_total,
            bits_total,
            shannon,
            min_entropy,
            collision_entropy,
            block_size,
            seed_entropy_bound,
        })
    }

    /// Records a successful run.
    pub fn record_run(&self, report: &EntropyReport) {
        self.runs_total.inc();
        self.bits_total.inc_by(report.bit_count() as u64);

        self.shannon.set(report.shannon());
        self.min_entropy.set(report.min_entropy());
        self.collision_entropy.set(report.collision_entropy());
        self.block_size.set(report.block_size() as i64);
        self.seed_entropy_bound.set(report.seed_entropy_bound());
    }

    /// Records a failed run.
    pub fn record_failure(&self) {
        self.failures_total.inc();
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Writes the text exposition to a file (node exporter textfile style).
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), MetricsError> {
        std::fs::write(path.as_ref(), self.encode()?)?;
        tracing::debug!(path = %path.as_ref().display(), "Wrote metrics");
        Ok(())
    }
}
