//! Pipeline orchestration.
//!
//! Sequences sampler → estimators → extractor for one decoded pixel
//! grid and packages the result. A run is synchronous, holds no state
//! between calls and either completes or fails fast on empty input.
//! Image decoding happens before the pipeline is ever invoked.

mod report;
mod state;

pub use report::{group_thousands, EntropyReport};
pub use state::{PipelineState, TransitionError};

use crate::analysis::EntropyEstimates;
use crate::conditioning::SeedExtractor;
use crate::config::{ConfigError, PipelineConfig};
use crate::extraction::{Bitstream, LsbSampler};
use crate::source::PixelGrid;
use thiserror::Error;

/// Fatal pipeline errors.
///
/// Soft estimator conditions never show up here; they surface as 0.0
/// values in the report.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The image produced no bits.
    #[error("extraction failed: zero bits were extracted")]
    EmptyInput,
    /// Internal state machine misuse.
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Output of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The sampled bitstream, for the persistence collaborator.
    pub bits: Bitstream,
    /// Metrics and master seed.
    pub report: EntropyReport,
    /// States visited, `Idle` through `Done`.
    pub states: Vec<PipelineState>,
}

/// Stateless orchestrator of the extraction pipeline.
///
/// Immutable after construction; safe to share between threads that
/// each process their own image.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    sampler: LsbSampler,
    extractor: SeedExtractor,
}

impl Pipeline {
    /// Creates a pipeline from a validated configuration.
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            sampler: LsbSampler::new(),
            extractor: SeedExtractor::new(config.hash),
            config,
        })
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the full pipeline on a decoded grid.
    pub fn run(&self, grid: &PixelGrid) -> Result<PipelineOutput, PipelineError> {
        let mut run = Run::default();

        run.advance(PipelineState::Sampling)?;
        let bits = self.sampler.sample(grid);
        if bits.is_empty() {
            run.fail();
            tracing::warn!(
                width = grid.width(),
                height = grid.height(),
                "Zero bits extracted, aborting run"
            );
            return Err(PipelineError::EmptyInput);
        }

        run.advance(PipelineState::Estimating)?;
        let estimates = EntropyEstimates::analyze(&bits, self.config.block_size);

        run.advance(PipelineState::Extracting)?;
        let seed = match self.extractor.extract(&bits) {
            Some(seed) => seed,
            None => {
                run.fail();
                return Err(PipelineError::EmptyInput);
            }
        };

        run.advance(PipelineState::Done)?;
        let report = EntropyReport::new(bits.len(), estimates, seed);

        tracing::info!(
            bits = report.bit_count(),
            shannon = report.shannon(),
            min_entropy = report.min_entropy(),
            collision_entropy = report.collision_entropy(),
            block_size = report.block_size(),
            "Pipeline run complete"
        );

        Ok(PipelineOutput {
            bits,
            report,
            states: run.visited,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            config: PipelineConfig::default(),
            sampler: LsbSampler::new(),
            extractor: SeedExtractor::default(),
        }
    }
}

/// Bookkeeping for one run.
struct Run {
    state: PipelineState,
    visited: Vec<PipelineState>,
}

impl Default for Run {
    fn default() -> Self {
        Self {
            state: PipelineState::Idle,
            visited: vec![PipelineState::Idle],
        }
    }
}

impl Run {
    fn advance(&mut self, next: PipelineState) -> Result<(), TransitionError> {
        self.state.advance(next)?;
        self.visited.push(next);
        Ok(())
    }

    fn fail(&mut self) {
        // Failed is reachable from every live state
        if self.state.advance(PipelineState::Failed).is_ok() {
            self.visited.push(PipelineState::Failed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditioning::HashAlgorithm;
    use crate::source::{PixelSource, SyntheticSource};

    /// Grid whose pixels are all gray `value`.
    fn flat_grid(width: u32, height: u32, value: u8) -> PixelGrid {
        let n = (width * height) as usize;
        PixelGrid::new(vec![value; n * 3], width, height).unwrap()
    }

    /// 16 pixels alternating odd/even gray, one row.
    fn alternating_grid() -> PixelGrid {
        let pixels: Vec<[u8; 3]> = (0..16).map(|i| if i % 2 == 0 { [1, 1, 1] } else { [2, 2, 2] }).collect();
        PixelGrid::from_pixels(&pixels, 16, 1).unwrap()
    }

    #[test]
    fn test_alternating_image_end_to_end() {
        let out = Pipeline::default().run(&alternating_grid()).unwrap();

        assert_eq!(out.bits.to_string(), "1010101010101010");
        assert_eq!(out.report.bit_count(), 16);
        assert!((out.report.shannon() - 1.0).abs() < 1e-9);
        assert_eq!(out.report.min_entropy(), 0.0);
        assert_eq!(out.report.collision_entropy(), 0.0);
        assert_eq!(out.report.block_size(), 8);
        assert_eq!(out.report.master_seed().to_hex().len(), 64);
    }

    #[test]
    fn test_visits_every_state_in_order() {
        let out = Pipeline::default().run(&flat_grid(4, 4, 9)).unwrap();
        assert_eq!(
            out.states,
            vec![
                PipelineState::Idle,
                PipelineState::Sampling,
                PipelineState::Estimating,
                PipelineState::Extracting,
                PipelineState::Done,
            ]
        );
    }

    #[test]
    fn test_empty_grid_is_fatal() {
        let err = Pipeline::default().run(&PixelGrid::empty()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput));
        assert_eq!(err.to_string(), "extraction failed: zero bits were extracted");
    }

    #[test]
    fn test_zero_width_grid_is_fatal() {
        let grid = PixelGrid::new(Vec::new(), 0, 10).unwrap();
        assert!(matches!(
            Pipeline::default().run(&grid),
            Err(PipelineError::EmptyInput)
        ));
    }

    #[test]
    fn test_short_stream_absorbs_soft_errors() {
        // 3 bits: shorter than one block, but still a valid run
        let out = Pipeline::default().run(&flat_grid(3, 1, 1)).unwrap();

        assert_eq!(out.report.shannon(), 0.0);
        assert_eq!(out.report.min_entropy(), 0.0);
        assert_eq!(out.report.collision_entropy(), 0.0);
        assert!(!out.report.master_seed().to_hex().is_empty());
    }

    #[test]
    fn test_block_size_is_configurable() {
        let pipeline = Pipeline::new(PipelineConfig::with_block_size(2)).unwrap();
        // gray parity 0,0,0,1,1,0,1,1 -> blocks 00 01 10 11
        let pixels: Vec<[u8; 3]> = [0u8, 0, 0, 1, 1, 0, 1, 1]
            .iter()
            .map(|&b| [b, b, b])
            .collect();
        let grid = PixelGrid::from_pixels(&pixels, 4, 2).unwrap();

        let out = pipeline.run(&grid).unwrap();
        assert_eq!(out.report.block_size(), 2);
        assert_eq!(out.report.min_entropy(), 2.0);
        assert_eq!(out.report.collision_entropy(), 2.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Pipeline::new(PipelineConfig::with_block_size(0)).is_err());
    }

    #[test]
    fn test_runs_are_deterministic_and_independent() {
        let grid = SyntheticSource::new(32, 32).load().unwrap();
        let pipeline = Pipeline::default();

        let a = pipeline.run(&grid).unwrap();
        let b = pipeline.run(&grid).unwrap();
        assert_eq!(a.report, b.report);

        let other = SyntheticSource::new(32, 32).with_seed(1).load().unwrap();
        let c = pipeline.run(&other).unwrap();
        assert_ne!(a.report.master_seed(), c.report.master_seed());
    }

    #[test]
    fn test_hash_choice_changes_seed_only() {
        let grid = SyntheticSource::new(8, 8).load().unwrap();
        let sha = Pipeline::default().run(&grid).unwrap();
        let b3 = Pipeline::new(PipelineConfig {
            hash: HashAlgorithm::Blake3,
            ..Default::default()
        })
        .unwrap()
        .run(&grid)
        .unwrap();

        assert_eq!(sha.report.estimates(), b3.report.estimates());
        assert_ne!(sha.report.master_seed(), b3.report.master_seed());
    }

    #[test]
    fn test_parallel_runs() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline>();

        let pipeline = Pipeline::default();
        let grid = SyntheticSource::new(16, 16).load().unwrap();
        let expected = pipeline.run(&grid).unwrap().report;

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4).map(|_| s.spawn(|| pipeline.run(&grid).unwrap().report)).collect();
            for h in handles {
                assert_eq!(h.join().unwrap(), expected);
            }
        });
    }
}
