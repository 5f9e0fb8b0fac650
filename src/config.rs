//! Size sweep configuration.

use std::path::PathBuf;

use crate::error::{BenchError, Result};

pub const DEFAULT_MIN_SIZE: usize = 500;
/// Exclusive upper bound of the sweep.
pub const DEFAULT_MAX_SIZE: usize = 5001;
pub const DEFAULT_STEP: usize = 500;
pub const DEFAULT_REPEATS: usize = 20;
pub const DEFAULT_SEED: u64 = 21;

/// Parameters of one benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    pub min_size: usize,
    /// Exclusive.
    pub max_size: usize,
    pub step: usize,
    /// Trials per operation; the fastest one is recorded.
    pub repeats: usize,
    pub seed: u64,
    /// Where result tables are written and read back for plotting.
    pub output_dir: PathBuf,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            step: DEFAULT_STEP,
            repeats: DEFAULT_REPEATS,
            seed: DEFAULT_SEED,
            output_dir: PathBuf::from("."),
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        if self.step == 0 {
            return Err(BenchError::InvalidConfig("step must be greater than 0".into()));
        }

        if self.repeats == 0 {
            return Err(BenchError::InvalidConfig(
                "repeat count must be greater than 0".into(),
            ));
        }

        if self.min_size == 0 {
            return Err(BenchError::InvalidConfig(
                "minimum size must be greater than 0".into(),
            ));
        }

        if self.min_size >= self.max_size {
            return Err(BenchError::InvalidConfig(format!(
                "minimum size {} must be below maximum size {}",
                self.min_size, self.max_size
            )));
        }

        Ok(())
    }

    /// Matrix dimensions to benchmark, in increasing order.
    pub fn sizes(&self) -> impl Iterator<Item = usize> {
        (self.min_size..self.max_size).step_by(self.step.max(1))
    }

    /// Number of rows a run with this config produces.
    pub fn expected_rows(&self) -> usize {
        self.max_size
            .saturating_sub(self.min_size)
            .div_ceil(self.step.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sweep_covers_500_to_5000() {
        let config = SweepConfig::default();
        let sizes: Vec<usize> = config.sizes().collect();

        assert_eq!(sizes.len(), 10);
        assert_eq!(sizes.first(), Some(&500));
        assert_eq!(sizes.last(), Some(&5000));
        assert_eq!(config.expected_rows(), 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn two_size_sweep() {
        let config = SweepConfig {
            min_size: 500,
            max_size: 1001,
            step: 500,
            ..SweepConfig::default()
        };

        assert_eq!(config.sizes().collect::<Vec<_>>(), vec![500, 1000]);
        assert_eq!(config.expected_rows(), 2);
    }

    #[test]
    fn expected_rows_matches_sizes() {
        for (min_size, max_size, step) in [(1, 2, 1), (4, 20, 4), (4, 21, 4), (3, 100, 7)] {
            let config = SweepConfig {
                min_size,
                max_size,
                step,
                ..SweepConfig::default()
            };
            assert_eq!(config.expected_rows(), config.sizes().count());
        }
    }

    #[test]
    fn rejects_degenerate_sweeps() {
        let base = SweepConfig::default();

        let zero_step = SweepConfig { step: 0, ..base.clone() };
        assert!(matches!(zero_step.validate(), Err(BenchError::InvalidConfig(_))));

        let zero_repeats = SweepConfig { repeats: 0, ..base.clone() };
        assert!(matches!(zero_repeats.validate(), Err(BenchError::InvalidConfig(_))));

        let zero_min = SweepConfig { min_size: 0, ..base.clone() };
        assert!(matches!(zero_min.validate(), Err(BenchError::InvalidConfig(_))));

        let inverted = SweepConfig {
            min_size: 1000,
            max_size: 500,
            ..base
        };
        assert!(matches!(inverted.validate(), Err(BenchError::InvalidConfig(_))));
    }
}
