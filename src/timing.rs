//! Minimum-of-N wall-clock timing.

use std::hint::black_box;
use std::time::{Duration, Instant};

use crate::error::{BenchError, Result};

/// Runs `trial` `repeats` times and returns the fastest observed duration.
///
/// Each trial is a single execution. The first failing trial aborts the
/// measurement and its error is returned.
pub fn min_trial_time<T, F>(repeats: usize, mut trial: F) -> Result<Duration>
where
    F: FnMut() -> Result<T>,
{
    let mut best: Option<Duration> = None;

    for _ in 0..repeats {
        let start = Instant::now();
        let output = trial()?;
        let elapsed = start.elapsed();
        black_box(output);

        best = Some(best.map_or(elapsed, |b| b.min(elapsed)));
    }

    best.ok_or_else(|| BenchError::InvalidConfig("repeat count must be greater than 0".into()))
}
