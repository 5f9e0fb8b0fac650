//! linbench: dense matrix operation benchmarks across compute backends
//!
//! Times matrix product, element-wise add, exponential, sum, mean and min over a
//! sweep of square matrix sizes on the ndarray, scalar CPU and rayon backends,
//! saves one result table per backend, and plots the backends against each other.

pub mod cli;
pub mod compute;
pub mod config;
pub mod error;
pub mod matrix;
pub mod operands;
pub mod plot;
pub mod results;
pub mod runner;
pub mod timing;

pub use compute::{BackendKind, ComputeBackend, Operation, CPUBackend, NdarrayBackend, RayonBackend};
pub use config::SweepConfig;
pub use error::{BenchError, Result};
pub use matrix::{Matrix, Shape};
pub use results::{ResultTable, TimingRow};
pub use runner::BenchmarkRunner;

use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_ids(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}
