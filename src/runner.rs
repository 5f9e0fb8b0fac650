//! Size sweep driver.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument};

use crate::compute::{
    kernel_table, BackendKind, CPUBackend, ComputeBackend, Kernel, NdarrayBackend, Operation,
    RayonBackend, Session, OPERATION_COUNT,
};
use crate::config::SweepConfig;
use crate::error::{BenchError, Result};
use crate::matrix::{Matrix, Shape};
use crate::operands::OperandGenerator;
use crate::results::{ResultTable, TimingRow};
use crate::timing::min_trial_time;

/// Times every operation of a backend over the configured size sweep.
pub struct BenchmarkRunner {
    config: SweepConfig,
}

impl BenchmarkRunner {
    pub fn new(config: SweepConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Runs the sweep on the backend selected at runtime.
    pub fn run_backend(&self, kind: BackendKind) -> Result<ResultTable> {
        match kind {
            BackendKind::Ndarray => self.run::<NdarrayBackend>(),
            BackendKind::Cpu => self.run::<CPUBackend>(),
            BackendKind::Rayon => self.run::<RayonBackend>(),
        }
    }

    /// Runs the sweep and persists the table into the configured output directory.
    pub fn run_and_save(&self, kind: BackendKind) -> Result<PathBuf> {
        let table = self.run_backend(kind)?;
        table.save(&self.config.output_dir)
    }

    /// Runs the sweep on backend `B`.
    ///
    /// Progress (the current size) and the final table are printed to stdout.
    pub fn run<B: ComputeBackend>(&self) -> Result<ResultTable> {
        println!("Benchmarking {}", B::NAME);
        info!(
            backend = B::NAME,
            min_size = self.config.min_size,
            max_size = self.config.max_size,
            step = self.config.step,
            repeats = self.config.repeats,
            "Starting benchmark"
        );

        let ctx = B::new()?;
        let kernels = kernel_table::<B>();
        let mut operands = OperandGenerator::new(self.config.seed);
        let mut table = ResultTable::new(B::NAME);

        for size in self.config.sizes() {
            println!("{size}");
            let row = self.bench_size::<B>(&ctx, &kernels, &mut operands, size)?;
            table.push(row);
        }

        println!("{table}");
        Ok(table)
    }

    #[instrument(skip(self, ctx, kernels, operands), fields(backend = B::NAME))]
    fn bench_size<B: ComputeBackend>(
        &self,
        ctx: &Arc<B::Context>,
        kernels: &[(Operation, Kernel<B>); OPERATION_COUNT],
        operands: &mut OperandGenerator,
        size: usize,
    ) -> Result<TimingRow> {
        let (a_data, b_data) = operands.pair(size);
        let a = Matrix::<B>::new(Arc::clone(ctx), Shape::square(size), &a_data)?;
        let b = Matrix::<B>::new(Arc::clone(ctx), Shape::square(size), &b_data)?;

        let mut times = [0.0; OPERATION_COUNT];
        for &(operation, kernel) in kernels {
            let elapsed = self
                .time_operation::<B>(ctx, operation, kernel, &a, &b)
                .map_err(|e| BenchError::in_operation(B::NAME, operation, e))?;
            times[operation.index()] = elapsed.as_secs_f64();
        }

        info!(backend = B::NAME, size, ?times, "Timed size");
        Ok(TimingRow { size, times })
    }

    fn time_operation<B: ComputeBackend>(
        &self,
        ctx: &B::Context,
        operation: Operation,
        kernel: Kernel<B>,
        a: &Matrix<B>,
        b: &Matrix<B>,
    ) -> Result<Duration> {
        let session = Session::<B>::open(ctx, operation)?;
        min_trial_time(self.config.repeats, || kernel(session.get(), a, b))
    }
}
