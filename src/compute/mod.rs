use std::fmt;
use std::hint::black_box;
use std::sync::Arc;

use crate::error::Result;
use crate::matrix::Matrix;

/// Trait representing the capabilities required for a compute backend.
pub trait ComputeBackend: Send + Sync + 'static {
    /// Name used in logs, errors and the result file name
    const NAME: &'static str;

    /// The buffer type used by this backend
    type Buffer: Send + Sync;
    /// The context type used by this backend
    type Context: Send + Sync + fmt::Debug;
    /// Execution scope for a single timed operation.
    ///
    /// Backends that need no per-operation state use `()`. Whatever the session
    /// holds is released when it is dropped.
    type Session;

    /// Creates a new instance of the compute backend
    fn new() -> Result<Arc<Self::Context>>;

    /// Opens the execution scope for one operation
    fn open_session(ctx: &Self::Context) -> Result<Self::Session>;

    /// Allocates a `rows x cols` buffer, optionally filled from row-major `data`
    fn allocate_buffer(
        ctx: &Self::Context,
        rows: usize,
        cols: usize,
        data: Option<&[f32]>,
    ) -> Result<Self::Buffer>;

    /// Reads data from the buffer into a row-major Vec<f32>
    fn read_buffer(ctx: &Self::Context, buffer: &Self::Buffer) -> Result<Vec<f32>>;

    /// Performs matrix multiplication C = A * B
    ///
    /// # Arguments
    /// * `a` - Left matrix (M x K)
    /// * `b` - Right matrix (K x N)
    /// * `m` - Number of rows in result
    /// * `n` - Number of columns in result
    /// * `k` - Inner dimension
    fn matmul(
        session: &Self::Session,
        a: &Self::Buffer,
        b: &Self::Buffer,
        m: usize,
        n: usize,
        k: usize,
    ) -> Result<Self::Buffer>;

    /// Performs element-wise addition
    fn element_wise_add(
        session: &Self::Session,
        a: &Self::Buffer,
        b: &Self::Buffer,
        size: usize,
    ) -> Result<Self::Buffer>;

    /// Applies `e^x` to every element
    fn exp(session: &Self::Session, input: &Self::Buffer, size: usize) -> Result<Self::Buffer>;

    /// Sum of all elements
    fn sum(session: &Self::Session, input: &Self::Buffer) -> Result<f32>;

    /// Arithmetic mean of all elements
    fn mean(session: &Self::Session, input: &Self::Buffer) -> Result<f32>;

    /// Smallest element
    fn min(session: &Self::Session, input: &Self::Buffer) -> Result<f32>;

    /// Synchronizes the backend (if needed)
    fn synchronize(_session: &Self::Session) -> Result<()> {
        Ok(())
    }
}

/// Number of benchmarked operations, and of timing columns per result row.
pub const OPERATION_COUNT: usize = 6;

/// The benchmarked operations, in result-column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Dot,
    Add,
    Exp,
    Sum,
    Mean,
    Min,
}

impl Operation {
    pub const ALL: [Operation; OPERATION_COUNT] = [
        Operation::Dot,
        Operation::Add,
        Operation::Exp,
        Operation::Sum,
        Operation::Mean,
        Operation::Min,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Dot => "dot",
            Operation::Add => "add",
            Operation::Exp => "exp",
            Operation::Sum => "sum",
            Operation::Mean => "mean",
            Operation::Min => "min",
        }
    }

    /// Position of this operation's timing within a row, after the size column.
    pub fn index(self) -> usize {
        match self {
            Operation::Dot => 0,
            Operation::Add => 1,
            Operation::Exp => 2,
            Operation::Sum => 3,
            Operation::Mean => 4,
            Operation::Min => 5,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The backends selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Ndarray,
    Cpu,
    Rayon,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [BackendKind::Ndarray, BackendKind::Cpu, BackendKind::Rayon];

    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Ndarray => NdarrayBackend::NAME,
            BackendKind::Cpu => CPUBackend::NAME,
            BackendKind::Rayon => RayonBackend::NAME,
        }
    }

    pub fn names() -> [&'static str; 3] {
        Self::ALL.map(BackendKind::name)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One timed execution of an operation on a pair of operands.
pub type Kernel<B> =
    fn(&<B as ComputeBackend>::Session, &Matrix<B>, &Matrix<B>) -> Result<()>;

/// Maps every operation to the kernel that runs it on backend `B`.
pub fn kernel_table<B: ComputeBackend>() -> [(Operation, Kernel<B>); OPERATION_COUNT] {
    [
        (Operation::Dot, run_dot::<B> as Kernel<B>),
        (Operation::Add, run_add::<B> as Kernel<B>),
        (Operation::Exp, run_exp::<B> as Kernel<B>),
        (Operation::Sum, run_sum::<B> as Kernel<B>),
        (Operation::Mean, run_mean::<B> as Kernel<B>),
        (Operation::Min, run_min::<B> as Kernel<B>),
    ]
}

fn run_dot<B: ComputeBackend>(session: &B::Session, a: &Matrix<B>, b: &Matrix<B>) -> Result<()> {
    black_box(a.matmul(session, b)?);
    B::synchronize(session)
}

fn run_add<B: ComputeBackend>(session: &B::Session, a: &Matrix<B>, b: &Matrix<B>) -> Result<()> {
    black_box(a.add(session, b)?);
    B::synchronize(session)
}

fn run_exp<B: ComputeBackend>(session: &B::Session, a: &Matrix<B>, _b: &Matrix<B>) -> Result<()> {
    black_box(a.exp(session)?);
    B::synchronize(session)
}

fn run_sum<B: ComputeBackend>(session: &B::Session, a: &Matrix<B>, _b: &Matrix<B>) -> Result<()> {
    black_box(a.sum(session)?);
    B::synchronize(session)
}

fn run_mean<B: ComputeBackend>(session: &B::Session, a: &Matrix<B>, _b: &Matrix<B>) -> Result<()> {
    black_box(a.mean(session)?);
    B::synchronize(session)
}

fn run_min<B: ComputeBackend>(session: &B::Session, a: &Matrix<B>, _b: &Matrix<B>) -> Result<()> {
    black_box(a.min(session)?);
    B::synchronize(session)
}

mod array;
mod cpu;
mod parallel;
mod session;

pub use array::{NdarrayBackend, NdarrayContext};
pub use cpu::{CPUBackend, CPUContext};
pub use parallel::{RayonBackend, RayonContext};
pub use session::Session;
