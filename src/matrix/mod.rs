use std::sync::Arc;
use crate::compute::ComputeBackend;
use crate::error::{Result, BenchError};
use tracing::{debug, error, instrument};

/// Represents the shape of a matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape(Vec<usize>);

impl Shape {
    pub fn new(dims: Vec<usize>) -> Self {
        Self(dims)
    }

    /// Shape of an `n x n` matrix
    pub fn square(n: usize) -> Self {
        Self(vec![n, n])
    }

    pub fn size(&self) -> usize {
        self.0.iter().product()
    }

    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// Returns the matrix dimensions (height, width)
    pub fn matrix_dims(&self) -> Result<(usize, usize)> {
        match self.0.as_slice() {
            &[rows, cols] => Ok((rows, cols)),
            dims => Err(BenchError::ShapeMismatch(format!(
                "Expected a 2D shape, got {:?}",
                dims
            ))),
        }
    }
}

/// A 2D matrix held in a backend buffer.
/// Uses Arc for sharing the backend context between operands.
pub struct Matrix<B: ComputeBackend> {
    buffer: B::Buffer,
    shape: Shape,
    ctx: Arc<B::Context>,
}

impl<B: ComputeBackend> Matrix<B> {
    /// Creates a new matrix with the given shape and row-major data.
    /// Uses the backend's buffer allocation mechanism.
    #[instrument(skip(ctx, data), fields(backend = B::NAME))]
    pub fn new(ctx: Arc<B::Context>, shape: Shape, data: &[f32]) -> Result<Self> {
        debug!("Creating new matrix with shape {:?}", shape);

        if data.len() != shape.size() {
            error!("Data length {} doesn't match shape size {}", data.len(), shape.size());
            return Err(BenchError::ShapeMismatch(
                format!("Data length {} doesn't match shape size {}", data.len(), shape.size())
            ));
        }

        let (rows, cols) = shape.matrix_dims()?;
        let buffer = B::allocate_buffer(&ctx, rows, cols, Some(data))?;
        debug!("Successfully allocated buffer for matrix");

        Ok(Self {
            buffer,
            shape,
            ctx,
        })
    }

    /// Creates a new matrix filled with zeros.
    pub fn zeros(ctx: Arc<B::Context>, shape: Shape) -> Result<Self> {
        let (rows, cols) = shape.matrix_dims()?;
        let buffer = B::allocate_buffer(&ctx, rows, cols, None)?;

        Ok(Self {
            buffer,
            shape,
            ctx,
        })
    }

    /// Returns the shape of the matrix.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Reads the matrix data into a row-major Vec<f32>.
    pub fn data(&self) -> Result<Vec<f32>> {
        B::read_buffer(&self.ctx, &self.buffer)
    }

    fn with_buffer(&self, buffer: B::Buffer, shape: Shape) -> Self {
        Self {
            buffer,
            shape,
            ctx: Arc::clone(&self.ctx),
        }
    }

    /// Performs matrix multiplication with another matrix
    pub fn matmul(&self, session: &B::Session, other: &Self) -> Result<Self> {
        let (m, k1) = self.shape.matrix_dims()?;
        let (k2, n) = other.shape.matrix_dims()?;

        if k1 != k2 {
            return Err(BenchError::ShapeMismatch(
                format!("Incompatible dimensions for matmul: {:?} and {:?}",
                    self.shape.dims(), other.shape.dims())
            ));
        }

        let result_buffer = B::matmul(session, &self.buffer, &other.buffer, m, n, k1)?;
        Ok(self.with_buffer(result_buffer, Shape::new(vec![m, n])))
    }

    /// Element-wise addition of two matrices.
    pub fn add(&self, session: &B::Session, other: &Self) -> Result<Self> {
        if self.shape != other.shape {
            return Err(BenchError::ShapeMismatch(
                format!("Cannot add matrices with shapes {:?} and {:?}", self.shape, other.shape)
            ));
        }

        let result_buffer = B::element_wise_add(
            session,
            &self.buffer,
            &other.buffer,
            self.shape.size(),
        )?;

        Ok(self.with_buffer(result_buffer, self.shape.clone()))
    }

    /// Element-wise exponential.
    pub fn exp(&self, session: &B::Session) -> Result<Self> {
        let result_buffer = B::exp(session, &self.buffer, self.shape.size())?;
        Ok(self.with_buffer(result_buffer, self.shape.clone()))
    }

    pub fn sum(&self, session: &B::Session) -> Result<f32> {
        B::sum(session, &self.buffer)
    }

    pub fn mean(&self, session: &B::Session) -> Result<f32> {
        B::mean(session, &self.buffer)
    }

    pub fn min(&self, session: &B::Session) -> Result<f32> {
        B::min(session, &self.buffer)
    }
}
